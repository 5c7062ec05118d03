//! Field specifications: the bridge between a typed record field and the
//! type-erased machinery that moves values in and out of it as text.
//!
//! A [`Specification`] owns a key, a human-readable description, and three
//! erased closures built from a [`Bind`] accessor pair plus a
//! [`Validator`]. Once constructed, specifications for differently-typed
//! fields of the same record are a uniform type and can live side by side
//! in one collection.

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::defaulted::Defaulted;
use crate::erased;
use crate::error::{Failure, FailureKind};
use crate::reader::Reader;
use crate::validate::Validator;
use crate::writer::Writer;

/// Access to one field of a record.
///
/// `peek` may come back empty (an unassigned `Option` field has nothing to
/// show); `put` always lands a value. The associated `Base` type is what
/// crosses the conversion registries for this field, which for a
/// [`Defaulted`] field is the whole wrapper so sentinel handling stays with
/// the registered reader and writer.
pub trait Bind<R>: Send + Sync + 'static {
    type Base: Any + Clone + Send + Sync;

    fn peek<'r>(&self, record: &'r R) -> Option<&'r Self::Base>;
    fn put(&self, record: &mut R, value: Self::Base);
}

/// Plain field access: `peek` always sees the value, `put` replaces it.
pub struct Binding<R, F> {
    get: fn(&R) -> &F,
    get_mut: fn(&mut R) -> &mut F,
}

impl<R, F> Clone for Binding<R, F> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<R, F> Copy for Binding<R, F> {}

impl<R, F> Bind<R> for Binding<R, F>
where
    R: 'static,
    F: Any + Clone + Send + Sync,
{
    type Base = F;

    fn peek<'r>(&self, record: &'r R) -> Option<&'r F> {
        Some((self.get)(record))
    }

    fn put(&self, record: &mut R, value: F) {
        *(self.get_mut)(record) = value;
    }
}

/// Access to an `Option<F>` field in terms of `F`: `peek` is empty while
/// the field is `None`, `put` wraps in `Some`.
pub struct OptionBinding<R, F> {
    get: fn(&R) -> &Option<F>,
    get_mut: fn(&mut R) -> &mut Option<F>,
}

impl<R, F> Clone for OptionBinding<R, F> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<R, F> Copy for OptionBinding<R, F> {}

impl<R, F> Bind<R> for OptionBinding<R, F>
where
    R: 'static,
    F: Any + Clone + Send + Sync,
{
    type Base = F;

    fn peek<'r>(&self, record: &'r R) -> Option<&'r F> {
        (self.get)(record).as_ref()
    }

    fn put(&self, record: &mut R, value: F) {
        *(self.get_mut)(record) = Some(value);
    }
}

/// Access to a [`Defaulted<F>`] field in terms of the whole wrapper.
/// `put` goes through [`Defaulted::assign`], so the field keeps its own
/// canonical default and an unassigned incoming value resets it.
pub struct DefaultedBinding<R, F> {
    get: fn(&R) -> &Defaulted<F>,
    get_mut: fn(&mut R) -> &mut Defaulted<F>,
}

impl<R, F> Clone for DefaultedBinding<R, F> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<R, F> Copy for DefaultedBinding<R, F> {}

impl<R, F> Bind<R> for DefaultedBinding<R, F>
where
    R: 'static,
    F: Any + Clone + Send + Sync,
{
    type Base = Defaulted<F>;

    fn peek<'r>(&self, record: &'r R) -> Option<&'r Defaulted<F>> {
        Some((self.get)(record))
    }

    fn put(&self, record: &mut R, value: Defaulted<F>) {
        (self.get_mut)(record).assign(value);
    }
}

/// Bind a plain field through an accessor pair. Non-capturing closures
/// coerce to the function pointers: `bind(|r: &Rec| &r.port, |r: &mut Rec|
/// &mut r.port)`.
pub fn bind<R, F>(get: fn(&R) -> &F, get_mut: fn(&mut R) -> &mut F) -> Binding<R, F> {
    Binding { get, get_mut }
}

/// Bind an `Option` field.
pub fn bind_optional<R, F>(
    get: fn(&R) -> &Option<F>,
    get_mut: fn(&mut R) -> &mut Option<F>,
) -> OptionBinding<R, F> {
    OptionBinding { get, get_mut }
}

/// Bind a [`Defaulted`] field.
pub fn bind_defaulted<R, F>(
    get: fn(&R) -> &Defaulted<F>,
    get_mut: fn(&mut R) -> &mut Defaulted<F>,
) -> DefaultedBinding<R, F> {
    DefaultedBinding { get, get_mut }
}

type AssignFn<R> = Arc<dyn Fn(&mut R, Box<dyn Any>) -> Result<(), Failure> + Send + Sync>;
type RetrieveFn<R> = Arc<dyn for<'r> Fn(&'r R) -> Option<&'r dyn Any> + Send + Sync>;
type ValidateFn<R> = Arc<dyn Fn(&R) -> Result<(), Failure> + Send + Sync>;

/// One record field described for text round-tripping: key, description,
/// field type tag, and erased assign/retrieve/validate functions.
///
/// Every failure leaving a specification is tagged with the field's key.
pub struct Specification<R: 'static> {
    key: String,
    description: String,
    field_type: TypeId,
    assign_fn: AssignFn<R>,
    retrieve_fn: RetrieveFn<R>,
    validate_fn: ValidateFn<R>,
}

impl<R: 'static> Clone for Specification<R> {
    fn clone(&self) -> Self {
        Specification {
            key: self.key.clone(),
            description: self.description.clone(),
            field_type: self.field_type,
            assign_fn: Arc::clone(&self.assign_fn),
            retrieve_fn: Arc::clone(&self.retrieve_fn),
            validate_fn: Arc::clone(&self.validate_fn),
        }
    }
}

impl<R: 'static> std::fmt::Debug for Specification<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Specification")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<R: 'static> Specification<R> {
    /// Describe a field: where it lives (`binding`), what it is called
    /// (`key`), and what values it accepts (`validator`).
    pub fn new<B>(key: impl Into<String>, binding: B, validator: Validator<B::Base>) -> Self
    where
        B: Bind<R> + Clone,
    {
        let assign_binding = binding.clone();
        let assign_validator = validator.clone();
        let assign_fn: AssignFn<R> = Arc::new(move |record, value| {
            let value = erased::downcast_value::<B::Base>(value)?;
            let value = assign_validator.run(value)?;
            assign_binding.put(record, value);
            Ok(())
        });

        let retrieve_binding = binding.clone();
        let retrieve_fn: RetrieveFn<R> = Arc::new(move |record| {
            retrieve_binding
                .peek(record)
                .map(|value| value as &dyn Any)
        });

        let validate_fn: ValidateFn<R> = Arc::new(move |record| match binding.peek(record) {
            Some(value) => validator.run(value.clone()).map(|_| ()),
            None => Err(Failure::empty_optional()),
        });

        Specification {
            key: key.into(),
            description: String::new(),
            field_type: TypeId::of::<B::Base>(),
            assign_fn,
            retrieve_fn,
            validate_fn,
        }
    }

    /// Re-root `inner`, a specification over a nested record type, onto
    /// the outer record through an accessor pair. The outer key replaces
    /// the inner one; the description carries over until
    /// [`describe`](Specification::describe)d away.
    pub fn delegate<S>(
        key: impl Into<String>,
        get: fn(&R) -> &S,
        get_mut: fn(&mut R) -> &mut S,
        inner: Specification<S>,
    ) -> Self
    where
        S: 'static,
    {
        let inner_assign = inner.assign_fn;
        let inner_retrieve = inner.retrieve_fn;
        let inner_validate = inner.validate_fn;
        let assign_fn: AssignFn<R> =
            Arc::new(move |record, value| inner_assign(get_mut(record), value));
        let retrieve_fn: RetrieveFn<R> = Arc::new(move |record| inner_retrieve(get(record)));
        let validate_fn: ValidateFn<R> = Arc::new(move |record| inner_validate(get(record)));
        Specification {
            key: key.into(),
            description: inner.description,
            field_type: inner.field_type,
            assign_fn,
            retrieve_fn,
            validate_fn,
        }
    }

    /// Chaining setter for the description shown by exporters.
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Type tag of the value crossing the registries for this field.
    pub fn field_type(&self) -> TypeId {
        self.field_type
    }

    /// Parse `repn` with `reader`, validate, and store into `record`.
    pub fn read(&self, record: &mut R, repn: &str, reader: &Reader) -> Result<(), Failure> {
        let value = reader
            .read_erased(self.field_type, repn)
            .map_err(|e| e.with_key(self.key.as_str()))?;
        self.assign_erased(record, value)
    }

    /// Render the field's current value with `writer`. An unassigned
    /// optional field reports `empty_optional`.
    pub fn write(&self, record: &R, writer: &Writer) -> Result<String, Failure> {
        let value = self.retrieve(record)?;
        writer
            .write_erased(self.field_type, value)
            .map_err(|e| e.with_key(self.key.as_str()))
    }

    /// Validate and store a typed value. The type must match the bound
    /// field's base type or the assignment reports `internal_error`.
    pub fn assign<V: Any>(&self, record: &mut R, value: V) -> Result<(), Failure> {
        self.assign_erased(record, Box::new(value))
    }

    /// Validate and store an already-erased value.
    pub fn assign_erased(&self, record: &mut R, value: Box<dyn Any>) -> Result<(), Failure> {
        (self.assign_fn)(record, value).map_err(|e| e.with_key(self.key.as_str()))
    }

    /// Borrow the field's current value, erased. An unassigned optional
    /// field reports `empty_optional`.
    pub fn retrieve<'r>(&self, record: &'r R) -> Result<&'r dyn Any, Failure> {
        (self.retrieve_fn)(record)
            .ok_or_else(|| Failure::empty_optional().with_key(self.key.as_str()))
    }

    /// Check the field's current value against the validator without
    /// modifying anything. An unassigned optional field reports
    /// `empty_optional`.
    pub fn validate(&self, record: &R) -> Result<(), Failure> {
        (self.validate_fn)(record).map_err(|e| e.with_key(self.key.as_str()))
    }
}

/// Validate every field of `record`, collecting the failures. Unassigned
/// optional fields are skipped; absence is not invalidity here.
pub fn validate_record<R: 'static>(record: &R, specs: &[Specification<R>]) -> Vec<Failure> {
    specs
        .iter()
        .filter_map(|spec| match spec.validate(record) {
            Ok(()) => None,
            Err(e) if e.kind == FailureKind::EmptyOptional => None,
            Err(e) => Some(e),
        })
        .collect()
}
