//! Keyed views: string-keyed, dynamically-typed access to a record's
//! fields through its [`SpecificationMap`].
//!
//! Views move whole typed values, not text, so no conversion registry is
//! involved. [`KeyedView`] reads; [`KeyedViewMut`] also assigns, running
//! the field's validator on the way in.

use std::any::Any;

use crate::erased;
use crate::error::Failure;
use crate::map::SpecificationMap;

/// Read-only keyed access to `record`.
pub struct KeyedView<'a, R: 'static> {
    record: &'a R,
    specs: &'a SpecificationMap<R>,
}

impl<'a, R: 'static> KeyedView<'a, R> {
    pub fn new(record: &'a R, specs: &'a SpecificationMap<R>) -> Self {
        KeyedView { record, specs }
    }

    /// Clone out the field named `key` as a `T`.
    ///
    /// Reports `unrecognized_key` for an unknown key, `empty_optional` for
    /// an unassigned optional field, and `internal_error` when `T` is not
    /// the field's type.
    pub fn try_get<T: Any + Clone>(&self, key: &str) -> Result<T, Failure> {
        get_typed(self.record, self.specs, key)
    }

    /// [`try_get`](KeyedView::try_get), panicking on failure.
    #[track_caller]
    pub fn get<T: Any + Clone>(&self, key: &str) -> T {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.specs.contains_key(key)
    }
}

/// Mutable keyed access to `record`.
pub struct KeyedViewMut<'a, R: 'static> {
    record: &'a mut R,
    specs: &'a SpecificationMap<R>,
}

impl<'a, R: 'static> KeyedViewMut<'a, R> {
    pub fn new(record: &'a mut R, specs: &'a SpecificationMap<R>) -> Self {
        KeyedViewMut { record, specs }
    }

    /// Clone out the field named `key` as a `T`.
    pub fn try_get<T: Any + Clone>(&self, key: &str) -> Result<T, Failure> {
        get_typed(self.record, self.specs, key)
    }

    /// [`try_get`](KeyedViewMut::try_get), panicking on failure.
    #[track_caller]
    pub fn get<T: Any + Clone>(&self, key: &str) -> T {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }

    /// Validate `value` and store it into the field named `key`. The field
    /// is untouched when the validator rejects or the type is wrong.
    pub fn try_set<V: Any>(&mut self, key: &str, value: V) -> Result<(), Failure> {
        match self.specs.get(key) {
            Some(spec) => spec.assign(self.record, value),
            None => Err(Failure::unrecognized_key(key)),
        }
    }

    /// [`try_set`](KeyedViewMut::try_set), panicking on failure.
    #[track_caller]
    pub fn set<V: Any>(&mut self, key: &str, value: V) {
        if let Err(e) = self.try_set(key, value) {
            panic!("{e}");
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.specs.contains_key(key)
    }
}

fn get_typed<R: 'static, T: Any + Clone>(
    record: &R,
    specs: &SpecificationMap<R>,
    key: &str,
) -> Result<T, Failure> {
    let spec = specs
        .get(key)
        .ok_or_else(|| Failure::unrecognized_key(key))?;
    let value = spec.retrieve(record)?;
    let value = erased::downcast_ref::<T>(value).map_err(|e| e.with_key(spec.key()))?;
    Ok(value.clone())
}
