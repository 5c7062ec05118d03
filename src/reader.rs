//! Reader registry: a type-indexed table of text-to-value conversion
//! functions.
//!
//! A [`Reader`] maps a [`TypeId`] to a parse function, so a specification
//! that only knows its field type at runtime (as a type tag) can still find
//! a statically-typed parser for it. Registered functions may take the
//! registry itself as a second argument, which is how container readers such
//! as [`read_dsv`] delegate per-element parsing back to the registry.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use crate::erased;
use crate::error::Failure;

type ReadFn = Arc<dyn Fn(&Reader, &str) -> Result<Box<dyn Any>, Failure> + Send + Sync>;

/// Type-indexed registry of parse functions.
///
/// At most one function is registered per type; adding a second one for the
/// same type replaces the first. Registries are cheap to clone (entries are
/// shared), which is the composition story: start from
/// [`default_reader()`], clone, and [`with`](Reader::with) the extras on.
///
/// A registry is immutable in use: build it up front, then share it freely
/// (`Reader` is `Send + Sync`).
#[derive(Clone, Default)]
pub struct Reader {
    entries: HashMap<TypeId, ReadFn>,
}

impl Reader {
    /// An empty registry.
    pub fn new() -> Self {
        Reader {
            entries: HashMap::new(),
        }
    }

    /// Register `read` under the type it returns.
    pub fn add<T, F>(&mut self, read: F)
    where
        T: Any,
        F: Fn(&str) -> Result<T, Failure> + Send + Sync + 'static,
    {
        self.entries.insert(
            TypeId::of::<T>(),
            Arc::new(move |_, repn| read(repn).map(|v| Box::new(v) as Box<dyn Any>)),
        );
    }

    /// Register a reader that can call back into the registry, for
    /// container or otherwise cooperating readers.
    pub fn add_recursive<T, F>(&mut self, read: F)
    where
        T: Any,
        F: Fn(&str, &Reader) -> Result<T, Failure> + Send + Sync + 'static,
    {
        self.entries.insert(
            TypeId::of::<T>(),
            Arc::new(move |reader, repn| read(repn, reader).map(|v| Box::new(v) as Box<dyn Any>)),
        );
    }

    /// Chaining form of [`add`](Reader::add).
    pub fn with<T, F>(mut self, read: F) -> Self
    where
        T: Any,
        F: Fn(&str) -> Result<T, Failure> + Send + Sync + 'static,
    {
        self.add(read);
        self
    }

    /// Chaining form of [`add_recursive`](Reader::add_recursive).
    pub fn with_recursive<T, F>(mut self, read: F) -> Self
    where
        T: Any,
        F: Fn(&str, &Reader) -> Result<T, Failure> + Send + Sync + 'static,
    {
        self.add_recursive(read);
        self
    }

    /// Copy every entry of `other` into this registry. Incoming entries win
    /// ties for the same type.
    pub fn extend(&mut self, other: &Reader) {
        for (ty, read) in &other.entries {
            self.entries.insert(*ty, Arc::clone(read));
        }
    }

    /// Parse `repn` as a `T`.
    ///
    /// Fails with `unsupported_type` when no reader is registered for `T`,
    /// or with whatever the registered reader reports.
    pub fn read<T: Any>(&self, repn: &str) -> Result<T, Failure> {
        erased::downcast_value::<T>(self.read_erased(TypeId::of::<T>(), repn)?)
    }

    /// Parse `repn` by runtime type identity, yielding an erased value.
    pub fn read_erased(&self, ty: TypeId, repn: &str) -> Result<Box<dyn Any>, Failure> {
        let read = self.entries.get(&ty).ok_or_else(Failure::unsupported_type)?;
        read(self, repn)
    }
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reader({} types)", self.entries.len())
    }
}

/// Parse via [`FromStr`], mapping any parse error to `read_failure`.
///
/// Useful for registering custom field types:
/// `reader.with(read_from_str::<MyType>)`.
pub fn read_from_str<T: FromStr>(text: &str) -> Result<T, Failure> {
    text.parse::<T>().map_err(|_| Failure::read_failure())
}

fn read_int<T>(text: &str) -> Result<T, Failure>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    text.parse::<T>().map_err(|e| match e.kind() {
        // The text is a well-formed number that the type cannot hold.
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            Failure::invalid_value("value out of representable range")
        }
        _ => Failure::read_failure(),
    })
}

/// Build a reader for `Vec<T>` from delimiter-separated text.
///
/// Elements are parsed through the registry the returned function is
/// registered in, so `T` needs its own entry there. Leading spaces and tabs
/// are skipped per field; empty input is an empty vector. The delimiter may
/// be more than one character.
pub fn read_dsv<T: Any>(
    delimiter: &str,
) -> impl Fn(&str, &Reader) -> Result<Vec<T>, Failure> + Send + Sync + 'static {
    let delimiter = delimiter.to_string();
    move |text, reader| {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        text.split(delimiter.as_str())
            .map(|field| reader.read::<T>(field.trim_start_matches([' ', '\t'])))
            .collect()
    }
}

/// [`read_dsv`] with an explicit per-element reader and skip set instead of
/// registry delegation.
pub fn read_dsv_with<T, F>(
    read_field: F,
    delimiter: &str,
    skip: &str,
) -> impl Fn(&str) -> Result<Vec<T>, Failure> + Send + Sync + 'static
where
    F: Fn(&str) -> Result<T, Failure> + Send + Sync + 'static,
{
    let delimiter = delimiter.to_string();
    let skip: Vec<char> = skip.chars().collect();
    move |text| {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        text.split(delimiter.as_str())
            .map(|field| read_field(field.trim_start_matches(skip.as_slice())))
            .collect()
    }
}

macro_rules! add_numeric_readers {
    ($reader:expr, $parse:ident, $($t:ty),+ $(,)?) => {
        $(
            $reader.add($parse::<$t>);
            $reader.add_recursive(read_dsv::<$t>(","));
        )+
    };
}

fn build_default_reader() -> Reader {
    let mut reader = Reader::new();
    add_numeric_readers!(
        reader, read_int, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
    );
    add_numeric_readers!(reader, read_from_str, f32, f64);
    reader.add(read_from_str::<bool>);
    reader.add(read_from_str::<String>);
    reader
}

/// The shared default registry: all primitive integers and floats, `bool`
/// (literal `true`/`false` only), `String` (verbatim), and `Vec` of every
/// numeric scalar as comma-separated text.
///
/// Lazily initialized once, immutable afterwards. To customize, clone and
/// extend: `default_reader().clone().with(read_from_str::<Fish>)`.
pub fn default_reader() -> &'static Reader {
    static DEFAULT: LazyLock<Reader> = LazyLock::new(build_default_reader);
    &DEFAULT
}
