//! Writer registry: the inverse of [`Reader`](crate::reader::Reader),
//! mapping a [`TypeId`] to a value-to-text conversion function.
//!
//! Values cross the registry boundary as `&dyn Any`; each registered
//! function downcasts back to its own concrete type, so a mismatch between
//! the type tag and the value behind it surfaces as `internal_error` rather
//! than undefined nonsense.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::erased;
use crate::error::Failure;

type WriteFn = Arc<dyn Fn(&Writer, &dyn Any) -> Result<String, Failure> + Send + Sync>;

/// Type-indexed registry of write functions.
///
/// Mirrors [`Reader`](crate::reader::Reader): one entry per type, last
/// registration wins, cheap to clone, composable via
/// [`extend`](Writer::extend).
#[derive(Clone, Default)]
pub struct Writer {
    entries: HashMap<TypeId, WriteFn>,
}

impl Writer {
    /// An empty registry.
    pub fn new() -> Self {
        Writer {
            entries: HashMap::new(),
        }
    }

    /// Register `write` under the type it takes.
    pub fn add<T, F>(&mut self, write: F)
    where
        T: Any,
        F: Fn(&T) -> Result<String, Failure> + Send + Sync + 'static,
    {
        self.entries.insert(
            TypeId::of::<T>(),
            Arc::new(move |_, value| write(erased::downcast_ref::<T>(value)?)),
        );
    }

    /// Register a writer that can call back into the registry.
    pub fn add_recursive<T, F>(&mut self, write: F)
    where
        T: Any,
        F: Fn(&T, &Writer) -> Result<String, Failure> + Send + Sync + 'static,
    {
        self.entries.insert(
            TypeId::of::<T>(),
            Arc::new(move |writer, value| write(erased::downcast_ref::<T>(value)?, writer)),
        );
    }

    /// Chaining form of [`add`](Writer::add).
    pub fn with<T, F>(mut self, write: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Result<String, Failure> + Send + Sync + 'static,
    {
        self.add(write);
        self
    }

    /// Chaining form of [`add_recursive`](Writer::add_recursive).
    pub fn with_recursive<T, F>(mut self, write: F) -> Self
    where
        T: Any,
        F: Fn(&T, &Writer) -> Result<String, Failure> + Send + Sync + 'static,
    {
        self.add_recursive(write);
        self
    }

    /// Copy every entry of `other` into this registry. Incoming entries win
    /// ties for the same type.
    pub fn extend(&mut self, other: &Writer) {
        for (ty, write) in &other.entries {
            self.entries.insert(*ty, Arc::clone(write));
        }
    }

    /// Render `value` as text.
    ///
    /// Fails with `unsupported_type` when no writer is registered for `T`.
    pub fn write<T: Any>(&self, value: &T) -> Result<String, Failure> {
        self.write_erased(TypeId::of::<T>(), value)
    }

    /// Render an erased value by runtime type identity. `ty` must be the
    /// type of the value behind the reference, or the registered writer
    /// reports `internal_error`.
    pub fn write_erased(&self, ty: TypeId, value: &dyn Any) -> Result<String, Failure> {
        let write = self.entries.get(&ty).ok_or_else(Failure::unsupported_type)?;
        write(self, value)
    }
}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Writer({} types)", self.entries.len())
    }
}

/// Render via [`Display`](fmt::Display). The counterpart of
/// [`read_from_str`](crate::reader::read_from_str) for registering custom
/// field types.
pub fn write_to_string<T: fmt::Display>(value: &T) -> Result<String, Failure> {
    Ok(value.to_string())
}

/// Build a writer for `Vec<T>` producing delimiter-separated text.
///
/// Elements are rendered through the registry the returned function is
/// registered in. No padding is added around the delimiter; an empty vector
/// renders as empty text.
pub fn write_dsv<T: Any>(
    delimiter: &str,
) -> impl Fn(&Vec<T>, &Writer) -> Result<String, Failure> + Send + Sync + 'static {
    let delimiter = delimiter.to_string();
    move |values, writer| {
        let mut fields = Vec::with_capacity(values.len());
        for value in values {
            fields.push(writer.write::<T>(value)?);
        }
        Ok(fields.join(&delimiter))
    }
}

/// [`write_dsv`] with an explicit per-element writer instead of registry
/// delegation.
pub fn write_dsv_with<T, F>(
    write_field: F,
    delimiter: &str,
) -> impl Fn(&Vec<T>) -> Result<String, Failure> + Send + Sync + 'static
where
    F: Fn(&T) -> Result<String, Failure> + Send + Sync + 'static,
{
    let delimiter = delimiter.to_string();
    move |values| {
        let mut fields = Vec::with_capacity(values.len());
        for value in values {
            fields.push(write_field(value)?);
        }
        Ok(fields.join(&delimiter))
    }
}

macro_rules! add_numeric_writers {
    ($writer:expr, $($t:ty),+ $(,)?) => {
        $(
            $writer.add(write_to_string::<$t>);
            $writer.add_recursive(write_dsv::<$t>(","));
        )+
    };
}

fn build_default_writer() -> Writer {
    let mut writer = Writer::new();
    add_numeric_writers!(
        writer, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
    );
    writer.add(write_to_string::<bool>);
    writer.add(write_to_string::<String>);
    writer
}

/// The shared default registry, covering the same types as
/// [`default_reader()`](crate::reader::default_reader). Floats render in
/// shortest form that reads back to the identical value.
pub fn default_writer() -> &'static Writer {
    static DEFAULT: LazyLock<Writer> = LazyLock::new(build_default_writer);
    &DEFAULT
}
