//! [`Defaulted`]: a value paired with its canonical default.
//!
//! The wrapper remembers whether a value was ever explicitly set, so a
//! round trip through text can distinguish "the user chose 8" from "nobody
//! said anything, 8 is the fallback". Fields of this type export their
//! sentinel when unassigned and snap back to their default when the
//! sentinel is read in.

use std::any::Any;

use crate::error::Failure;
use crate::reader::Reader;
use crate::writer::Writer;

/// A value that knows its own default and whether it has been overridden.
///
/// [`assign`](Defaulted::assign) deliberately transfers only the
/// assigned state: the destination keeps its own fallback, and assigning
/// from an unassigned source resets the destination to that fallback.
/// Construction and [`map`](Defaulted::map) carry both halves.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Defaulted<T> {
    assigned: Option<T>,
    fallback: T,
}

impl<T> Defaulted<T> {
    /// Unassigned, with `fallback` as the canonical default.
    pub fn new(fallback: T) -> Self {
        Defaulted {
            assigned: None,
            fallback,
        }
    }

    /// The effective value: the assigned one if present, else the default.
    pub fn value(&self) -> &T {
        self.assigned.as_ref().unwrap_or(&self.fallback)
    }

    /// The canonical default, regardless of assignment.
    pub fn default_value(&self) -> &T {
        &self.fallback
    }

    /// Assign an explicit value.
    pub fn set(&mut self, value: T) {
        self.assigned = Some(value);
    }

    /// Replace the canonical default. Does not touch the assigned value,
    /// so this only shows through [`value`](Defaulted::value) while
    /// unassigned.
    pub fn set_default(&mut self, fallback: T) {
        self.fallback = fallback;
    }

    /// Drop the assigned value and fall back to the default.
    pub fn reset(&mut self) {
        self.assigned = None;
    }

    /// Whether an explicit value is present.
    pub fn is_assigned(&self) -> bool {
        self.assigned.is_some()
    }

    /// Whether the effective value is the default.
    pub fn is_default(&self) -> bool {
        self.assigned.is_none()
    }

    /// Take over the assigned state of `other`, keeping this value's own
    /// default. An unassigned `other` resets this value to its default.
    pub fn assign(&mut self, other: Defaulted<T>) {
        self.assigned = other.assigned;
    }

    /// Apply `f` to both the assigned value (when present) and the default.
    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Defaulted<U> {
        Defaulted {
            assigned: self.assigned.map(&mut f),
            fallback: f(self.fallback),
        }
    }
}

/// Build a reader for `Defaulted<T>`: the sentinel text yields an
/// unassigned value, anything else parses as `T` through the registry.
///
/// The fallback half of the result is a placeholder `T::default()`; when
/// the value lands in a record field via
/// [`bind_defaulted`](crate::spec::bind_defaulted), only the assigned
/// state transfers and the field keeps its configured default.
pub fn read_defaulted<T>(
    sentinel: &str,
) -> impl Fn(&str, &Reader) -> Result<Defaulted<T>, Failure> + Send + Sync + 'static
where
    T: Any + Default,
{
    let sentinel = sentinel.to_string();
    move |text, reader| {
        if text == sentinel {
            return Ok(Defaulted::default());
        }
        let mut value = Defaulted::default();
        value.set(reader.read::<T>(text)?);
        Ok(value)
    }
}

/// [`read_defaulted`] with an explicit per-value reader.
pub fn read_defaulted_with<T, F>(
    read_field: F,
    sentinel: &str,
) -> impl Fn(&str) -> Result<Defaulted<T>, Failure> + Send + Sync + 'static
where
    T: Default,
    F: Fn(&str) -> Result<T, Failure> + Send + Sync + 'static,
{
    let sentinel = sentinel.to_string();
    move |text| {
        if text == sentinel {
            return Ok(Defaulted::default());
        }
        let mut value = Defaulted::default();
        value.set(read_field(text)?);
        Ok(value)
    }
}

/// Build a writer for `Defaulted<T>`: an unassigned value renders as the
/// sentinel, an assigned one as `T` through the registry.
pub fn write_defaulted<T: Any>(
    sentinel: &str,
) -> impl Fn(&Defaulted<T>, &Writer) -> Result<String, Failure> + Send + Sync + 'static {
    let sentinel = sentinel.to_string();
    move |value, writer| {
        if value.is_default() {
            Ok(sentinel.clone())
        } else {
            writer.write::<T>(value.value())
        }
    }
}

/// [`write_defaulted`] with an explicit per-value writer.
pub fn write_defaulted_with<T, F>(
    write_field: F,
    sentinel: &str,
) -> impl Fn(&Defaulted<T>) -> Result<String, Failure> + Send + Sync + 'static
where
    F: Fn(&T) -> Result<String, Failure> + Send + Sync + 'static,
{
    let sentinel = sentinel.to_string();
    move |value| {
        if value.is_default() {
            Ok(sentinel.clone())
        } else {
            write_field(value.value())
        }
    }
}
