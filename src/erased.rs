//! Helpers for the type-erased boundary between registries and
//! specifications.
//!
//! Values cross that boundary as [`Box<dyn Any>`] (owned, into an assign)
//! or [`&dyn Any`](Any) (borrowed, out of a retrieve). A downcast mismatch
//! means a specification and a registry entry disagree about a field's type,
//! which is a wiring bug, so it surfaces as
//! [`InternalError`](crate::FailureKind::InternalError) rather than a
//! user-input failure.

use std::any::Any;

use crate::error::Failure;

/// Recover an owned `T` from an erased value.
pub fn downcast_value<T: Any>(value: Box<dyn Any>) -> Result<T, Failure> {
    match value.downcast::<T>() {
        Ok(boxed) => Ok(*boxed),
        Err(_) => Err(Failure::internal_error()),
    }
}

/// Borrow a `T` out of an erased reference.
pub fn downcast_ref<T: Any>(value: &dyn Any) -> Result<&T, Failure> {
    value.downcast_ref::<T>().ok_or_else(Failure::internal_error)
}
