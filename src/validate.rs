//! Validator combinators.
//!
//! A [`Validator`] takes a value, checks it, and hands it back, so a chain
//! built with [`and`](Validator::and) is free to transform along the way
//! (clamping, normalizing case) as well as reject. Rejection is an
//! `invalid_value` failure whose constraint text names the rule that was
//! broken; the chain stops at the first rejection.

use std::fmt;
use std::sync::Arc;

use crate::defaulted::Defaulted;
use crate::error::Failure;

/// A check-and-pass-through function over values of one field type.
pub struct Validator<T> {
    run: Arc<dyn Fn(T) -> Result<T, Failure> + Send + Sync>,
}

impl<T> Clone for Validator<T> {
    fn clone(&self) -> Self {
        Validator {
            run: Arc::clone(&self.run),
        }
    }
}

impl<T> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator")
    }
}

impl<T: 'static> Validator<T> {
    /// Wrap an arbitrary check. The function may return a different value
    /// than it was given.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(T) -> Result<T, Failure> + Send + Sync + 'static,
    {
        Validator {
            run: Arc::new(check),
        }
    }

    /// Accepts everything unchanged.
    pub fn accept() -> Self {
        Validator::new(Ok)
    }

    /// Reject values failing `predicate`, reporting `constraint` as the
    /// broken rule.
    pub fn require<P>(predicate: P, constraint: &str) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let constraint = constraint.to_string();
        Validator::new(move |value| {
            if predicate(&value) {
                Ok(value)
            } else {
                Err(Failure::invalid_value(constraint.as_str()))
            }
        })
    }

    /// Run this validator, then `next` on its output. The first rejection
    /// wins and later links never see the value.
    pub fn and(self, next: Validator<T>) -> Validator<T> {
        let first = self.run;
        let second = next.run;
        Validator {
            run: Arc::new(move |value| second(first(value)?)),
        }
    }

    /// Apply the chain to `value`.
    pub fn run(&self, value: T) -> Result<T, Failure> {
        (self.run)(value)
    }
}

impl<T> Validator<T>
where
    T: PartialOrd + fmt::Display + Send + Sync + 'static,
{
    /// Reject values below `bound`.
    pub fn at_least(bound: T) -> Self {
        let constraint = format!("at least {bound}");
        Validator::new(move |value: T| {
            if value >= bound {
                Ok(value)
            } else {
                Err(Failure::invalid_value(constraint.as_str()))
            }
        })
    }

    /// Reject values above `bound`.
    pub fn at_most(bound: T) -> Self {
        let constraint = format!("at most {bound}");
        Validator::new(move |value: T| {
            if value <= bound {
                Ok(value)
            } else {
                Err(Failure::invalid_value(constraint.as_str()))
            }
        })
    }

    /// Reject values at or below `bound`.
    pub fn greater_than(bound: T) -> Self {
        let constraint = format!("greater than {bound}");
        Validator::new(move |value: T| {
            if value > bound {
                Ok(value)
            } else {
                Err(Failure::invalid_value(constraint.as_str()))
            }
        })
    }

    /// Reject values at or above `bound`.
    pub fn less_than(bound: T) -> Self {
        let constraint = format!("less than {bound}");
        Validator::new(move |value: T| {
            if value < bound {
                Ok(value)
            } else {
                Err(Failure::invalid_value(constraint.as_str()))
            }
        })
    }
}

impl<T> Validator<T>
where
    T: Default + PartialEq + 'static,
{
    /// Reject the type's default value (zero for the numerics).
    pub fn nonzero() -> Self {
        Validator::require(|value| *value != T::default(), "nonzero")
    }
}

impl<T> Validator<T>
where
    T: Empty + 'static,
{
    /// Reject empty strings and containers.
    pub fn nonempty() -> Self {
        Validator::require(|value: &T| !value.is_empty(), "nonempty")
    }
}

impl<T> Validator<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Lift to a validator over [`Defaulted<T>`] fields: the assigned
    /// value is checked (and any transform kept), an unassigned value
    /// passes untouched since its default is trusted.
    pub fn defaulted(self) -> Validator<Defaulted<T>> {
        Validator::new(move |mut value: Defaulted<T>| {
            if value.is_assigned() {
                let checked = self.run(value.value().clone())?;
                value.set(checked);
            }
            Ok(value)
        })
    }
}

/// Emptiness test backing [`Validator::nonempty`].
pub trait Empty {
    fn is_empty(&self) -> bool;
}

impl Empty for String {
    fn is_empty(&self) -> bool {
        String::is_empty(self)
    }
}

impl<T> Empty for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}
