//! Lazily resolvable values and inclusive min/max bounds
//!
//! Bounds and defaults are either literals or providers re-evaluated on every
//! call, so a bound such as "at most sixteen years before today" tracks the
//! current date instead of the schema construction date.

use std::fmt;
use std::sync::Arc;

/// A literal value or a zero-argument provider resolved at the point of use
pub enum Provider<T> {
    Literal(T),
    Thunk(Arc<dyn Fn() -> T + Send + Sync>),
}

impl<T: Clone> Provider<T> {
    /// Wraps a provider function
    pub fn thunk(f: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Provider::Thunk(Arc::new(f))
    }

    /// Returns the literal, or calls the provider
    pub fn resolve(&self) -> T {
        match self {
            Provider::Literal(value) => value.clone(),
            Provider::Thunk(f) => f(),
        }
    }
}

impl<T: Clone> Clone for Provider<T> {
    fn clone(&self) -> Self {
        match self {
            Provider::Literal(value) => Provider::Literal(value.clone()),
            Provider::Thunk(f) => Provider::Thunk(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Provider::Thunk(_) => f.write_str("Thunk(..)"),
        }
    }
}

impl<T> From<T> for Provider<T> {
    fn from(value: T) -> Self {
        Provider::Literal(value)
    }
}

/// Inclusive range over a measured quantity.
///
/// An absent bound leaves that side unconstrained.
#[derive(Clone, Debug)]
pub struct Range<T> {
    min: Option<Provider<T>>,
    max: Option<Provider<T>>,
}

impl<T> Default for Range<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

impl<T: PartialOrd + Clone> Range<T> {
    /// Unbounded range
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min(mut self, min: impl Into<Provider<T>>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn with_max(mut self, max: impl Into<Provider<T>>) -> Self {
        self.max = Some(max.into());
        self
    }

    pub fn set_min(&mut self, min: Provider<T>) {
        self.min = Some(min);
    }

    pub fn set_max(&mut self, max: Provider<T>) {
        self.max = Some(max);
    }

    /// True if neither side is bounded
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Checks a measured value against both bounds.
    ///
    /// Bounds are resolved on every call. An absent value always passes;
    /// incomparable values (NaN) fail any present bound.
    pub fn admits(&self, value: Option<&T>) -> bool {
        let Some(value) = value else {
            return true;
        };

        if let Some(min) = &self.min {
            let min = min.resolve();
            if !matches!(
                value.partial_cmp(&min),
                Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
            ) {
                return false;
            }
        }

        if let Some(max) = &self.max {
            let max = max.resolve();
            if !matches!(
                value.partial_cmp(&max),
                Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
            ) {
                return false;
            }
        }

        true
    }
}
