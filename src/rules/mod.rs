//! Boolean rule combinators
//!
//! Rules are predicates over an arbitrary item. The combinators compose them:
//! - `AllOf`: every rule accepts (true when empty)
//! - `AnyOf`: at least one rule accepts (false when empty)
//! - `NoneOf`: no rule accepts (true when empty)
//! - `Callback`: `AllOf` over plain functions
//!
//! Nothing here assumes an item shape, so the same combinators serve the
//! schema engine (`Rule<Value>`) and callers authorizing arbitrary claims.
//! Evaluation short-circuits in declaration order.

/// A predicate over an item
pub trait Rule<T: ?Sized>: Send + Sync {
    fn check(&self, item: &T) -> bool;
}

impl<T: ?Sized, F> Rule<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn check(&self, item: &T) -> bool {
        self(item)
    }
}

macro_rules! collection_rule {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        pub struct $name<T: ?Sized> {
            rules: Vec<Box<dyn Rule<T>>>,
        }

        impl<T: ?Sized> Default for $name<T> {
            fn default() -> Self {
                Self { rules: Vec::new() }
            }
        }

        impl<T: ?Sized + 'static> $name<T> {
            pub fn new() -> Self {
                Self::default()
            }

            /// Adds a rule, builder style
            pub fn with(mut self, rule: impl Rule<T> + 'static) -> Self {
                self.push(rule);
                self
            }

            pub fn push(&mut self, rule: impl Rule<T> + 'static) {
                self.rules.push(Box::new(rule));
            }

            pub fn len(&self) -> usize {
                self.rules.len()
            }

            pub fn is_empty(&self) -> bool {
                self.rules.is_empty()
            }
        }
    };
}

collection_rule!(
    /// Accepts an item iff every rule accepts it
    AllOf
);
collection_rule!(
    /// Accepts an item iff at least one rule accepts it
    AnyOf
);
collection_rule!(
    /// Accepts an item iff no rule accepts it
    NoneOf
);

impl<T: ?Sized> Rule<T> for AllOf<T> {
    fn check(&self, item: &T) -> bool {
        self.rules.iter().all(|rule| rule.check(item))
    }
}

impl<T: ?Sized> Rule<T> for AnyOf<T> {
    fn check(&self, item: &T) -> bool {
        self.rules.iter().any(|rule| rule.check(item))
    }
}

impl<T: ?Sized> Rule<T> for NoneOf<T> {
    fn check(&self, item: &T) -> bool {
        !self.rules.iter().any(|rule| rule.check(item))
    }
}

/// `AllOf` restricted to plain functions
pub struct Callback<T: ?Sized> {
    inner: AllOf<T>,
}

impl<T: ?Sized> Default for Callback<T> {
    fn default() -> Self {
        Self {
            inner: AllOf::default(),
        }
    }
}

impl<T: ?Sized + 'static> Callback<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a function, builder style
    pub fn with(mut self, f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.inner.push(f);
        self
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<T: ?Sized> Rule<T> for Callback<T> {
    fn check(&self, item: &T) -> bool {
        self.inner.check(item)
    }
}
