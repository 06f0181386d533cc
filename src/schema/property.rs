//! Base property: type filter, nullability, defaulting and post-processing
//!
//! Every validator in the engine owns a `Property` and runs the same
//! pipeline around its own checks:
//!
//! 1. null input is replaced by the default (literal or provider)
//! 2. a still-null value passes only if nullable
//! 3. kind-specific coercion (temporal parsing)
//! 4. kind filter against the accepted kinds
//! 5. kind-specific checks (range, pattern, composite traversal)
//! 6. the callback, if any, post-processes the result

use std::fmt;
use std::sync::Arc;

use super::errors::{SchemaError, SchemaResult};
use super::range::Provider;
use super::value::{Value, ValueKind};
use crate::rules::Rule;

/// A validator/coercer for one value position.
///
/// Implementations are immutable after construction and hold no per-call
/// state, so one schema can validate concurrently from many threads.
pub trait Validate: Send + Sync {
    /// Validates and coerces a raw value
    fn validate(&self, value: Value) -> SchemaResult<Value>;
}

/// Shared handle to a validator inside a schema graph
pub type PropertyRef = Arc<dyn Validate>;

impl<V: Validate + ?Sized> Validate for Arc<V> {
    fn validate(&self, value: Value) -> SchemaResult<Value> {
        (**self).validate(value)
    }
}

impl<V: Validate + ?Sized> Validate for Box<V> {
    fn validate(&self, value: Value) -> SchemaResult<Value> {
        (**self).validate(value)
    }
}

/// Post-processing function applied to a validated, non-null value
pub type Callback = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Base configuration shared by every validator
#[derive(Clone)]
pub struct Property {
    accepts: Vec<ValueKind>,
    nullable: bool,
    default: Option<Provider<Value>>,
    callback: Option<Callback>,
}

impl Default for Property {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("accepts", &self.accepts)
            .field("nullable", &self.nullable)
            .field("default", &self.default)
            .field("callback", &self.callback.as_ref().map(|_| ".."))
            .finish()
    }
}

impl Property {
    /// Nullable property accepting any kind
    pub fn new() -> Self {
        Self {
            accepts: Vec::new(),
            nullable: true,
            default: None,
            callback: None,
        }
    }

    /// Nullable property accepting only the given kinds
    pub fn of(kinds: &[ValueKind]) -> Self {
        Self {
            accepts: kinds.to_vec(),
            ..Self::new()
        }
    }

    /// Accepted kinds; empty means any
    pub fn accepts(&self) -> &[ValueKind] {
        &self.accepts
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub(crate) fn set_nullable(&mut self, nullable: bool) {
        self.nullable = nullable;
    }

    pub(crate) fn set_default(&mut self, default: Provider<Value>) {
        self.default = Some(default);
    }

    pub(crate) fn set_callback(&mut self, callback: Callback) {
        self.callback = Some(callback);
    }

    /// Applies defaulting and nullability; returns `Null` only if allowed.
    pub fn resolve(&self, value: Value) -> SchemaResult<Value> {
        let value = match (value, &self.default) {
            (Value::Null, Some(default)) => default.resolve(),
            (value, _) => value,
        };

        if value.is_null() && !self.nullable {
            return Err(SchemaError::null_value());
        }
        Ok(value)
    }

    /// Checks a non-null value against the accepted kinds
    pub fn check_kind(&self, value: &Value) -> SchemaResult<()> {
        if self.accepts.is_empty() || self.accepts.contains(&value.kind()) {
            return Ok(());
        }
        let expected = self
            .accepts
            .iter()
            .map(ValueKind::name)
            .collect::<Vec<_>>()
            .join(" or ");
        Err(SchemaError::type_mismatch(expected, value.kind()))
    }

    /// Applies the callback, if any
    pub fn finish(&self, value: Value) -> Value {
        match &self.callback {
            Some(callback) => callback(value),
            None => value,
        }
    }

    /// Runs the full pipeline with kind-specific coercion and checks.
    pub(crate) fn run(
        &self,
        value: Value,
        coerce: impl FnOnce(Value) -> SchemaResult<Value>,
        check: impl FnOnce(Value) -> SchemaResult<Value>,
    ) -> SchemaResult<Value> {
        let value = self.resolve(value)?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        let value = coerce(value)?;
        self.check_kind(&value)?;
        let value = check(value)?;
        Ok(self.finish(value))
    }
}

impl Validate for Property {
    fn validate(&self, value: Value) -> SchemaResult<Value> {
        self.run(value, Ok, Ok)
    }
}

/// Builder methods shared by every validator owning a `Property`
pub trait Configure: Sized {
    fn property_mut(&mut self) -> &mut Property;

    /// Whether null is an acceptable final value
    fn nullable(mut self, nullable: bool) -> Self {
        self.property_mut().set_nullable(nullable);
        self
    }

    /// Value substituted for null input
    fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.property_mut()
            .set_default(Provider::Literal(default.into()));
        self
    }

    /// Provider called for every null input
    fn default_with(mut self, f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.property_mut().set_default(Provider::thunk(f));
        self
    }

    /// Post-processing applied to every validated, non-null value
    fn callback(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.property_mut().set_callback(Arc::new(f));
        self
    }
}

impl Configure for Property {
    fn property_mut(&mut self) -> &mut Property {
        self
    }
}

/// Adapts a validator into a rule: accepts an item iff it validates.
///
/// Validation runs on a clone, the item itself is never modified.
pub struct Accepts<V>(pub V);

impl<V: Validate> Rule<Value> for Accepts<V> {
    fn check(&self, item: &Value) -> bool {
        self.0.validate(item.clone()).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::errors::SchemaErrorCode;

    fn int_property() -> Property {
        Property::of(&[ValueKind::Int])
    }

    #[test]
    fn test_nullable_by_default() {
        assert_eq!(int_property().validate(Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_not_nullable_rejects_null() {
        let prop = int_property().nullable(false);
        let err = prop.validate(Value::Null).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::NullViolation);
    }

    #[test]
    fn test_default_value() {
        let prop = int_property().default_value(12);
        assert_eq!(prop.validate(Value::Null).unwrap(), Value::Int(12));
    }

    #[test]
    fn test_default_passive_when_value_present() {
        let prop = int_property().default_value(12);
        assert_eq!(prop.validate(Value::Int(21)).unwrap(), Value::Int(21));
    }

    #[test]
    fn test_default_provider() {
        let prop = int_property().nullable(false).default_with(|| Value::Int(12));
        assert_eq!(prop.validate(Value::Null).unwrap(), Value::Int(12));
    }

    #[test]
    fn test_default_provider_returning_null_still_enforces_nullability() {
        let prop = int_property().nullable(false).default_with(|| Value::Null);
        assert!(prop.validate(Value::Null).is_err());
    }

    #[test]
    fn test_wrong_type() {
        let prop = Property::of(&[ValueKind::String]);
        let err = prop.validate(Value::Int(12)).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::TypeMismatch);
        assert!(err.message().contains("string"));
    }

    #[test]
    fn test_any_kind_when_unrestricted() {
        let prop = Property::new();
        assert_eq!(prop.validate(Value::from("x")).unwrap(), Value::from("x"));
        assert_eq!(prop.validate(Value::Bool(true)).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_callback() {
        let prop = int_property().callback(|v| Value::Int(v.as_i64().unwrap_or(0) * 2));
        assert_eq!(prop.validate(Value::Int(12)).unwrap(), Value::Int(24));
    }

    #[test]
    fn test_callback_not_applied_to_null() {
        let prop = int_property().callback(|_| Value::Int(1));
        assert_eq!(prop.validate(Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_accepts_rule_adapter() {
        let rule = Accepts(int_property().nullable(false));
        assert!(rule.check(&Value::Int(1)));
        assert!(!rule.check(&Value::from("1")));
        assert!(!rule.check(&Value::Null));
    }
}
