//! User-supplied validation hook
//!
//! `Custom` runs the base property pipeline and then a user function that
//! may transform or refuse the value. `from_rule` turns any rule combinator
//! into a refusal check.
//!
//! Like every other check, the user function only sees non-null values: a
//! null that survives nullability and defaulting is returned as is. Use
//! `nullable(false)` to refuse it instead.

use std::sync::Arc;

use super::errors::{SchemaError, SchemaResult};
use super::property::{Configure, Property, Validate};
use super::value::{Value, ValueKind};
use crate::rules::Rule;

type CheckFn = Arc<dyn Fn(Value) -> SchemaResult<Value> + Send + Sync>;

#[derive(Clone)]
pub struct Custom {
    property: Property,
    check: CheckFn,
}

impl Custom {
    /// `kinds` restricts accepted kinds; empty accepts any
    pub fn new(
        kinds: &[ValueKind],
        check: impl Fn(Value) -> SchemaResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            property: Property::of(kinds),
            check: Arc::new(check),
        }
    }

    /// Accepts values the rule accepts, refuses the rest with `message`
    pub fn from_rule(rule: impl Rule<Value> + 'static, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(&[], move |value| {
            if rule.check(&value) {
                Ok(value)
            } else {
                Err(SchemaError::rejected(message.clone()))
            }
        })
    }
}

impl Configure for Custom {
    fn property_mut(&mut self) -> &mut Property {
        &mut self.property
    }
}

impl Validate for Custom {
    fn validate(&self, value: Value) -> SchemaResult<Value> {
        self.property.run(value, Ok, |value| (self.check)(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{AllOf, AnyOf};
    use crate::schema::errors::SchemaErrorCode;
    use crate::schema::property::Accepts;
    use crate::schema::scalar::{Int, Text};

    fn even(value: Value) -> SchemaResult<Value> {
        match value.as_i64() {
            Some(n) if n % 2 == 0 => Ok(value),
            _ => Err(SchemaError::rejected("value must be even")),
        }
    }

    #[test]
    fn test_custom_function() {
        let prop = Custom::new(&[ValueKind::Int], even);
        assert_eq!(prop.validate(Value::Int(4)).unwrap(), Value::Int(4));
        assert_eq!(
            prop.validate(Value::Int(3)).unwrap_err().code(),
            SchemaErrorCode::CallbackRejected
        );
        assert_eq!(
            prop.validate(Value::from("4")).unwrap_err().code(),
            SchemaErrorCode::TypeMismatch
        );
    }

    #[test]
    fn test_custom_transform() {
        let prop = Custom::new(&[ValueKind::String], |value| {
            Ok(Value::from(value.as_str().unwrap_or_default().trim()))
        });
        assert_eq!(prop.validate(Value::from("  a ")).unwrap(), Value::from("a"));
    }

    #[test]
    fn test_custom_base_configuration() {
        let prop = Custom::new(&[ValueKind::Int], even).nullable(false);
        assert!(prop.validate(Value::Null).is_err());

        let prop = Custom::new(&[ValueKind::Int], even).default_value(3);
        assert!(prop.validate(Value::Null).is_err());
    }

    #[test]
    fn test_custom_function_skipped_for_null() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let prop = Custom::new(&[], move |value| {
            seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(value)
        });

        assert_eq!(prop.validate(Value::Null).unwrap(), Value::Null);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);

        assert_eq!(prop.validate(Value::Int(1)).unwrap(), Value::Int(1));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_from_rule() {
        let rule = AnyOf::<Value>::new()
            .with(Accepts(Int::new().min(10)))
            .with(Accepts(Text::email()));
        let prop = Custom::from_rule(rule, "needs a large number or an email");

        assert!(prop.validate(Value::Int(12)).is_ok());
        assert!(prop.validate(Value::from("a@example.com")).is_ok());
        let err = prop.validate(Value::Int(3)).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::CallbackRejected);
        assert_eq!(err.message(), "needs a large number or an email");
    }

    #[test]
    fn test_from_rule_with_closures() {
        let rule = AllOf::<Value>::new()
            .with(|v: &Value| v.as_str().is_some())
            .with(|v: &Value| v.as_str().map_or(false, |s| s.starts_with("id-")));
        let prop = Custom::from_rule(rule, "bad identifier");
        assert!(prop.validate(Value::from("id-7")).is_ok());
        assert!(prop.validate(Value::from("7")).is_err());
        assert_eq!(prop.validate(Value::Null).unwrap(), Value::Null);
    }
}
