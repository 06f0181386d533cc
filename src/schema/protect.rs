//! Request body policy

use std::fmt;

use super::errors::{SchemaError, SchemaResult};
use super::property::{PropertyRef, Validate};
use super::value::Value;

/// What a handler expects from the request body.
///
/// The body is `None` when the request carried none; a JSON `null` body is
/// `Some(Value::Null)`.
#[derive(Clone)]
pub enum BodyRule {
    /// A body must be present
    Required,
    /// No body may be present
    Forbidden,
    /// Any body, or none, passes through
    Optional,
    /// The body (null when absent) must validate
    Validated(PropertyRef),
}

impl BodyRule {
    pub fn apply(&self, body: Option<Value>) -> SchemaResult<Option<Value>> {
        match (self, body) {
            (BodyRule::Required, None) => Err(SchemaError::body_policy("request body is required")),
            (BodyRule::Forbidden, Some(_)) => {
                Err(SchemaError::body_policy("request body is not allowed"))
            }
            (BodyRule::Validated(validator), body) => validator
                .validate(body.unwrap_or(Value::Null))
                .map(Some),
            (_, body) => Ok(body),
        }
    }
}

impl fmt::Debug for BodyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyRule::Required => write!(f, "Required"),
            BodyRule::Forbidden => write!(f, "Forbidden"),
            BodyRule::Optional => write!(f, "Optional"),
            BodyRule::Validated(_) => write!(f, "Validated(..)"),
        }
    }
}
