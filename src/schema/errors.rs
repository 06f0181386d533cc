//! Schema error types
//!
//! Every violation surfaces as a single `SchemaError` carrying:
//! - a code identifying the violation class
//! - a human-readable message
//! - the field path at which the violation occurred (e.g. `address.number`)
//!
//! Validation is fail-fast: the first violation aborts the whole call.

use std::fmt;

/// Error codes for schema validation and schema management
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaErrorCode {
    /// Value required but absent and no usable default
    NullViolation,
    /// Value present but of the wrong kind
    TypeMismatch,
    /// Length, numeric or temporal value outside configured bounds
    RangeViolation,
    /// String fails its pattern
    PatternViolation,
    /// No choice candidate matched
    NoMatchingChoice,
    /// Strict object received an undeclared key
    UnexpectedField,
    /// Temporal string malformed
    ParseFailure,
    /// Custom property function refused the value
    CallbackRejected,
    /// Body presence does not match the protection policy
    BodyPolicy,
    /// Input exceeds configured depth or size limits
    LimitExceeded,
    /// Property definition cannot be built
    InvalidDefinition,
    /// Schema ID not registered
    UnknownSchema,
    /// Schema version not registered
    UnknownSchemaVersion,
    /// Attempt to replace a registered schema
    SchemaImmutable,
    /// Schema document unreadable or malformed
    MalformedSchema,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::NullViolation => "SCHEMA_NULL_VIOLATION",
            SchemaErrorCode::TypeMismatch => "SCHEMA_TYPE_MISMATCH",
            SchemaErrorCode::RangeViolation => "SCHEMA_RANGE_VIOLATION",
            SchemaErrorCode::PatternViolation => "SCHEMA_PATTERN_VIOLATION",
            SchemaErrorCode::NoMatchingChoice => "SCHEMA_NO_MATCHING_CHOICE",
            SchemaErrorCode::UnexpectedField => "SCHEMA_UNEXPECTED_FIELD",
            SchemaErrorCode::ParseFailure => "SCHEMA_PARSE_FAILURE",
            SchemaErrorCode::CallbackRejected => "SCHEMA_CALLBACK_REJECTED",
            SchemaErrorCode::BodyPolicy => "SCHEMA_BODY_POLICY",
            SchemaErrorCode::LimitExceeded => "SCHEMA_LIMIT_EXCEEDED",
            SchemaErrorCode::InvalidDefinition => "SCHEMA_INVALID_DEFINITION",
            SchemaErrorCode::UnknownSchema => "SCHEMA_UNKNOWN",
            SchemaErrorCode::UnknownSchemaVersion => "SCHEMA_UNKNOWN_VERSION",
            SchemaErrorCode::SchemaImmutable => "SCHEMA_IMMUTABLE",
            SchemaErrorCode::MalformedSchema => "SCHEMA_MALFORMED",
        }
    }

    /// Returns true if the error was caused by the validated input rather than
    /// by a schema definition or the registry.
    pub fn is_validation_failure(&self) -> bool {
        !matches!(
            self,
            SchemaErrorCode::InvalidDefinition
                | SchemaErrorCode::UnknownSchema
                | SchemaErrorCode::UnknownSchemaVersion
                | SchemaErrorCode::SchemaImmutable
                | SchemaErrorCode::MalformedSchema
        )
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error with code, message and field path
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    /// Dotted path from the validated root, empty at the root
    path: String,
}

impl SchemaError {
    /// Create an error with the given code and message
    pub fn new(code: SchemaErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: String::new(),
        }
    }

    /// Null value where none is allowed
    pub fn null_value() -> Self {
        Self::new(SchemaErrorCode::NullViolation, "value should not be null")
    }

    /// Value of an unexpected kind
    pub fn type_mismatch(expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        Self::new(
            SchemaErrorCode::TypeMismatch,
            format!("expected {}, got {}", expected, actual),
        )
    }

    /// Value outside its range
    pub fn out_of_range(value: impl fmt::Display) -> Self {
        Self::new(
            SchemaErrorCode::RangeViolation,
            format!("value {} is out of defined range", value),
        )
    }

    /// String not matching its pattern
    pub fn pattern_mismatch(value: &str, pattern: &str) -> Self {
        Self::new(
            SchemaErrorCode::PatternViolation,
            format!("value '{}' does not match pattern '{}'", value, pattern),
        )
    }

    /// No choice candidate accepted the value
    pub fn no_matching_choice(value: impl fmt::Display) -> Self {
        Self::new(
            SchemaErrorCode::NoMatchingChoice,
            format!("value {} matches none of the choices", value),
        )
    }

    /// Strict object received an undeclared key
    pub fn unexpected_field(field: &str) -> Self {
        Self::new(
            SchemaErrorCode::UnexpectedField,
            "object contains undeclared field",
        )
        .within(field)
    }

    /// Temporal value could not be parsed
    pub fn parse_failure(input: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            SchemaErrorCode::ParseFailure,
            format!("cannot parse '{}': {}", input, reason),
        )
    }

    /// Custom property function refused the value
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::new(SchemaErrorCode::CallbackRejected, reason)
    }

    /// Body presence violates the protection policy
    pub fn body_policy(reason: impl Into<String>) -> Self {
        Self::new(SchemaErrorCode::BodyPolicy, reason)
    }

    /// Input exceeds configured limits
    pub fn limit_exceeded(limit: &str, actual: usize, max: usize) -> Self {
        Self::new(
            SchemaErrorCode::LimitExceeded,
            format!("input {} {} exceeds maximum {}", limit, actual, max),
        )
    }

    /// Property definition cannot be built
    pub fn invalid_definition(reason: impl Into<String>) -> Self {
        Self::new(SchemaErrorCode::InvalidDefinition, reason)
    }

    /// Schema ID not registered
    pub fn unknown_schema(schema_id: &str) -> Self {
        Self::new(
            SchemaErrorCode::UnknownSchema,
            format!("Schema '{}' not found", schema_id),
        )
    }

    /// Schema version not registered
    pub fn unknown_version(schema_id: &str, version: &str) -> Self {
        Self::new(
            SchemaErrorCode::UnknownSchemaVersion,
            format!("Schema '{}' version '{}' not found", schema_id, version),
        )
    }

    /// Attempt to replace a registered schema
    pub fn schema_immutable(schema_id: &str, version: &str) -> Self {
        Self::new(
            SchemaErrorCode::SchemaImmutable,
            format!("Schema '{}' version '{}' is immutable", schema_id, version),
        )
    }

    /// Schema document unreadable or malformed
    pub fn malformed_schema(source: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::new(
            SchemaErrorCode::MalformedSchema,
            format!("Malformed schema '{}': {}", source.into(), reason),
        )
    }

    /// Prefix the error path with an enclosing segment.
    ///
    /// Field names join with `.`, array indices (`[3]`) attach directly.
    pub fn within(mut self, segment: &str) -> Self {
        self.path = if self.path.is_empty() {
            segment.to_string()
        } else if self.path.starts_with('[') {
            format!("{}{}", segment, self.path)
        } else {
            format!("{}.{}", segment, self.path)
        };
        self
    }

    /// Prefix the error path with an array index
    pub fn at_index(self, index: usize) -> Self {
        self.within(&format!("[{}]", index))
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field path, empty when the root value failed
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns true if the input (not the schema) caused the error
    pub fn is_validation_failure(&self) -> bool {
        self.code.is_validation_failure()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code.code())?;
        if !self.path.is_empty() {
            write!(f, " at '{}'", self.path)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
