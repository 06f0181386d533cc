//! Declarative schema documents
//!
//! A document is the JSON form of a schema:
//!
//! ```json
//! {
//!   "schema_id": "person",
//!   "schema_version": "v1",
//!   "strict": true,
//!   "fields": {
//!     "name": { "type": "string", "nullable": false, "max_length": 64 },
//!     "born": { "type": "date", "max": { "days_from_today": -5840 } },
//!     "tags": { "type": "array", "items": { "type": "string" } }
//!   }
//! }
//! ```
//!
//! Supported field types:
//! - any: optionally restricted to `kinds`
//! - int, float, number: `min`/`max`
//! - bool
//! - string, regex, email: `min_length`/`max_length`; regex needs `pattern`
//! - uuid: `strip_hyphens`
//! - date, datetime: `min`/`max` as literal strings or relative day offsets
//! - object: nested `fields`, `strict`
//! - array: `items`, `min_length`/`max_length`
//! - choice: `choices`, each `{"literal": v}` or `{"property": def}`
//!
//! Documents compile into validator graphs; a document is only registered
//! once it compiles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};

use super::array::Array;
use super::choice::{Candidate, Choice};
use super::errors::{SchemaError, SchemaResult};
use super::object::{Object, Schema};
use super::property::{Configure, Property, PropertyRef, Validate};
use super::scalar::{Bool, Float, Int, Number, Text};
use super::temporal::{parse_date, parse_datetime, Date, DateTime};
use super::value::{Value, ValueKind};

/// Bound of a temporal range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemporalBound {
    /// Offset from the current UTC day, resolved on every validation
    Relative { days_from_today: i64 },
    /// Fixed `YYYY-MM-DD` or RFC 3339 value
    Literal(String),
}

/// One candidate of a choice field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceDef {
    Literal(serde_json::Value),
    Property(FieldDef),
}

/// Field types with their type-specific options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    Any {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        kinds: Vec<String>,
    },
    Int {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    Float {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Bool,
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    Regex {
        pattern: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    Email {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    Uuid {
        #[serde(default)]
        strip_hyphens: bool,
    },
    Date {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<TemporalBound>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<TemporalBound>,
    },
    DateTime {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<TemporalBound>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<TemporalBound>,
    },
    Object {
        fields: BTreeMap<String, FieldDef>,
        #[serde(default)]
        strict: bool,
    },
    Array {
        items: Box<FieldDef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    Choice {
        choices: Vec<ChoiceDef>,
    },
}

impl FieldType {
    /// Returns the type name used in documents
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Any { .. } => "any",
            FieldType::Int { .. } => "int",
            FieldType::Float { .. } => "float",
            FieldType::Number { .. } => "number",
            FieldType::Bool => "bool",
            FieldType::String { .. } => "string",
            FieldType::Regex { .. } => "regex",
            FieldType::Email { .. } => "email",
            FieldType::Uuid { .. } => "uuid",
            FieldType::Date { .. } => "date",
            FieldType::DateTime { .. } => "datetime",
            FieldType::Object { .. } => "object",
            FieldType::Array { .. } => "array",
            FieldType::Choice { .. } => "choice",
        }
    }
}

fn default_nullable() -> bool {
    true
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether null is an acceptable final value
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Literal substituted for null input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl FieldDef {
    /// Nullable field without default
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            nullable: true,
            default: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Compiles the definition into a validator
    pub fn build(&self) -> SchemaResult<PropertyRef> {
        self.compile("")
    }

    fn compile(&self, name: &str) -> SchemaResult<PropertyRef> {
        let property = match &self.field_type {
            FieldType::Any { kinds } => {
                let kinds = kinds
                    .iter()
                    .map(|kind| {
                        ValueKind::from_name(kind).ok_or_else(|| {
                            SchemaError::invalid_definition(format!("unknown kind '{}'", kind))
                        })
                    })
                    .collect::<SchemaResult<Vec<_>>>()?;
                self.configure(Property::of(&kinds))
            }
            FieldType::Int { min, max } => {
                let mut prop = Int::new();
                if let Some(min) = min {
                    prop = prop.min(*min);
                }
                if let Some(max) = max {
                    prop = prop.max(*max);
                }
                self.configure(prop)
            }
            FieldType::Float { min, max } => {
                let mut prop = Float::new();
                if let Some(min) = min {
                    prop = prop.min(*min);
                }
                if let Some(max) = max {
                    prop = prop.max(*max);
                }
                self.configure(prop)
            }
            FieldType::Number { min, max } => {
                let mut prop = Number::new();
                if let Some(min) = min {
                    prop = prop.min(*min);
                }
                if let Some(max) = max {
                    prop = prop.max(*max);
                }
                self.configure(prop)
            }
            FieldType::Bool => self.configure(Bool::new()),
            FieldType::String {
                min_length,
                max_length,
            } => self.configure(with_lengths(Text::new(), *min_length, *max_length)),
            FieldType::Regex {
                pattern,
                min_length,
                max_length,
            } => self.configure(with_lengths(Text::regex(pattern)?, *min_length, *max_length)),
            FieldType::Email {
                min_length,
                max_length,
            } => self.configure(with_lengths(Text::email(), *min_length, *max_length)),
            FieldType::Uuid { strip_hyphens } => {
                self.configure(Text::uuid().strip_hyphens(*strip_hyphens))
            }
            FieldType::Date { min, max } => {
                let mut prop = Date::new();
                if let Some(min) = min {
                    prop = date_bound(prop, min, true)?;
                }
                if let Some(max) = max {
                    prop = date_bound(prop, max, false)?;
                }
                self.configure(prop)
            }
            FieldType::DateTime { min, max } => {
                let mut prop = DateTime::new();
                if let Some(min) = min {
                    prop = datetime_bound(prop, min, true)?;
                }
                if let Some(max) = max {
                    prop = datetime_bound(prop, max, false)?;
                }
                self.configure(prop)
            }
            FieldType::Object { fields, strict } => {
                let schema = compile_fields(name, fields, *strict)?;
                self.configure(Object::new(schema))
            }
            FieldType::Array {
                items,
                min_length,
                max_length,
            } => {
                if self.default.is_some() {
                    return Err(SchemaError::invalid_definition(
                        "array fields always default to an empty array",
                    ));
                }
                let mut prop = Array::of(items.compile(name)?);
                if let Some(min) = min_length {
                    prop = prop.min_length(*min);
                }
                if let Some(max) = max_length {
                    prop = prop.max_length(*max);
                }
                Arc::new(prop) as PropertyRef
            }
            FieldType::Choice { choices } => {
                let candidates = choices
                    .iter()
                    .map(|choice| match choice {
                        ChoiceDef::Literal(value) => Ok(Candidate::Literal(Value::from(value.clone()))),
                        ChoiceDef::Property(def) => def.compile(name).map(Candidate::Property),
                    })
                    .collect::<SchemaResult<Vec<_>>>()?;
                self.configure(Choice::new(candidates))
            }
        };

        // A default that cannot pass its own field is a definition error
        if self.default.is_some() {
            property.validate(Value::Null).map_err(|err| {
                SchemaError::invalid_definition(format!("invalid default: {}", err))
            })?;
        }

        Ok(property)
    }

    fn configure<P: Configure + Validate + 'static>(&self, property: P) -> PropertyRef {
        let mut property = property.nullable(self.nullable);
        if let Some(default) = &self.default {
            property = property.default_value(Value::from(default.clone()));
        }
        Arc::new(property)
    }
}

fn with_lengths(prop: Text, min: Option<usize>, max: Option<usize>) -> Text {
    let prop = match min {
        Some(min) => prop.min_length(min),
        None => prop,
    };
    match max {
        Some(max) => prop.max_length(max),
        None => prop,
    }
}

fn date_bound(prop: Date, bound: &TemporalBound, is_min: bool) -> SchemaResult<Date> {
    Ok(match bound {
        TemporalBound::Literal(text) => {
            let date = parse_date(text).map_err(bound_error)?;
            if is_min {
                prop.min(date)
            } else {
                prop.max(date)
            }
        }
        TemporalBound::Relative { days_from_today } => {
            let days = *days_from_today;
            if shift_today(days).is_none() {
                return Err(relative_bound_error(days));
            }
            // Unresolvable later on: the bound excludes every date
            let fallback = if is_min { NaiveDate::MAX } else { NaiveDate::MIN };
            let resolve = move || shift_today(days).unwrap_or(fallback);
            if is_min {
                prop.min_with(resolve)
            } else {
                prop.max_with(resolve)
            }
        }
    })
}

fn datetime_bound(prop: DateTime, bound: &TemporalBound, is_min: bool) -> SchemaResult<DateTime> {
    Ok(match bound {
        TemporalBound::Literal(text) => {
            let datetime = parse_datetime(text).map_err(bound_error)?;
            if is_min {
                prop.min(datetime)
            } else {
                prop.max(datetime)
            }
        }
        TemporalBound::Relative { days_from_today } => {
            let days = *days_from_today;
            if shift_now(days).is_none() {
                return Err(relative_bound_error(days));
            }
            let fallback = if is_min {
                chrono::DateTime::<Utc>::MAX_UTC
            } else {
                chrono::DateTime::<Utc>::MIN_UTC
            };
            let resolve = move || shift_now(days).unwrap_or(fallback).fixed_offset();
            if is_min {
                prop.min_with(resolve)
            } else {
                prop.max_with(resolve)
            }
        }
    })
}

fn shift_today(days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|delta| Utc::now().date_naive().checked_add_signed(delta))
}

fn shift_now(days: i64) -> Option<chrono::DateTime<Utc>> {
    Duration::try_days(days).and_then(|delta| Utc::now().checked_add_signed(delta))
}

fn relative_bound_error(days: i64) -> SchemaError {
    SchemaError::invalid_definition(format!(
        "relative temporal bound of {} days is out of range",
        days
    ))
}

fn bound_error(err: SchemaError) -> SchemaError {
    SchemaError::invalid_definition(format!("invalid temporal bound: {}", err.message()))
}

fn compile_fields(
    name: &str,
    fields: &BTreeMap<String, FieldDef>,
    strict: bool,
) -> SchemaResult<Schema> {
    fields
        .iter()
        .try_fold(Schema::new(name).strict(strict), |schema, (field, def)| {
            let property = def.compile(field).map_err(|err| err.within(field))?;
            Ok(schema.field_ref(field.as_str(), property))
        })
}

/// Complete schema document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Unique schema identifier
    pub schema_id: String,
    /// Schema version
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reject undeclared top-level keys
    #[serde(default)]
    pub strict: bool,
    pub fields: BTreeMap<String, FieldDef>,
}

impl SchemaDocument {
    pub fn new(
        schema_id: impl Into<String>,
        schema_version: impl Into<String>,
        fields: BTreeMap<String, FieldDef>,
    ) -> Self {
        Self {
            schema_id: schema_id.into(),
            schema_version: schema_version.into(),
            description: None,
            strict: false,
            fields,
        }
    }

    /// Returns the unique key for this schema (id, version)
    pub fn key(&self) -> (&str, &str) {
        (&self.schema_id, &self.schema_version)
    }

    /// Checks the identifying fields of the document itself
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.schema_id.trim().is_empty() {
            return Err("schema_id must not be empty".into());
        }
        if self.schema_version.trim().is_empty() {
            return Err("schema_version must not be empty".into());
        }
        // Both end up in the file name
        for (label, value) in [
            ("schema_id", &self.schema_id),
            ("schema_version", &self.schema_version),
        ] {
            if value.contains(['/', '\\']) || value.contains("..") {
                return Err(format!("{} must not contain path separators or '..'", label));
            }
        }
        if self.fields.keys().any(|name| name.is_empty()) {
            return Err("field names must not be empty".into());
        }
        Ok(())
    }

    /// Compiles the document into a root schema
    pub fn compile(&self) -> SchemaResult<Schema> {
        compile_fields(&self.schema_id, &self.fields, self.strict)
    }
}
