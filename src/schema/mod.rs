//! Declarative property validation and coercion
//!
//! Properties are composable descriptors that turn loosely typed input into
//! validated, coerced, default-filled values or reject it with a
//! `SchemaError` naming the offending field.
//!
//! # Building blocks
//!
//! - `Property`: base type filter, nullability, default and callback
//! - `Scalar<K>`: `Int`, `Float`, `Number`, `Bool`, `Text` (string, regex,
//!   email, uuid) and the temporal `Date`/`DateTime`
//! - `Schema`/`Object`: named fields, optional strictness
//! - `Array`: one element validator plus a length range
//! - `Choice`: first matching candidate wins
//! - `Custom`: user function or rule combinator
//!
//! Schemas can also be declared as JSON documents, loaded by
//! `SchemaLoader` and checked through `SchemaValidator`.
//!
//! ```ignore
//! use schemata::schema::{Configure, Int, Object, Schema, Text, Validate};
//!
//! let person = Schema::new("Person")
//!     .field("name", Text::new().nullable(false))
//!     .field("age", Int::new().min(0).default_value(18));
//! let out = person.validate(serde_json::json!({"name": "Ann"}).into())?;
//! ```

mod array;
mod choice;
mod custom;
mod errors;
mod loader;
mod object;
mod property;
mod protect;
mod range;
mod scalar;
mod temporal;
mod types;
mod validator;
mod value;

pub use array::Array;
pub use choice::{Candidate, Choice};
pub use custom::Custom;
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use loader::{LoadedSchema, SchemaLoader};
pub use object::{Field, Object, Schema};
pub use property::{Accepts, Callback, Configure, Property, PropertyRef, Validate};
pub use protect::BodyRule;
pub use range::{Provider, Range};
pub use scalar::{
    Bool, BoolKind, Float, FloatKind, Format, Int, IntKind, Number, NumberKind, Numeric, Scalar,
    ScalarKind, Text, TextKind, Unordered,
};
pub use temporal::{parse_date, parse_datetime, Date, DateKind, DateTime, DateTimeKind};
pub use types::{ChoiceDef, FieldDef, FieldType, SchemaDocument, TemporalBound};
pub use validator::{Limits, SchemaValidator};
pub use value::{Map, Value, ValueKind};
