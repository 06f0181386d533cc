//! Scalar properties: numbers, booleans and strings
//!
//! One generic `Scalar<K>` covers every scalar type. The kind marker `K`
//! fixes the accepted value kinds, the quantity measured by the range
//! (numeric value, string length) and any coercion; an optional `Format`
//! adds pattern matching for strings.
//!
//! - `Int`: integers only, range over the value
//! - `Float`, `Number`: integers or floats, range over the value
//! - `Bool`: booleans only
//! - `Text`: strings, range over the length in characters;
//!   `Text::regex`, `Text::email` and `Text::uuid` add a format

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::sync::OnceLock;

use regex::Regex;

use super::errors::{SchemaError, SchemaResult};
use super::property::{Configure, Property, Validate};
use super::range::{Provider, Range};
use super::value::{Value, ValueKind};

const EMAIL_PATTERN: &str = ".+@[^@]+.[^@]{2,}$";
const UUID_PATTERN: &str =
    "^[a-fA-F0-9]{8}-?[a-fA-F0-9]{4}-?[a-fA-F0-9]{4}-?[a-fA-F0-9]{4}-?[a-fA-F0-9]{12}$";

/// Type-level description of a scalar kind
pub trait ScalarKind: Send + Sync + 'static {
    /// Quantity the range constrains
    type Measure: PartialOrd + Clone + fmt::Debug + Send + Sync + 'static;

    /// Value kinds accepted after coercion
    const ACCEPTS: &'static [ValueKind];

    /// Extracts the measured quantity, `None` if the kind has no range
    fn measure(value: &Value) -> Option<Self::Measure>;

    /// Converts an accepted raw representation into the canonical kind
    fn coerce(value: Value) -> SchemaResult<Value> {
        Ok(value)
    }
}

/// Integer or float, compared numerically
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub fn as_f64(&self) -> f64 {
        match self {
            Numeric::Int(i) => *i as f64,
            Numeric::Float(f) => *f,
        }
    }
}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Numeric::Int(a), Numeric::Int(b)) => a.partial_cmp(b),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl From<i32> for Numeric {
    fn from(i: i32) -> Self {
        Numeric::Int(i64::from(i))
    }
}

impl From<i64> for Numeric {
    fn from(i: i64) -> Self {
        Numeric::Int(i)
    }
}

impl From<f64> for Numeric {
    fn from(f: f64) -> Self {
        Numeric::Float(f)
    }
}

fn numeric(value: &Value) -> Option<Numeric> {
    match value {
        Value::Int(i) => Some(Numeric::Int(*i)),
        Value::Float(f) => Some(Numeric::Float(*f)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IntKind;

impl ScalarKind for IntKind {
    type Measure = Numeric;
    const ACCEPTS: &'static [ValueKind] = &[ValueKind::Int];

    fn measure(value: &Value) -> Option<Numeric> {
        numeric(value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FloatKind;

impl ScalarKind for FloatKind {
    type Measure = Numeric;
    const ACCEPTS: &'static [ValueKind] = &[ValueKind::Int, ValueKind::Float];

    fn measure(value: &Value) -> Option<Numeric> {
        numeric(value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NumberKind;

impl ScalarKind for NumberKind {
    type Measure = Numeric;
    const ACCEPTS: &'static [ValueKind] = &[ValueKind::Int, ValueKind::Float];

    fn measure(value: &Value) -> Option<Numeric> {
        numeric(value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BoolKind;

impl ScalarKind for BoolKind {
    type Measure = Unordered;
    const ACCEPTS: &'static [ValueKind] = &[ValueKind::Bool];

    fn measure(_value: &Value) -> Option<Unordered> {
        None
    }
}

/// Measure of kinds without a range; `min`/`max` cannot be called for them
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Unordered {}

#[derive(Debug, Clone, Copy)]
pub struct TextKind;

impl ScalarKind for TextKind {
    type Measure = usize;
    const ACCEPTS: &'static [ValueKind] = &[ValueKind::String];

    fn measure(value: &Value) -> Option<usize> {
        value.as_str().map(|s| s.chars().count())
    }
}

/// Pattern check anchored at the start of the string
#[derive(Debug, Clone)]
pub struct Format {
    pattern: String,
    matcher: Regex,
}

impl Format {
    /// Compiles a pattern that must match from the start of the string
    pub fn new(pattern: &str) -> SchemaResult<Self> {
        let matcher = Regex::new(&format!(r"\A(?:{})", pattern)).map_err(|e| {
            SchemaError::invalid_definition(format!("invalid pattern '{}': {}", pattern, e))
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            matcher,
        })
    }

    fn builtin(cell: &'static OnceLock<Format>, pattern: &str) -> Self {
        cell.get_or_init(|| {
            Format::new(pattern).expect("built-in pattern compilation cannot fail")
        })
        .clone()
    }

    pub fn email() -> Self {
        static EMAIL: OnceLock<Format> = OnceLock::new();
        Self::builtin(&EMAIL, EMAIL_PATTERN)
    }

    pub fn uuid() -> Self {
        static UUID: OnceLock<Format> = OnceLock::new();
        Self::builtin(&UUID, UUID_PATTERN)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    fn apply(&self, value: Value) -> SchemaResult<Value> {
        let Value::String(text) = value else {
            return Ok(value);
        };
        if !self.is_match(&text) {
            return Err(SchemaError::pattern_mismatch(&text, &self.pattern));
        }
        Ok(Value::String(text))
    }
}

/// Generic scalar validator
#[derive(Debug, Clone)]
pub struct Scalar<K: ScalarKind> {
    property: Property,
    range: Range<K::Measure>,
    format: Option<Format>,
    strip_hyphens: bool,
    kind: PhantomData<fn() -> K>,
}

pub type Int = Scalar<IntKind>;
pub type Float = Scalar<FloatKind>;
pub type Number = Scalar<NumberKind>;
pub type Bool = Scalar<BoolKind>;
pub type Text = Scalar<TextKind>;

impl<K: ScalarKind> Default for Scalar<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ScalarKind> Scalar<K> {
    /// Nullable, unbounded scalar of kind `K`
    pub fn new() -> Self {
        Self {
            property: Property::of(K::ACCEPTS),
            range: Range::default(),
            format: None,
            strip_hyphens: false,
            kind: PhantomData,
        }
    }

    /// Inclusive lower bound
    pub fn min(mut self, bound: impl Into<K::Measure>) -> Self {
        self.range.set_min(Provider::Literal(bound.into()));
        self
    }

    /// Inclusive upper bound
    pub fn max(mut self, bound: impl Into<K::Measure>) -> Self {
        self.range.set_max(Provider::Literal(bound.into()));
        self
    }

    /// Lower bound resolved on every validation
    pub fn min_with(mut self, f: impl Fn() -> K::Measure + Send + Sync + 'static) -> Self {
        self.range.set_min(Provider::thunk(f));
        self
    }

    /// Upper bound resolved on every validation
    pub fn max_with(mut self, f: impl Fn() -> K::Measure + Send + Sync + 'static) -> Self {
        self.range.set_max(Provider::thunk(f));
        self
    }

    pub fn range(&self) -> &Range<K::Measure> {
        &self.range
    }

    pub fn property(&self) -> &Property {
        &self.property
    }
}

impl Scalar<TextKind> {
    /// Minimum length in characters
    pub fn min_length(self, length: usize) -> Self {
        self.min(length)
    }

    /// Maximum length in characters
    pub fn max_length(self, length: usize) -> Self {
        self.max(length)
    }

    /// String matching `pattern` from its start
    pub fn regex(pattern: &str) -> SchemaResult<Self> {
        Ok(Self::new().with_format(Format::new(pattern)?))
    }

    /// String shaped like an email address
    pub fn email() -> Self {
        Self::new().with_format(Format::email())
    }

    /// Hexadecimal UUID, hyphens optional
    pub fn uuid() -> Self {
        Self::new().with_format(Format::uuid())
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Removes hyphens from the value after the format check
    pub fn strip_hyphens(mut self, strip: bool) -> Self {
        self.strip_hyphens = strip;
        self
    }

    pub fn format(&self) -> Option<&Format> {
        self.format.as_ref()
    }
}

impl<K: ScalarKind> Configure for Scalar<K> {
    fn property_mut(&mut self) -> &mut Property {
        &mut self.property
    }
}

impl<K: ScalarKind> Validate for Scalar<K> {
    fn validate(&self, value: Value) -> SchemaResult<Value> {
        self.property.run(value, K::coerce, |value| {
            if !self.range.admits(K::measure(&value).as_ref()) {
                return Err(SchemaError::out_of_range(&value));
            }
            let value = match &self.format {
                Some(format) => format.apply(value)?,
                None => value,
            };
            match value {
                Value::String(text) if self.strip_hyphens => {
                    Ok(Value::String(text.replace('-', "")))
                }
                other => Ok(other),
            }
        })
    }
}
