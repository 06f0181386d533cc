//! Ordered polymorphic matcher
//!
//! Candidates are tried in declaration order; the first one that accepts the
//! value wins, so order encodes priority. Property candidates validate an
//! independent clone of the input, which keeps a coercing candidate that
//! later fails from leaking changes into the next attempt.

use std::sync::Arc;

use super::errors::{SchemaError, SchemaResult};
use super::property::{Configure, Property, PropertyRef, Validate};
use super::value::Value;

/// One option of a `Choice`
#[derive(Clone)]
pub enum Candidate {
    /// Matches on equality, returns the value unchanged
    Literal(Value),
    /// Matches when validation succeeds, returns the validated value
    Property(PropertyRef),
}

impl Candidate {
    pub fn literal(value: impl Into<Value>) -> Self {
        Candidate::Literal(value.into())
    }

    pub fn property(property: impl Validate + 'static) -> Self {
        Candidate::Property(Arc::new(property))
    }

    fn attempt(&self, value: &Value) -> Option<Value> {
        match self {
            Candidate::Literal(literal) => (literal == value).then(|| value.clone()),
            Candidate::Property(property) => property.validate(value.clone()).ok(),
        }
    }
}

impl From<Value> for Candidate {
    fn from(value: Value) -> Self {
        Candidate::Literal(value)
    }
}

/// Validator accepting the first matching candidate
#[derive(Clone)]
pub struct Choice {
    property: Property,
    candidates: Vec<Candidate>,
}

impl Choice {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            property: Property::new(),
            candidates,
        }
    }

    /// Choice between literal values
    pub fn literals<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::new(values.into_iter().map(Candidate::literal).collect())
    }

    /// Appends a candidate with the lowest priority so far
    pub fn or(mut self, candidate: Candidate) -> Self {
        self.candidates.push(candidate);
        self
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }
}

impl Configure for Choice {
    fn property_mut(&mut self) -> &mut Property {
        &mut self.property
    }
}

impl Validate for Choice {
    fn validate(&self, value: Value) -> SchemaResult<Value> {
        self.property.run(value, Ok, |value| {
            self.candidates
                .iter()
                .find_map(|candidate| candidate.attempt(&value))
                .ok_or_else(|| SchemaError::no_matching_choice(&value))
        })
    }
}
