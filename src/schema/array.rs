//! Homogeneous sequence validator

use std::sync::Arc;

use super::errors::{SchemaError, SchemaResult};
use super::property::{Property, PropertyRef, Validate};
use super::range::{Provider, Range};
use super::value::{Value, ValueKind};

/// Validates a sequence whose elements all satisfy one validator.
///
/// Arrays are not nullable: a null input becomes an empty array, which
/// then goes through the length check like any other input. Only the
/// callback is configurable on the base property.
#[derive(Clone)]
pub struct Array {
    property: Property,
    element: PropertyRef,
    length: Range<usize>,
}

impl Array {
    pub fn new(element: impl Validate + 'static) -> Self {
        Self::of(Arc::new(element))
    }

    pub fn of(element: PropertyRef) -> Self {
        let mut property = Property::of(&[ValueKind::Array]);
        property.set_nullable(false);
        property.set_default(Provider::thunk(|| Value::Array(Vec::new())));
        Self {
            property,
            element,
            length: Range::new(),
        }
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.length.set_min(Provider::Literal(length));
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.length.set_max(Provider::Literal(length));
        self
    }

    pub fn min_length_with(mut self, f: impl Fn() -> usize + Send + Sync + 'static) -> Self {
        self.length.set_min(Provider::thunk(f));
        self
    }

    pub fn max_length_with(mut self, f: impl Fn() -> usize + Send + Sync + 'static) -> Self {
        self.length.set_max(Provider::thunk(f));
        self
    }

    /// Post-processing applied to the validated array
    pub fn callback(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.property.set_callback(Arc::new(f));
        self
    }

    pub fn length(&self) -> &Range<usize> {
        &self.length
    }
}

impl Validate for Array {
    fn validate(&self, value: Value) -> SchemaResult<Value> {
        self.property.run(value, Ok, |value| {
            let items = match value {
                Value::Array(items) => items,
                other => return Err(SchemaError::type_mismatch("array", other.kind())),
            };
            if !self.length.admits(Some(&items.len())) {
                return Err(SchemaError::out_of_range(format!("array of length {}", items.len())));
            }

            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    self.element
                        .validate(item)
                        .map_err(|err| err.at_index(index))
                })
                .collect::<SchemaResult<Vec<_>>>()
                .map(Value::Array)
        })
    }
}
