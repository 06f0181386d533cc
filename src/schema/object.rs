//! Composite validators over named fields
//!
//! A `Schema` is an ordered registry of `(name, validator)` pairs built with
//! an explicit builder. It validates on its own (as a non-nullable object)
//! or through an `Object`, which adds the usual property configuration.
//!
//! Output maps contain exactly the declared fields. Absent fields are
//! validated as null so that defaults and nullability apply uniformly.

use std::sync::Arc;

use super::errors::{SchemaError, SchemaResult};
use super::property::{Configure, Property, PropertyRef, Validate};
use super::value::{Map, Value, ValueKind};

/// One declared field
#[derive(Clone)]
pub struct Field {
    name: String,
    property: PropertyRef,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property(&self) -> &PropertyRef {
        &self.property
    }
}

/// Named, ordered field registry
#[derive(Clone)]
pub struct Schema {
    name: String,
    strict: bool,
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strict: false,
            fields: Vec::new(),
        }
    }

    /// Reject input keys that are not declared
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Declares a field; redeclaring a name replaces the earlier validator
    /// but keeps its position.
    pub fn field(self, name: impl Into<String>, property: impl Validate + 'static) -> Self {
        self.field_ref(name, Arc::new(property))
    }

    pub fn field_ref(mut self, name: impl Into<String>, property: PropertyRef) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.property = property,
            None => self.fields.push(Field { name, property }),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&PropertyRef> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.property)
    }

    fn is_declared(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Validates the contents of an input map against every declared field
    fn validate_fields(&self, mut input: Map, strict: bool) -> SchemaResult<Value> {
        if strict {
            // BTreeMap iteration is key-ordered, so the reported key is stable
            if let Some(key) = input.keys().find(|key| !self.is_declared(key)) {
                return Err(SchemaError::unexpected_field(key));
            }
        }

        let mut output = Map::new();
        for field in &self.fields {
            let raw = input.remove(&field.name).unwrap_or(Value::Null);
            let value = field
                .property
                .validate(raw)
                .map_err(|err| err.within(&field.name))?;
            output.insert(field.name.clone(), value);
        }
        Ok(Value::Object(output))
    }
}

fn expect_object(value: Value) -> SchemaResult<Map> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(SchemaError::type_mismatch("object", other.kind())),
    }
}

impl Validate for Schema {
    fn validate(&self, value: Value) -> SchemaResult<Value> {
        if value.is_null() {
            return Err(SchemaError::null_value());
        }
        self.validate_fields(expect_object(value)?, self.strict)
    }
}

/// Configurable property wrapping a `Schema`
#[derive(Clone)]
pub struct Object {
    property: Property,
    schema: Arc<Schema>,
    strict: bool,
}

impl Object {
    pub fn new(schema: Schema) -> Self {
        Self::shared(Arc::new(schema))
    }

    /// Wraps a schema shared with other graph nodes
    pub fn shared(schema: Arc<Schema>) -> Self {
        Self {
            property: Property::of(&[ValueKind::Object]),
            schema,
            strict: false,
        }
    }

    /// Strict on top of the schema's own strictness
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict || self.schema.strict
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl Configure for Object {
    fn property_mut(&mut self) -> &mut Property {
        &mut self.property
    }
}

impl Validate for Object {
    fn validate(&self, value: Value) -> SchemaResult<Value> {
        self.property.run(value, Ok, |value| {
            self.schema
                .validate_fields(expect_object(value)?, self.is_strict())
        })
    }
}
