//! Validation entry point for registered schemas
//!
//! - The schema is resolved by `(schema_id, schema_version)`
//! - Input size is bounded before any property runs
//! - Fail-fast: the first violation is returned with its field path
//! - The input is never mutated; a new value is returned
//!
//! Outcomes are counted when a metrics registry is attached and logged at
//! TRACE.

use super::errors::{SchemaError, SchemaResult};
use super::loader::SchemaLoader;
use super::property::Validate;
use super::value::Value;
use crate::observability::{trace_event, Event, MetricsRegistry};

/// Bounds on input shape, checked before validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth; scalars have depth 1
    pub max_depth: usize,
    /// Maximum number of values, containers included
    pub max_nodes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_nodes: 10_000,
        }
    }
}

impl Limits {
    /// Rejects input deeper or larger than allowed
    pub fn check(&self, input: &serde_json::Value) -> SchemaResult<()> {
        let mut nodes = 0usize;
        self.measure(input, 1, &mut nodes).map(|_| ())
    }

    // Walks the input, stopping as soon as a limit is crossed
    fn measure(
        &self,
        value: &serde_json::Value,
        depth: usize,
        nodes: &mut usize,
    ) -> SchemaResult<usize> {
        if depth > self.max_depth {
            return Err(SchemaError::limit_exceeded("depth", depth, self.max_depth));
        }
        *nodes += 1;
        if *nodes > self.max_nodes {
            return Err(SchemaError::limit_exceeded("node count", *nodes, self.max_nodes));
        }

        let mut descend = |deepest: usize, child: &serde_json::Value| -> SchemaResult<usize> {
            Ok(deepest.max(self.measure(child, depth + 1, nodes)?))
        };
        match value {
            serde_json::Value::Array(items) => items.iter().try_fold(depth, &mut descend),
            serde_json::Value::Object(map) => map.values().try_fold(depth, &mut descend),
            _ => Ok(depth),
        }
    }
}

/// Validates input against schemas held by a loader.
pub struct SchemaValidator<'a> {
    loader: &'a SchemaLoader,
    limits: Limits,
    metrics: Option<&'a MetricsRegistry>,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(loader: &'a SchemaLoader) -> Self {
        Self {
            loader,
            limits: Limits::default(),
            metrics: None,
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_metrics(mut self, metrics: &'a MetricsRegistry) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Validates a JSON input against a registered schema.
    ///
    /// # Errors
    ///
    /// - `SCHEMA_UNKNOWN` / `SCHEMA_UNKNOWN_VERSION` if the schema is not registered
    /// - `SCHEMA_LIMIT_EXCEEDED` if the input is too deep or too large
    /// - any validation code, with the path of the offending field
    pub fn validate(
        &self,
        schema_id: &str,
        schema_version: &str,
        input: &serde_json::Value,
    ) -> SchemaResult<Value> {
        let loaded = self.loader.resolve(schema_id, schema_version)?;

        if let Err(err) = self.limits.check(input) {
            if let Some(metrics) = self.metrics {
                metrics.increment_limit_rejections();
            }
            trace_event(
                Event::LimitRejected,
                &[
                    ("schema_id", schema_id),
                    ("schema_version", schema_version),
                    ("message", err.message()),
                ],
            );
            return Err(err);
        }

        let result = loaded.schema().validate(Value::from(input.clone()));

        match &result {
            Ok(_) => {
                if let Some(metrics) = self.metrics {
                    metrics.increment_passed();
                }
                trace_event(
                    Event::ValidationPassed,
                    &[("schema_id", schema_id), ("schema_version", schema_version)],
                );
            }
            Err(err) => {
                if let Some(metrics) = self.metrics {
                    metrics.increment_rejected();
                }
                trace_event(
                    Event::ValidationRejected,
                    &[
                        ("schema_id", schema_id),
                        ("schema_version", schema_version),
                        ("code", err.code().code()),
                        ("path", err.path()),
                    ],
                );
            }
        }

        result
    }
}
