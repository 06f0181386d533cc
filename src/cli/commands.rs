//! CLI command implementations
//!
//! Every command follows the same boot sequence:
//! 1. Configuration load
//! 2. Log level applied
//! 3. Schema load (any failure is fatal)
//!
//! `validate` then reads one document and writes exactly one response.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::config::Config;
use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry};
use crate::schema::{SchemaLoader, SchemaValidator};

use super::args::Command;
use super::errors::CliResult;
use super::io::{read_request, read_request_from, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let result = match cmd {
        Command::Validate {
            config,
            schema,
            schema_version,
            input,
        } => validate(&config, &schema, &schema_version, input.as_deref()),
        Command::Check { config } => check(&config),
    };

    match result {
        Ok(data) => write_response(data),
        Err(err) => {
            write_error(&err)?;
            Err(err)
        }
    }
}

/// Loaded configuration and schema registry
pub struct Runtime {
    pub config: Config,
    pub loader: SchemaLoader,
    pub metrics: MetricsRegistry,
}

/// Loads configuration and every schema under `schema_dir`
pub fn boot(config_path: &Path) -> CliResult<Runtime> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);

    let schema_dir = config.schema_dir.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("schema_dir", schema_dir.as_str())]);

    let metrics = MetricsRegistry::new();
    let mut loader = SchemaLoader::new(&config.schema_dir);
    let count = loader.load_all()?;
    metrics.add_schemas_loaded(count as u64);

    Ok(Runtime {
        config,
        loader,
        metrics,
    })
}

/// Validate a document read from `input` (stdin when absent)
pub fn validate(
    config_path: &Path,
    schema_id: &str,
    schema_version: &str,
    input: Option<&Path>,
) -> CliResult<Value> {
    let runtime = boot(config_path)?;
    let document = match input {
        Some(path) => read_request_from(fs::File::open(path)?)?,
        None => read_request()?,
    };
    validate_document(&runtime, schema_id, schema_version, &document)
}

/// Validates an already decoded document
pub fn validate_document(
    runtime: &Runtime,
    schema_id: &str,
    schema_version: &str,
    document: &Value,
) -> CliResult<Value> {
    let validated = SchemaValidator::new(&runtime.loader)
        .with_limits(runtime.config.limits())
        .with_metrics(&runtime.metrics)
        .validate(schema_id, schema_version, document)?;
    Ok(validated.into_json())
}

/// Report registered schemas
pub fn check(config_path: &Path) -> CliResult<Value> {
    let runtime = boot(config_path)?;
    Ok(describe(&runtime))
}

fn describe(runtime: &Runtime) -> Value {
    let schemas: Vec<Value> = runtime
        .loader
        .keys()
        .into_iter()
        .filter_map(|(id, version)| runtime.loader.get(id, version))
        .map(|loaded| {
            let document = loaded.document();
            json!({
                "schema_id": document.schema_id,
                "schema_version": document.schema_version,
                "strict": document.strict,
                "fields": document.fields.keys().collect::<Vec<_>>(),
            })
        })
        .collect();

    json!({
        "schema_dir": runtime.config.schema_dir.display().to_string(),
        "count": schemas.len(),
        "schemas": schemas,
        "metrics": runtime.metrics.to_json(),
    })
}
