//! JSON I/O handling for CLI
//!
//! - Input: one JSON document via stdin or a file
//! - Output: one JSON object per response on stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Read a JSON document from stdin
pub fn read_request() -> CliResult<Value> {
    read_request_from(io::stdin().lock())
}

/// Read a JSON document from any reader; the whole input is one document
pub fn read_request_from<R: Read>(mut reader: R) -> CliResult<Value> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;

    if content.trim().is_empty() {
        return Err(CliError::EmptyInput);
    }

    Ok(serde_json::from_str(&content)?)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_response_to(&mut io::stdout().lock(), data)
}

pub fn write_response_to<W: Write>(writer: &mut W, data: Value) -> CliResult<()> {
    write_line(writer, &json!({"status": "ok", "data": data}))
}

/// Write an error response to stdout
pub fn write_error(err: &CliError) -> CliResult<()> {
    write_error_to(&mut io::stdout().lock(), err)
}

pub fn write_error_to<W: Write>(writer: &mut W, err: &CliError) -> CliResult<()> {
    let mut response = json!({
        "status": "error",
        "code": err.code(),
        "message": err.message(),
    });
    if !err.path().is_empty() {
        response["path"] = Value::from(err.path());
    }
    write_line(writer, &response)
}

fn write_line<W: Write>(writer: &mut W, response: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, response)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
