//! Document Pipeline Tests
//!
//! End-to-end behavior of schema documents on disk:
//! - Loading, saving and immutability
//! - Validation through the registry with shape limits and metrics
//! - Body policies and rule-based custom properties

use schemata::observability::MetricsRegistry;
use schemata::rules::{AllOf, AnyOf, NoneOf};
use schemata::schema::{
    Accepts, BodyRule, Custom, Int, Limits, Object, Schema, SchemaDocument, SchemaErrorCode,
    SchemaLoader, SchemaValidator, Text, Validate, Value,
};
use serde_json::json;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_document(dir: &TempDir, file: &str, document: serde_json::Value) {
    fs::write(dir.path().join(file), document.to_string()).unwrap();
}

fn orders_document() -> serde_json::Value {
    json!({
        "schema_id": "orders",
        "schema_version": "v1",
        "strict": true,
        "fields": {
            "id": {"type": "uuid", "strip_hyphens": true, "nullable": false},
            "quantity": {"type": "int", "min": 1, "default": 1},
            "placed": {"type": "datetime"},
            "status": {
                "type": "choice",
                "choices": [{"literal": "open"}, {"literal": "closed"}],
                "default": "open"
            },
            "lines": {
                "type": "array",
                "max_length": 2,
                "items": {
                    "type": "object",
                    "strict": true,
                    "fields": {
                        "sku": {"type": "regex", "pattern": "[A-Z]{3}-\\d+", "nullable": false},
                        "price": {"type": "number", "min": 0}
                    }
                }
            }
        }
    })
}

fn loaded_dir() -> (TempDir, SchemaLoader) {
    let temp_dir = TempDir::new().unwrap();
    write_document(&temp_dir, "orders.json", orders_document());
    let mut loader = SchemaLoader::new(temp_dir.path());
    assert_eq!(loader.load_all().unwrap(), 1);
    (temp_dir, loader)
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_loaded_document_validates_and_coerces() {
    let (_dir, loader) = loaded_dir();
    let validator = SchemaValidator::new(&loader);

    let out = validator
        .validate(
            "orders",
            "v1",
            &json!({
                "id": "123e4567-e89b-12d3-a456-426614174000",
                "placed": "2018-12-26T10:00:00Z",
                "lines": [{"sku": "ABC-1", "price": 9.5}]
            }),
        )
        .unwrap();

    assert_eq!(
        out.into_json(),
        json!({
            "id": "123e4567e89b12d3a456426614174000",
            "quantity": 1,
            "placed": "2018-12-26T10:00:00.000000Z",
            "status": "open",
            "lines": [{"sku": "ABC-1", "price": 9.5}]
        })
    );
}

#[test]
fn test_loaded_document_rejections() {
    let (_dir, loader) = loaded_dir();
    let validator = SchemaValidator::new(&loader);
    let id = "123e4567-e89b-12d3-a456-426614174000";

    let cases = [
        (json!({}), "id", SchemaErrorCode::NullViolation),
        (json!({"id": id, "quantity": 0}), "quantity", SchemaErrorCode::RangeViolation),
        (json!({"id": id, "status": "lost"}), "status", SchemaErrorCode::NoMatchingChoice),
        (json!({"id": id, "extra": 1}), "extra", SchemaErrorCode::UnexpectedField),
        (json!({"id": id, "placed": "yesterday"}), "placed", SchemaErrorCode::ParseFailure),
        (
            json!({"id": id, "lines": [{"sku": "ABC-1"}, {"sku": "abc"}]}),
            "lines[1].sku",
            SchemaErrorCode::PatternViolation,
        ),
        (
            json!({"id": id, "lines": [{"sku": "ABC-1", "note": "x"}]}),
            "lines[0].note",
            SchemaErrorCode::UnexpectedField,
        ),
        (
            json!({"id": id, "lines": [{"sku": "A-1"}, {"sku": "A-2"}, {"sku": "A-3"}]}),
            "lines",
            SchemaErrorCode::RangeViolation,
        ),
    ];

    for (input, path, expected) in cases {
        let err = validator.validate("orders", "v1", &input).unwrap_err();
        assert_eq!(err.code(), expected, "input {}", input);
        assert_eq!(err.path(), path, "input {}", input);
    }
}

#[test]
fn test_unknown_schema_and_version() {
    let (_dir, loader) = loaded_dir();
    let validator = SchemaValidator::new(&loader);

    let err = validator.validate("invoices", "v1", &json!({})).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::UnknownSchema);

    let err = validator.validate("orders", "v9", &json!({})).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::UnknownSchemaVersion);
}

#[test]
fn test_malformed_file_fails_load() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("broken.json"), "{ not json").unwrap();

    let mut loader = SchemaLoader::new(temp_dir.path());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::MalformedSchema);
}

#[test]
fn test_invalid_default_fails_load() {
    let temp_dir = TempDir::new().unwrap();
    write_document(
        &temp_dir,
        "bad.json",
        json!({
            "schema_id": "bad",
            "schema_version": "v1",
            "fields": {"n": {"type": "int", "min": 5, "default": 1}}
        }),
    );

    let mut loader = SchemaLoader::new(temp_dir.path());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::InvalidDefinition);
    assert_eq!(err.path(), "n");
}

#[test]
fn test_saved_documents_are_immutable() {
    let temp_dir = TempDir::new().unwrap();
    let document: SchemaDocument = serde_json::from_value(orders_document()).unwrap();

    let loader = SchemaLoader::new(temp_dir.path());
    loader.save_schema(&document).unwrap();
    let err = loader.save_schema(&document).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::SchemaImmutable);

    let mut reloaded = SchemaLoader::new(temp_dir.path());
    assert_eq!(reloaded.load_all().unwrap(), 1);
    assert_eq!(reloaded.get("orders", "v1").unwrap().document(), &document);
}

#[test]
fn test_duplicate_documents_across_files_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write_document(&temp_dir, "a.json", orders_document());
    write_document(&temp_dir, "b.json", orders_document());

    let mut loader = SchemaLoader::new(temp_dir.path());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::SchemaImmutable);
}

// =============================================================================
// Limits and Metrics
// =============================================================================

#[test]
fn test_limits_reject_before_validation() {
    let (_dir, loader) = loaded_dir();
    let metrics = MetricsRegistry::new();
    let validator = SchemaValidator::new(&loader)
        .with_limits(Limits {
            max_depth: 3,
            max_nodes: 100,
        })
        .with_metrics(&metrics);

    let id = "123e4567-e89b-12d3-a456-426614174000";
    assert!(validator.validate("orders", "v1", &json!({"id": id})).is_ok());

    let err = validator
        .validate("orders", "v1", &json!({"id": id, "lines": [{"sku": {"deep": 1}}]}))
        .unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::LimitExceeded);

    assert!(validator.validate("orders", "v1", &json!({"id": "x"})).is_err());

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.validations_passed, 1);
    assert_eq!(snapshot.validations_rejected, 1);
    assert_eq!(snapshot.limit_rejections, 1);
    assert_eq!(snapshot.total_validations(), 3);
}

// =============================================================================
// Body Policy and Rules
// =============================================================================

#[test]
fn test_body_rules() {
    let login = Schema::new("Login")
        .field("user", Text::new().min_length(1))
        .field("pin", Int::new().min(0).max(9999));
    let rule = BodyRule::Validated(Arc::new(Object::new(login)));

    let out = rule
        .apply(Some(Value::from(json!({"user": "ann", "pin": 42}))))
        .unwrap();
    assert_eq!(out, Some(Value::from(json!({"user": "ann", "pin": 42}))));
    assert!(rule.apply(None).unwrap() == Some(Value::Null));

    let err = BodyRule::Required.apply(None).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::BodyPolicy);
    let err = BodyRule::Forbidden.apply(Some(Value::Null)).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::BodyPolicy);
    assert_eq!(BodyRule::Optional.apply(None).unwrap(), None);
}

#[test]
fn test_custom_property_from_combinators() {
    let port = Custom::from_rule(
        AllOf::new()
            .with(Accepts(Int::new().min(1).max(65535)))
            .with(NoneOf::new().with(|v: &Value| v.as_i64() == Some(22))),
        "port not allowed",
    );

    assert_eq!(port.validate(Value::Int(8080)).unwrap(), Value::Int(8080));
    let err = port.validate(Value::Int(22)).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::CallbackRejected);
    assert!(port.validate(Value::Int(0)).is_err());

    let contact = Custom::from_rule(
        AnyOf::new()
            .with(Accepts(Text::email()))
            .with(Accepts(Text::regex(r"\+\d{6,15}").unwrap())),
        "expected email or phone number",
    );
    assert!(contact.validate(Value::from("ann@example.org")).is_ok());
    assert!(contact.validate(Value::from("+4915112345678")).is_ok());
    assert!(contact.validate(Value::from("ann")).is_err());
}
