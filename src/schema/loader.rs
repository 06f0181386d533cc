//! Schema loader and registry
//!
//! - One JSON document per schema version, any `*.json` file name
//! - Saved documents are written as `schema_<id>_<version>.json`
//! - A `(schema_id, schema_version)` pair is registered at most once
//! - Malformed or uncompilable documents fail the whole load

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::errors::{SchemaError, SchemaResult};
use super::object::Schema;
use super::types::SchemaDocument;
use crate::observability::{log_event_with_fields, Event};

/// A registered document together with its compiled validator
#[derive(Clone)]
pub struct LoadedSchema {
    document: SchemaDocument,
    schema: Arc<Schema>,
}

impl LoadedSchema {
    pub fn document(&self) -> &SchemaDocument {
        &self.document
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }
}

/// Schema loader that reads schema files from disk and maintains an in-memory registry.
pub struct SchemaLoader {
    schema_dir: PathBuf,
    /// Loaded schemas indexed by (schema_id, schema_version)
    schemas: HashMap<(String, String), LoadedSchema>,
}

impl SchemaLoader {
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            schemas: HashMap::new(),
        }
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads all schema files from the schema directory.
    ///
    /// A missing directory is created empty. Returns the number of
    /// schemas registered by this call.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        if !self.schema_dir.exists() {
            fs::create_dir_all(&self.schema_dir).map_err(|e| {
                SchemaError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to create schema directory: {}", e),
                )
            })?;
            return Ok(0);
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        // Directory order is platform dependent
        paths.sort();

        for path in &paths {
            if let Err(err) = self.load_schema_file(path) {
                let file = path.display().to_string();
                let error = err.to_string();
                log_event_with_fields(
                    Event::SchemaLoadFailed,
                    &[("file", file.as_str()), ("error", error.as_str())],
                );
                return Err(err);
            }
        }

        let count = paths.len().to_string();
        let dir = self.schema_dir.display().to_string();
        log_event_with_fields(
            Event::SchemasLoaded,
            &[("count", count.as_str()), ("schema_dir", dir.as_str())],
        );
        Ok(paths.len())
    }

    fn load_schema_file(&mut self, path: &Path) -> SchemaResult<()> {
        let source = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(source.as_str(), format!("Failed to read file: {}", e))
        })?;

        let document: SchemaDocument = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_schema(source.as_str(), format!("Invalid JSON: {}", e))
        })?;

        self.insert(document, &source)
    }

    /// Registers a document directly.
    pub fn register(&mut self, document: SchemaDocument) -> SchemaResult<()> {
        self.insert(document, "<in-memory>")
    }

    fn insert(&mut self, document: SchemaDocument, source: &str) -> SchemaResult<()> {
        document
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(source, e))?;

        let key = (document.schema_id.clone(), document.schema_version.clone());
        if self.schemas.contains_key(&key) {
            return Err(SchemaError::schema_immutable(
                &document.schema_id,
                &document.schema_version,
            ));
        }

        let schema = document.compile()?;
        log_event_with_fields(
            Event::SchemaLoaded,
            &[
                ("schema_id", document.schema_id.as_str()),
                ("schema_version", document.schema_version.as_str()),
                ("source", source),
            ],
        );

        self.schemas.insert(
            key,
            LoadedSchema {
                document,
                schema: Arc::new(schema),
            },
        );
        Ok(())
    }

    /// Gets a schema by ID and version.
    pub fn get(&self, schema_id: &str, schema_version: &str) -> Option<&LoadedSchema> {
        self.schemas
            .get(&(schema_id.to_string(), schema_version.to_string()))
    }

    /// Gets a schema, distinguishing an unknown ID from an unknown version.
    pub fn resolve(&self, schema_id: &str, schema_version: &str) -> SchemaResult<&LoadedSchema> {
        match self.get(schema_id, schema_version) {
            Some(loaded) => Ok(loaded),
            None if self.schema_id_exists(schema_id) => {
                Err(SchemaError::unknown_version(schema_id, schema_version))
            }
            None => Err(SchemaError::unknown_schema(schema_id)),
        }
    }

    pub fn exists(&self, schema_id: &str, schema_version: &str) -> bool {
        self.get(schema_id, schema_version).is_some()
    }

    /// Checks if any version of a schema ID exists.
    pub fn schema_id_exists(&self, schema_id: &str) -> bool {
        self.schemas.keys().any(|(id, _)| id == schema_id)
    }

    /// Registered `(id, version)` pairs, sorted
    pub fn keys(&self) -> Vec<(&str, &str)> {
        let mut keys: Vec<_> = self
            .schemas
            .keys()
            .map(|(id, version)| (id.as_str(), version.as_str()))
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn all_schemas(&self) -> impl Iterator<Item = &LoadedSchema> {
        self.schemas.values()
    }

    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Saves a document to the schema directory.
    ///
    /// The document must compile; an existing file for the same key is
    /// never overwritten.
    pub fn save_schema(&self, document: &SchemaDocument) -> SchemaResult<PathBuf> {
        document
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema("<in-memory>", e))?;
        document.compile()?;

        let filename = format!(
            "schema_{}_{}.json",
            document.schema_id, document.schema_version
        );
        let path = self.schema_dir.join(&filename);

        if path.exists() {
            return Err(SchemaError::schema_immutable(
                &document.schema_id,
                &document.schema_version,
            ));
        }

        fs::create_dir_all(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to create schema directory: {}", e),
            )
        })?;

        let content = serde_json::to_string_pretty(document).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to serialize schema: {}", e),
            )
        })?;

        fs::write(&path, content).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to write file: {}", e),
            )
        })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::errors::SchemaErrorCode;
    use crate::schema::property::Validate;
    use crate::schema::types::{FieldDef, FieldType};
    use crate::schema::value::Value;
    use serde_json::json;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample_document() -> SchemaDocument {
        let mut fields = BTreeMap::new();
        fields.insert(
            "name".into(),
            FieldDef::new(FieldType::String {
                min_length: None,
                max_length: None,
            })
            .not_null(),
        );
        fields.insert(
            "age".into(),
            FieldDef::new(FieldType::Int { min: Some(0), max: None }),
        );
        SchemaDocument::new("users", "v1", fields)
    }

    #[test]
    fn test_register_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());

        loader.register(sample_document()).unwrap();

        let loaded = loader.get("users", "v1").unwrap();
        assert_eq!(loaded.document().schema_id, "users");
        let out = loaded
            .schema()
            .validate(Value::from(json!({"name": "ann"})))
            .unwrap();
        assert_eq!(out, Value::from(json!({"name": "ann", "age": null})));
    }

    #[test]
    fn test_schema_immutability() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());

        loader.register(sample_document()).unwrap();

        let result = loader.register(sample_document());
        assert_eq!(result.unwrap_err().code().code(), "SCHEMA_IMMUTABLE");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let loader = SchemaLoader::new(temp_dir.path());

        let path = loader.save_schema(&sample_document()).unwrap();
        assert!(path.ends_with("schema_users_v1.json"));

        let mut loader2 = SchemaLoader::new(temp_dir.path());
        assert_eq!(loader2.load_all().unwrap(), 1);
        assert!(loader2.exists("users", "v1"));
        assert_eq!(loader2.get("users", "v1").unwrap().document(), &sample_document());
    }

    #[test]
    fn test_save_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let schema_dir = temp_dir.path().join("schemas");
        let loader = SchemaLoader::new(&schema_dir);

        let mut document = sample_document();
        document.schema_id = "../escape".into();
        let err = loader.save_schema(&document).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MalformedSchema);
        assert!(!temp_dir.path().join("escape_v1.json").exists());
        assert!(!schema_dir.exists());

        let mut loader = SchemaLoader::new(&schema_dir);
        assert_eq!(
            loader.register(document).unwrap_err().code(),
            SchemaErrorCode::MalformedSchema
        );
    }

    #[test]
    fn test_save_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let loader = SchemaLoader::new(temp_dir.path());

        loader.save_schema(&sample_document()).unwrap();
        let err = loader.save_schema(&sample_document()).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::SchemaImmutable);
    }

    #[test]
    fn test_resolve_distinguishes_unknowns() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        loader.register(sample_document()).unwrap();

        assert!(loader.resolve("users", "v1").is_ok());
        assert_eq!(
            loader.resolve("users", "v2").err().map(|e| e.code()),
            Some(SchemaErrorCode::UnknownSchemaVersion)
        );
        assert_eq!(
            loader.resolve("orders", "v1").err().map(|e| e.code()),
            Some(SchemaErrorCode::UnknownSchema)
        );
    }

    #[test]
    fn test_unknown_schema() {
        let temp_dir = TempDir::new().unwrap();
        let loader = SchemaLoader::new(temp_dir.path());

        assert!(loader.get("nonexistent", "v1").is_none());
        assert!(!loader.exists("nonexistent", "v1"));
        assert!(!loader.schema_id_exists("nonexistent"));
    }

    #[test]
    fn test_load_missing_directory_creates_it() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("schemas");
        let mut loader = SchemaLoader::new(&dir);

        assert_eq!(loader.load_all().unwrap(), 0);
        assert!(dir.is_dir());
        assert_eq!(loader.schema_count(), 0);
    }

    #[test]
    fn test_load_skips_non_json_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("README.txt"), "not a schema").unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        assert_eq!(loader.load_all().unwrap(), 0);
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("bad.json"), "{ not json").unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.load_all().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MalformedSchema);
        assert!(err.message().contains("bad.json"));
    }

    #[test]
    fn test_load_uncompilable_file() {
        let temp_dir = TempDir::new().unwrap();
        let doc = json!({
            "schema_id": "codes",
            "schema_version": "1",
            "fields": {"code": {"type": "regex", "pattern": "("}}
        });
        fs::write(temp_dir.path().join("codes.json"), doc.to_string()).unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.load_all().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidDefinition);
        assert_eq!(err.path(), "code");
    }

    #[test]
    fn test_duplicate_key_across_files() {
        let temp_dir = TempDir::new().unwrap();
        let doc = serde_json::to_string(&sample_document()).unwrap();
        fs::write(temp_dir.path().join("a.json"), &doc).unwrap();
        fs::write(temp_dir.path().join("b.json"), &doc).unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        assert_eq!(
            loader.load_all().unwrap_err().code(),
            SchemaErrorCode::SchemaImmutable
        );
    }

    #[test]
    fn test_keys_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        let mut v2 = sample_document();
        v2.schema_version = "v2".into();
        loader.register(v2).unwrap();
        loader.register(sample_document()).unwrap();
        assert_eq!(loader.keys(), vec![("users", "v1"), ("users", "v2")]);
    }
}
