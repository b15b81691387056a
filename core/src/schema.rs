//! JSON Schema validation of trackhub documents.
//!
//! The validation algorithm itself comes from the `jsonschema` crate; this
//! module only adapts its output into owned, sorted records.

use serde_json::Value;

use crate::error::Error;

/// One reason an instance fails its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// JSON pointer to the offending part of the instance (`""` for the root).
    pub path: String,
    /// JSON pointer to the schema keyword that failed.
    pub schema_path: String,
    pub message: String,
}

/// One step of a JSON pointer. Array indices order numerically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum PathSegment {
    Index(usize),
    Key(String),
}

fn segments(pointer: &str) -> Vec<PathSegment> {
    pointer
        .split('/')
        .skip(1)
        .map(|part| match part.parse() {
            Ok(index) => PathSegment::Index(index),
            Err(_) => PathSegment::Key(part.to_string()),
        })
        .collect()
}

/// Capability: check an instance document against a schema document.
pub trait SchemaValidator {
    /// Returns every violation, sorted by instance path. An empty vector
    /// means the instance is valid.
    fn validate(&self, schema: &Value, instance: &Value) -> Result<Vec<ValidationError>, Error>;
}

/// JSON Schema draft 4, the draft trackhub schemas are written against.
#[derive(Debug, Clone, Copy, Default)]
pub struct Draft4Validator;

impl SchemaValidator for Draft4Validator {
    fn validate(&self, schema: &Value, instance: &Value) -> Result<Vec<ValidationError>, Error> {
        let validator = jsonschema::draft4::new(schema).map_err(|e| Error::Schema(e.to_string()))?;
        let mut errors: Vec<ValidationError> = validator
            .iter_errors(instance)
            .map(|e| ValidationError {
                path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();
        errors.sort_by_cached_key(|e| (segments(&e.path), e.schema_path.clone(), e.message.clone()));
        Ok(errors)
    }
}
