pub mod protected;
pub mod public;

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::validation::{registry, validate, TypedPayload, ValidationResult};

/// Path parameters arrive as text; schema coercion turns them into typed
/// values.
pub(crate) fn params_map(params: &HashMap<String, String>) -> Map<String, Value> {
    params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

/// JSON bodies must be objects; anything else is a single invalid-JSON
/// rejection rather than per-field errors.
pub(crate) fn body_map(body: &Value) -> Result<Map<String, Value>, ApiError> {
    match body {
        Value::Object(map) => Ok(map.clone()),
        _ => Err(ApiError::invalid_json("Request body must be a JSON object")),
    }
}

/// Look up a registered schema and validate a raw payload against it.
/// Validation failures become a structured field-error response.
pub(crate) fn validated(schema_name: &str, raw: &Map<String, Value>) -> Result<TypedPayload, ApiError> {
    let schema = registry().expect(schema_name)?;
    match validate(schema, raw) {
        ValidationResult::Valid(payload) => Ok(payload),
        ValidationResult::Invalid(errors) => Err(errors.into()),
    }
}
