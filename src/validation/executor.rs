//! Generic schema interpreter. Coerces, defaults, and checks constraints in
//! declaration order, accumulating at most one error per field and never
//! short-circuiting the payload. Malformed input is a modeled `Invalid`
//! outcome, not a fault.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::validation::schema::{Coercion, Constraint, FieldSpec, FieldType, FieldValue, Schema};

/// One field-level rejection: the offending field and a human-readable
/// reason.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Typed output of a successful validation. Contains exactly the schema's
/// declared fields; omitted optional fields are present as `Absent`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedPayload {
    fields: BTreeMap<String, FieldValue>,
}

impl TypedPayload {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(FieldValue::as_int)
    }

    pub fn is_absent(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(FieldValue::is_absent)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid(TypedPayload),
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }
}

/// Validate a raw JSON object against a schema.
pub fn validate(schema: &Schema, raw: &Map<String, Value>) -> ValidationResult {
    let mut fields = BTreeMap::new();
    let mut errors = Vec::new();

    for spec in &schema.fields {
        match coerce_field(spec, raw.get(spec.name)) {
            Ok(Some(value)) => {
                if let Err(err) = check_constraints(spec, &value) {
                    errors.push(err);
                } else {
                    fields.insert(spec.name.to_string(), value);
                }
            }
            Ok(None) => {
                fields.insert(spec.name.to_string(), FieldValue::Absent);
            }
            Err(err) => errors.push(err),
        }
    }

    if errors.is_empty() {
        ValidationResult::Valid(TypedPayload { fields })
    } else {
        ValidationResult::Invalid(errors)
    }
}

/// Resolve presence, defaulting, and coercion for one field. `Ok(None)`
/// means legitimately absent (optional with no default).
fn coerce_field(spec: &FieldSpec, raw: Option<&Value>) -> Result<Option<FieldValue>, FieldError> {
    let raw = match raw {
        Some(Value::Null) | None => {
            if let Some(default) = &spec.default {
                return Ok(Some(default.clone()));
            }
            if spec.required {
                return Err(FieldError::new(spec.name, "is required"));
            }
            return Ok(None);
        }
        Some(value) => value,
    };

    match (spec.ty, spec.coerce) {
        (FieldType::String | FieldType::Enum, _) => match raw {
            Value::String(s) => Ok(Some(FieldValue::Str(s.clone()))),
            _ => Err(FieldError::new(spec.name, "expected a string")),
        },
        (FieldType::Integer, Coercion::IntFromText) => match raw {
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(|n| Some(FieldValue::Int(n)))
                .map_err(|_| FieldError::new(spec.name, "expected an integer")),
            Value::Number(n) => n
                .as_i64()
                .map(|n| Some(FieldValue::Int(n)))
                .ok_or_else(|| FieldError::new(spec.name, "expected an integer")),
            _ => Err(FieldError::new(spec.name, "expected an integer")),
        },
        (FieldType::Integer, Coercion::None) => match raw {
            Value::Number(n) => n
                .as_i64()
                .map(|n| Some(FieldValue::Int(n)))
                .ok_or_else(|| FieldError::new(spec.name, "expected an integer")),
            _ => Err(FieldError::new(spec.name, "expected an integer")),
        },
    }
}

/// Apply constraints in declaration order; the first violation is the
/// field's single reported error.
fn check_constraints(spec: &FieldSpec, value: &FieldValue) -> Result<(), FieldError> {
    for constraint in &spec.constraints {
        match (constraint, value) {
            (Constraint::MinLen(min), FieldValue::Str(s)) => {
                if s.chars().count() < *min {
                    return Err(FieldError::new(
                        spec.name,
                        format!("must be at least {min} characters"),
                    ));
                }
            }
            (Constraint::Positive, FieldValue::Int(n)) => {
                if *n <= 0 {
                    return Err(FieldError::new(spec.name, "must be a positive integer"));
                }
            }
            (Constraint::OneOf(set), FieldValue::Str(s)) => {
                if !set.contains(s) {
                    return Err(FieldError::new(
                        spec.name,
                        format!("must be one of: {}", set.values.join(", ")),
                    ));
                }
            }
            // Type/constraint mismatches cannot arise from the built-in
            // table; coercion already rejected ill-typed values.
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::registry::{self, registry};
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn schema(name: &str) -> &'static Schema {
        registry().expect(name).unwrap()
    }

    #[test]
    fn login_accepts_non_empty_password() {
        let result = validate(schema(registry::LOGIN_BODY), &obj(json!({"password": "s3cret"})));
        match result {
            ValidationResult::Valid(payload) => assert_eq!(payload.str("password"), Some("s3cret")),
            other => panic!("expected valid, got {other:?}"),
        }
    }

    #[test]
    fn login_rejects_empty_password() {
        let result = validate(schema(registry::LOGIN_BODY), &obj(json!({"password": ""})));
        match result {
            ValidationResult::Invalid(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "password");
            }
            other => panic!("expected invalid, got {other:?}"),
        }
    }

    #[test]
    fn missing_required_field_reports_only_that_field() {
        let result = validate(schema(registry::LOGIN_BODY), &obj(json!({})));
        match result {
            ValidationResult::Invalid(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "password");
                assert_eq!(errors[0].reason, "is required");
            }
            other => panic!("expected invalid, got {other:?}"),
        }
    }

    #[test]
    fn team_id_coercion_from_text() {
        let s = schema(registry::TEAM_ID_PARAMS);

        match validate(s, &obj(json!({"id": "5"}))) {
            ValidationResult::Valid(payload) => assert_eq!(payload.int("id"), Some(5)),
            other => panic!("expected valid, got {other:?}"),
        }

        for bad in ["0", "-3", "abc"] {
            let result = validate(s, &obj(json!({ "id": bad })));
            assert!(!result.is_valid(), "'{bad}' should be rejected");
        }
    }

    #[test]
    fn wave_params_report_both_violations() {
        let result = validate(
            schema(registry::WAVE_ID_PARAMS),
            &obj(json!({"id": "0", "waveId": "abc"})),
        );
        match result {
            ValidationResult::Invalid(errors) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "id");
                assert_eq!(errors[1].field, "waveId");
            }
            other => panic!("expected invalid, got {other:?}"),
        }
    }

    #[test]
    fn prompt_value_min_length_boundary() {
        let s = schema(registry::PROMPT_UPDATE_BODY);

        let nine = validate(s, &obj(json!({"value": "123456789"})));
        assert!(!nine.is_valid(), "9 characters must be rejected");

        let ten = validate(s, &obj(json!({"value": "1234567890"})));
        assert!(ten.is_valid(), "10 characters must be accepted");
    }

    #[test]
    fn prompt_key_enum_membership() {
        let s = schema(registry::PROMPT_GET_PARAMS);

        assert!(validate(s, &obj(json!({"key": "final_report"}))).is_valid());

        match validate(s, &obj(json!({"key": "bogus"}))) {
            ValidationResult::Invalid(errors) => {
                assert_eq!(errors[0].field, "key");
                assert!(errors[0].reason.contains("one of"));
            }
            other => panic!("expected invalid, got {other:?}"),
        }
    }

    #[test]
    fn optional_wave_name_absent_is_valid() {
        let result = validate(schema(registry::WAVE_CREATE_BODY), &obj(json!({})));
        match result {
            ValidationResult::Valid(payload) => {
                assert!(payload.is_absent("name"));
                assert_eq!(payload.str("name"), None);
            }
            other => panic!("expected valid, got {other:?}"),
        }
    }

    #[test]
    fn first_violation_per_field_wins() {
        // "key" fails type coercion before enum membership is ever reached.
        let result = validate(schema(registry::PROMPT_GET_PARAMS), &obj(json!({"key": 7})));
        match result {
            ValidationResult::Invalid(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].reason, "expected a string");
            }
            other => panic!("expected invalid, got {other:?}"),
        }
    }
}
