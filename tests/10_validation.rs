// Cross-field validation properties exercised through the public crate API.

use serde_json::{json, Map, Value};

use wavecoach_api::types::PROMPT_KEYS;
use wavecoach_api::validation::{
    registry, validate, Constraint, FieldSpec, FieldType, RegistryError, Schema, SchemaRegistry,
    ValidationResult,
};

fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

#[test]
fn simultaneous_violations_across_fields_are_all_reported() {
    // A combined schema: empty password and an invalid enum key must yield
    // two field errors in one Invalid result, not one.
    let schema = Schema::new(
        "combined.test",
        vec![
            FieldSpec::required("password", FieldType::String, vec![Constraint::MinLen(1)]),
            FieldSpec::required("key", FieldType::Enum, vec![Constraint::OneOf(&PROMPT_KEYS)]),
        ],
    );

    let result = validate(&schema, &obj(json!({"password": "", "key": "bogus"})));
    match result {
        ValidationResult::Invalid(errors) => {
            assert_eq!(errors.len(), 2);
            assert_eq!(errors[0].field, "password");
            assert_eq!(errors[1].field, "key");
        }
        other => panic!("expected invalid, got {other:?}"),
    }
}

#[test]
fn valid_payload_carries_exactly_the_declared_fields() {
    let schema = registry::registry()
        .expect(registry::WAVE_CREATE_BODY)
        .unwrap();

    let result = validate(schema, &obj(json!({"name": "Sprint wave", "extra": 99})));
    match result {
        ValidationResult::Valid(payload) => {
            let names: Vec<&str> = payload.fields().map(|(name, _)| name).collect();
            assert_eq!(names, vec!["name"]);
            assert_eq!(payload.str("name"), Some("Sprint wave"));
        }
        other => panic!("expected valid, got {other:?}"),
    }
}

#[test]
fn malformed_input_never_panics() {
    let schema = registry::registry()
        .expect(registry::WAVE_ID_PARAMS)
        .unwrap();

    for raw in [
        json!({}),
        json!({"id": null, "waveId": null}),
        json!({"id": [1], "waveId": {"nested": true}}),
        json!({"id": "999999999999999999999999", "waveId": "1"}),
    ] {
        let result = validate(schema, &obj(raw));
        assert!(matches!(result, ValidationResult::Invalid(_)));
    }
}

#[test]
fn lookup_of_unregistered_schema_is_a_distinct_fault() {
    let err = registry::registry().expect("not.a.schema").unwrap_err();
    assert!(matches!(err, RegistryError::Unregistered(_)));
}

#[test]
fn registration_is_rejected_for_duplicates() {
    let mut reg = SchemaRegistry::new();
    reg.register(Schema::new("once", vec![])).unwrap();
    assert!(matches!(
        reg.register(Schema::new("once", vec![])),
        Err(RegistryError::Duplicate("once"))
    ));
}
