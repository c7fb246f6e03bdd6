//! Startup-only schema registration and lock-free lookup.

use std::collections::HashMap;
use std::sync::OnceLock;

use thiserror::Error;

use crate::types::PROMPT_KEYS;
use crate::validation::schema::{Constraint, FieldSpec, FieldType, Schema};

/// Registry faults. `Unregistered` at request time means a route referenced
/// a schema that was never registered; it is surfaced to the caller as an
/// internal error, never as a validation failure.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("schema '{0}' is already registered")]
    Duplicate(&'static str),

    #[error("schema '{0}' is not registered")]
    Unregistered(String),
}

/// Immutable after startup; lookups are side-effect-free and safe for
/// unbounded concurrent reads.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    pub fn register(&mut self, schema: Schema) -> Result<(), RegistryError> {
        if self.schemas.contains_key(schema.name) {
            return Err(RegistryError::Duplicate(schema.name));
        }
        tracing::debug!("registered schema '{}'", schema.name);
        self.schemas.insert(schema.name, schema);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Lookup that treats absence as a fault rather than a miss.
    pub fn expect(&self, name: &str) -> Result<&Schema, RegistryError> {
        self.lookup(name)
            .ok_or_else(|| RegistryError::Unregistered(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemas.keys().copied()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Schema names, keyed by operation. Routes and bot commands refer to these.
pub const LOGIN_BODY: &str = "login.body";
pub const PROMPT_GET_PARAMS: &str = "prompt.get.params";
pub const PROMPT_UPDATE_BODY: &str = "prompt.update.body";
pub const TEAM_ID_PARAMS: &str = "team.id.params";
pub const WAVE_ID_PARAMS: &str = "wave.id.params";
pub const WAVE_CREATE_BODY: &str = "wave.create.body";
pub const BOT_WAVE_PARAMS: &str = "bot.wave.params";

fn built_in() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();

    let schemas = vec![
        Schema::new(
            LOGIN_BODY,
            vec![FieldSpec::required(
                "password",
                FieldType::String,
                vec![Constraint::MinLen(1)],
            )],
        ),
        Schema::new(
            PROMPT_GET_PARAMS,
            vec![FieldSpec::required(
                "key",
                FieldType::Enum,
                vec![Constraint::OneOf(&PROMPT_KEYS)],
            )],
        ),
        Schema::new(
            PROMPT_UPDATE_BODY,
            vec![FieldSpec::required(
                "value",
                FieldType::String,
                vec![Constraint::MinLen(10)],
            )],
        ),
        Schema::new(
            TEAM_ID_PARAMS,
            vec![FieldSpec::path_int("id", vec![Constraint::Positive])],
        ),
        Schema::new(
            WAVE_ID_PARAMS,
            vec![
                FieldSpec::path_int("id", vec![Constraint::Positive]),
                FieldSpec::path_int("waveId", vec![Constraint::Positive]),
            ],
        ),
        Schema::new(
            WAVE_CREATE_BODY,
            vec![FieldSpec::optional("name", FieldType::String, vec![])],
        ),
        Schema::new(
            BOT_WAVE_PARAMS,
            vec![FieldSpec::path_int("waveId", vec![Constraint::Positive])],
        ),
    ];

    for schema in schemas {
        // Startup-time invariant: the built-in table has no duplicate names.
        registry
            .register(schema)
            .expect("duplicate built-in schema registration");
    }

    registry
}

/// Process-wide registry, built once on first access.
pub fn registry() -> &'static SchemaRegistry {
    static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
    REGISTRY.get_or_init(built_in)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_schemas_resolve() {
        let reg = registry();
        for name in [
            LOGIN_BODY,
            PROMPT_GET_PARAMS,
            PROMPT_UPDATE_BODY,
            TEAM_ID_PARAMS,
            WAVE_ID_PARAMS,
            WAVE_CREATE_BODY,
            BOT_WAVE_PARAMS,
        ] {
            assert!(reg.lookup(name).is_some(), "missing schema {name}");
        }
    }

    #[test]
    fn unregistered_lookup_is_a_distinct_fault() {
        let err = registry().expect("no.such.schema").unwrap_err();
        assert!(matches!(err, RegistryError::Unregistered(_)));
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut reg = SchemaRegistry::new();
        reg.register(Schema::new("dup", vec![])).unwrap();
        let err = reg.register(Schema::new("dup", vec![])).unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate("dup")));
    }
}
