pub mod executor;
pub mod registry;
pub mod schema;

pub use executor::{validate, FieldError, TypedPayload, ValidationResult};
pub use registry::{registry, RegistryError, SchemaRegistry};
pub use schema::{Coercion, Constraint, FieldSpec, FieldType, FieldValue, Schema};
