//! Declarative field descriptors. A schema is data: a list of field specs,
//! each carrying a type tag, an optional coercion, and ordered constraints.
//! One generic executor interprets the list; there is no per-endpoint
//! validator code.

use crate::types::EnumSet;

/// Semantic type of a field after coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    /// Stored as a string; membership is enforced by `Constraint::OneOf`.
    Enum,
}

/// How raw input is turned into the declared type before constraint checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Take the value as-is for its declared type.
    None,
    /// Parse a text value (e.g. a path segment) into an integer.
    IntFromText,
}

/// A single constraint, checked in declaration order. The first failing
/// constraint produces the field's one error; later constraints are skipped.
#[derive(Debug, Clone, Copy)]
pub enum Constraint {
    /// Minimum length in characters.
    MinLen(usize),
    /// Integer must be strictly greater than zero.
    Positive,
    /// Value must be a member of a closed set.
    OneOf(&'static EnumSet),
}

/// A coerced, typed field value. Every declared field is present in a valid
/// payload; optional fields that were omitted carry `Absent`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Absent,
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }
}

/// Descriptor for one field of an inbound payload.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
    /// Used when the field is absent and not required. Optional fields may
    /// legitimately have no default, in which case the typed payload carries
    /// `Absent`.
    pub default: Option<FieldValue>,
    pub coerce: Coercion,
    pub constraints: Vec<Constraint>,
}

impl FieldSpec {
    pub fn required(name: &'static str, ty: FieldType, constraints: Vec<Constraint>) -> Self {
        Self {
            name,
            ty,
            required: true,
            default: None,
            coerce: Coercion::None,
            constraints,
        }
    }

    pub fn optional(name: &'static str, ty: FieldType, constraints: Vec<Constraint>) -> Self {
        Self {
            name,
            ty,
            required: false,
            default: None,
            coerce: Coercion::None,
            constraints,
        }
    }

    /// Required integer parsed from a text path segment.
    pub fn path_int(name: &'static str, constraints: Vec<Constraint>) -> Self {
        Self {
            name,
            ty: FieldType::Integer,
            required: true,
            default: None,
            coerce: Coercion::IntFromText,
            constraints,
        }
    }
}

/// An immutable, named input shape. Constructed once at startup through the
/// registry and shared read-only across all in-flight operations.
#[derive(Debug, Clone)]
pub struct Schema {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(name: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self { name, fields }
    }
}
