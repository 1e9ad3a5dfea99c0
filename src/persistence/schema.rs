//! Field schemas for schema-validated containers
//!
//! A schema declares, per field, the expected kind and whether the field is
//! required. Validation follows document-model semantics: values are cast to
//! the declared kind where an unambiguous conversion exists (`"42"` for a
//! number field becomes `42`), required fields may not be missing, null, or
//! an empty string, and undeclared fields are dropped unless the schema is
//! non-strict.

use serde_json::{Map, Number, Value};

use super::errors::{FieldError, FieldErrorReason, ValidationError};
use super::record::Record;

/// Declared value kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl FieldKind {
    /// Name used in validation messages
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Array => "array",
            FieldKind::Object => "object",
        }
    }

    /// Cast a non-null value to this kind, or `None` when no cast applies.
    fn cast(&self, value: Value) -> Option<Value> {
        match (self, value) {
            (FieldKind::String, Value::String(s)) => Some(Value::String(s)),
            (FieldKind::String, Value::Number(n)) => Some(Value::String(n.to_string())),
            (FieldKind::String, Value::Bool(b)) => Some(Value::String(b.to_string())),

            (FieldKind::Number, Value::Number(n)) => Some(Value::Number(n)),
            (FieldKind::Number, Value::String(s)) => parse_number(&s).map(Value::Number),

            (FieldKind::Boolean, Value::Bool(b)) => Some(Value::Bool(b)),
            (FieldKind::Boolean, Value::String(s)) => match s.as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },

            (FieldKind::Array, Value::Array(items)) => Some(Value::Array(items)),
            (FieldKind::Object, Value::Object(map)) => Some(Value::Object(map)),
            _ => None,
        }
    }
}

fn parse_number(raw: &str) -> Option<Number> {
    let raw = raw.trim();
    if let Ok(int) = raw.parse::<i64>() {
        return Some(Number::from(int));
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Kind and requiredness of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    /// A field that must be present
    pub fn required(kind: FieldKind) -> Self {
        Self {
            kind,
            required: true,
        }
    }

    /// A field that may be absent
    pub fn optional(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
        }
    }
}

/// Ordered field declarations for one collection
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<(String, FieldSpec)>,
    strict: bool,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    /// Create an empty, strict schema
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            strict: true,
        }
    }

    /// Declare a field. Redeclaring a name replaces the earlier spec.
    pub fn field<S: Into<String>>(mut self, name: S, spec: FieldSpec) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = spec,
            None => self.fields.push((name, spec)),
        }
        self
    }

    /// Keep (`false`) or drop (`true`, the default) undeclared fields
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Whether undeclared fields are dropped
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Look up a field declaration
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    /// Declared field names, in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Schema of the `usuarios` collection: every field required.
    pub fn users() -> Self {
        Self::new()
            .field("email", FieldSpec::required(FieldKind::String))
            .field("password", FieldSpec::required(FieldKind::String))
            .field("name", FieldSpec::required(FieldKind::String))
            .field("telephone", FieldSpec::required(FieldKind::Number))
            .field("adress", FieldSpec::required(FieldKind::String))
            .field("age", FieldSpec::required(FieldKind::Number))
    }

    /// Schema of the `carritos` collection.
    pub fn carts() -> Self {
        Self::new().field("productos", FieldSpec::required(FieldKind::Array))
    }

    /// Validate and cast a record.
    ///
    /// On success the returned record holds the cast values; the identifier
    /// is carried over untouched. On failure every offending field is listed.
    pub fn validate(&self, record: Record) -> Result<Record, ValidationError> {
        let id = record.id().cloned();
        let mut input = record.fields().clone();
        let mut output = Map::with_capacity(input.len());
        let mut errors = Vec::new();

        for (name, spec) in &self.fields {
            match input.remove(name) {
                None | Some(Value::Null) if spec.required => errors.push(FieldError {
                    field: name.clone(),
                    reason: FieldErrorReason::Missing,
                }),
                None => {}
                Some(Value::Null) => {
                    output.insert(name.clone(), Value::Null);
                }
                Some(Value::String(s)) if spec.required && s.is_empty() => {
                    errors.push(FieldError {
                        field: name.clone(),
                        reason: FieldErrorReason::Missing,
                    })
                }
                Some(value) => match spec.kind.cast(value) {
                    Some(cast) => {
                        output.insert(name.clone(), cast);
                    }
                    None => errors.push(FieldError {
                        field: name.clone(),
                        reason: FieldErrorReason::Mistyped {
                            expected: spec.kind.name(),
                        },
                    }),
                },
            }
        }

        if !errors.is_empty() {
            return Err(ValidationError { errors });
        }

        if !self.strict {
            output.extend(input);
        }

        let mut validated = Record::from_fields(output);
        validated.set_id(id);
        Ok(validated)
    }
}
