use std::fmt;

use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::document::{Document, Kind, NodeData, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    InvalidType,
    PropertyMissing,
    InvalidValue,
}

impl ValidationErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ValidationErrorKind::InvalidType => "InvalidType",
            ValidationErrorKind::PropertyMissing => "PropertyMissing",
            ValidationErrorKind::InvalidValue => "InvalidValue",
        }
    }
}

/// One rule violation: the offending value node, the schema node whose rule
/// it broke, and an English description.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub value: NodeId,
    pub schema: NodeId,
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.name(), self.message)
    }
}

/// Checks `value` against `schema`, both nodes of `doc`. Validation itself
/// never fails; malformed schemas simply constrain less. An empty result
/// means the value conforms.
pub fn validate(doc: &Document, value: NodeId, schema: NodeId) -> Vec<ValidationError> {
    let mut checker = Checker {
        doc,
        errors: Vec::new(),
    };
    checker.check(value, schema);
    checker.errors
}

struct Checker<'a> {
    doc: &'a Document,
    errors: Vec<ValidationError>,
}

impl<'a> Checker<'a> {
    fn check(&mut self, value: NodeId, schema: NodeId) {
        // A value referring back to its own root is accepted outright,
        // otherwise recursive structures would never stop validating.
        if let NodeData::Reference { path, .. } = &self.doc.node(value).data {
            if path == "#" {
                return;
            }
        }
        let schema = self.doc.resolve(schema);
        if self.doc.kind(schema) == Kind::Null {
            return;
        }
        let value = self.doc.resolve(value);
        match self.schema_str(schema, "type") {
            Some(type_name) => self.check_type(value, schema, type_name),
            None => self.check_any_of(value, schema),
        }
    }

    fn check_type(&mut self, value: NodeId, schema: NodeId, type_name: &str) {
        match type_name {
            "object" => self.check_object(value, schema),
            "array" => self.check_array(value, schema),
            "string" => self.check_string(value, schema),
            "integer" => self.check_number(value, schema, true),
            "number" => self.check_number(value, schema, false),
            "boolean" => {
                self.expect_kind(value, schema, Kind::Bool);
            }
            "null" => {
                self.expect_kind(value, schema, Kind::Null);
            }
            other => self.push_error(
                schema,
                schema,
                ValidationErrorKind::InvalidType,
                format!("unknown schema type '{other}'"),
            ),
        }
    }

    /// Kind gate shared by every typed rule. On mismatch it records the
    /// error and the caller skips its remaining constraints.
    fn expect_kind(&mut self, value: NodeId, schema: NodeId, expected: Kind) -> bool {
        let found = self.doc.kind(value);
        if found == expected {
            return true;
        }
        self.push_error(
            value,
            schema,
            ValidationErrorKind::InvalidType,
            format!("expected {expected}, found {found}"),
        );
        false
    }

    fn check_object(&mut self, value: NodeId, schema: NodeId) {
        if !self.expect_kind(value, schema, Kind::Object) {
            return;
        }
        let doc = self.doc;
        if let Some(required) = self.schema_child(schema, "required") {
            if let NodeData::Array(entries) = &doc.node(required).data {
                for &entry in entries {
                    let entry = doc.resolve(entry);
                    let NodeData::String(key) = &doc.node(entry).data else {
                        continue;
                    };
                    let present = match &doc.node(value).data {
                        NodeData::Object(map) => map.contains_key(key.as_str()),
                        _ => false,
                    };
                    if !present {
                        self.push_error(
                            value,
                            schema,
                            ValidationErrorKind::PropertyMissing,
                            format!("missing required property '{key}'"),
                        );
                    }
                }
            }
        }

        let properties = self.schema_child(schema, "properties");
        let additional = self.schema_child(schema, "additionalProperties");
        let members: SmallVec<[(SmolStr, NodeId); 16]> = match &doc.node(value).data {
            NodeData::Object(map) => map.iter().map(|(key, &child)| (key.clone(), child)).collect(),
            _ => return,
        };
        for (key, child) in members {
            let declared = properties.and_then(|props| match &doc.node(props).data {
                NodeData::Object(map) => map.get(key.as_str()).copied(),
                _ => None,
            });
            if let Some(declared) = declared {
                self.check(child, declared);
                continue;
            }
            let Some(additional) = additional else {
                continue;
            };
            match &doc.node(additional).data {
                NodeData::Bool(false) => self.push_error(
                    child,
                    schema,
                    ValidationErrorKind::PropertyMissing,
                    format!("unexpected property '{key}'"),
                ),
                NodeData::Object(_) => self.check(child, additional),
                _ => {}
            }
        }
    }

    fn check_array(&mut self, value: NodeId, schema: NodeId) {
        if !self.expect_kind(value, schema, Kind::Array) {
            return;
        }
        let doc = self.doc;
        let Some(items_schema) = self.schema_child(schema, "items") else {
            return;
        };
        let elements: SmallVec<[NodeId; 16]> = match &doc.node(value).data {
            NodeData::Array(items) => items.iter().copied().collect(),
            _ => return,
        };
        for element in elements {
            self.check(element, items_schema);
        }
    }

    fn check_string(&mut self, value: NodeId, schema: NodeId) {
        if !self.expect_kind(value, schema, Kind::String) {
            return;
        }
        let doc = self.doc;
        let NodeData::String(text) = &doc.node(value).data else {
            return;
        };
        if let Some(allowed) = self.schema_child(schema, "enum") {
            if let NodeData::Array(entries) = &doc.node(allowed).data {
                let matched = entries.iter().any(|&entry| {
                    let entry = doc.resolve(entry);
                    matches!(&doc.node(entry).data, NodeData::String(candidate) if candidate == text)
                });
                if !matched {
                    self.push_error(
                        value,
                        schema,
                        ValidationErrorKind::InvalidType,
                        format!("string '{text}' is not one of the allowed values"),
                    );
                }
            }
        }
        let length = text.chars().count();
        if let Some(min) = self.schema_usize(schema, "minLength") {
            if length < min {
                self.push_error(
                    value,
                    schema,
                    ValidationErrorKind::InvalidValue,
                    format!("string length must be at least {min}"),
                );
            }
        }
        if let Some(max) = self.schema_usize(schema, "maxLength") {
            if length > max {
                self.push_error(
                    value,
                    schema,
                    ValidationErrorKind::InvalidValue,
                    format!("string length must be at most {max}"),
                );
            }
        }
    }

    fn check_number(&mut self, value: NodeId, schema: NodeId, integer: bool) {
        if !self.expect_kind(value, schema, Kind::Number) {
            return;
        }
        let NodeData::Number(number) = &self.doc.node(value).data else {
            return;
        };
        let number = *number;
        if integer && number.fract() != 0.0 {
            self.push_error(
                value,
                schema,
                ValidationErrorKind::InvalidType,
                "must be a whole number".to_string(),
            );
        }
        if let Some(min) = self.schema_number(schema, "minimum") {
            let exclusive = self.schema_bool(schema, "exclusiveMinimum").unwrap_or(false);
            let violated = if exclusive { number <= min } else { number < min };
            if violated {
                let wording = if exclusive { "greater than" } else { "at least" };
                self.push_error(
                    value,
                    schema,
                    ValidationErrorKind::InvalidValue,
                    format!("value must be {wording} {min}"),
                );
            }
        }
        if let Some(max) = self.schema_number(schema, "maximum") {
            let exclusive = self.schema_bool(schema, "exclusiveMaximum").unwrap_or(false);
            let violated = if exclusive { number >= max } else { number > max };
            if violated {
                let wording = if exclusive { "less than" } else { "at most" };
                self.push_error(
                    value,
                    schema,
                    ValidationErrorKind::InvalidValue,
                    format!("value must be {wording} {max}"),
                );
            }
        }
    }

    /// Untyped schema: probe each `anyOf` alternative with a scratch
    /// checker. One clean pass accepts the value; otherwise the probes'
    /// errors are discarded and a single failure names the whole set.
    fn check_any_of(&mut self, value: NodeId, schema: NodeId) {
        let doc = self.doc;
        let Some(any_of) = self.schema_child(schema, "anyOf") else {
            return;
        };
        let NodeData::Array(entries) = &doc.node(any_of).data else {
            return;
        };
        let alternatives: SmallVec<[NodeId; 8]> = entries.iter().copied().collect();
        for &alternative in &alternatives {
            let mut probe = Checker {
                doc,
                errors: Vec::new(),
            };
            probe.check(value, alternative);
            if probe.errors.is_empty() {
                return;
            }
        }
        self.push_error(
            value,
            any_of,
            ValidationErrorKind::InvalidValue,
            format!(
                "value does not match any of the {} allowed schemas",
                alternatives.len()
            ),
        );
    }

    fn schema_child(&self, schema: NodeId, key: &str) -> Option<NodeId> {
        match &self.doc.node(schema).data {
            NodeData::Object(map) => map.get(key).map(|&child| self.doc.resolve(child)),
            _ => None,
        }
    }

    fn schema_str(&self, schema: NodeId, key: &str) -> Option<&'a str> {
        let doc = self.doc;
        let child = self.schema_child(schema, key)?;
        match &doc.node(child).data {
            NodeData::String(text) => Some(text),
            _ => None,
        }
    }

    fn schema_number(&self, schema: NodeId, key: &str) -> Option<f64> {
        let child = self.schema_child(schema, key)?;
        match &self.doc.node(child).data {
            NodeData::Number(value) => Some(*value),
            _ => None,
        }
    }

    fn schema_usize(&self, schema: NodeId, key: &str) -> Option<usize> {
        let value = self.schema_number(schema, key)?;
        if value < 0.0 {
            return None;
        }
        Some(value as usize)
    }

    fn schema_bool(&self, schema: NodeId, key: &str) -> Option<bool> {
        let child = self.schema_child(schema, key)?;
        match &self.doc.node(child).data {
            NodeData::Bool(value) => Some(*value),
            _ => None,
        }
    }

    fn push_error(
        &mut self,
        value: NodeId,
        schema: NodeId,
        kind: ValidationErrorKind,
        message: String,
    ) {
        self.errors.push(ValidationError {
            value,
            schema,
            kind,
            message,
        });
    }
}
