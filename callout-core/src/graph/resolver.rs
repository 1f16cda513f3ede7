//! Attribute resolution over variant-keyed attribute bags
//!
//! Every field in a graph export is stored as `{ <variant key>: value }`, where
//! the variant key records how the value was entered (`-Imported`,
//! `button_added`, `multi_added`, ...). Which key is present differs per job, so
//! a field is read by trying an ordered list of variants.

use serde_json::{Map, Value};

use crate::error::ResolveError;

/// One step in a field's variant priority list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant<'a> {
    /// A named variant key
    Key(&'a str),
    /// Whatever value comes first in the field's mapping
    First,
}

/// How to read one logical field out of an attribute bag
#[derive(Debug, Clone, Copy)]
pub struct FieldLookup<'a> {
    pub field: &'a str,
    pub variants: &'a [Variant<'a>],
    /// Member to read from the variant's value, e.g. `tagtext`
    pub member: Option<&'a str>,
    pub fallback: &'a str,
}

/// Borrowed view over an entity's `attributes` mapping
#[derive(Debug, Clone, Copy)]
pub struct AttributeBag<'a> {
    attrs: &'a Map<String, Value>,
}

impl<'a> AttributeBag<'a> {
    pub fn new(attrs: &'a Map<String, Value>) -> Self {
        Self { attrs }
    }

    /// The `attributes` mapping of a node or connection
    pub fn from_entity(entity: &'a Value) -> Result<Self, ResolveError> {
        entity
            .get("attributes")
            .and_then(Value::as_object)
            .map(Self::new)
            .ok_or(ResolveError::MissingAttributes)
    }

    /// Variant mapping of a field; `None` when the field is absent
    pub fn variants(&self, field: &str) -> Result<Option<&'a Map<String, Value>>, ResolveError> {
        match self.attrs.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(_) => Err(ResolveError::MalformedField { field: field.to_string() }),
        }
    }

    /// Every value stored under a field, for list-like fields such as notes
    pub fn entries(&self, field: &str) -> Result<Vec<&'a Value>, ResolveError> {
        match self.attrs.get(field) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Object(map)) => Ok(map.values().collect()),
            Some(Value::Array(items)) => Ok(items.iter().collect()),
            Some(_) => Err(ResolveError::MalformedField { field: field.to_string() }),
        }
    }

    /// Resolve a field to text, falling back when no variant holds a value.
    ///
    /// Only a structurally broken field is an error; an absent one is not.
    pub fn resolve(&self, lookup: &FieldLookup<'_>) -> Result<String, ResolveError> {
        let Some(variants) = self.variants(lookup.field)? else {
            return Ok(lookup.fallback.to_string());
        };

        for variant in lookup.variants {
            let candidate = match variant {
                Variant::Key(key) => variants.get(*key),
                Variant::First => variants.values().next(),
            };
            let candidate = match lookup.member {
                Some(member) => candidate.and_then(|value| value.get(member)),
                None => candidate,
            };
            if let Some(text) = candidate.and_then(scalar_text) {
                return Ok(text);
            }
        }

        Ok(lookup.fallback.to_string())
    }
}

/// Text of a value that holds something.
///
/// `null`, `false`, `""` and `0` all read as missing so the next variant is tried.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}
