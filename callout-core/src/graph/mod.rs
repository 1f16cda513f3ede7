//! Graph export extraction
//!
//! A graph export is a JSON document with a job `name` and either a `nodes`
//! collection (poles and equipment) or a `connections` collection (spans).
//! Each entity keeps its fields in a variant-keyed attribute bag which is read
//! through [`AttributeBag`].

pub mod resolver;


use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::CalloutConfig;
use crate::error::{ResolveError, Result};
use crate::model::{Extraction, NOT_APPLICABLE, NormalizedRecord, sort_by_count};
use crate::notes::format_construction_notes;
pub use resolver::{AttributeBag, FieldLookup, Variant, scalar_text};

/// Job name used when the document does not carry one
pub const DEFAULT_JOB_NAME: &str = "Default Job Name";

/// Diagnostic for a document with neither `nodes` nor `connections`
pub const UNRECOGNIZED_STRUCTURE: &str = "Unrecognized JSON structure";

/// Keyword marking a note as a joint-use transfer
const JOINT_USE_KEYWORD: &str = "nesc";

/// Stand-in for a joint-use note with a blank attacher
const MISSING_JOINT_USE_COMPANY: &str = "Missing JU transfer company";

const POLE_COUNT: FieldLookup<'static> = FieldLookup {
    field: "pole_count",
    variants: &[Variant::Key("-Imported"), Variant::First],
    member: None,
    fallback: "error with data",
};

const POLE_OWNER: FieldLookup<'static> = FieldLookup {
    field: "pole_owner",
    variants: &[Variant::First, Variant::Key("-Imported")],
    member: None,
    fallback: NOT_APPLICABLE,
};

const PROPOSED_POLE_SPEC: FieldLookup<'static> = FieldLookup {
    field: "proposed_pole_spec",
    variants: &[Variant::Key("button_added"), Variant::Key("-Imported")],
    member: None,
    fallback: NOT_APPLICABLE,
};

const NODE_TYPE: FieldLookup<'static> = FieldLookup {
    field: "node_type",
    variants: &[
        Variant::Key("-Imported"),
        Variant::Key("multi_added"),
        Variant::Key("button_added"),
        Variant::First,
    ],
    member: None,
    fallback: NOT_APPLICABLE,
};

const NODE_TAG: FieldLookup<'static> = FieldLookup {
    field: "pole_tag",
    variants: &[Variant::Key("-Imported"), Variant::First],
    member: Some("tagtext"),
    fallback: NOT_APPLICABLE,
};

const CONNECTION_TYPE: FieldLookup<'static> = FieldLookup {
    field: "connection_type",
    variants: &[Variant::Key("button_added")],
    member: None,
    fallback: NOT_APPLICABLE,
};

const CONNECTION_TAG: FieldLookup<'static> = FieldLookup {
    field: "pole_tag",
    variants: &[Variant::Key("-Imported")],
    member: Some("tagtext"),
    fallback: NOT_APPLICABLE,
};

/// Which collection a graph document carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphShape {
    Nodes,
    Connections,
}

impl GraphShape {
    /// Detect the shape from the top-level keys; `nodes` wins if both exist
    pub fn detect(document: &Value) -> Option<Self> {
        if document.get("nodes").is_some_and(Value::is_object) {
            Some(Self::Nodes)
        } else if document.get("connections").is_some_and(Value::is_object) {
            Some(Self::Connections)
        } else {
            None
        }
    }

    fn collection_key(self) -> &'static str {
        match self {
            Self::Nodes => "nodes",
            Self::Connections => "connections",
        }
    }

    fn entity_label(self) -> &'static str {
        match self {
            Self::Nodes => "node",
            Self::Connections => "connection",
        }
    }

    fn type_lookup(self) -> &'static FieldLookup<'static> {
        match self {
            Self::Nodes => &NODE_TYPE,
            Self::Connections => &CONNECTION_TYPE,
        }
    }

    fn tag_lookup(self) -> &'static FieldLookup<'static> {
        match self {
            Self::Nodes => &NODE_TAG,
            Self::Connections => &CONNECTION_TAG,
        }
    }
}

/// Builds normalized records from graph exports
#[derive(Debug, Clone, Default)]
pub struct GraphRecordExtractor {
    config: CalloutConfig,
}

impl GraphRecordExtractor {
    pub fn new(config: CalloutConfig) -> Self {
        Self { config }
    }

    /// Parse and extract a document held in memory
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<Extraction> {
        let document: Value = serde_json::from_slice(bytes)?;
        Ok(self.extract(&document))
    }

    pub fn extract_str(&self, text: &str) -> Result<Extraction> {
        let document: Value = serde_json::from_str(text)?;
        Ok(self.extract(&document))
    }

    /// Extract every record of the target type.
    ///
    /// Entities that fail to resolve are reported in `diagnostics` and left out;
    /// they never stop the rest of the document from being read.
    pub fn extract(&self, document: &Value) -> Extraction {
        let job_name = document
            .get("name")
            .and_then(scalar_text)
            .unwrap_or_else(|| DEFAULT_JOB_NAME.to_string());

        let Some(shape) = GraphShape::detect(document) else {
            warn!(job = %job_name, "document has neither nodes nor connections");
            return Extraction {
                job_name,
                records: Vec::new(),
                diagnostics: vec![UNRECOGNIZED_STRUCTURE.to_string()],
            };
        };

        let entities = document
            .get(shape.collection_key())
            .and_then(Value::as_object)
            .into_iter()
            .flatten();

        let mut records = Vec::new();
        let mut diagnostics = Vec::new();

        for (id, entity) in entities {
            match self.extract_entity(shape, id, entity) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => debug!(id = %id, "skipping {} of another type", shape.entity_label()),
                Err(err) => {
                    warn!(
                        id = %id,
                        error = %err,
                        "failed to resolve {} attributes",
                        shape.entity_label()
                    );
                    diagnostics.push(format!(
                        "Issue with attributes for {} ID: {}",
                        shape.entity_label(),
                        id
                    ));
                }
            }
        }

        sort_by_count(&mut records);

        info!(
            job = %job_name,
            records = records.len(),
            diagnostics = diagnostics.len(),
            "extracted graph records"
        );

        Extraction { job_name, records, diagnostics }
    }

    fn target_type(&self, shape: GraphShape) -> &str {
        match shape {
            GraphShape::Nodes => &self.config.pole_type,
            GraphShape::Connections => &self.config.span_type,
        }
    }

    fn no_work_notes(&self, shape: GraphShape) -> &str {
        match shape {
            GraphShape::Nodes => &self.config.no_work_notes,
            GraphShape::Connections => NOT_APPLICABLE,
        }
    }

    /// `Ok(None)` means the entity is not of the target type
    fn extract_entity(
        &self,
        shape: GraphShape,
        id: &str,
        entity: &Value,
    ) -> std::result::Result<Option<NormalizedRecord>, ResolveError> {
        let bag = AttributeBag::from_entity(entity)?;

        let record_type = bag.resolve(shape.type_lookup())?;
        if record_type != self.target_type(shape) {
            return Ok(None);
        }

        let notes = ConstructionNotes::read(&bag)?;

        let mut record = NormalizedRecord::new(id, record_type);
        record.count = bag.resolve(&POLE_COUNT)?;
        record.tag = bag.resolve(shape.tag_lookup())?;
        record.owner = bag.resolve(&POLE_OWNER)?;
        record.proposed_spec = bag.resolve(&PROPOSED_POLE_SPEC)?;
        record.notes = notes
            .by_attacher(&self.config.utility)
            .unwrap_or_else(|| self.no_work_notes(shape).to_string());
        record.notes_formatted = format_construction_notes(&record.notes);
        record.attacher = notes.attachers().unwrap_or_else(|| NOT_APPLICABLE.to_string());
        record.joint_use = notes.joint_use_companies();
        record.position = position_text(entity);

        Ok(Some(record))
    }
}

/// A single entry of the `construction_notes` field
#[derive(Debug, Clone, PartialEq)]
struct ConstructionNote<'a> {
    attacher: Option<&'a str>,
    text: Option<&'a str>,
}

#[derive(Debug, Clone, Default)]
struct ConstructionNotes<'a> {
    entries: Vec<ConstructionNote<'a>>,
}

impl<'a> ConstructionNotes<'a> {
    fn read(bag: &AttributeBag<'a>) -> std::result::Result<Self, ResolveError> {
        let entries = bag
            .entries("construction_notes")?
            .into_iter()
            .map(|entry| ConstructionNote {
                attacher: entry.get("attacher").and_then(Value::as_str),
                text: entry.get("note").and_then(Value::as_str),
            })
            .collect();
        Ok(Self { entries })
    }

    /// Comma-joined notes written for `attacher`, if there are any
    fn by_attacher(&self, attacher: &str) -> Option<String> {
        let joined = self
            .entries
            .iter()
            .filter(|note| note.attacher == Some(attacher))
            .filter_map(|note| note.text)
            .collect::<Vec<_>>()
            .join(", ");
        (!joined.is_empty()).then_some(joined)
    }

    fn attachers(&self) -> Option<String> {
        let joined = self
            .entries
            .iter()
            .filter_map(|note| note.attacher)
            .filter(|attacher| !attacher.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        (!joined.is_empty()).then_some(joined)
    }

    fn joint_use_companies(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|note| {
                note.text
                    .is_some_and(|text| text.to_lowercase().contains(JOINT_USE_KEYWORD))
            })
            .filter_map(|note| match note.attacher {
                Some("") => Some(MISSING_JOINT_USE_COMPANY.to_string()),
                Some(attacher) => Some(attacher.to_string()),
                None => None,
            })
            .collect()
    }
}

/// `"<lat>, <lon>"` from an entity's coordinates
fn position_text(entity: &Value) -> String {
    let coordinate = |key: &str| match entity.get(key)? {
        Value::Object(map) => map.values().next().and_then(scalar_text),
        Value::Number(number) => Some(number.to_string()),
        other => scalar_text(other),
    };

    match (coordinate("latitude"), coordinate("longitude")) {
        (Some(lat), Some(lon)) => format!("{}, {}", lat, lon),
        _ => NOT_APPLICABLE.to_string(),
    }
}
