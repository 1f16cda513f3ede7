//! Normalized output model shared by both extractors

use regex_utils::number;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder for any field that could not be resolved
pub const NOT_APPLICABLE: &str = "N/A";

/// One work location, whichever format it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Entity ID (graph) or location (spreadsheet)
    pub id: String,

    /// Resolved entity type
    #[serde(rename = "type")]
    pub record_type: String,

    /// Location number as written; may be fractional or free text
    pub count: String,

    /// Pole tag text
    pub tag: String,

    /// Construction notes before formatting
    pub notes: String,

    /// Construction notes after formatting
    pub notes_formatted: String,

    /// Every company with a note on this entity, comma-joined
    pub attacher: String,

    /// Proposed pole spec
    pub proposed_spec: String,

    /// Pole owner
    pub owner: String,

    /// `"<lat>, <lon>"`
    pub position: String,

    /// Companies with joint-use transfers
    pub joint_use: Vec<String>,
}

impl NormalizedRecord {
    /// A record with every field at its fallback value
    pub fn new(id: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            record_type: record_type.into(),
            count: NOT_APPLICABLE.to_string(),
            tag: NOT_APPLICABLE.to_string(),
            notes: String::new(),
            notes_formatted: String::new(),
            attacher: NOT_APPLICABLE.to_string(),
            proposed_spec: NOT_APPLICABLE.to_string(),
            owner: NOT_APPLICABLE.to_string(),
            position: NOT_APPLICABLE.to_string(),
            joint_use: Vec::new(),
        }
    }

    /// Numeric value of the count; anything unparsable sorts as zero
    pub fn count_value(&self) -> f64 {
        number::parse_leading_float(&self.count).unwrap_or(0.0)
    }
}

/// Stable ascending sort on [`NormalizedRecord::count_value`]
pub fn sort_by_count(records: &mut [NormalizedRecord]) {
    records.sort_by(|a, b| a.count_value().total_cmp(&b.count_value()));
}

/// Result of one extraction pass over a document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extraction {
    /// Job identifier from the document, if it has one
    pub job_name: String,

    /// Records ordered by count
    pub records: Vec<NormalizedRecord>,

    /// One message per entity that could not be extracted
    pub diagnostics: Vec<String>,
}

impl Extraction {
    /// Diagnostics as a single line for display
    pub fn diagnostics_message(&self) -> String {
        self.diagnostics.join(" | ")
    }
}

/// Prefix used in the callout header line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationLabel {
    #[default]
    Loc,
    Wl,
}

impl fmt::Display for LocationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loc => write!(f, "LOC"),
            Self::Wl => write!(f, "WL"),
        }
    }
}

/// Footage split by conductor class
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassTotals<T> {
    pub primary: T,
    pub secondary: T,
    pub service: T,
}

/// Aggregate counters for a spreadsheet job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub poles_removed: usize,
    pub padmount_xfmr: usize,
    pub terminating_cabinets: usize,
    pub total_bore_footage: f64,

    /// Copied from the bore sheet
    pub ug_install: ClassTotals<f64>,

    /// Mined from removal text
    pub oh_removal: ClassTotals<u64>,

    pub pole_removal_locations: Vec<String>,
    pub padmount_locations: Vec<String>,
    pub tc_locations: Vec<String>,

    /// One `"<footage>' - <type>"` line per install/removal group
    pub wire_removal_formatted: String,
}

/// Render footage without a trailing `.0` for whole numbers
pub fn format_footage(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
