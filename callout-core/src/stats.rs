//! Job counters over graph records

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{NOT_APPLICABLE, NormalizedRecord};

const POLE_KEYWORD: &str = "POLE";
const REMOVAL_KEYWORDS: [&str; 2] = ["RM:", "REMOVE"];
const NEW_POLE_NOTE_KEYWORDS: [&str; 2] = ["GPS", "SET NEW POLE"];
const NEW_POLE_TAG_KEYWORD: &str = "NEW POLE";

/// Pole counts for a graph job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    pub total_locations: usize,
    pub changed_out_poles: usize,
    pub mid_span_poles: usize,
    pub worked_poles: usize,
    /// Worked poles that are neither changed out nor mid-span; negative when
    /// a pole is counted as both
    pub non_utility_worked: i64,
}

impl JobStats {
    /// Count records by work category for `utility`
    pub fn compute(records: &[NormalizedRecord], utility: &str) -> Self {
        let mut stats = Self { total_locations: records.len(), ..Self::default() };

        // changed-out and mid-span poles are kinds of worked pole
        for record in records.iter().filter(|record| is_worked(record, utility)) {
            stats.worked_poles += 1;
            if is_changed_out(record) {
                stats.changed_out_poles += 1;
            }
            if is_mid_span(record) {
                stats.mid_span_poles += 1;
            }
        }

        stats.non_utility_worked = stats.worked_poles as i64
            - stats.changed_out_poles as i64
            - stats.mid_span_poles as i64;

        debug!(?stats, "computed job stats");
        stats
    }

    /// Plain text block, one counter per line
    pub fn render(&self) -> String {
        [
            format!("Total locations: {}", self.total_locations),
            format!("Poles changed out: {}", self.changed_out_poles),
            format!("Mid-span poles: {}", self.mid_span_poles),
            format!("Worked poles: {}", self.worked_poles),
            format!("Other worked poles: {}", self.non_utility_worked),
        ]
        .join("\n")
    }
}

fn is_worked(record: &NormalizedRecord, utility: &str) -> bool {
    !utility.is_empty() && record.attacher.contains(utility)
}

fn has_proposed_spec(record: &NormalizedRecord) -> bool {
    record.proposed_spec.trim() != NOT_APPLICABLE
}

/// A proposed pole replaces one being removed
fn is_changed_out(record: &NormalizedRecord) -> bool {
    let notes = record.notes_formatted.to_uppercase();
    has_proposed_spec(record)
        && notes.contains(POLE_KEYWORD)
        && REMOVAL_KEYWORDS.iter().any(|keyword| notes.contains(keyword))
}

/// A proposed pole set where none stood before
fn is_mid_span(record: &NormalizedRecord) -> bool {
    let notes = record.notes_formatted.to_uppercase();
    has_proposed_spec(record)
        && (NEW_POLE_NOTE_KEYWORDS.iter().any(|keyword| notes.contains(keyword))
            || record.tag.to_uppercase().contains(NEW_POLE_TAG_KEYWORD))
}
