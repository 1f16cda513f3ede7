//! Callout text for field crews

use regex_utils::tag;

use crate::model::{LocationLabel, NOT_APPLICABLE, NormalizedRecord};

/// `POLE TAG# <tag>` for a strict pole tag, anything else unchanged
pub fn display_tag(raw: &str) -> String {
    let raw = raw.trim();
    if tag::is_pole_tag(raw) {
        format!("POLE TAG# {}", raw)
    } else {
        raw.to_string()
    }
}

/// Header line, a blank line, then the formatted notes
pub fn render_callout(record: &NormalizedRecord, label: LocationLabel) -> String {
    let mut header = format!("{} {}", label, record.count);

    let tag = record.tag.trim();
    if !tag.is_empty() && tag != NOT_APPLICABLE {
        header.push_str(": ");
        header.push_str(&display_tag(tag));
    }

    if record.notes_formatted.is_empty() {
        header
    } else {
        format!("{}\n\n{}", header, record.notes_formatted)
    }
}
