//! Callout blocks built from spreadsheet rows

use tracing::info;

use super::SpreadsheetRow;
use crate::model::{NormalizedRecord, sort_by_count};
use crate::render::display_tag;

/// Record type given to spreadsheet locations
pub const LOCATION_TYPE: &str = "location";

/// Builds normalized records from callout rows
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetRecordExtractor;

impl SpreadsheetRecordExtractor {
    pub fn new() -> Self {
        Self
    }

    /// One record per retained row, ordered by location number
    pub fn extract(&self, rows: &[SpreadsheetRow]) -> Vec<NormalizedRecord> {
        let mut records: Vec<NormalizedRecord> = rows
            .iter()
            .filter(|row| row.is_retained())
            .map(|row| self.extract_row(row))
            .collect();

        sort_by_count(&mut records);
        info!(records = records.len(), "built spreadsheet callouts");

        records
    }

    fn extract_row(&self, row: &SpreadsheetRow) -> NormalizedRecord {
        let mut record = NormalizedRecord::new(&row.location, LOCATION_TYPE);
        record.count = row.location.clone();
        record.tag = display_tag(&row.tag);
        record.notes = [&row.removal, &row.install, &row.transfer, &row.notes]
            .into_iter()
            .map(|text| text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        record.notes_formatted = callout_block(row);
        record
    }
}

/// Labeled removal/install/transfer lines followed by starred notes
pub fn callout_block(row: &SpreadsheetRow) -> String {
    let mut lines = Vec::new();

    push_section(&mut lines, "RM", 8, &row.removal);
    push_section(&mut lines, "IN", 6, &row.install);
    push_section(&mut lines, "TX", 7, &row.transfer);

    let notes: Vec<&str> = non_blank_lines(&row.notes).collect();
    if !notes.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        for note in notes {
            if note.starts_with('*') {
                lines.push(note.to_string());
            } else {
                lines.push(format!("*{}", note));
            }
        }
    }

    lines.join("\n")
}

/// Label the first line, indent the rest
fn push_section(lines: &mut Vec<String>, label: &str, indent: usize, text: &str) {
    for (index, line) in non_blank_lines(text).enumerate() {
        if index == 0 {
            lines.push(format!("{}: {}", label, line));
        } else {
            lines.push(format!("{:indent$}{}", "", line, indent = indent));
        }
    }
}

fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        location: &str,
        tag: &str,
        removal: &str,
        install: &str,
        transfer: &str,
        notes: &str,
    ) -> SpreadsheetRow {
        SpreadsheetRow {
            location: location.to_string(),
            tag: tag.to_string(),
            removal: removal.to_string(),
            install: install.to_string(),
            transfer: transfer.to_string(),
            notes: notes.to_string(),
        }
    }

    #[test]
    fn test_callout_block_layout() {
        let row = row(
            "4",
            "3-45",
            "40' #2 ACSR\nCROSSARM",
            "45/3 POLE\nDOWN GUY",
            "ATT\nCHARTER",
            "CHECK CLEARANCE\n*SEE SPEC",
        );
        let expected = [
            "RM: 40' #2 ACSR",
            "        CROSSARM",
            "IN: 45/3 POLE",
            "      DOWN GUY",
            "TX: ATT",
            "       CHARTER",
            "",
            "*CHECK CLEARANCE",
            "*SEE SPEC",
        ]
        .join("\n");
        assert_eq!(callout_block(&row), expected);
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let row = row("5", "", "", "UG XFMR", "", "");
        assert_eq!(callout_block(&row), "IN: UG XFMR");
    }

    #[test]
    fn test_notes_only_row_has_no_leading_blank() {
        let row = row("4", "", "", "", "", "NOTE\n*CALL FIRST");
        assert_eq!(callout_block(&row), "*NOTE\n*CALL FIRST");
    }

    #[test]
    fn test_record_fields() {
        let rows = vec![
            row("12", "3-45", "40' #2 ACSR", "", "", "NOTE"),
            row("2", "INSTALL T# 123", "", "UG XFMR", "CATV", ""),
            row("", "9-9", "40' #2 ACSR", "", "", ""),
            row("7", "1-1", "", "", "", ""),
        ];

        let records = SpreadsheetRecordExtractor::new().extract(&rows);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].id, "2");
        assert_eq!(records[0].tag, "INSTALL T# 123");
        assert_eq!(records[0].notes, "UG XFMR, CATV");

        assert_eq!(records[1].count, "12");
        assert_eq!(records[1].tag, "POLE TAG# 3-45");
        assert_eq!(records[1].notes, "40' #2 ACSR, NOTE");
        assert_eq!(records[1].record_type, LOCATION_TYPE);
        assert_eq!(records[1].attacher, "N/A");
    }
}
