//! Spreadsheet callout exports
//!
//! A callout workbook has one row per location with free-text removal,
//! install, transfer and notes cells, plus a small bore sheet with
//! underground footage totals.

pub mod callout;
pub mod miner;
pub mod workbook;

use serde::{Deserialize, Serialize};

pub use callout::SpreadsheetRecordExtractor;
pub use miner::summarize;
pub use workbook::{JobWorkbook, read_workbook};

/// Raw cells of one callout row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadsheetRow {
    pub location: String,
    pub tag: String,
    pub removal: String,
    pub install: String,
    pub transfer: String,
    pub notes: String,
}

impl SpreadsheetRow {
    /// Map cells positionally: location, tag, removal, install, transfer, notes
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |index: usize| {
            cells
                .get(index)
                .map(|text| text.trim_end().to_string())
                .unwrap_or_default()
        };
        Self {
            location: cell(0).trim().to_string(),
            tag: cell(1).trim().to_string(),
            removal: cell(2),
            install: cell(3),
            transfer: cell(4),
            notes: cell(5),
        }
    }

    /// Whether any of the four work-text cells has content
    pub fn has_work(&self) -> bool {
        [&self.removal, &self.install, &self.transfer, &self.notes]
            .iter()
            .any(|text| !text.trim().is_empty())
    }

    /// Rows without a location or without any work are not callouts
    pub fn is_retained(&self) -> bool {
        !self.location.trim().is_empty() && self.has_work()
    }
}

/// Callout rows from a cell grid whose first row is the header
pub fn rows_from_grid(grid: &[Vec<String>]) -> Vec<SpreadsheetRow> {
    grid.iter()
        .skip(1)
        .map(|cells| SpreadsheetRow::from_cells(cells))
        .filter(SpreadsheetRow::is_retained)
        .collect()
}

/// Underground footage from the bore sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoreFootage {
    pub primary_ug: f64,
    pub secondary_ug: f64,
    pub service_ug: f64,
    pub total_bore: f64,
}

impl BoreFootage {
    /// Read either label/value rows or a header row over a value row
    pub fn from_grid(grid: &[Vec<String>]) -> Self {
        let mut bore = Self::default();

        for row in grid {
            if let [label, value, ..] = row.as_slice() {
                bore.set(label, value);
            }
        }

        if let [header, values, ..] = grid {
            for (label, value) in header.iter().zip(values) {
                bore.set(label, value);
            }
        }

        bore
    }

    fn set(&mut self, label: &str, value: &str) {
        let Some(value) = parse_number(value) else {
            return;
        };
        let key: String = label
            .chars()
            .filter(|c| !matches!(*c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "primaryug" => self.primary_ug = value,
            "secondaryug" => self.secondary_ug = value,
            "serviceug" => self.service_ug = value,
            "totalborefootage" | "totalbore" => self.total_bore = value,
            _ => {}
        }
    }
}

/// A whole-cell number; blank and textual cells are not numbers
fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter().map(|row| row.iter().map(|cell| cell.to_string()).collect()).collect()
    }

    #[test]
    fn test_rows_from_grid_skips_header_and_empty_rows() {
        let grid = grid(&[
            &["LOC", "TAG", "RM", "IN", "TX", "NOTES"],
            &["1", "3-45", "40' #2 ACSR", "", "", ""],
            &["", "3-46", "40' #2 ACSR", "", "", ""],
            &["3", "3-47", "", "", "", "  "],
            &["4", "", "", "", "", "CHECK GUY"],
            &["5"],
        ]);

        let rows = rows_from_grid(&grid);
        let locations: Vec<_> = rows.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(locations, vec!["1", "4"]);
        assert_eq!(rows[1].notes, "CHECK GUY");
    }

    #[test]
    fn test_bore_label_value_rows() {
        let grid = grid(&[
            &["Primary UG", "1200"],
            &["secondaryUG", "300"],
            &["service_ug", "150.5"],
            &["Total Bore Footage", "1650"],
            &["Notes", "n/a"],
        ]);
        let bore = BoreFootage::from_grid(&grid);
        assert_eq!(bore.primary_ug, 1200.0);
        assert_eq!(bore.secondary_ug, 300.0);
        assert_eq!(bore.service_ug, 150.5);
        assert_eq!(bore.total_bore, 1650.0);
    }

    #[test]
    fn test_bore_header_row() {
        let grid = grid(&[
            &["primaryUG", "secondaryUG", "serviceUG", "totalBoreFootage"],
            &["800", "0", "45", "845"],
        ]);
        let bore = BoreFootage::from_grid(&grid);
        assert_eq!(bore.primary_ug, 800.0);
        assert_eq!(bore.secondary_ug, 0.0);
        assert_eq!(bore.service_ug, 45.0);
        assert_eq!(bore.total_bore, 845.0);
    }

    #[test]
    fn test_empty_bore_sheet_is_zero() {
        assert_eq!(BoreFootage::from_grid(&[]), BoreFootage::default());
    }
}
