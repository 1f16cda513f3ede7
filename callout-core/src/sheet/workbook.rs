//! Workbook loading
//!
//! Reads the callout and bore sheets out of an in-memory workbook with
//! calamine and turns them into plain string grids.

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tracing::{debug, info};

use super::{BoreFootage, SpreadsheetRow, rows_from_grid};
use crate::error::{ExtractError, Result};
use crate::model::{LocationLabel, format_footage};

/// Sheet names tried for callout rows, before falling back to the first sheet
const CALLOUT_SHEETS: [&str; 3] = ["Callout Template", "callouts", "Sheet1"];

const BORE_SHEETS: [&str; 2] = ["Bore", "bore"];

/// Column G of the callout header row carries the label flag
const LABEL_FLAG_COLUMN: usize = 6;

/// Everything the core needs from a callout workbook
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobWorkbook {
    pub callout_sheet: String,
    pub rows: Vec<SpreadsheetRow>,
    pub bore: BoreFootage,
    /// Label convention requested by the workbook, if it says
    pub label_flag: Option<LocationLabel>,
}

impl JobWorkbook {
    pub fn from_grids(
        callout_sheet: &str,
        callouts: &[Vec<String>],
        bore: Option<&[Vec<String>]>,
    ) -> Self {
        let label_flag = callouts
            .first()
            .and_then(|header| header.get(LABEL_FLAG_COLUMN))
            .and_then(|flag| parse_label_flag(flag));

        Self {
            callout_sheet: callout_sheet.to_string(),
            rows: rows_from_grid(callouts),
            bore: bore.map(BoreFootage::from_grid).unwrap_or_default(),
            label_flag,
        }
    }
}

/// Open a workbook held in memory and read its callout and bore sheets
pub fn read_workbook(bytes: &[u8]) -> Result<JobWorkbook> {
    let mut sheets = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let names = sheets.sheet_names();

    let callout_sheet = CALLOUT_SHEETS
        .iter()
        .find(|wanted| names.iter().any(|name| name == *wanted))
        .map(|name| name.to_string())
        .or_else(|| names.first().cloned())
        .ok_or_else(|| ExtractError::MissingSheet { name: CALLOUT_SHEETS[0].to_string() })?;
    debug!(sheet = %callout_sheet, "reading callout sheet");

    let callouts = grid(&sheets.worksheet_range(&callout_sheet)?);

    let bore = match BORE_SHEETS.iter().find(|wanted| names.iter().any(|name| name == *wanted)) {
        Some(name) => Some(grid(&sheets.worksheet_range(name)?)),
        None => {
            debug!("workbook has no bore sheet");
            None
        }
    };

    let workbook = JobWorkbook::from_grids(&callout_sheet, &callouts, bore.as_deref());
    info!(sheet = %callout_sheet, rows = workbook.rows.len(), "loaded callout workbook");

    Ok(workbook)
}

/// Cell text grid anchored at A1, whatever cell the used range starts at
fn grid(range: &Range<Data>) -> Vec<Vec<String>> {
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let padding = vec![String::new(); first_col as usize];

    let mut grid = vec![Vec::new(); first_row as usize];
    grid.extend(range.rows().map(|row| {
        padding.iter().cloned().chain(row.iter().map(cell_text)).collect::<Vec<_>>()
    }));
    grid
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => format_footage(*value),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}

fn parse_label_flag(flag: &str) -> Option<LocationLabel> {
    match flag.trim().to_uppercase().as_str() {
        "TRUE" | "YES" | "1" | "GPC" | "WL" => Some(LocationLabel::Wl),
        "FALSE" | "NO" | "0" | "LOC" => Some(LocationLabel::Loc),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter().map(|row| row.iter().map(|cell| cell.to_string()).collect()).collect()
    }

    #[test]
    fn test_from_grids() {
        let callouts = grid(&[
            &["LOC", "TAG", "RM", "IN", "TX", "NOTES", "TRUE"],
            &["10", "", "40' #2 ACSR", "", "", ""],
        ]);
        let bore = grid(&[&["totalBoreFootage", "420"]]);

        let workbook =
            JobWorkbook::from_grids("Callout Template", &callouts, Some(bore.as_slice()));
        assert_eq!(workbook.rows.len(), 1);
        assert_eq!(workbook.bore.total_bore, 420.0);
        assert_eq!(workbook.label_flag, Some(LocationLabel::Wl));
    }

    #[test]
    fn test_label_flag_absent_or_false() {
        let callouts = grid(&[&["LOC", "TAG", "RM", "IN", "TX", "NOTES"]]);
        assert_eq!(JobWorkbook::from_grids("Sheet1", &callouts, None).label_flag, None);

        let callouts = grid(&[&["LOC", "TAG", "RM", "IN", "TX", "NOTES", "false"]]);
        assert_eq!(
            JobWorkbook::from_grids("Sheet1", &callouts, None).label_flag,
            Some(LocationLabel::Loc)
        );
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Float(40.0)), "40");
        assert_eq!(cell_text(&Data::Float(12.5)), "12.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Bool(true)), "TRUE");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_garbage_bytes_are_a_workbook_error() {
        let err = read_workbook(b"definitely not a spreadsheet").unwrap_err();
        assert!(matches!(err, ExtractError::Workbook { .. }));
    }
}
