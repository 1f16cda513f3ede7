//! Job totals mined from callout text
//!
//! Removal, install and notes cells are free text; totals come from pattern
//! matching line by line. Underground install footage is not in the text at
//! all and is copied from the bore sheet.

use indexmap::{IndexMap, IndexSet};
use regex_utils::{conductor, work_item};
use tracing::debug;

use super::{BoreFootage, SpreadsheetRow};
use crate::model::{ClassTotals, JobSummary, format_footage};

/// Cable named for the underground primary footage line
const UG_PRIMARY_CABLE: &str = "1/0 AXN-J PRI UG CABLE";

/// Summarize a job's callout rows
pub fn summarize(rows: &[SpreadsheetRow], bore: &BoreFootage) -> JobSummary {
    let mut summary = JobSummary::default();
    let mut removed_poles: IndexSet<&str> = IndexSet::new();

    for row in rows {
        let location = row.location.as_str();

        if work_item::is_pole_removal(&row.removal, &row.notes) {
            removed_poles.insert(location);
        }

        if work_item::is_padmount_install(&row.install) {
            summary.padmount_xfmr += 1;
            summary.padmount_locations.push(location.to_string());
        }

        if work_item::is_terminating_cabinet_install(&row.install) {
            summary.terminating_cabinets += 1;
            summary.tc_locations.push(location.to_string());
        }

        add_overhead_removal(&mut summary.oh_removal, &row.removal);
    }

    summary.poles_removed = removed_poles.len();
    summary.pole_removal_locations = removed_poles.into_iter().map(str::to_string).collect();

    summary.ug_install = ClassTotals {
        primary: bore.primary_ug,
        secondary: bore.secondary_ug,
        service: bore.service_ug,
    };
    summary.total_bore_footage = bore.total_bore;

    summary.wire_removal_formatted = wire_removal_block(bore.primary_ug, &wire_groups(rows));

    debug!(
        poles_removed = summary.poles_removed,
        padmount = summary.padmount_xfmr,
        terminating_cabinets = summary.terminating_cabinets,
        "summarized callout rows"
    );

    summary
}

/// Add each removal line's leading footage to every conductor class it names
fn add_overhead_removal(totals: &mut ClassTotals<u64>, removal: &str) {
    for line in removal.lines() {
        if let Some(footage) = conductor::service_footage(line) {
            totals.service = totals.service.saturating_add(footage);
        }
        if let Some(footage) = conductor::secondary_footage(line) {
            totals.secondary = totals.secondary.saturating_add(footage);
        }
        if let Some(footage) = conductor::primary_footage(line) {
            totals.primary = totals.primary.saturating_add(footage);
        }
    }
}

/// Removed footage per wire type, in order of first appearance.
///
/// This pass is independent of [`add_overhead_removal`]: it only sees runs
/// written as `<footage>' - #<gauge> ACSR`, and feeds the wire block alone.
pub fn wire_groups(rows: &[SpreadsheetRow]) -> IndexMap<String, u64> {
    let mut groups = IndexMap::new();
    for line in rows.iter().flat_map(|row| row.removal.lines()) {
        for run in conductor::wire_runs(line) {
            let total = groups.entry(run.wire_type()).or_insert(0u64);
            *total = total.saturating_add(run.footage);
        }
    }
    groups
}

fn wire_removal_block(ug_primary: f64, groups: &IndexMap<String, u64>) -> String {
    let ug_line = (ug_primary != 0.0)
        .then(|| format!("{}' - {}", format_footage(ug_primary), UG_PRIMARY_CABLE));

    ug_line
        .into_iter()
        .chain(groups.iter().map(|(wire_type, footage)| format!("{}' - {}", footage, wire_type)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(location: &str, removal: &str, install: &str, notes: &str) -> SpreadsheetRow {
        SpreadsheetRow {
            location: location.to_string(),
            removal: removal.to_string(),
            install: install.to_string(),
            notes: notes.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_pole_removal_counted_once_per_location() {
        let rows = vec![
            row("10", "40' 2/0 POLE", "", ""),
            row("10", "40' 2/0 POLE", "", ""),
            row("11", "TOP FOREIGN POLE", "", ""),
            row("12", "", "", "Remove SoCo birthmark"),
            row("13", "40' #2 ACSR", "", ""),
        ];
        let summary = summarize(&rows, &BoreFootage::default());
        assert_eq!(summary.poles_removed, 3);
        assert_eq!(summary.pole_removal_locations, vec!["10", "11", "12"]);
    }

    #[test]
    fn test_equipment_installs() {
        let rows = vec![
            row("20", "", "50 KVA UG XFMR", ""),
            row("21", "", "TERMINATING CABINET", ""),
            row("22", "", "UG XFMR\nTERMINATING CABINET", ""),
            row("23", "", "OH XFMR", ""),
        ];
        let summary = summarize(&rows, &BoreFootage::default());
        assert_eq!(summary.padmount_xfmr, 2);
        assert_eq!(summary.padmount_locations, vec!["20", "22"]);
        assert_eq!(summary.terminating_cabinets, 2);
        assert_eq!(summary.tc_locations, vec!["21", "22"]);
    }

    #[test]
    fn test_single_padmount_install() {
        let summary = summarize(&[row("7", "", "UG XFMR", "")], &BoreFootage::default());
        assert_eq!(summary.padmount_xfmr, 1);
        assert_eq!(summary.padmount_locations, vec!["7"]);
    }

    #[test]
    fn test_overhead_removal_by_class() {
        let rows = vec![
            row("1", "40' #2 ACSR", "", ""),
            row("2", "120' - 1/0 TPX SVC\n85' - 4/0 QPX SEC\n60' #4 ACSR/N", "", ""),
            row("3", "300' - #2 ACSR & #4 ACSR/N", "", ""),
        ];
        let summary = summarize(&rows, &BoreFootage::default());
        assert_eq!(summary.oh_removal.primary, 340);
        assert_eq!(summary.oh_removal.secondary, 85);
        assert_eq!(summary.oh_removal.service, 120);
    }

    #[test]
    fn test_wire_groups_and_block() {
        let rows = vec![
            row("1", "150' - #2 ACSR & #4 ACSR/N\n90' - #1 ACSR", "", ""),
            row("2", "50' - #2 ACSR & #4 ACSR/N", "", ""),
            row("3", "40' #2 ACSR", "", ""),
        ];
        let bore = BoreFootage { primary_ug: 800.0, total_bore: 950.0, ..Default::default() };

        let groups = wire_groups(&rows);
        assert_eq!(groups.get("#2 ACSR & #4 ACSR/N"), Some(&200));
        assert_eq!(groups.get("#1 ACSR"), Some(&90));
        assert_eq!(groups.len(), 2);

        let summary = summarize(&rows, &bore);
        assert_eq!(
            summary.wire_removal_formatted,
            "800' - 1/0 AXN-J PRI UG CABLE\n200' - #2 ACSR & #4 ACSR/N\n90' - #1 ACSR"
        );
        assert_eq!(summary.ug_install.primary, 800.0);
        assert_eq!(summary.total_bore_footage, 950.0);
    }

    #[test]
    fn test_no_ug_line_without_primary_bore() {
        let rows = vec![row("1", "90' - #1 ACSR", "", "")];
        let summary = summarize(&rows, &BoreFootage::default());
        assert_eq!(summary.wire_removal_formatted, "90' - #1 ACSR");
    }

    #[test]
    fn test_huge_footage_saturates() {
        let max = u64::MAX;
        let removal = [
            format!("{max}' - 1/0 TPX SVC"),
            format!("{max}' - 1/0 TPX SVC"),
            format!("{max}' #2 ACSR"),
            format!("{max}' - #1 ACSR"),
        ]
        .join("\n");
        let rows = vec![row("1", &removal, "", "")];

        let summary = summarize(&rows, &BoreFootage::default());
        assert_eq!(summary.oh_removal.service, u64::MAX);
        assert_eq!(summary.oh_removal.primary, u64::MAX);
        assert_eq!(wire_groups(&rows).get("#1 ACSR"), Some(&u64::MAX));
    }

    #[test]
    fn test_empty_job() {
        let summary = summarize(&[], &BoreFootage::default());
        assert_eq!(summary, JobSummary::default());
    }
}
