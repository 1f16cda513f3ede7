//! Parse an export and print its callouts

use anyhow::{Context, Result};
use callout_core::{CalloutConfig, Format, JobReport, NormalizedRecord, process, render_callout};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::app::{FormatArg, ParseArgs};

/// Execute the parse command
pub async fn execute(args: ParseArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = CalloutConfig::load_or_default(config_path.as_deref())?;

    let bytes = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;

    let format = match args.format {
        FormatArg::Auto => Format::detect(&args.path, &bytes)?,
        FormatArg::Graph => Format::Graph,
        FormatArg::Sheet => Format::Workbook,
    };
    debug!(?format, path = %args.path.display(), "reading export");

    let mut report = process(&bytes, format, &config)?;

    if report.extraction.job_name.is_empty() {
        report.extraction.job_name = job_name_from_path(&args.path);
    }
    if let Some(label) = args.label {
        report.label = label.into();
    }

    let hide_no_work = config.hide_no_work && !args.show_no_work;
    if hide_no_work {
        report.extraction.records.retain(|record| !is_no_work(record, &config));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &JobReport) {
    println!("Job: {}", report.extraction.job_name);

    if let Some(stats) = &report.stats {
        println!("\n{}", stats.render());
    }

    if let Some(summary) = &report.summary {
        println!("\nPoles removed: {}", summary.poles_removed);
        println!("Pad-mount transformers: {}", summary.padmount_xfmr);
        println!("Terminating cabinets: {}", summary.terminating_cabinets);
        println!(
            "OH removal (pri/sec/svc): {}' / {}' / {}'",
            summary.oh_removal.primary, summary.oh_removal.secondary, summary.oh_removal.service
        );
        if !summary.wire_removal_formatted.is_empty() {
            println!("\n{}", summary.wire_removal_formatted);
        }
    }

    for record in &report.extraction.records {
        println!("\n{}", render_callout(record, report.label));
    }

    if !report.extraction.diagnostics.is_empty() {
        eprintln!("\n{}", report.extraction.diagnostics_message());
    }
}

fn is_no_work(record: &NormalizedRecord, config: &CalloutConfig) -> bool {
    record.notes == config.no_work_notes
}

fn job_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_name_from_path() {
        assert_eq!(job_name_from_path(Path::new("jobs/J-4410 callouts.xlsx")), "J-4410 callouts");
    }

    #[test]
    fn test_no_work_records() {
        let config = CalloutConfig::default();
        let mut record = NormalizedRecord::new("n1", "pole");
        record.notes = config.no_work_notes.clone();
        assert!(is_no_work(&record, &config));

        record.notes = "RM: 40/2 POLE".to_string();
        assert!(!is_no_work(&record, &config));
    }
}
