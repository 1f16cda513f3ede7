//! Whole-document processing
//!
//! Detects the upload format, runs the matching extractor and attaches the
//! job-level counters for that format.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::config::CalloutConfig;
use crate::error::{ExtractError, Result};
use crate::graph::GraphRecordExtractor;
use crate::model::{Extraction, JobSummary, LocationLabel};
use crate::sheet::{SpreadsheetRecordExtractor, read_workbook, summarize};
use crate::stats::JobStats;

/// OLE compound document header used by legacy `.xls` files
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Graph export with `nodes` or `connections`
    Graph,
    /// Callout spreadsheet
    Workbook,
}

impl Format {
    /// Detect format from file extension and content
    pub fn detect(path: &Path, bytes: &[u8]) -> Result<Self> {
        if let Some(ext) = path.extension() {
            let ext = ext.to_string_lossy().to_lowercase();
            match ext.as_str() {
                "json" => return Ok(Self::Graph),
                "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => return Ok(Self::Workbook),
                _ => {}
            }
        }

        if bytes.starts_with(b"PK") || bytes.starts_with(&OLE_MAGIC) {
            return Ok(Self::Workbook);
        }

        let first = bytes.iter().find(|byte| !byte.is_ascii_whitespace());
        if first == Some(&b'{') {
            return Ok(Self::Graph);
        }

        Err(ExtractError::UnknownFormat { hint: path.display().to_string() })
    }
}

/// Everything produced from one upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub format: Format,

    #[serde(flatten)]
    pub extraction: Extraction,

    /// Graph jobs only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<JobStats>,

    /// Spreadsheet jobs only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<JobSummary>,

    /// Label for callout headers
    pub label: LocationLabel,
}

/// Extract records and counters from an upload held in memory
pub fn process(bytes: &[u8], format: Format, config: &CalloutConfig) -> Result<JobReport> {
    debug!(?format, size = bytes.len(), "processing upload");

    let report = match format {
        Format::Graph => {
            let extraction = GraphRecordExtractor::new(config.clone()).extract_bytes(bytes)?;
            let stats = JobStats::compute(&extraction.records, &config.utility);
            JobReport { format, extraction, stats: Some(stats), summary: None, label: config.label }
        }
        Format::Workbook => {
            let workbook = read_workbook(bytes)?;
            let records = SpreadsheetRecordExtractor::new().extract(&workbook.rows);
            let summary = summarize(&workbook.rows, &workbook.bore);
            JobReport {
                format,
                extraction: Extraction {
                    job_name: String::new(),
                    records,
                    diagnostics: Vec::new(),
                },
                stats: None,
                summary: Some(summary),
                label: workbook.label_flag.unwrap_or(config.label),
            }
        }
    };

    info!(
        ?format,
        records = report.extraction.records.len(),
        diagnostics = report.extraction.diagnostics.len(),
        "processed upload"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(Format::detect(Path::new("job.json"), b"").unwrap(), Format::Graph);
        assert_eq!(Format::detect(Path::new("JOB.XLSX"), b"").unwrap(), Format::Workbook);
        assert_eq!(Format::detect(Path::new("old.xls"), b"").unwrap(), Format::Workbook);
    }

    #[test]
    fn test_detect_by_content() {
        let path = PathBuf::from("upload");
        assert_eq!(Format::detect(&path, b"  \n{\"nodes\": {}}").unwrap(), Format::Graph);
        assert_eq!(Format::detect(&path, b"PK\x03\x04rest").unwrap(), Format::Workbook);
        assert_eq!(Format::detect(&path, &OLE_MAGIC).unwrap(), Format::Workbook);
    }

    #[test]
    fn test_detect_unknown() {
        let err = Format::detect(Path::new("notes.txt"), b"plain text").unwrap_err();
        assert!(matches!(err, ExtractError::UnknownFormat { .. }));
    }

    #[test]
    fn test_process_graph_upload() {
        let document = br#"{
            "name": "J100",
            "nodes": {
                "n1": {"attributes": {
                    "node_type": {"-Imported": "pole"},
                    "pole_count": {"-Imported": "1"},
                    "construction_notes": {"a": {"attacher": "Alabama Power", "note": "RM: 40/2 POLE"}}
                }},
                "n2": {"attributes": {"node_type": {"-Imported": "pole"}, "pole_count": {"-Imported": "2"}}}
            }
        }"#;

        let report = process(document, Format::Graph, &CalloutConfig::default()).unwrap();
        assert_eq!(report.extraction.job_name, "J100");
        assert_eq!(report.extraction.records.len(), 2);
        assert!(report.summary.is_none());

        let stats = report.stats.unwrap();
        assert_eq!(stats.total_locations, 2);
        assert_eq!(stats.worked_poles, 1);
        assert_eq!(report.label, LocationLabel::Loc);
    }

    #[test]
    fn test_process_invalid_json() {
        let err = process(b"{\"nodes\":", Format::Graph, &CalloutConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "Error parsing JSON file.");
    }

    #[test]
    fn test_report_json_shape() {
        let report =
            process(br#"{"nodes": {}}"#, Format::Graph, &CalloutConfig::default()).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["format"], "graph");
        assert_eq!(value["job_name"], "Default Job Name");
        assert!(value["records"].as_array().unwrap().is_empty());
        assert!(value.get("summary").is_none());
        assert_eq!(value["stats"]["total_locations"], 0);
    }
}
