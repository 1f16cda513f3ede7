//! Callout extraction core
//!
//! Turns utility design exports into normalized work-location records:
//!
//! - [`graph`] reads graph JSON exports (`nodes` or `connections`)
//! - [`sheet`] reads callout workbooks and mines their free text for job totals
//! - [`notes`] tidies construction notes into labeled sections
//! - [`stats`] counts changed-out, mid-span and worked poles
//! - [`render`] produces the callout text handed to field crews

pub mod config;
pub mod error;
pub mod graph;
pub mod job;
pub mod model;
pub mod notes;
pub mod render;
pub mod sheet;
pub mod stats;

pub use config::CalloutConfig;
pub use error::{ExtractError, ResolveError, Result};
pub use graph::GraphRecordExtractor;
pub use job::{Format, JobReport, process};
pub use model::{Extraction, JobSummary, LocationLabel, NormalizedRecord};
pub use notes::format_construction_notes;
pub use render::{display_tag, render_callout};
pub use sheet::{SpreadsheetRecordExtractor, SpreadsheetRow};
pub use stats::JobStats;
