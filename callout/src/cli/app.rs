use callout_core::LocationLabel;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "callout",
    version,
    about = "Callout - Work location callouts from utility design exports",
    long_about = "Callout reads graph JSON exports and callout spreadsheets, normalizes every work location, and prints the callout text and job totals field crews work from."
)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse an export
    #[command(about = "Extract callouts and job totals from a graph export or callout workbook")]
    Parse(ParseArgs),

    /// Write the default configuration
    #[command(about = "Write the default configuration to .callout/config.toml")]
    Init,
}

#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Path to the export
    #[arg(help = "Path to a graph JSON export or callout workbook")]
    pub path: PathBuf,

    /// Input format
    #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
    pub format: FormatArg,

    /// Print the whole report as JSON
    #[arg(long, help = "Emit records, diagnostics and totals as one JSON document")]
    pub json: bool,

    /// Include locations without utility work
    #[arg(long, help = "Show locations whose notes are the no-work sentinel")]
    pub show_no_work: bool,

    /// Callout header label
    #[arg(long, value_enum, help = "Override the callout label (loc or wl)")]
    pub label: Option<LabelArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Auto,
    Graph,
    Sheet,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelArg {
    Loc,
    Wl,
}

impl From<LabelArg> for LocationLabel {
    fn from(label: LabelArg) -> Self {
        match label {
            LabelArg::Loc => LocationLabel::Loc,
            LabelArg::Wl => LocationLabel::Wl,
        }
    }
}
