//! Regex utilities for callout
//! Extracted to a separate crate for compilation optimization

use once_cell::sync::Lazy;
use regex::Regex;

/// Work-item classification patterns for callout rows
pub mod work_item {
    use super::*;

    /// Pole spec such as `40/2` or `40' 2/0` followed somewhere by `POLE`
    pub static POLE_REMOVAL: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)\b[0-9]{2,}(?:/[0-9]|'\s*[0-9]+/[0-9]+)\b.*\bPOLE\b")
            .expect("Invalid regex pattern")
    });

    pub static TOP_FOREIGN_POLE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)TOP.*FOREIGN POLE").expect("Invalid regex pattern")
    });

    pub static SOCO_BIRTHMARK: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)remove.*soco birthmark").expect("Invalid regex pattern")
    });

    pub static PADMOUNT_XFMR: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)UG XFMR").expect("Invalid regex pattern")
    });

    pub static TERMINATING_CABINET: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)TERMINATING CABINET").expect("Invalid regex pattern")
    });

    /// Whether a row's removal or notes text describes a pole coming out
    pub fn is_pole_removal(removal: &str, notes: &str) -> bool {
        POLE_REMOVAL.is_match(removal)
            || TOP_FOREIGN_POLE.is_match(removal)
            || SOCO_BIRTHMARK.is_match(notes)
    }

    pub fn is_padmount_install(install: &str) -> bool {
        PADMOUNT_XFMR.is_match(install)
    }

    pub fn is_terminating_cabinet_install(install: &str) -> bool {
        TERMINATING_CABINET.is_match(install)
    }
}

/// Overhead conductor footage patterns
///
/// Each helper looks at a single line of removal text and returns the leading
/// footage when the line names the matching conductor class.
pub mod conductor {
    use super::*;

    pub static SERVICE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)([0-9]+)[^0-9]+[-–]?\s*.*\bSVC\b").expect("Invalid regex pattern")
    });

    pub static SECONDARY: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)([0-9]+)[^0-9]+[-–]?\s*.*\bSEC\b").expect("Invalid regex pattern")
    });

    /// Gauge plus `ACSR`; the `/N` exclusion is checked by hand since `regex` has no lookahead
    pub static ACSR: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)#[0-9]+\s+ACSR").expect("Invalid regex pattern")
    });

    static DIGITS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[0-9]+").expect("Invalid regex pattern"));

    /// Footage run with a phase conductor and an optional paired neutral
    pub static WIRE_RUN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"(?i)([0-9]+)'?\s*-\s*(?:[0-9]Ø\s*)?#([0-9]+)\s*ACSR(?:\s*&\s*(?:[0-9]Ø\s*)?#([0-9]+)\s*ACSR/N)?",
        )
        .expect("Invalid regex pattern")
    });

    fn captured_footage(pattern: &Regex, line: &str) -> Option<u64> {
        pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    pub fn service_footage(line: &str) -> Option<u64> {
        captured_footage(&SERVICE, line)
    }

    pub fn secondary_footage(line: &str) -> Option<u64> {
        captured_footage(&SECONDARY, line)
    }

    /// Leading footage of a line that removes a bare `#N ACSR` phase conductor.
    ///
    /// A conductor written as `ACSR/N` is a neutral and does not count; a line
    /// with both is still primary as long as one phase conductor is bare.
    pub fn primary_footage(line: &str) -> Option<u64> {
        for acsr in ACSR.find_iter(line) {
            let tail = &line[acsr.end()..];
            if tail.get(..2).is_some_and(|next| next.eq_ignore_ascii_case("/n")) {
                continue;
            }
            if tail.chars().next().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                continue;
            }
            // footage must be separated from the gauge by at least one non-digit
            let head = &line[..acsr.start()];
            let footage = DIGITS.find_iter(head).find(|digits| digits.end() < head.len());
            if let Some(footage) = footage {
                return footage.as_str().parse().ok();
            }
        }
        None
    }

    /// One footage/conductor match inside a removal line
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct WireRun {
        pub footage: u64,
        pub gauge: String,
        pub neutral_gauge: Option<String>,
    }

    impl WireRun {
        /// Grouping key, e.g. `#2 ACSR` or `#2 ACSR & #4 ACSR/N`
        pub fn wire_type(&self) -> String {
            match &self.neutral_gauge {
                Some(neutral) => format!("#{} ACSR & #{} ACSR/N", self.gauge, neutral),
                None => format!("#{} ACSR", self.gauge),
            }
        }
    }

    /// Every wire run in a line, in order of appearance
    pub fn wire_runs(line: &str) -> Vec<WireRun> {
        WIRE_RUN
            .captures_iter(line)
            .filter_map(|caps| {
                let footage = caps.get(1)?.as_str().parse().ok()?;
                Some(WireRun {
                    footage,
                    gauge: caps.get(2)?.as_str().to_string(),
                    neutral_gauge: caps.get(3).map(|m| m.as_str().to_string()),
                })
            })
            .collect()
    }
}

/// Pole tag recognition
pub mod tag {
    use super::*;

    /// Strict `digits-digits[-digits...]` pole tag
    pub static POLE_TAG: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^[0-9]+(?:-[0-9]+)+$").expect("Invalid regex pattern")
    });

    pub fn is_pole_tag(text: &str) -> bool {
        POLE_TAG.is_match(text.trim())
    }
}

/// Lenient numeric parsing for location counts
pub mod number {
    use super::*;

    pub static LEADING_FLOAT: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\s*[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
            .expect("Invalid regex pattern")
    });

    /// Parse the numeric prefix of `text` (`"12.5A"` reads as 12.5)
    pub fn parse_leading_float(text: &str) -> Option<f64> {
        LEADING_FLOAT
            .find(text)
            .and_then(|m| m.as_str().trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
    }
}
