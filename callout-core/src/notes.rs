//! Construction note layout
//!
//! Field notes arrive as loose lines with `RM:`, `IN:` and `TX:` markers, usually
//! on a line of their own. The formatter pulls the first content line up next to
//! its marker and hangs the rest of the section under it.

use tracing::trace;

/// Section markers recognized at the start of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Removal,
    Install,
    Transfer,
}

impl Marker {
    const ALL: [Marker; 3] = [Marker::Removal, Marker::Install, Marker::Transfer];

    pub fn label(self) -> &'static str {
        match self {
            Self::Removal => "RM:",
            Self::Install => "IN:",
            Self::Transfer => "TX:",
        }
    }

    /// Continuation indent that lines content up under the marker
    fn indent(self) -> &'static str {
        match self {
            Self::Removal | Self::Transfer => "       ",
            Self::Install => "     ",
        }
    }

    /// Split a trimmed line into its marker and whatever follows it
    fn strip(line: &str) -> Option<(Self, &str)> {
        Self::ALL
            .into_iter()
            .find_map(|marker| line.strip_prefix(marker.label()).map(|rest| (marker, rest)))
    }
}

/// Re-indent free-form construction notes.
///
/// Never fails: unbalanced or dangling markers are emitted as best as possible.
pub fn format_construction_notes(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut formatted = Vec::with_capacity(lines.len());
    let mut section: Option<Marker> = None;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();

        if let Some((marker, rest)) = Marker::strip(line) {
            let rest = rest.trim();
            let content = if rest.is_empty() {
                // bare marker: the content is on the next line, unless that is blank
                match lines.get(i + 1).map(|next| next.trim()) {
                    Some(next) if !next.is_empty() => {
                        i += 1;
                        next
                    }
                    _ => "",
                }
            } else {
                rest
            };
            if content.is_empty() {
                formatted.push(marker.label().to_string());
                section = None;
            } else {
                formatted.push(format!("{} {}", marker.label(), content));
                section = Some(marker);
            }
        } else if let Some(marker) = section {
            if line.is_empty() || line.starts_with('*') {
                section = None;
                formatted.push(line.to_string());
            } else {
                formatted.push(format!("{}{}", marker.indent(), line));
            }
        } else {
            formatted.push(line.to_string());
        }

        i += 1;
    }

    let formatted = separate_transfer_blocks(collapse_blank_runs(formatted));
    trace!(lines = formatted.len(), "formatted construction notes");

    formatted.join("\n").trim_end().to_string()
}

fn collapse_blank_runs(lines: Vec<String>) -> Vec<String> {
    let mut collapsed: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        let repeat_blank = line.is_empty() && collapsed.last().is_some_and(|prev| prev.is_empty());
        if !repeat_blank {
            collapsed.push(line);
        }
    }
    collapsed
}

/// Make sure a `TX:` block and its indented lines are followed by one blank line
fn separate_transfer_blocks(lines: Vec<String>) -> Vec<String> {
    let mut separated = Vec::with_capacity(lines.len() + 1);
    let mut in_transfer = false;

    for line in lines {
        if in_transfer {
            let continuation = line.starts_with(char::is_whitespace);
            if !continuation {
                in_transfer = false;
                if !line.is_empty() {
                    separated.push(String::new());
                }
            }
        }
        if line.starts_with(Marker::Transfer.label()) {
            in_transfer = true;
        }
        separated.push(line);
    }

    separated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_merges_with_next_line() {
        assert_eq!(format_construction_notes("RM:\nremove wire"), "RM: remove wire");
    }

    #[test]
    fn test_continuation_indent_per_marker() {
        let notes = "RM:\n40' #2 ACSR\nCROSSARM\n*SEE SPEC";
        assert_eq!(
            format_construction_notes(notes),
            "RM: 40' #2 ACSR\n       CROSSARM\n*SEE SPEC"
        );

        let notes = "IN:\n45/3 POLE\nDOWN GUY";
        assert_eq!(format_construction_notes(notes), "IN: 45/3 POLE\n     DOWN GUY");
    }

    #[test]
    fn test_full_block_layout() {
        let notes = "RM:\n40' #2 ACSR\n\nIN:\n45/3 POLE\nGUY\nTX:\nATT\nCHARTER\n*NESC CLEARANCE\n\n";
        let expected = "RM: 40' #2 ACSR\n\nIN: 45/3 POLE\n     GUY\nTX: ATT\n       CHARTER\n\n*NESC CLEARANCE";
        assert_eq!(format_construction_notes(notes), expected);
    }

    #[test]
    fn test_blank_line_after_transfer_is_inserted_once() {
        assert_eq!(format_construction_notes("TX:\nCATV\n*NOTE"), "TX: CATV\n\n*NOTE");
        assert_eq!(format_construction_notes("TX:\nCATV\n\n*NOTE"), "TX: CATV\n\n*NOTE");
        assert_eq!(format_construction_notes("TX: CATV\nTX: ATT"), "TX: CATV\n\nTX: ATT");
    }

    #[test]
    fn test_blank_runs_collapse() {
        let formatted = format_construction_notes("one\n\n\n\ntwo\n\n\nthree");
        assert_eq!(formatted, "one\n\ntwo\n\nthree");
        assert!(!formatted.contains("\n\n\n"));
    }

    #[test]
    fn test_idempotent_on_formatted_output() {
        let inputs = [
            "RM:\n40' #2 ACSR\n\nIN:\n45/3 POLE\nGUY\nTX:\nATT\nCHARTER\n*NESC CLEARANCE",
            "TX:\nCATV\n*NOTE",
            "plain note\n\n\nRM:\nremove wire\nremove arm",
            "RM:\n\nfoo",
            "IN:\n   \n45/3 POLE\nGUY",
        ];
        for input in inputs {
            let once = format_construction_notes(input);
            assert_eq!(format_construction_notes(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_malformed_markers_do_not_panic() {
        assert_eq!(format_construction_notes("RM:"), "RM:");
        assert_eq!(format_construction_notes("TX:"), "TX:");
        assert_eq!(format_construction_notes("RM:\nIN:\nfoo"), "RM: IN:\n       foo");
        assert_eq!(format_construction_notes("RM:\n\nfoo"), "RM:\n\nfoo");
        assert_eq!(format_construction_notes(""), "");
    }

    #[test]
    fn test_trailing_whitespace_trimmed() {
        assert_eq!(format_construction_notes("NO APC WORK  \n\n  "), "NO APC WORK");
    }
}
