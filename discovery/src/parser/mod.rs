//! Parser for Valve's brace-delimited key/value text format (VDF).
//!
//! Steam stores both `libraryfolders.vdf` and the per-game
//! `appmanifest_<id>.acf` files in this format:
//!
//! ```text
//! "AppState"
//! {
//!     "appid"       "440"
//!     "name"        "Team Fortress 2"
//!     "installdir"  "Team Fortress 2"
//! }
//! ```
//!
//! The parser is a single-pass line scanner with an explicit stack of open
//! sections, so nesting depth never grows the call stack. It never fails:
//! malformed input yields whatever could be parsed, and the
//! [`VdfDiagnostics`] of a [`VdfParser`] record what was tolerated.
//!
//! Quoted strings are taken literally; escape sequences are not processed.

mod line;
mod node;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::discover::DiscoverError;
use line::{Line, classify};
pub use line::COMMENT_PREFIX;
pub use node::{VdfNode, VdfSection};

/// Counters describing one parse run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VdfDiagnostics {
    pub lines: usize,
    pub pairs: usize,
    pub sections: usize,
    /// Lines with zero or more than two quoted strings.
    pub ignored_lines: usize,
    /// `{` with no preceding key.
    pub stray_open_braces: usize,
    /// `}` with no open section.
    pub unmatched_close_braces: usize,
    /// Sections still open at end of input.
    pub unclosed_sections: usize,
}

impl VdfDiagnostics {
    /// Returns `true` if anything had to be tolerated.
    pub fn is_malformed(&self) -> bool {
        self.ignored_lines > 0
            || self.stray_open_braces > 0
            || self.unmatched_close_braces > 0
            || self.unclosed_sections > 0
    }
}

/// A section being filled, plus its slot in the parent section.
struct OpenSection {
    slot: usize,
    section: VdfSection,
}

/// VDF parser that keeps diagnostics for the last run.
///
/// # Examples
///
/// ```
/// use launcher_sync_discovery::parser::VdfParser;
///
/// let mut parser = VdfParser::new();
/// let root = parser.parse("\"a\"\n{\n\"b\" \"c\"\n}\n}\n");
///
/// assert_eq!(root.get_section("a").unwrap().get_str("b"), Some("c"));
/// assert_eq!(parser.diagnostics().unmatched_close_braces, 1);
/// ```
#[derive(Debug, Default)]
pub struct VdfParser {
    diagnostics: VdfDiagnostics,
}

impl VdfParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &VdfDiagnostics {
        &self.diagnostics
    }

    /// Parses `text` into its root section.
    pub fn parse(&mut self, text: &str) -> VdfSection {
        let mut diagnostics = VdfDiagnostics::default();
        let mut root = VdfSection::new();
        let mut open: Vec<OpenSection> = Vec::new();
        let mut pending_key: Option<String> = None;

        for raw in text.lines() {
            diagnostics.lines += 1;
            match classify(raw) {
                Line::Blank => {}
                Line::Open => match pending_key.take() {
                    Some(key) => {
                        let slot = current(&mut root, &mut open).insert(key, VdfSection::new());
                        open.push(OpenSection {
                            slot,
                            section: VdfSection::new(),
                        });
                        diagnostics.sections += 1;
                    }
                    None => diagnostics.stray_open_braces += 1,
                },
                Line::Close => match open.pop() {
                    Some(finished) => close(&mut root, &mut open, finished),
                    None => diagnostics.unmatched_close_braces += 1,
                },
                Line::Pair(key, value) => {
                    current(&mut root, &mut open).insert(key, value);
                    diagnostics.pairs += 1;
                }
                // An empty key names nothing; it also drops any earlier one.
                Line::Key(key) => pending_key = (!key.is_empty()).then(|| key.to_string()),
                Line::Unrecognized => diagnostics.ignored_lines += 1,
            }
        }

        diagnostics.unclosed_sections = open.len();
        while let Some(finished) = open.pop() {
            close(&mut root, &mut open, finished);
        }

        if diagnostics.is_malformed() {
            debug!(?diagnostics, "Tolerated malformed VDF input");
        }
        self.diagnostics = diagnostics;
        root
    }
}

fn current<'a>(root: &'a mut VdfSection, open: &'a mut [OpenSection]) -> &'a mut VdfSection {
    match open.last_mut() {
        Some(top) => &mut top.section,
        None => root,
    }
}

fn close(root: &mut VdfSection, open: &mut [OpenSection], finished: OpenSection) {
    current(root, open).replace_at(finished.slot, VdfNode::Section(finished.section));
}

/// Parses VDF text into its root section.
///
/// # Examples
///
/// ```
/// use launcher_sync_discovery::parser::parse_vdf;
///
/// let text = r#"
/// // comment
/// "AppState"
/// {
///     "appid"     "440"
///     "name"      "Team Fortress 2"
/// }
/// "#;
///
/// let root = parse_vdf(text);
/// let app = root.get_section("AppState").unwrap();
/// assert_eq!(app.get_str("appid"), Some("440"));
/// assert_eq!(app.get_str("name"), Some("Team Fortress 2"));
/// ```
pub fn parse_vdf(text: &str) -> VdfSection {
    VdfParser::new().parse(text)
}

/// Reads a VDF file and parses it.
///
/// Invalid UTF-8 sequences are dropped rather than failing the read.
///
/// # Errors
///
/// Returns [`DiscoverError::Io`] only when the file cannot be read.
pub fn read_vdf_file(path: &Path) -> Result<VdfSection, DiscoverError> {
    let bytes = fs::read(path)?;
    Ok(parse_vdf(&decode_lossy(&bytes)))
}

/// Decodes UTF-8, silently dropping invalid byte sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_sections_with_blank_and_comment_lines() {
        let text = "\
\"libraryfolders\"
{

    // first library
    \"0\"
    {
        \"path\"      \"C:\\\\Program Files (x86)\\\\Steam\"

        \"apps\"
        {
            \"228980\"  \"123\"
        }
    }
    \"contentstatsid\"  \"-1\"
}
";
        let root = parse_vdf(text);
        let folders = root.get_section("libraryfolders").unwrap();
        assert_eq!(folders.len(), 2);
        assert_eq!(folders.get_str("contentstatsid"), Some("-1"));

        let first = folders.get_section("0").unwrap();
        assert_eq!(
            first.get_str("path"),
            Some("C:\\\\Program Files (x86)\\\\Steam")
        );
        assert_eq!(
            first.get_section("apps").unwrap().get_str("228980"),
            Some("123")
        );
    }

    #[test]
    fn test_repeated_key_last_write_wins() {
        let root = parse_vdf("\"k\" \"1\"\n\"other\" \"x\"\n\"k\" \"2\"\n");
        assert_eq!(root.get_str("k"), Some("2"));
        assert_eq!(root.keys().collect::<Vec<_>>(), vec!["k", "other"]);
    }

    #[test]
    fn test_unmatched_close_brace_never_pops_root() {
        let mut parser = VdfParser::new();
        let root = parser.parse("}\n}\n\"a\" \"1\"\n");
        assert_eq!(root.get_str("a"), Some("1"));
        assert_eq!(parser.diagnostics().unmatched_close_braces, 2);
    }

    #[test]
    fn test_open_brace_without_key_is_ignored() {
        let mut parser = VdfParser::new();
        let root = parser.parse("{\n\"a\" \"1\"\n");
        assert_eq!(root.get_str("a"), Some("1"));
        assert_eq!(parser.diagnostics().stray_open_braces, 1);
        assert_eq!(parser.diagnostics().sections, 0);
    }

    #[test]
    fn test_unclosed_sections_are_attached_at_end_of_input() {
        let mut parser = VdfParser::new();
        let root = parser.parse("\"outer\"\n{\n\"inner\"\n{\n\"k\" \"v\"\n");

        let inner = root
            .get_section("outer")
            .and_then(|outer| outer.get_section("inner"))
            .unwrap();
        assert_eq!(inner.get_str("k"), Some("v"));
        assert_eq!(parser.diagnostics().unclosed_sections, 2);
    }

    #[test]
    fn test_dangling_key_at_end_is_dropped() {
        let root = parse_vdf("\"a\" \"1\"\n\"dangling\"\n");
        assert_eq!(root.len(), 1);
        assert!(!root.contains_key("dangling"));
    }

    #[test]
    fn test_pending_key_survives_intervening_pair() {
        let root = parse_vdf("\"section\"\n\"a\" \"1\"\n{\n\"b\" \"2\"\n}\n");
        assert_eq!(root.get_str("a"), Some("1"));
        assert_eq!(
            root.get_section("section").unwrap().get_str("b"),
            Some("2")
        );
    }

    #[test]
    fn test_empty_key_opens_no_section() {
        let mut parser = VdfParser::new();
        let root = parser.parse("\"\"\n{\n\"a\" \"1\"\n}\n");

        assert_eq!(root.get_str("a"), Some("1"));
        assert!(!root.contains_key(""));
        assert_eq!(parser.diagnostics().stray_open_braces, 1);
        assert_eq!(parser.diagnostics().unmatched_close_braces, 1);
    }

    #[test]
    fn test_empty_key_clears_earlier_pending_key() {
        let root = parse_vdf("\"section\"\n\"\"\n{\n\"a\" \"1\"\n}\n");
        assert_eq!(root.get_str("a"), Some("1"));
        assert!(!root.contains_key("section"));
    }

    #[test]
    fn test_lines_with_wrong_quote_count_are_ignored() {
        let mut parser = VdfParser::new();
        let root = parser.parse("\"a\" \"b\" \"c\"\nno quotes here\n\"k\" \"v\"\n");
        assert_eq!(root.len(), 1);
        assert_eq!(parser.diagnostics().ignored_lines, 2);
        assert_eq!(parser.diagnostics().pairs, 1);
    }

    #[test]
    fn test_crlf_line_endings() {
        let root = parse_vdf("\"AppState\"\r\n{\r\n\"appid\"\t\"10\"\r\n}\r\n");
        assert_eq!(
            root.get_section("AppState").unwrap().get_str("appid"),
            Some("10")
        );
    }

    #[test]
    fn test_decode_lossy_drops_invalid_bytes() {
        let bytes = b"\"name\" \"Caf\xff\xfee\"";
        assert_eq!(decode_lossy(bytes), "\"name\" \"Cafe\"");
    }

    #[test]
    fn test_empty_input_yields_empty_root() {
        let mut parser = VdfParser::new();
        assert!(parser.parse("").is_empty());
        assert!(!parser.diagnostics().is_malformed());
    }
}
