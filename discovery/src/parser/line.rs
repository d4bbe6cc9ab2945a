//! Line classification for the VDF scanner.

use regex::Regex;
use std::sync::LazyLock;

/// Double-quoted substring; no escape processing.
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).expect("static regex must compile"));

/// Marker that starts a line comment.
pub const COMMENT_PREFIX: &str = "//";

/// What a single trimmed line means to the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Line<'a> {
    /// Empty or comment line.
    Blank,
    /// A lone `{`.
    Open,
    /// A lone `}`.
    Close,
    /// `"key" "value"`.
    Pair(&'a str, &'a str),
    /// `"key"` on its own, expected to be followed by `{`.
    Key(&'a str),
    /// Zero or more than two quoted strings.
    Unrecognized,
}

pub(super) fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
        return Line::Blank;
    }
    match line {
        "{" => return Line::Open,
        "}" => return Line::Close,
        _ => {}
    }

    let mut quoted = QUOTED
        .captures_iter(line)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()));
    match (quoted.next(), quoted.next(), quoted.next()) {
        (Some(key), Some(value), None) => Line::Pair(key, value),
        (Some(key), None, _) => Line::Key(key),
        _ => Line::Unrecognized,
    }
}
