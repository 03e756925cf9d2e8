use serde::{Deserialize, Serialize};

use crate::error::{FragviewError, Result};

/// One line of corpus text. `content` carries the base64 encoding of the raw
/// line bytes; `start_index..end_index` is the half-open global byte range the
/// line occupies in the corpus (the terminating newline is excluded).
///
/// Wire field names stay PascalCase for compatibility with the original
/// backend's JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Line {
    pub start_index: usize,
    pub end_index: usize,
    pub content: String,
}

impl Line {
    #[must_use]
    pub const fn byte_len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }
}

/// A line containing a match, with the matched sub-range in the same global
/// offset space. Invariant (guaranteed by the backend):
/// `start_index <= matched_start_index <= matched_end_index <= end_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatchedLine {
    #[serde(flatten)]
    pub line: Line,
    pub matched_start_index: usize,
    pub matched_end_index: usize,
}

/// One match occurrence plus its surrounding context windows. `previous` holds
/// lines strictly before the matched line, `next` lines strictly after, both
/// in increasing offset order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Fragment {
    #[serde(default, deserialize_with = "nullable_lines")]
    pub previous: Vec<Line>,
    pub matched: MatchedLine,
    #[serde(default, deserialize_with = "nullable_lines")]
    pub next: Vec<Line>,
}

// The original backend marshals empty slices as JSON null.
fn nullable_lines<'de, D>(deserializer: D) -> std::result::Result<Vec<Line>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let lines = Option::<Vec<Line>>::deserialize(deserializer)?;
    Ok(lines.unwrap_or_default())
}

/// Query options, sent verbatim to the backend. No client-side validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SearchOptions {
    pub match_case: bool,
    pub match_whole_word: bool,
    pub use_regular_expression: bool,
}

impl SearchOptions {
    pub fn toggle(&mut self, toggle: SearchToggle) {
        match toggle {
            SearchToggle::MatchCase => self.match_case = !self.match_case,
            SearchToggle::MatchWholeWord => self.match_whole_word = !self.match_whole_word,
            SearchToggle::UseRegularExpression => {
                self.use_regular_expression = !self.use_regular_expression;
            }
        }
    }
}

/// Named option toggles as exposed on user surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchToggle {
    MatchCase,
    MatchWholeWord,
    UseRegularExpression,
}

impl SearchToggle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MatchCase => "case",
            Self::MatchWholeWord => "word",
            Self::UseRegularExpression => "regex",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "case" => Ok(Self::MatchCase),
            "word" => Ok(Self::MatchWholeWord),
            "regex" => Ok(Self::UseRegularExpression),
            other => Err(FragviewError::Validation(format!(
                "invalid option toggle: {other} (expected case|word|regex)"
            ))),
        }
    }
}

/// Context-growth direction for a fragment, wire-encoded `"p"` / `"n"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Previous => "p",
            Self::Next => "n",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim() {
            "p" | "previous" => Ok(Self::Previous),
            "n" | "next" => Ok(Self::Next),
            other => Err(FragviewError::Validation(format!(
                "load kind not supported: {other} (expected p|n)"
            ))),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(text: &str) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(text.as_bytes())
    }

    #[test]
    fn line_wire_format_uses_pascal_case_fields() {
        let line = Line {
            start_index: 10,
            end_index: 15,
            content: encoded("hello"),
        };
        let json = serde_json::to_value(&line).expect("serialize line");
        assert_eq!(json["StartIndex"], 10);
        assert_eq!(json["EndIndex"], 15);
        assert!(json["Content"].is_string());
    }

    #[test]
    fn matched_line_flattens_into_line_fields() {
        let raw = format!(
            "{{\"StartIndex\":3,\"EndIndex\":8,\"Content\":\"{}\",\"MatchedStartIndex\":4,\"MatchedEndIndex\":6}}",
            encoded("words")
        );
        let matched: MatchedLine = serde_json::from_str(&raw).expect("deserialize matched line");
        assert_eq!(matched.line.start_index, 3);
        assert_eq!(matched.matched_start_index, 4);
        assert_eq!(matched.matched_end_index, 6);
    }

    #[test]
    fn fragment_accepts_null_context_windows() {
        let raw = format!(
            "{{\"Previous\":null,\"Matched\":{{\"StartIndex\":0,\"EndIndex\":2,\"Content\":\"{}\",\"MatchedStartIndex\":0,\"MatchedEndIndex\":2}},\"Next\":null}}",
            encoded("ab")
        );
        let fragment: Fragment = serde_json::from_str(&raw).expect("deserialize fragment");
        assert!(fragment.previous.is_empty());
        assert!(fragment.next.is_empty());
    }

    #[test]
    fn search_options_round_trip_preserves_wire_names() {
        let options = SearchOptions {
            match_case: true,
            match_whole_word: false,
            use_regular_expression: true,
        };
        let json = serde_json::to_value(options).expect("serialize options");
        assert_eq!(json["MatchCase"], true);
        assert_eq!(json["MatchWholeWord"], false);
        assert_eq!(json["UseRegularExpression"], true);
        let parsed: SearchOptions = serde_json::from_value(json).expect("deserialize options");
        assert_eq!(parsed, options);
    }

    #[test]
    fn search_options_default_on_missing_fields() {
        let parsed: SearchOptions =
            serde_json::from_str("{\"MatchCase\":true}").expect("deserialize partial options");
        assert!(parsed.match_case);
        assert!(!parsed.match_whole_word);
        assert!(!parsed.use_regular_expression);
    }

    #[test]
    fn direction_parser_accepts_wire_kinds() {
        assert_eq!(Direction::parse("p").expect("p"), Direction::Previous);
        assert_eq!(Direction::parse("n").expect("n"), Direction::Next);
        assert!(Direction::parse("x").is_err());
        assert!(Direction::parse("").is_err());
    }

    #[test]
    fn toggle_parser_rejects_unknown_names() {
        assert_eq!(
            SearchToggle::parse("case").expect("case"),
            SearchToggle::MatchCase
        );
        assert!(SearchToggle::parse("fuzzy").is_err());
    }

    #[test]
    fn toggling_an_option_twice_restores_it() {
        let mut options = SearchOptions::default();
        options.toggle(SearchToggle::MatchWholeWord);
        assert!(options.match_whole_word);
        options.toggle(SearchToggle::MatchWholeWord);
        assert_eq!(options, SearchOptions::default());
    }
}
