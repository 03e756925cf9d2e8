use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::bytes::RegexBuilder;

use crate::config::CoreConfig;
use crate::error::{FragviewError, Result};
use crate::models::{Fragment, Line, MatchedLine, SearchOptions};

/// Full-text searcher over an in-memory corpus. Matches are located with a
/// byte regex and returned as fragments: the matched line plus a window of
/// context lines on each side.
///
/// Lines are the half-open byte ranges between newlines; a `\n` byte belongs
/// to the line it terminates and is excluded from the line's content.
#[derive(Debug)]
pub struct Searcher {
    body: Vec<u8>,
    config: CoreConfig,
}

impl Searcher {
    #[must_use]
    pub fn new(body: Vec<u8>, config: CoreConfig) -> Self {
        Self { body, config }
    }

    pub fn open(path: impl AsRef<Path>, config: CoreConfig) -> Result<Self> {
        let body = std::fs::read(path)?;
        Ok(Self::new(body, config))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn config(&self) -> CoreConfig {
        self.config
    }

    /// Execute `query` with the given options, producing one fragment per
    /// match with `context_lines` of leading and trailing context.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<Fragment>> {
        if query.chars().count() < self.config.min_query_chars {
            return Err(FragviewError::Validation(format!(
                "query should have at least {} characters",
                self.config.min_query_chars
            )));
        }
        let pattern = compile_query(query, options)?;
        let mut fragments = Vec::new();
        for found in pattern.find_iter(&self.body) {
            if found.start() >= self.body.len() {
                break;
            }
            if fragments.len() >= self.config.max_results {
                return Err(FragviewError::Validation(
                    "query is too broad, try something more specific".to_string(),
                ));
            }
            let (line_start, line_end) = self.line_bounds(found.start());
            // Matches never extend past the matched line's end; a pattern
            // crossing a newline is clamped to the first line it touches.
            let matched_end = found.end().min(line_end).max(found.start());
            fragments.push(Fragment {
                previous: self.previous_lines(line_start, self.config.context_lines),
                matched: MatchedLine {
                    line: self.make_line(line_start, line_end),
                    matched_start_index: found.start(),
                    matched_end_index: matched_end,
                },
                next: self.next_lines(line_end + 1, self.config.context_lines),
            });
        }
        Ok(fragments)
    }

    /// Up to `limit` lines immediately preceding the line starting at
    /// `anchor`, in increasing offset order. Short or empty at the document
    /// start.
    #[must_use]
    pub fn previous_lines(&self, anchor: usize, limit: usize) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut cursor = anchor.min(self.body.len());
        for _ in 0..limit {
            if cursor == 0 {
                break;
            }
            let (start, end) = self.line_bounds(cursor - 1);
            lines.push(self.make_line(start, end));
            cursor = start;
        }
        lines.reverse();
        lines
    }

    /// Up to `limit` lines starting at or after `anchor`, in increasing
    /// offset order. Short or empty at the document end. A mid-line anchor
    /// yields the line containing it.
    #[must_use]
    pub fn next_lines(&self, anchor: usize, limit: usize) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut cursor = anchor;
        while lines.len() < limit && cursor < self.body.len() {
            let (start, end) = self.line_bounds(cursor);
            lines.push(self.make_line(start, end));
            cursor = end + 1;
        }
        lines
    }

    // Bounds of the line containing byte `ix`; `ix` must be within the body.
    fn line_bounds(&self, ix: usize) -> (usize, usize) {
        let start = self.body[..ix]
            .iter()
            .rposition(|&byte| byte == b'\n')
            .map_or(0, |pos| pos + 1);
        let end = self.body[ix..]
            .iter()
            .position(|&byte| byte == b'\n')
            .map_or(self.body.len(), |pos| ix + pos);
        (start, end)
    }

    fn make_line(&self, start: usize, end: usize) -> Line {
        Line {
            start_index: start,
            end_index: end,
            content: STANDARD.encode(&self.body[start..end]),
        }
    }
}

fn compile_query(query: &str, options: &SearchOptions) -> Result<regex::bytes::Regex> {
    let mut pattern = if options.use_regular_expression {
        query.to_string()
    } else {
        regex::escape(query)
    };
    if options.match_whole_word {
        pattern = format!(r"\b{pattern}\b");
    }
    Ok(RegexBuilder::new(&pattern)
        .case_insensitive(!options.match_case)
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::decode_content;

    const CORPUS: &str = "the first line\n\
                          a quick brown fox\n\
                          jumps over the lazy dog\n\
                          while the Quick owl watches\n\
                          and the night goes on\n";

    fn searcher() -> Searcher {
        Searcher::new(CORPUS.as_bytes().to_vec(), CoreConfig::default())
    }

    fn searcher_with(config: CoreConfig) -> Searcher {
        Searcher::new(CORPUS.as_bytes().to_vec(), config)
    }

    fn decoded(line: &Line) -> String {
        String::from_utf8(decode_content(&line.content).expect("decode")).expect("utf8")
    }

    #[test]
    fn search_is_case_insensitive_by_default() {
        let fragments = searcher()
            .search("quick", &SearchOptions::default())
            .expect("search");
        assert_eq!(fragments.len(), 2);
    }

    #[test]
    fn match_case_narrows_results() {
        let options = SearchOptions {
            match_case: true,
            ..SearchOptions::default()
        };
        let fragments = searcher().search("Quick", &options).expect("search");
        assert_eq!(fragments.len(), 1);
        assert_eq!(decoded(&fragments[0].matched.line), "while the Quick owl watches");
    }

    #[test]
    fn literal_queries_are_escaped_unless_regex_is_requested() {
        let literal = searcher()
            .search("q.ick", &SearchOptions::default())
            .expect("literal search");
        assert!(literal.is_empty());

        let options = SearchOptions {
            use_regular_expression: true,
            ..SearchOptions::default()
        };
        let regex = searcher().search("q.ick", &options).expect("regex search");
        assert_eq!(regex.len(), 2);
    }

    #[test]
    fn whole_word_requires_word_boundaries() {
        let options = SearchOptions {
            match_whole_word: true,
            ..SearchOptions::default()
        };
        let fragments = searcher().search("night", &options).expect("search");
        assert_eq!(fragments.len(), 1);

        let partial = searcher().search("nigh", &options).expect("partial search");
        assert!(partial.is_empty());
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let options = SearchOptions {
            use_regular_expression: true,
            ..SearchOptions::default()
        };
        let err = searcher().search("qui(ck", &options).expect_err("bad regex");
        assert_eq!(err.code(), "REGEX_ERROR");
    }

    #[test]
    fn short_queries_are_rejected() {
        let err = searcher()
            .search("abc", &SearchOptions::default())
            .expect_err("short query");
        assert_eq!(err.code(), "VALIDATION_FAILED");
    }

    #[test]
    fn too_broad_queries_are_rejected() {
        let config = CoreConfig {
            max_results: 1,
            ..CoreConfig::default()
        };
        let err = searcher_with(config)
            .search("quick", &SearchOptions::default())
            .expect_err("broad query");
        assert_eq!(err.code(), "VALIDATION_FAILED");
    }

    #[test]
    fn matched_range_sits_inside_the_matched_line() {
        let fragments = searcher()
            .search("lazy", &SearchOptions::default())
            .expect("search");
        let matched = &fragments[0].matched;
        assert!(matched.line.start_index <= matched.matched_start_index);
        assert!(matched.matched_start_index <= matched.matched_end_index);
        assert!(matched.matched_end_index <= matched.line.end_index);
        let line_text = decoded(&matched.line);
        let rel_start = matched.matched_start_index - matched.line.start_index;
        let rel_end = matched.matched_end_index - matched.line.start_index;
        assert_eq!(&line_text[rel_start..rel_end], "lazy");
    }

    #[test]
    fn fragments_carry_surrounding_context_windows() {
        let fragments = searcher()
            .search("jumps", &SearchOptions::default())
            .expect("search");
        let fragment = &fragments[0];
        assert_eq!(
            fragment.previous.iter().map(decoded).collect::<Vec<_>>(),
            vec!["the first line", "a quick brown fox"]
        );
        assert_eq!(
            fragment.next.iter().map(decoded).collect::<Vec<_>>(),
            vec!["while the Quick owl watches", "and the night goes on"]
        );
    }

    #[test]
    fn context_windows_are_contiguous_with_the_matched_line() {
        let fragments = searcher()
            .search("jumps", &SearchOptions::default())
            .expect("search");
        let fragment = &fragments[0];
        let mut cursor = 0usize;
        for line in fragment
            .previous
            .iter()
            .chain(std::iter::once(&fragment.matched.line))
            .chain(fragment.next.iter())
        {
            assert_eq!(line.start_index, cursor);
            cursor = line.end_index + 1;
        }
    }

    #[test]
    fn previous_lines_stop_at_document_start() {
        let s = searcher();
        let fragments = s
            .search("quick brown", &SearchOptions::default())
            .expect("search");
        let anchor = fragments[0].matched.line.start_index;
        let lines = s.previous_lines(anchor, 10);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].start_index, 0);
        assert_eq!(decoded(&lines[0]), "the first line");
        assert!(s.previous_lines(0, 10).is_empty());
    }

    #[test]
    fn next_lines_stop_at_document_end() {
        let s = searcher();
        let lines = s.next_lines(0, 100);
        assert_eq!(lines.len(), 5);
        assert!(s.next_lines(s.len() + 1, 10).is_empty());
    }

    #[test]
    fn next_lines_walk_consecutive_ranges() {
        let s = searcher();
        let first = s.next_lines(0, 2);
        let continued = s.next_lines(first[1].end_index + 1, 2);
        assert_eq!(continued[0].start_index, first[1].end_index + 1);
        assert_eq!(decoded(&continued[0]), "jumps over the lazy dog");
    }

    #[test]
    fn empty_lines_are_preserved_in_windows() {
        let body = b"alpha\n\nbeta\n".to_vec();
        let s = Searcher::new(body, CoreConfig::default());
        let lines = s.next_lines(0, 3);
        assert_eq!(lines.len(), 3);
        assert_eq!(decoded(&lines[1]), "");
        assert_eq!(lines[1].start_index, lines[1].end_index);
    }

    #[test]
    fn final_line_without_trailing_newline_is_searchable() {
        let body = b"head line\ntail needle".to_vec();
        let s = Searcher::new(body, CoreConfig::default());
        let fragments = s
            .search("needle", &SearchOptions::default())
            .expect("search");
        assert_eq!(fragments.len(), 1);
        assert_eq!(decoded(&fragments[0].matched.line), "tail needle");
        assert!(fragments[0].next.is_empty());
    }

    #[test]
    fn open_reads_the_corpus_from_disk() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().expect("temp corpus");
        file.write_all(CORPUS.as_bytes()).expect("write corpus");
        let s = Searcher::open(file.path(), CoreConfig::default()).expect("open corpus");
        assert_eq!(s.len(), CORPUS.len());
        assert!(!s.is_empty());
    }

    #[test]
    fn empty_corpus_yields_no_results() {
        let s = Searcher::new(Vec::new(), CoreConfig::default());
        let fragments = s
            .search("anything", &SearchOptions::default())
            .expect("search");
        assert!(fragments.is_empty());
    }
}
