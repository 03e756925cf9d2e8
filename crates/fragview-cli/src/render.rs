use std::io::Write;

use anyhow::Result;

use fragview_core::{Fragment, Highlighter};

// Reverse video around the matched span; resets attributes afterwards.
const OPEN_MARKER: &str = "\u{1b}[7m";
const CLOSE_MARKER: &str = "\u{1b}[27m";

pub(crate) fn terminal_highlighter() -> Highlighter {
    Highlighter::new(OPEN_MARKER, CLOSE_MARKER)
}

pub(crate) fn write_fragment(
    out: &mut impl Write,
    highlighter: &Highlighter,
    index: usize,
    fragment: &Fragment,
) -> Result<()> {
    writeln!(out, "--- fragment #{} ---", index + 1)?;
    for line in &fragment.previous {
        writeln!(out, "  {}", highlighter.render_plain(line)?)?;
    }
    writeln!(out, "> {}", highlighter.render_matched(&fragment.matched)?)?;
    for line in &fragment.next {
        writeln!(out, "  {}", highlighter.render_plain(line)?)?;
    }
    Ok(())
}

pub(crate) fn print_fragments(fragments: &[Fragment]) -> Result<()> {
    let highlighter = terminal_highlighter();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if fragments.is_empty() {
        writeln!(out, "no matches")?;
        return Ok(());
    }
    for (index, fragment) in fragments.iter().enumerate() {
        write_fragment(&mut out, &highlighter, index, fragment)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fragview_core::{Line, MatchedLine};

    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    fn line(start: usize, text: &str) -> Line {
        Line {
            start_index: start,
            end_index: start + text.len(),
            content: STANDARD.encode(text.as_bytes()),
        }
    }

    #[test]
    fn write_fragment_lays_out_windows_around_the_match() {
        let fragment = Fragment {
            previous: vec![line(0, "before")],
            matched: MatchedLine {
                line: line(7, "the match here"),
                matched_start_index: 11,
                matched_end_index: 16,
            },
            next: vec![line(22, "after")],
        };
        let highlighter = Highlighter::new("[", "]");
        let mut out = Vec::new();
        write_fragment(&mut out, &highlighter, 0, &fragment).expect("render fragment");
        let text = String::from_utf8(out).expect("utf8 output");
        assert_eq!(
            text,
            "--- fragment #1 ---\n  before\n> the [match] here\n  after\n"
        );
    }
}
