//! Shared helpers for fragment, compiler and reconciler tests.

pub mod fixtures;

use std::fmt::Write;

/// Escapes control characters and quotes so a string fits on one listing line.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' => {
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Renders the first mismatch between two line listings with two lines of context.
/// Returns an empty string when the listings are equal.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    fn line(lines: &[String], i: usize) -> &str {
        lines.get(i).map(String::as_str).unwrap_or("<missing>")
    }

    let max = expected.len().max(actual.len());
    let Some(first) = (0..max).find(|&i| line(expected, i) != line(actual, i)) else {
        return String::new();
    };

    let mut out = String::new();
    let start = first.saturating_sub(2);
    let end = (first + 3).min(max);
    let _ = writeln!(
        &mut out,
        "first mismatch at line {} (showing {}..={}):",
        first + 1,
        start + 1,
        end
    );
    for i in start..end {
        let marker = if i == first { ">" } else { " " };
        let _ = writeln!(&mut out, "{marker} {:>4}  expected: {}", i + 1, line(expected, i));
        let _ = writeln!(&mut out, "{marker} {:>4}    actual: {}", i + 1, line(actual, i));
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

/// Panics with a readable diff when two listings differ.
#[track_caller]
pub fn assert_lines_eq(context: &str, expected: &[String], actual: &[String]) {
    let diff = diff_lines(expected, actual);
    assert!(diff.is_empty(), "{context}:\n{diff}");
}

/// Structural outline of `markup` as produced by the fragment parser.
#[cfg(feature = "html")]
pub fn outline_of(markup: &str) -> Vec<String> {
    let tree = html::parse_fragment(markup);
    html::debug::outline(&tree, usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn escape_text_handles_controls_and_quotes() {
        assert_eq!(escape_text("a\"b\n\u{1}"), "a\\\"b\\n\\u{01}");
    }

    #[test]
    fn diff_lines_is_empty_for_equal_listings() {
        let a = lines(&["x", "y"]);
        assert!(diff_lines(&a, &a).is_empty());
    }

    #[test]
    fn diff_lines_points_at_first_mismatch() {
        let diff = diff_lines(&lines(&["a", "b", "c"]), &lines(&["a", "B"]));
        assert!(diff.contains("first mismatch at line 2"), "{diff}");
        assert!(diff.contains("actual: <missing>"), "{diff}");
        assert!(diff.contains("expected 3 lines, actual 2 lines"), "{diff}");
    }
}
