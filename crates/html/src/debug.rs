use crate::types::{NodeId, NodeKind, SourceTree};

const INDENT_STEP: &str = "  ";
const PREVIEW_CHARS: usize = 40;

/// Indented one-line-per-node preview of a fragment, at most `cap` lines.
///
/// Text is trimmed and whitespace-only text is omitted, so the outline is meant for
/// logs and assertions about structure, not for exact text comparison.
pub fn outline(tree: &SourceTree, cap: usize) -> Vec<String> {
    let mut out = Vec::new();
    // (node, depth) with children pushed in reverse so they pop in document order.
    let mut stack: Vec<(NodeId, usize)> = tree
        .children(tree.root())
        .iter()
        .rev()
        .map(|&id| (id, 0))
        .collect();

    while let Some((id, depth)) = stack.pop() {
        if out.len() == cap {
            break;
        }
        let mut line = INDENT_STEP.repeat(depth);
        match tree.kind(id) {
            NodeKind::Root => line.push_str("#root"),
            NodeKind::Tag { name, .. } => {
                let kind = tree.kind(id);
                line.push('<');
                line.push_str(name);
                for key in ["id", "class"] {
                    if let Some(value) = kind.attr(key).filter(|v| !v.is_empty()) {
                        line.push(' ');
                        line.push_str(key);
                        line.push_str("=\"");
                        line.push_str(value);
                        line.push('"');
                    }
                }
                line.push('>');
            }
            NodeKind::Text { data } => {
                let trimmed = data.trim();
                if trimmed.is_empty() {
                    continue;
                }
                line.push('"');
                push_preview(&mut line, trimmed);
                line.push('"');
            }
            NodeKind::Comment { data } => {
                line.push_str("<!-- ");
                push_preview(&mut line, data);
                line.push_str(" -->");
            }
            NodeKind::Directive { data } => {
                line.push_str("<!");
                line.push_str(data);
                line.push('>');
            }
        }
        out.push(line);
        stack.extend(
            tree.children(id)
                .iter()
                .rev()
                .map(|&child| (child, depth + 1)),
        );
    }
    out
}

fn push_preview(out: &mut String, s: &str) {
    for (i, ch) in s.chars().enumerate() {
        if i == PREVIEW_CHARS {
            out.push('…');
            break;
        }
        out.push(if ch == '\n' { ' ' } else { ch });
    }
}

#[cfg(test)]
mod tests {
    use super::outline;
    use crate::parse_fragment;

    #[test]
    fn outline_shows_structure_and_skips_blank_text() {
        let tree = parse_fragment("<div id=main class=\"a b\">\n  <p>hello\nworld</p>\n</div>");
        assert_eq!(
            outline(&tree, usize::MAX),
            vec![
                "<div id=\"main\" class=\"a b\">",
                "  <p>",
                "    \"hello world\"",
            ]
        );
    }

    #[test]
    fn outline_respects_cap_and_truncates_long_text() {
        let long = "x".repeat(60);
        let tree = parse_fragment(&format!("<p>{long}</p><!--c--><br>"));
        let lines = outline(&tree, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], format!("  \"{}…\"", "x".repeat(40)));
    }
}
