use crate::tree::{LiveKind, LiveTree, NodeRef};
use std::fmt::Write;

/// Deterministic line-per-node rendering of a live subtree for tests.
///
/// Elements render as `<name key="k" attr="v">` (key only with `include_keys`), text as
/// its escaped content in quotes, two spaces of indent per level. A container root is
/// not rendered itself; its children start at indent zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SnapshotOptions {
    pub include_keys: bool,
}

const INDENT_STEP: usize = 2;

impl LiveTree {
    pub fn snapshot(&self, node: NodeRef, options: SnapshotOptions) -> Vec<String> {
        let mut lines = Vec::new();
        let mut stack: Vec<(NodeRef, usize)> = if node == self.root() {
            self.children(node).iter().rev().map(|&c| (c, 0)).collect()
        } else {
            vec![(node, 0)]
        };
        while let Some((current, depth)) = stack.pop() {
            let Some(record) = self.record(current) else {
                continue;
            };
            let mut line = " ".repeat(depth * INDENT_STEP);
            write_node_line(&mut line, &record.kind, options);
            lines.push(line);
            stack.extend(record.children.iter().rev().map(|&c| (c, depth + 1)));
        }
        lines
    }
}

fn write_node_line(out: &mut String, kind: &LiveKind, options: SnapshotOptions) {
    match kind {
        LiveKind::Root => out.push_str("#root"),
        LiveKind::Element {
            name,
            key,
            attributes,
        } => {
            out.push('<');
            out.push_str(name);
            if options.include_keys
                && let Some(key) = key
            {
                out.push_str(" key=\"");
                write_escaped(out, key);
                out.push('"');
            }
            for (attr, value) in attributes {
                out.push(' ');
                out.push_str(attr);
                out.push_str("=\"");
                write_escaped(out, value);
                out.push('"');
            }
            out.push('>');
        }
        LiveKind::Text { text } => {
            out.push('"');
            write_escaped(out, text);
            out.push('"');
        }
    }
}

fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ if ch.is_ascii() => out.push(ch),
            _ => {
                let _ = write!(out, "\\u{{{:X}}}", ch as u32);
            }
        }
    }
}
