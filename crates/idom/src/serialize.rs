use crate::tree::{LiveKind, LiveTree, NodeRef};
use html::is_void_element;

enum Step {
    Enter(NodeRef),
    Close(NodeRef),
}

impl LiveTree {
    /// Markup of `node` and its subtree. For the root this equals [`LiveTree::inner_html`].
    ///
    /// Keys are not serialized; the id attribute is, so explicit keys survive a round trip.
    pub fn outer_html(&self, node: NodeRef) -> String {
        let mut out = String::new();
        if node == self.root() {
            self.write_children(node, &mut out);
        } else if self.is_live(node) {
            self.write_subtree(node, &mut out);
        }
        out
    }

    /// Markup of the children of `node`.
    pub fn inner_html(&self, node: NodeRef) -> String {
        let mut out = String::new();
        self.write_children(node, &mut out);
        out
    }

    fn write_children(&self, node: NodeRef, out: &mut String) {
        for &child in self.children(node) {
            self.write_subtree(child, out);
        }
    }

    fn write_subtree(&self, node: NodeRef, out: &mut String) {
        let mut stack = vec![Step::Enter(node)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Close(element) => {
                    if let Some(name) = self.element_name(element) {
                        out.push_str("</");
                        out.push_str(name);
                        out.push('>');
                    }
                }
                Step::Enter(current) => {
                    let Some(record) = self.record(current) else {
                        continue;
                    };
                    match &record.kind {
                        LiveKind::Root => {}
                        LiveKind::Element {
                            name, attributes, ..
                        } => {
                            out.push('<');
                            out.push_str(name);
                            for (attr, value) in attributes {
                                out.push(' ');
                                out.push_str(attr);
                                out.push_str("=\"");
                                escape_into(out, value, true);
                                out.push('"');
                            }
                            out.push('>');
                            if is_void_element(name) {
                                continue;
                            }
                            stack.push(Step::Close(current));
                        }
                        LiveKind::Text { text } => {
                            let raw = record
                                .parent
                                .and_then(|parent| self.element_name(parent))
                                .is_some_and(|parent| matches!(parent, "script" | "style"));
                            if raw {
                                out.push_str(text);
                            } else {
                                escape_into(out, text, false);
                            }
                            continue;
                        }
                    }
                    stack.extend(record.children.iter().rev().map(|&c| Step::Enter(c)));
                }
            }
        }
    }
}

fn escape_into(out: &mut String, value: &str, attribute: bool) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
