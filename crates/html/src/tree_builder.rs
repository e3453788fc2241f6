use crate::tokenizer::tokenize;
use crate::types::{NodeId, NodeKind, SourceTree, Token};
use std::collections::HashSet;
use std::sync::Arc;

/// Fragment parser: markup in, [`SourceTree`] out.
///
/// The parser is stateless; one value can parse any number of fragments.
#[derive(Clone, Copy, Debug, Default)]
pub struct FragmentParser;

impl FragmentParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, markup: &str) -> SourceTree {
        let tokens = tokenize(markup);
        let tree = build_tree(&tokens);
        log::trace!(
            target: "html.fragment",
            "parsed {} bytes into {} tokens / {} nodes",
            markup.len(),
            tokens.len(),
            tree.len()
        );
        tree
    }
}

pub fn parse_fragment(markup: &str) -> SourceTree {
    FragmentParser::new().parse(markup)
}

/// Builds the fragment tree from a token stream.
///
/// - Start tags open an element unless self-closing (void elements are self-closing).
/// - End tags close the innermost open element of the same name, implicitly closing
///   anything opened after it; an end tag with no matching open element is ignored.
/// - Elements still open at the end of input are closed implicitly.
/// - Duplicate attributes keep the first occurrence; valueless attributes become `""`.
pub fn build_tree(tokens: &[Token]) -> SourceTree {
    let mut tree = SourceTree::new();
    let mut open_elements: Vec<(NodeId, &str)> = Vec::new();

    for token in tokens {
        let parent = open_elements
            .last()
            .map_or(tree.root(), |(id, _)| *id);
        match token {
            Token::Doctype(s) => {
                tree.append(
                    parent,
                    NodeKind::Directive {
                        data: Arc::from(s.as_str()),
                    },
                );
            }
            Token::Comment(c) => {
                tree.append(
                    parent,
                    NodeKind::Comment {
                        data: Arc::from(c.as_str()),
                    },
                );
            }
            Token::Text(txt) => {
                tree.append_text(parent, txt);
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let id = tree.append(
                    parent,
                    NodeKind::Tag {
                        name: Arc::from(name.as_str()),
                        attributes: dedupe_attributes(attributes),
                    },
                );
                if !*self_closing {
                    open_elements.push((id, name.as_str()));
                }
            }
            Token::EndTag(name) => {
                if let Some(pos) = open_elements
                    .iter()
                    .rposition(|(_, open)| *open == name.as_str())
                {
                    open_elements.truncate(pos);
                }
            }
        }
    }

    tree
}

fn dedupe_attributes(attributes: &[(String, Option<String>)]) -> Vec<(Arc<str>, Arc<str>)> {
    let mut out: Vec<(Arc<str>, Arc<str>)> = Vec::with_capacity(attributes.len());
    let mut seen: HashSet<&str> = HashSet::with_capacity(attributes.len());
    for (key, value) in attributes {
        if !seen.insert(key.as_str()) {
            continue;
        }
        out.push((
            Arc::from(key.as_str()),
            Arc::from(value.as_deref().unwrap_or("")),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_name(tree: &SourceTree, id: NodeId) -> &str {
        match tree.kind(id) {
            NodeKind::Tag { name, .. } => name.as_ref(),
            other => panic!("expected tag, got {}", other.type_name()),
        }
    }

    #[test]
    fn top_level_whitespace_stays_as_root_text() {
        let tree = parse_fragment("  <div>hi</div>  ");
        let top = tree.children(tree.root());
        assert_eq!(top.len(), 3);
        assert_eq!(tree.kind(top[0]).type_name(), "text");
        assert_eq!(tag_name(&tree, top[1]), "div");
        assert_eq!(tree.kind(top[2]).type_name(), "text");
        assert_eq!(tree.parent(top[0]), Some(tree.root()));
    }

    #[test]
    fn stray_end_tag_is_ignored() {
        let tree = parse_fragment("<p>a</b>b</p>");
        let p = tree.children(tree.root())[0];
        let children = tree.children(p);
        assert_eq!(children.len(), 1, "text around a stray end tag merges");
        assert!(
            matches!(tree.kind(children[0]), NodeKind::Text { data } if data.as_ref() == "ab")
        );
    }

    #[test]
    fn end_tag_closes_intervening_elements() {
        let tree = parse_fragment("<div><span>x</div>tail");
        let top = tree.children(tree.root());
        assert_eq!(top.len(), 2);
        assert_eq!(tag_name(&tree, top[0]), "div");
        assert_eq!(tree.kind(top[1]).type_name(), "text");
    }

    #[test]
    fn unclosed_elements_end_at_eof() {
        let tree = parse_fragment("<ul><li>one<li>two");
        let ul = tree.children(tree.root())[0];
        let li = tree.children(ul)[0];
        let nested = tree.children(li);
        assert_eq!(nested.len(), 2, "second li nests without implied end tags");
        assert_eq!(tag_name(&tree, nested[1]), "li");
    }

    #[test]
    fn duplicate_attributes_keep_first_value() {
        let tree = parse_fragment(r#"<a href=1 HREF=2 hidden></a>"#);
        let a = tree.children(tree.root())[0];
        let NodeKind::Tag { attributes, .. } = tree.kind(a) else {
            panic!("expected tag");
        };
        let pairs: Vec<(&str, &str)> = attributes
            .iter()
            .map(|(k, v)| (k.as_ref(), v.as_ref()))
            .collect();
        assert_eq!(pairs, vec![("href", "1"), ("hidden", "")]);
    }

    #[test]
    fn build_tree_handles_many_attributes_linearly() {
        let count = 60_000;
        let attributes: String = (0..count).map(|i| format!(" a{i}=1")).collect();
        let input = format!("<p{attributes} a0=2></p>");
        let tree = parse_fragment(&input);
        let p = tree.children(tree.root())[0];
        let NodeKind::Tag { attributes, .. } = tree.kind(p) else {
            panic!("expected tag");
        };
        assert_eq!(attributes.len(), count);
        assert_eq!(tree.kind(p).attr("a0"), Some("1"));
    }

    #[test]
    fn comments_and_doctype_become_their_own_kinds() {
        let tree = parse_fragment("<!doctype html><div><!--c--></div>");
        let top = tree.children(tree.root());
        assert_eq!(tree.kind(top[0]).type_name(), "directive");
        let inner = tree.children(top[1]);
        assert_eq!(tree.kind(inner[0]).type_name(), "comment");
    }

    #[test]
    fn build_tree_stress_deep_nesting() {
        let depth = 10_000;
        let input = format!("{}{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let tree = parse_fragment(&input);
        let mut current = tree.root();
        for _ in 0..depth {
            let children = tree.children(current);
            assert_eq!(children.len(), 1);
            current = children[0];
            assert_eq!(tag_name(&tree, current), "div");
        }
        assert!(tree.children(current).is_empty());
    }
}
