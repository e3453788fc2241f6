use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Doctype(String),
    StartTag {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        self_closing: bool,
    },
    EndTag(String),
    Comment(String),
    Text(String),
}

/// Arena index of a node inside a [`SourceTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The synthetic fragment root is always the first arena slot.
    pub const ROOT: NodeId = NodeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Tag {
        name: Arc<str>,
        attributes: Vec<(Arc<str>, Arc<str>)>,
    },
    Text {
        data: Arc<str>,
    },
    Comment {
        data: Arc<str>,
    },
    Directive {
        data: Arc<str>,
    },
}

impl NodeKind {
    /// Short type label (`root`, `tag`, `text`, `comment`, `directive`).
    pub const fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Tag { .. } => "tag",
            NodeKind::Text { .. } => "text",
            NodeKind::Comment { .. } => "comment",
            NodeKind::Directive { .. } => "directive",
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            NodeKind::Tag { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.as_ref() == key)
                .map(|(_, v)| v.as_ref()),
            _ => None,
        }
    }

    fn allows_children(&self) -> bool {
        matches!(self, NodeKind::Root | NodeKind::Tag { .. })
    }
}

#[derive(Debug, Clone)]
pub struct SourceNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Parsed fragment: an arena of nodes below one synthetic root.
///
/// Invariants:
/// - `NodeId::ROOT` is the only node without a parent.
/// - A node appears in exactly one children list, the one of its `parent`.
/// - Only `Root` and `Tag` nodes have children.
#[derive(Debug, Clone)]
pub struct SourceTree {
    nodes: Vec<SourceNode>,
}

impl SourceTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![SourceNode {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[NodeId::ROOT.index()].children.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &SourceNode {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&SourceNode> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Appends `kind` as the last child of `parent`.
    ///
    /// Panics if `parent` is a leaf kind (text, comment, directive) or a second root is
    /// requested; both are programming errors in a tree source.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        assert!(
            !matches!(kind, NodeKind::Root),
            "source tree has exactly one root"
        );
        assert!(
            self.node(parent).kind.allows_children(),
            "{} node cannot have children",
            self.node(parent).kind.type_name()
        );
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SourceNode {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Appends text to `parent`, merging with a trailing text child.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Option<NodeId> {
        if text.is_empty() {
            return None;
        }
        if let Some(&last) = self.children(parent).last()
            && let NodeKind::Text { data } = &mut self.nodes[last.index()].kind
        {
            let mut merged = String::with_capacity(data.len() + text.len());
            merged.push_str(data);
            merged.push_str(text);
            *data = Arc::from(merged);
            return Some(last);
        }
        Some(self.append(
            parent,
            NodeKind::Text {
                data: Arc::from(text),
            },
        ))
    }

    /// Pre-order iterator over every node below the root (the root itself excluded).
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(NodeId::ROOT).to_vec();
        stack.reverse();
        Descendants { tree: self, stack }
    }
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Descendants<'a> {
    tree: &'a SourceTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
