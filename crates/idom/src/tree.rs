use crate::error::ReconcileError;
use html::{ends_raw_text, is_attribute_name, is_tag_name, is_void_element};
use patch_compiler::OuterHtml;
use std::fmt;
use std::sync::Arc;

/// Handle of a node inside a [`LiveTree`].
///
/// The slot of a removed node is recycled for later nodes, but the handle carries the
/// slot's generation, so a stale handle keeps reporting `false` from
/// [`LiveTree::is_live`] instead of naming the new occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef {
    index: u32,
    generation: u32,
}

impl NodeRef {
    pub(crate) const ROOT: NodeRef = NodeRef {
        index: 0,
        generation: 0,
    };

    pub(crate) fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "{}", self.index)
        } else {
            write!(f, "{}v{}", self.index, self.generation)
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum LiveKind {
    Root,
    Element {
        name: Arc<str>,
        key: Option<Arc<str>>,
        attributes: Vec<(Arc<str>, Arc<str>)>,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct NodeRecord {
    pub(crate) kind: LiveKind,
    pub(crate) parent: Option<NodeRef>,
    pub(crate) children: Vec<NodeRef>,
    pub(crate) live: bool,
    generation: u32,
}

impl NodeRecord {
    /// Text nodes and void elements hold nothing.
    pub(crate) fn allows_children(&self) -> bool {
        match &self.kind {
            LiveKind::Root => true,
            LiveKind::Element { name, .. } => !is_void_element(name),
            LiveKind::Text { .. } => false,
        }
    }
}

/// One open container during a transaction and the index of its next child.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub(crate) node: NodeRef,
    pub(crate) cursor: usize,
}

/// A mutable element tree that patches are replayed into.
///
/// The tree owns a container root; elements carry the key they were last opened with.
/// Detached nodes (created but not appended) are live but have no parent.
///
/// Every mutation keeps the tree serializable: names are valid tag and attribute names,
/// void elements stay empty, and `script`/`style` hold at most one text node that does
/// not contain their end tag. [`LiveTree::outer_html`] therefore parses back to the
/// same tree.
#[derive(Debug, Clone)]
pub struct LiveTree {
    pub(crate) nodes: Vec<NodeRecord>,
    free: Vec<u32>,
    pub(crate) frames: Vec<Frame>,
    pub(crate) in_transaction: bool,
}

impl LiveTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeRecord {
                kind: LiveKind::Root,
                parent: None,
                children: Vec::new(),
                live: true,
                generation: 0,
            }],
            free: Vec::new(),
            frames: Vec::new(),
            in_transaction: false,
        }
    }

    pub fn root(&self) -> NodeRef {
        NodeRef::ROOT
    }

    pub(crate) fn record(&self, node: NodeRef) -> Option<&NodeRecord> {
        self.nodes
            .get(node.index())
            .filter(|record| record.live && record.generation == node.generation)
    }

    pub(crate) fn live_record(&self, node: NodeRef) -> Result<&NodeRecord, ReconcileError> {
        self.record(node).ok_or(ReconcileError::UnknownNode(node))
    }

    pub(crate) fn push_node(&mut self, kind: LiveKind) -> NodeRef {
        if let Some(index) = self.free.pop() {
            let record = &mut self.nodes[index as usize];
            record.generation += 1;
            record.kind = kind;
            record.live = true;
            return NodeRef {
                index,
                generation: record.generation,
            };
        }
        let index = self.nodes.len() as u32;
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
            live: true,
            generation: 0,
        });
        NodeRef {
            index,
            generation: 0,
        }
    }

    /// Checks that a child can go at position `index` of `parent`. `text` is the child's
    /// text, or `None` for an element.
    pub(crate) fn check_content(
        &self,
        parent: NodeRef,
        index: usize,
        text: Option<&str>,
    ) -> Result<(), ReconcileError> {
        let record = self.live_record(parent)?;
        if !record.allows_children() {
            return Err(ReconcileError::NotAContainer(parent));
        }
        if let LiveKind::Element { name, .. } = &record.kind
            && matches!(name.as_ref(), "script" | "style")
        {
            let fits = index == 0 && text.is_some_and(|text| !ends_raw_text(name, text));
            if !fits {
                return Err(ReconcileError::RawTextContent { parent });
            }
        }
        Ok(())
    }

    /// Creates a detached element without key or attributes. The name is lowercased.
    pub fn create_element(&mut self, name: &str) -> Result<NodeRef, ReconcileError> {
        let name = name.to_ascii_lowercase();
        if !is_tag_name(&name) {
            return Err(ReconcileError::InvalidName(name));
        }
        Ok(self.push_node(LiveKind::Element {
            name: Arc::from(name),
            key: None,
            attributes: Vec::new(),
        }))
    }

    pub fn create_text(&mut self, text: &str) -> NodeRef {
        self.push_node(LiveKind::Text {
            text: text.to_string(),
        })
    }

    /// Appends `child` as the last child of `parent`, detaching it from its current
    /// parent first.
    pub fn append_child(&mut self, parent: NodeRef, child: NodeRef) -> Result<(), ReconcileError> {
        let index = self
            .live_record(parent)?
            .children
            .iter()
            .filter(|&&c| c != child)
            .count();
        let text = match &self.live_record(child)?.kind {
            LiveKind::Text { text } => Some(text.as_str()),
            _ => None,
        };
        self.check_content(parent, index, text)?;
        if child == self.root() || child == parent || self.is_ancestor(child, parent) {
            return Err(ReconcileError::CycleDetected { parent, child });
        }
        self.detach(child);
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Sets or adds an attribute. The name is lowercased.
    pub fn set_attribute(&mut self, node: NodeRef, name: &str, value: &str) -> Result<(), ReconcileError> {
        self.live_record(node)?;
        let name = name.to_ascii_lowercase();
        if !is_attribute_name(&name) {
            return Err(ReconcileError::InvalidName(name));
        }
        match &mut self.nodes[node.index()].kind {
            LiveKind::Element { attributes, .. } => {
                match attributes.iter_mut().find(|(k, _)| k.as_ref() == name) {
                    Some((_, existing)) => *existing = Arc::from(value),
                    None => attributes.push((Arc::from(name), Arc::from(value))),
                }
                Ok(())
            }
            _ => Err(ReconcileError::NotAnElement(node)),
        }
    }

    pub fn set_key(&mut self, node: NodeRef, key: &str) -> Result<(), ReconcileError> {
        self.live_record(node)?;
        match &mut self.nodes[node.index()].kind {
            LiveKind::Element { key: slot, .. } => {
                *slot = Some(Arc::from(key));
                Ok(())
            }
            _ => Err(ReconcileError::NotAnElement(node)),
        }
    }

    /// Children of a live node; empty for unknown nodes.
    pub fn children(&self, node: NodeRef) -> &[NodeRef] {
        match self.record(node) {
            Some(record) => record.children.as_slice(),
            None => &[],
        }
    }

    pub fn parent(&self, node: NodeRef) -> Option<NodeRef> {
        self.record(node).and_then(|record| record.parent)
    }

    pub fn element_name(&self, node: NodeRef) -> Option<&str> {
        match &self.record(node)?.kind {
            LiveKind::Element { name, .. } => Some(name.as_ref()),
            _ => None,
        }
    }

    pub fn key(&self, node: NodeRef) -> Option<&str> {
        match &self.record(node)?.kind {
            LiveKind::Element { key, .. } => key.as_deref(),
            _ => None,
        }
    }

    pub fn attributes(&self, node: NodeRef) -> &[(Arc<str>, Arc<str>)] {
        match self.record(node).map(|record| &record.kind) {
            Some(LiveKind::Element { attributes, .. }) => attributes.as_slice(),
            _ => &[],
        }
    }

    pub fn attribute(&self, node: NodeRef, name: &str) -> Option<&str> {
        self.attributes(node)
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_ref())
    }

    pub fn node_text(&self, node: NodeRef) -> Option<&str> {
        match &self.record(node)?.kind {
            LiveKind::Text { text } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn is_live(&self, node: NodeRef) -> bool {
        self.record(node).is_some()
    }

    /// Number of live nodes, root included.
    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|record| record.live).count()
    }

    /// Number of arena slots, live or waiting for reuse.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Borrowed view of an element that can be compiled as a fragment source.
    pub fn element(&self, node: NodeRef) -> Option<ElementRef<'_>> {
        self.element_name(node)?;
        Some(ElementRef { tree: self, node })
    }

    fn is_ancestor(&self, ancestor: NodeRef, node: NodeRef) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn detach(&mut self, node: NodeRef) {
        if let Some(parent) = self.nodes[node.index()].parent.take() {
            self.nodes[parent.index()].children.retain(|&c| c != node);
        }
    }

    /// Removes the children of `parent` from index `start` on, with their subtrees.
    pub(crate) fn remove_children_from(&mut self, parent: NodeRef, start: usize) {
        let children = &mut self.nodes[parent.index()].children;
        if start >= children.len() {
            return;
        }
        let mut stack: Vec<NodeRef> = children.drain(start..).collect();
        let mut removed = 0usize;
        while let Some(node) = stack.pop() {
            let record = &mut self.nodes[node.index()];
            record.live = false;
            record.parent = None;
            record.kind = LiveKind::Text {
                text: String::new(),
            };
            stack.append(&mut record.children);
            if record.generation < u32::MAX {
                self.free.push(node.index);
            }
            removed += 1;
        }
        log::trace!(target: "idom.reconcile", "removed {removed} nodes below node {parent}");
    }
}

impl Default for LiveTree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ElementRef<'a> {
    tree: &'a LiveTree,
    node: NodeRef,
}

impl ElementRef<'_> {
    pub fn node(&self) -> NodeRef {
        self.node
    }
}

impl OuterHtml for ElementRef<'_> {
    fn outer_html(&self) -> String {
        self.tree.outer_html(self.node)
    }
}
