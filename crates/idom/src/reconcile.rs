//! Incremental reconciliation of a [`LiveTree`] against a replayed program.
//!
//! A transaction walks the target's children with a cursor per open container:
//! - `open_element` keeps the child at the cursor when tag and key match, else moves a
//!   later sibling with the same tag and key into place, else creates a new element.
//! - `text` updates the text node at the cursor or inserts a new one.
//! - `close_element` removes whatever children the program did not visit.
//! - `skip` marks every remaining child of the open element as visited.
//!
//! Content that would not survive serialization (children of void elements, elements
//! or a second text inside `script`/`style`, invalid names) fails the primitive.
//!
//! Nothing is rolled back on error; the tree keeps the mutations made so far.

use crate::error::ReconcileError;
use crate::tree::{Frame, LiveKind, LiveTree, NodeRef};
use html::{is_attribute_name, is_tag_name};
use patch_compiler::{Key, Reconciler};
use std::sync::Arc;

impl LiveTree {
    fn top_frame(&self) -> Result<Frame, ReconcileError> {
        if !self.in_transaction {
            return Err(ReconcileError::NoTransaction);
        }
        self.frames.last().copied().ok_or(ReconcileError::NoTransaction)
    }

    fn advance(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.cursor += 1;
        }
    }

    fn is_keyed_element(&self, node: NodeRef, tag: &str, key: &str) -> bool {
        matches!(
            &self.nodes[node.index()].kind,
            LiveKind::Element { name, key: Some(existing), .. }
                if name.as_ref() == tag && existing.as_ref() == key
        )
    }

    fn insert_at(&mut self, parent: NodeRef, index: usize, child: NodeRef) {
        self.nodes[parent.index()].children.insert(index, child);
        self.nodes[child.index()].parent = Some(parent);
    }

    /// Finds or creates the element for `tag`/`key` at the cursor of `frame`.
    fn claim_element(&mut self, frame: Frame, tag: &str, key: &Key) -> Result<NodeRef, ReconcileError> {
        let Frame { node: parent, cursor } = frame;
        self.check_content(parent, cursor, None)?;
        let siblings = &self.nodes[parent.index()].children;
        if let Some(&current) = siblings.get(cursor)
            && self.is_keyed_element(current, tag, key.as_str())
        {
            return Ok(current);
        }
        let later = siblings
            .iter()
            .skip(cursor + 1)
            .position(|&sibling| self.is_keyed_element(sibling, tag, key.as_str()));
        if let Some(offset) = later {
            let from = cursor + 1 + offset;
            let moved = self.nodes[parent.index()].children.remove(from);
            self.nodes[parent.index()].children.insert(cursor, moved);
            log::trace!(
                target: "idom.reconcile",
                "moved <{tag} key={key}> from index {from} to {cursor} under node {parent}"
            );
            return Ok(moved);
        }
        if !is_tag_name(tag) {
            return Err(ReconcileError::InvalidName(tag.to_string()));
        }
        let created = self.push_node(LiveKind::Element {
            name: Arc::from(tag),
            key: Some(Arc::from(key.as_str())),
            attributes: Vec::new(),
        });
        self.insert_at(parent, cursor, created);
        log::trace!(
            target: "idom.reconcile",
            "created <{tag} key={key}> at index {cursor} under node {parent}"
        );
        Ok(created)
    }

    fn finish_transaction(&mut self) -> Result<(), ReconcileError> {
        let Some(&open) = self.frames.last() else {
            return Err(ReconcileError::NoTransaction);
        };
        if self.frames.len() > 1 {
            let tag = match &self.nodes[open.node.index()].kind {
                LiveKind::Element { name, .. } => Arc::clone(name),
                _ => Arc::from("#root"),
            };
            return Err(ReconcileError::UnclosedElement { tag });
        }
        self.remove_children_from(open.node, open.cursor);
        Ok(())
    }
}

impl Reconciler for LiveTree {
    type Target = NodeRef;
    type Error = ReconcileError;

    fn run_transaction<F>(&mut self, target: NodeRef, body: F) -> Result<(), ReconcileError>
    where
        F: FnOnce(&mut Self) -> Result<(), ReconcileError>,
    {
        if self.in_transaction {
            return Err(ReconcileError::NestedTransaction);
        }
        if !self.live_record(target)?.allows_children() {
            return Err(ReconcileError::NotAContainer(target));
        }
        log::trace!(target: "idom.reconcile", "begin transaction on node {target}");
        self.in_transaction = true;
        self.frames.push(Frame {
            node: target,
            cursor: 0,
        });
        let result = body(self).and_then(|()| self.finish_transaction());
        self.frames.clear();
        self.in_transaction = false;
        log::trace!(
            target: "idom.reconcile",
            "end transaction on node {target} ({})",
            if result.is_ok() { "ok" } else { "failed" }
        );
        result
    }

    fn open_element(
        &mut self,
        tag: &str,
        key: &Key,
        attributes: &[(Arc<str>, Arc<str>)],
    ) -> Result<(), ReconcileError> {
        let frame = self.top_frame()?;
        let element = self.claim_element(frame, tag, key)?;
        if let Some((name, _)) = attributes.iter().find(|(name, _)| !is_attribute_name(name)) {
            return Err(ReconcileError::InvalidName(name.to_string()));
        }
        if let LiveKind::Element {
            attributes: current,
            ..
        } = &mut self.nodes[element.index()].kind
            && current.as_slice() != attributes
        {
            current.clear();
            current.extend(attributes.iter().cloned());
        }
        self.advance();
        self.frames.push(Frame {
            node: element,
            cursor: 0,
        });
        Ok(())
    }

    fn close_element(&mut self, tag: &str) -> Result<(), ReconcileError> {
        let frame = self.top_frame()?;
        if self.frames.len() < 2 {
            return Err(ReconcileError::UnbalancedClose {
                tag: tag.to_string(),
            });
        }
        if let LiveKind::Element { name, .. } = &self.nodes[frame.node.index()].kind
            && name.as_ref() != tag
        {
            return Err(ReconcileError::TagMismatch {
                expected: Arc::clone(name),
                found: tag.to_string(),
            });
        }
        self.remove_children_from(frame.node, frame.cursor);
        self.frames.pop();
        Ok(())
    }

    fn text(&mut self, value: &str) -> Result<(), ReconcileError> {
        let Frame { node: parent, cursor } = self.top_frame()?;
        self.check_content(parent, cursor, Some(value))?;
        let current = self.nodes[parent.index()].children.get(cursor).copied();
        let reused = current.is_some_and(|node| {
            if let LiveKind::Text { text } = &mut self.nodes[node.index()].kind {
                if text.as_str() != value {
                    text.clear();
                    text.push_str(value);
                }
                true
            } else {
                false
            }
        });
        if !reused {
            let created = self.push_node(LiveKind::Text {
                text: value.to_string(),
            });
            self.insert_at(parent, cursor, created);
            log::trace!(
                target: "idom.reconcile",
                "created text at index {cursor} under node {parent}"
            );
        }
        self.advance();
        Ok(())
    }

    fn skip(&mut self) -> Result<(), ReconcileError> {
        let Frame { node, .. } = self.top_frame()?;
        let end = self.nodes[node.index()].children.len();
        if let Some(frame) = self.frames.last_mut() {
            frame.cursor = end;
        }
        Ok(())
    }
}
