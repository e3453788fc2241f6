use crate::tree::NodeRef;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// The node was never allocated or has been removed.
    UnknownNode(NodeRef),
    /// The node is a text node or a void element and cannot hold children.
    NotAContainer(NodeRef),
    /// `script` and `style` hold a single text node that does not contain their end tag.
    RawTextContent { parent: NodeRef },
    /// Not a name the markup parser would read back unchanged.
    InvalidName(String),
    /// Keys and attributes only exist on elements.
    NotAnElement(NodeRef),
    /// A primitive was called with no transaction running.
    NoTransaction,
    /// A transaction was started while another one was running.
    NestedTransaction,
    TagMismatch { expected: Arc<str>, found: String },
    /// A close with no element left open in the transaction.
    UnbalancedClose { tag: String },
    /// The transaction ended with an element still open.
    UnclosedElement { tag: Arc<str> },
    CycleDetected { parent: NodeRef, child: NodeRef },
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::UnknownNode(node) => write!(f, "unknown node {node}"),
            ReconcileError::NotAContainer(node) => write!(f, "node {node} cannot have children"),
            ReconcileError::RawTextContent { parent } => {
                write!(f, "node {parent} only takes one text child without its end tag")
            }
            ReconcileError::InvalidName(name) => write!(f, "invalid element or attribute name {name:?}"),
            ReconcileError::NotAnElement(node) => write!(f, "node {node} is not an element"),
            ReconcileError::NoTransaction => f.write_str("no patch transaction is running"),
            ReconcileError::NestedTransaction => {
                f.write_str("a patch transaction is already running")
            }
            ReconcileError::TagMismatch { expected, found } => {
                write!(f, "close of `{found}` while `{expected}` is open")
            }
            ReconcileError::UnbalancedClose { tag } => {
                write!(f, "close of `{tag}` with no open element")
            }
            ReconcileError::UnclosedElement { tag } => {
                write!(f, "transaction ended with `{tag}` still open")
            }
            ReconcileError::CycleDetected { parent, child } => {
                write!(f, "appending node {child} to node {parent} would create a cycle")
            }
        }
    }
}

impl std::error::Error for ReconcileError {}
