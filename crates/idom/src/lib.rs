//! A keyed live element tree and the incremental reconciler that patches it.
//!
//! [`LiveTree`] implements [`patch_compiler::Reconciler`]: replaying a compiled patch
//! into a node keeps the children whose tag and key still match, moves keyed children
//! that changed position, and removes whatever the patch did not visit.

mod error;
mod reconcile;
mod serialize;
mod snapshot;
mod tree;

pub use error::ReconcileError;
pub use snapshot::SnapshotOptions;
pub use tree::{ElementRef, LiveTree, NodeRef};
