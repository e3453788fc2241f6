//! Compile static HTML fragments once, replay them as keyed incremental patches.
//!
//! ```
//! use fragpatch::{LiveTree, SnapshotOptions, compile};
//!
//! let patch = compile("<ul><li id=\"a\">one</li></ul>").unwrap();
//! let mut tree = LiveTree::new();
//! let root = tree.root();
//! patch.apply(&mut tree, root).unwrap();
//! assert_eq!(
//!     tree.snapshot(root, SnapshotOptions::default()),
//!     vec!["<ul>", "  <li id=\"a\">", "    \"one\""]
//! );
//! ```

pub use idom::{ElementRef, LiveTree, NodeRef, ReconcileError, SnapshotOptions};
pub use patch_compiler::recorder;
pub use patch_compiler::{
    CompileError, Compiler, CompilerConfig, FragmentSource, IdentityStrategy, Instruction,
    Key, KeyDisplay, KeyOrigin, OuterHtml, Patch, PatchStats, Reconciler, SharedCompiler,
    TreeSource, compile,
};

/// The fragment parser compiles go through by default.
pub use html::FragmentParser;
