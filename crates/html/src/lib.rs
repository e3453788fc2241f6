//! HTML fragment parsing into an arena-backed [`SourceTree`].
//!
//! The tree keeps the shapes a fragment parser produces: a synthetic root, tags with
//! attributes, text, comments and directives. Stray text directly below the root (for
//! example the whitespace around `<div>` in `"  <div></div>  "`) is kept; consumers
//! decide what to do with it.

pub mod debug;
pub mod perf_fixtures;

mod entities;
mod tokenizer;
mod tree_builder;
mod types;

pub use crate::tokenizer::{
    Tokenizer, ends_raw_text, is_attribute_name, is_tag_name, is_void_element, tokenize,
};
pub use crate::tree_builder::{FragmentParser, build_tree, parse_fragment};
pub use crate::types::{Descendants, NodeId, NodeKind, SourceNode, SourceTree, Token};
