//! Compiles static HTML fragments into replayable patch programs.
//!
//! A fragment is parsed and walked once; the result is a [`Patch`], a flat list of
//! open / close / text / skip instructions that drives any [`Reconciler`]. Elements are
//! keyed by their id attribute or, failing that, by a key generated at compile time, so
//! repeated replays let the reconciler keep the nodes it already has.

mod compiler;
mod error;
mod identity;
mod instruction;
mod patch;
mod reconciler;
mod source;

pub mod recorder;

pub use compiler::{Compiler, CompilerConfig, SharedCompiler, compile};
pub use error::CompileError;
pub use identity::{IdentityStrategy, Key, KeyOrigin};
pub use instruction::{Instruction, KeyDisplay};
pub use patch::{Patch, PatchStats};
pub use reconciler::Reconciler;
pub use source::{FragmentSource, OuterHtml, TreeSource};
