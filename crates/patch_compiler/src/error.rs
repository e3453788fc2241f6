use html::NodeId;
use std::fmt;

/// Compile failures. A failed compile never yields a partial program.
#[derive(Debug)]
pub enum CompileError {
    /// A parsed node is neither a tag, nor text inside a tag, nor stray root-level text.
    UnrecognizedNodeKind { kind: &'static str, node: NodeId },
    /// The OS random source failed while generating an identity.
    Entropy(getrandom::Error),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::UnrecognizedNodeKind { kind, node } => {
                write!(f, "unrecognized node kind `{kind}` (node {})", node.0)
            }
            CompileError::Entropy(err) => write!(f, "identity generation failed: {err}"),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<getrandom::Error> for CompileError {
    fn from(err: getrandom::Error) -> Self {
        CompileError::Entropy(err)
    }
}
