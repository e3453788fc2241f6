use crate::error::CompileError;
use crate::identity::{IdentityStrategy, Key, KeyAllocator};
use crate::instruction::{Instruction, KeyDisplay};
use crate::patch::Patch;
use crate::source::{FragmentSource, TreeSource};
use html::{FragmentParser, NodeId, NodeKind, SourceTree};
use std::sync::{Arc, OnceLock};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Attribute whose value becomes an element's key, taken verbatim (an empty value is
    /// a key like any other).
    pub id_attribute: Arc<str>,
    pub identity: IdentityStrategy,
    /// Elements carrying this attribute compile to open, skip, close; their children
    /// are left to whatever the live tree already holds.
    pub opaque_attribute: Option<Arc<str>>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            id_attribute: Arc::from("id"),
            identity: IdentityStrategy::default(),
            opaque_attribute: None,
        }
    }
}

/// Turns fragments into [`Patch`] programs.
///
/// Each compile parses once and walks the tree once, depth first, in document order.
#[derive(Clone, Debug, Default)]
pub struct Compiler<S = FragmentParser> {
    source: S,
    config: CompilerConfig,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CompilerConfig) -> Self {
        Self {
            source: FragmentParser::new(),
            config,
        }
    }
}

enum Visit {
    Enter(NodeId),
    Exit(Arc<str>),
}

impl<S: TreeSource> Compiler<S> {
    pub fn with_source(source: S, config: CompilerConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn compile<'a>(&self, input: impl Into<FragmentSource<'a>>) -> Result<Patch, CompileError> {
        let markup = input.into().into_markup();
        let tree = self.source.parse_fragment(&markup);
        self.compile_tree(&tree)
    }

    /// Compiles an already parsed tree.
    ///
    /// Root-level text is dropped. Tags become open/close pairs around their children,
    /// text inside tags becomes text. Any other node kind fails the whole compile.
    pub fn compile_tree(&self, tree: &SourceTree) -> Result<Patch, CompileError> {
        let root = tree.root();
        let mut keys = KeyAllocator::new(&self.config.identity);
        for id in tree.descendants() {
            if let NodeKind::Tag { attributes, .. } = tree.kind(id)
                && let Some(value) = self.explicit_id(attributes)
            {
                keys.reserve(value);
            }
        }
        let mut program: Vec<Instruction> = Vec::new();
        let mut stack: Vec<Visit> = tree
            .children(root)
            .iter()
            .rev()
            .map(|&id| Visit::Enter(id))
            .collect();

        while let Some(visit) = stack.pop() {
            let id = match visit {
                Visit::Exit(name) => {
                    program.push(Instruction::CloseTag { name });
                    continue;
                }
                Visit::Enter(id) => id,
            };
            let node = tree.node(id);
            match &node.kind {
                NodeKind::Text { data } => {
                    if node.parent == Some(root) {
                        log::trace!(
                            target: "fragpatch.compile",
                            "dropping root-level text ({} bytes)",
                            data.len()
                        );
                        continue;
                    }
                    program.push(Instruction::EmitText {
                        content: Arc::clone(data),
                    });
                }
                NodeKind::Tag { name, attributes } => {
                    let key = match self.explicit_id(attributes) {
                        Some(value) => Key::explicit(Arc::clone(value)),
                        None => keys.generate()?,
                    };
                    let opaque = self
                        .config
                        .opaque_attribute
                        .as_deref()
                        .is_some_and(|attr| node.kind.attr(attr).is_some());
                    program.push(Instruction::OpenTag {
                        name: Arc::clone(name),
                        key,
                        attributes: attributes.clone(),
                    });
                    stack.push(Visit::Exit(Arc::clone(name)));
                    if opaque {
                        program.push(Instruction::Skip);
                    } else {
                        stack.extend(tree.children(id).iter().rev().map(|&c| Visit::Enter(c)));
                    }
                }
                other => {
                    log::debug!(
                        target: "fragpatch.compile",
                        "refusing {} node {}",
                        other.type_name(),
                        id.0
                    );
                    return Err(CompileError::UnrecognizedNodeKind {
                        kind: other.type_name(),
                        node: id,
                    });
                }
            }
        }

        let patch = Patch::from_instructions(program);
        log::debug!(
            target: "fragpatch.compile",
            "compiled {} source nodes into {} instructions",
            tree.len(),
            patch.len()
        );
        if log::log_enabled!(target: "fragpatch.compile", log::Level::Trace) {
            for line in patch.listing(KeyDisplay::Full) {
                log::trace!(target: "fragpatch.compile", "{line}");
            }
        }
        Ok(patch)
    }

    fn explicit_id<'t>(&self, attributes: &'t [(Arc<str>, Arc<str>)]) -> Option<&'t Arc<str>> {
        attributes
            .iter()
            .find(|(name, _)| *name == self.config.id_attribute)
            .map(|(_, value)| value)
    }
}

/// Compiles with the default parser and configuration.
pub fn compile<'a>(input: impl Into<FragmentSource<'a>>) -> Result<Patch, CompileError> {
    Compiler::new().compile(input)
}

/// A compiler built on first use and shared by reference afterwards.
///
/// Owned by the caller (a field, a `static`, an `Arc`), never process-global by itself.
#[derive(Debug, Default)]
pub struct SharedCompiler {
    config: CompilerConfig,
    cell: OnceLock<Compiler>,
}

impl SharedCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            cell: OnceLock::new(),
        }
    }

    pub fn get(&self) -> &Compiler {
        self.cell.get_or_init(|| {
            log::debug!(target: "fragpatch.compile", "initializing shared compiler");
            Compiler::with_config(self.config.clone())
        })
    }

    pub fn compile<'a>(&self, input: impl Into<FragmentSource<'a>>) -> Result<Patch, CompileError> {
        self.get().compile(input)
    }
}
