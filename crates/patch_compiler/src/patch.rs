use crate::instruction::{Instruction, KeyDisplay};
use crate::reconciler::Reconciler;
use std::sync::Arc;

/// A compiled fragment, ready to be replayed.
///
/// The program is immutable and shared, so clones are cheap and a `Patch` can be
/// replayed from several threads against different targets. Every replay runs the
/// whole program from the start; nothing is remembered between replays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patch {
    program: Arc<[Instruction]>,
}

/// Instruction counts of a program.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PatchStats {
    pub elements: usize,
    pub texts: usize,
    pub skips: usize,
}

impl Patch {
    /// Wraps a hand-built program. Balance of open/close pairs is not checked here;
    /// the reconciler reports unbalanced programs at replay time.
    pub fn from_instructions(program: impl Into<Arc<[Instruction]>>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.program
    }

    pub fn len(&self) -> usize {
        self.program.len()
    }

    pub fn is_empty(&self) -> bool {
        self.program.is_empty()
    }

    /// Replays the program into `target` inside one reconciler transaction.
    pub fn apply<R: Reconciler>(&self, reconciler: &mut R, target: R::Target) -> Result<(), R::Error> {
        self.apply_with(reconciler, target, || {})
    }

    /// Like [`Patch::apply`], then calls `on_done` once, still inside the transaction.
    ///
    /// `on_done` is not called when a primitive fails.
    pub fn apply_with<R, F>(&self, reconciler: &mut R, target: R::Target, on_done: F) -> Result<(), R::Error>
    where
        R: Reconciler,
        F: FnOnce(),
    {
        log::trace!(
            target: "fragpatch.patch",
            "replaying {} instructions",
            self.program.len()
        );
        let program = &self.program;
        reconciler.run_transaction(target, move |reconciler| {
            for instruction in program.iter() {
                instruction.replay(reconciler)?;
            }
            on_done();
            Ok(())
        })
    }

    pub fn stats(&self) -> PatchStats {
        let mut stats = PatchStats::default();
        for instruction in self.program.iter() {
            match instruction {
                Instruction::OpenTag { .. } => stats.elements += 1,
                Instruction::EmitText { .. } => stats.texts += 1,
                Instruction::Skip => stats.skips += 1,
                Instruction::CloseTag { .. } => {}
            }
        }
        stats
    }

    /// Human-readable program, one instruction per line, indented by nesting depth.
    pub fn listing(&self, keys: KeyDisplay) -> Vec<String> {
        let mut depth = 0usize;
        let mut lines = Vec::with_capacity(self.program.len());
        for instruction in self.program.iter() {
            if matches!(instruction, Instruction::CloseTag { .. }) {
                depth = depth.saturating_sub(1);
            }
            lines.push(format!(
                "{}{}",
                "  ".repeat(depth),
                instruction.listing_line(keys)
            ));
            if matches!(instruction, Instruction::OpenTag { .. }) {
                depth += 1;
            }
        }
        lines
    }
}
