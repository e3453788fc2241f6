use crate::identity::Key;
use std::sync::Arc;

/// The primitive mutation calls a compiled program is replayed through.
///
/// Primitives are only meaningful inside [`Reconciler::run_transaction`]; each one
/// advances the reconciler's cursor over the live target. The first error aborts the
/// replay and is handed back to the caller unchanged.
pub trait Reconciler {
    /// What a transaction is scoped to (a node handle, a document id, ...).
    type Target;
    type Error;

    /// Begins a transaction on `target`, runs `body` synchronously, then ends it.
    ///
    /// An error from `body` ends the transaction and is returned as is.
    fn run_transaction<F>(&mut self, target: Self::Target, body: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Self::Error>;

    fn open_element(
        &mut self,
        tag: &str,
        key: &Key,
        attributes: &[(Arc<str>, Arc<str>)],
    ) -> Result<(), Self::Error>;

    fn close_element(&mut self, tag: &str) -> Result<(), Self::Error>;

    fn text(&mut self, value: &str) -> Result<(), Self::Error>;

    fn skip(&mut self) -> Result<(), Self::Error>;
}
