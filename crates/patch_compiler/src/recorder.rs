//! A reconciler that records the calls it receives, for tests and debugging.

use crate::identity::Key;
use crate::reconciler::Reconciler;
use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    NoTransaction,
    NestedTransaction,
    /// Raised by a recorder built with [`Recorder::failing_at`].
    Injected { at: usize },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::NoTransaction => f.write_str("primitive called outside a transaction"),
            RecordError::NestedTransaction => f.write_str("transaction already running"),
            RecordError::Injected { at } => write!(f, "injected failure at primitive {at}"),
        }
    }
}

impl std::error::Error for RecordError {}

/// Records one line per call: `begin <target>`, then `open ...`, `text ...`, `close ...`
/// and `skip` in the listing format, then `end <target>` (or `abort <target>`).
#[derive(Debug, Default)]
pub struct Recorder {
    lines: Vec<String>,
    active: Option<String>,
    primitives: usize,
    fail_at: Option<usize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder whose `n`-th primitive call (1-based, counted across transactions) fails.
    pub fn failing_at(n: usize) -> Self {
        Self {
            fail_at: Some(n),
            ..Self::default()
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    fn record(&mut self, line: String) -> Result<(), RecordError> {
        if self.active.is_none() {
            return Err(RecordError::NoTransaction);
        }
        self.primitives += 1;
        if self.fail_at == Some(self.primitives) {
            return Err(RecordError::Injected {
                at: self.primitives,
            });
        }
        self.lines.push(line);
        Ok(())
    }
}

impl Reconciler for Recorder {
    type Target = String;
    type Error = RecordError;

    fn run_transaction<F>(&mut self, target: String, body: F) -> Result<(), RecordError>
    where
        F: FnOnce(&mut Self) -> Result<(), RecordError>,
    {
        if self.active.is_some() {
            return Err(RecordError::NestedTransaction);
        }
        self.lines.push(format!("begin {target}"));
        self.active = Some(target);
        let result = body(self);
        let target = self.active.take().unwrap_or_default();
        match &result {
            Ok(()) => self.lines.push(format!("end {target}")),
            Err(_) => self.lines.push(format!("abort {target}")),
        }
        result
    }

    fn open_element(
        &mut self,
        tag: &str,
        key: &Key,
        attributes: &[(Arc<str>, Arc<str>)],
    ) -> Result<(), RecordError> {
        let mut line = format!("open {tag} key={:?}", key.as_str());
        for (name, value) in attributes {
            let _ = write!(line, " {name}={:?}", value.as_ref());
        }
        self.record(line)
    }

    fn close_element(&mut self, tag: &str) -> Result<(), RecordError> {
        self.record(format!("close {tag}"))
    }

    fn text(&mut self, value: &str) -> Result<(), RecordError> {
        self.record(format!("text {value:?}"))
    }

    fn skip(&mut self) -> Result<(), RecordError> {
        self.record("skip".to_string())
    }
}
