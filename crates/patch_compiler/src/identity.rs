//! Identity keys for compiled elements.
//!
//! An element keeps the value of its id attribute as key. Elements without one get a key
//! generated at compile time; that key is baked into the program and reused by every
//! replay, which is what lets a reconciler recognize the element on the next patch.

use crate::error::CompileError;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyOrigin {
    /// Taken from the element's id attribute.
    Explicit,
    /// Generated by the compiler.
    Generated,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key {
    value: Arc<str>,
    origin: KeyOrigin,
}

impl Key {
    pub fn explicit(value: impl Into<Arc<str>>) -> Self {
        Self {
            value: value.into(),
            origin: KeyOrigin::Explicit,
        }
    }

    pub fn generated(value: impl Into<Arc<str>>) -> Self {
        Self {
            value: value.into(),
            origin: KeyOrigin::Generated,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn origin(&self) -> KeyOrigin {
        self.origin
    }

    pub fn is_generated(&self) -> bool {
        self.origin == KeyOrigin::Generated
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// How keys are generated for elements without an id attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum IdentityStrategy {
    /// Lowercase hex of a random `u64` from the OS entropy source.
    #[default]
    RandomHex,
    /// `prefix` followed by a counter starting at 1, restarted for every compile.
    /// Deterministic; meant for snapshots and tests.
    Sequential { prefix: Arc<str> },
}

/// Issues keys for one compile. Every explicit id in the fragment is reserved before the
/// first key is generated, so a generated key never equals an explicit id anywhere in the
/// same compile, nor another generated key.
pub(crate) struct KeyAllocator<'a> {
    strategy: &'a IdentityStrategy,
    issued: HashSet<Arc<str>>,
    counter: u64,
}

impl<'a> KeyAllocator<'a> {
    pub(crate) fn new(strategy: &'a IdentityStrategy) -> Self {
        Self {
            strategy,
            issued: HashSet::new(),
            counter: 0,
        }
    }

    /// Marks an explicit id as taken.
    pub(crate) fn reserve(&mut self, value: &Arc<str>) {
        if !self.issued.insert(Arc::clone(value)) {
            log::debug!(
                target: "fragpatch.compile",
                "key {value:?} is used by more than one element"
            );
        }
    }

    pub(crate) fn generate(&mut self) -> Result<Key, CompileError> {
        loop {
            let candidate: Arc<str> = match self.strategy {
                IdentityStrategy::RandomHex => Arc::from(format!("{:x}", getrandom::u64()?)),
                IdentityStrategy::Sequential { prefix } => {
                    self.counter += 1;
                    Arc::from(format!("{prefix}{}", self.counter))
                }
            };
            if self.issued.insert(Arc::clone(&candidate)) {
                return Ok(Key::generated(candidate));
            }
            log::trace!(target: "fragpatch.compile", "generated key {candidate:?} collided, redrawing");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_keys_are_hex_and_distinct() {
        let strategy = IdentityStrategy::RandomHex;
        let mut keys = KeyAllocator::new(&strategy);
        let a = keys.generate().expect("entropy");
        let b = keys.generate().expect("entropy");
        assert_ne!(a, b);
        for key in [&a, &b] {
            assert!(key.is_generated());
            assert!(!key.as_str().is_empty());
            assert!(
                key.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
                "expected lowercase hex, got {key}"
            );
        }
    }

    #[test]
    fn sequential_keys_skip_reserved_values() {
        let strategy = IdentityStrategy::Sequential {
            prefix: Arc::from("k"),
        };
        let mut keys = KeyAllocator::new(&strategy);
        keys.reserve(&Arc::from("k1"));
        keys.reserve(&Arc::from("k3"));
        let generated: Vec<String> = (0..3)
            .map(|_| keys.generate().expect("sequential keys never fail").to_string())
            .collect();
        assert_eq!(generated, vec!["k2", "k4", "k5"]);
    }

    #[test]
    fn duplicate_reservations_are_tolerated() {
        let strategy = IdentityStrategy::default();
        let mut keys = KeyAllocator::new(&strategy);
        keys.reserve(&Arc::from("x"));
        keys.reserve(&Arc::from("x"));
        assert_eq!(keys.issued.len(), 1);
    }
}
