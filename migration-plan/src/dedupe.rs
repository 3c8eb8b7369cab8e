//! Deduplication of steps across composed registries.
//!
//! When a caller unions several filtered registries (for example two `upto`
//! calls at different ceilings over overlapping definitions), each step key
//! must survive at most once. The claimed keys live in an explicit
//! [`DedupeContext`] passed by reference to every call that shares it, so
//! the data flow is visible rather than hidden in closure state.

use log::trace;

use indexmap::IndexSet;

use crate::registry::Registry;

/// Transient record of step keys already claimed within one resolution.
///
/// # Characteristics
/// - Scoped to one resolution call or one builder invocation; never
///   persisted
/// - Keys are kept in claim order, which is occasionally useful for
///   diagnostics
/// - Growing the context is an observable side effect of [`dedupe`] and of
///   the builder's incremental filter; that is the mechanism by which
///   chained calls avoid re-emitting a key
#[derive(Debug, Default, Clone)]
pub struct DedupeContext {
    claimed: IndexSet<String>,
}

impl DedupeContext {
    pub fn new() -> Self {
        DedupeContext::default()
    }

    /// Returns true if the key has already been claimed.
    pub fn is_claimed(&self, key: &str) -> bool {
        self.claimed.contains(key)
    }

    /// Claims a key, returning false if it was already claimed.
    pub fn claim(&mut self, key: &str) -> bool {
        self.claimed.insert(key.to_string())
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }

    /// Iterates the claimed keys in claim order.
    pub fn claimed(&self) -> impl Iterator<Item = &str> {
        self.claimed.iter().map(String::as_str)
    }
}

/// Drops entries whose key is already claimed in the context, claiming
/// every key that survives.
///
/// # Behavior
/// - Input order is preserved for surviving entries
/// - Deterministic: same input order and same starting context contents
///   always produce the same output
/// - Sharing one context across several calls guarantees a key is consumed
///   by at most one of them, preferring the first occurrence in
///   composition order
pub fn dedupe<Op>(registry: Registry<Op>, ctx: &mut DedupeContext) -> Registry<Op> {
    let mut kept = Registry::new();

    for (key, step) in registry {
        if ctx.claim(&key) {
            kept.insert(key, step);
        } else {
            trace!("Dropping already-claimed step '{}'", key);
        }
    }

    kept
}
