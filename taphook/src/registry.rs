//! Ordered tap storage.
//!
//! Taps are kept in execution order. Insertion walks backwards from the end
//! and settles the new tap right after the last tap it is allowed to follow:
//! `before` constraints are satisfied first, then `stage` decides. Equal
//! stages keep registration order.

use std::collections::HashSet;
use taphook_core::Tap;

/// The ordered tap list of one hook.
pub struct TapRegistry<A, R> {
    taps: Vec<Tap<A, R>>,
}

impl<A, R> Default for TapRegistry<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R> TapRegistry<A, R> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { taps: Vec::new() }
    }

    /// Taps in execution order.
    pub fn taps(&self) -> &[Tap<A, R>] {
        &self.taps
    }

    /// Number of taps.
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// Whether no tap is registered.
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Insert `tap` at its ordered position and return that position.
    pub fn insert(&mut self, tap: Tap<A, R>) -> usize {
        let index = self.position_for(&tap);
        self.taps.insert(index, tap);
        index
    }

    /// Replace every tap with `rewrite(tap)` where it returns `Some`.
    ///
    /// Positions are kept even if the rewrite changes `stage` or `before`.
    pub fn rewrite<F>(&mut self, mut rewrite: F)
    where
        F: FnMut(&Tap<A, R>) -> Option<Tap<A, R>>,
    {
        for slot in &mut self.taps {
            if let Some(replacement) = rewrite(slot) {
                *slot = replacement;
            }
        }
    }

    fn position_for(&self, tap: &Tap<A, R>) -> usize {
        let mut before: HashSet<&str> = tap.before.iter().map(String::as_str).collect();
        let mut index = self.taps.len();
        while index > 0 {
            let existing = &self.taps[index - 1];
            if !before.is_empty() {
                if before.remove(existing.name.as_str()) {
                    index -= 1;
                    continue;
                }
                if !before.is_empty() {
                    index -= 1;
                    continue;
                }
            }
            if existing.stage > tap.stage {
                index -= 1;
                continue;
            }
            break;
        }
        if !before.is_empty() {
            tracing::debug!(
                tap = %tap.name,
                unmatched = ?before,
                "`before` names not registered; placing tap first"
            );
        }
        index
    }
}
