//! Hooks for tracing probe sequences.
//!
//! Table operations never print. Callers that want to watch collisions pass a
//! [`ProbeObserver`] to the `*_observed` variants of insert, search and
//! delete; any `FnMut(ProbeStep)` closure qualifies.

use crate::Key;

/// The table operation that produced a [`ProbeStep`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// [`HashTable::insert`](crate::HashTable::insert).
    Insert,
    /// [`HashTable::search`](crate::HashTable::search).
    Search,
    /// [`HashTable::delete`](crate::HashTable::delete).
    Delete,
}

/// What a probed slot held at the moment it was visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// Never occupied.
    Empty,
    /// Tombstone.
    Deleted,
    /// Holds the given key.
    Live(Key),
}

/// One slot visited while resolving a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbeStep {
    /// Operation being performed.
    pub operation: Operation,
    /// Key being resolved.
    pub key: Key,
    /// Position in the probe sequence; `0` is the home slot.
    pub attempt: usize,
    /// Slot index visited.
    pub slot: usize,
    /// Contents of the slot when visited.
    pub state: SlotState,
}

impl ProbeStep {
    /// Whether this visit was caused by a collision rather than being the
    /// first look at the home slot.
    pub fn is_collision(&self) -> bool {
        self.attempt > 0
    }
}

/// Receives every slot an operation visits, in probe order.
pub trait ProbeObserver {
    /// Called once per visited slot.
    fn observe(&mut self, step: ProbeStep);
}

impl<F> ProbeObserver for F
where
    F: FnMut(ProbeStep),
{
    #[inline]
    fn observe(&mut self, step: ProbeStep) {
        self(step)
    }
}

/// An observer that discards everything. Used by the plain table operations.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObserver;

impl ProbeObserver for NoObserver {
    #[inline(always)]
    fn observe(&mut self, _step: ProbeStep) {}
}
