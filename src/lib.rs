#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Table keys. Non-negative by construction.
pub type Key = u64;

/// Values bound to keys, typically a position in a caller-owned record
/// array.
///
/// Unsigned by construction: slot state is tracked by [`Slot`] rather than by
/// reserving negative values as markers, so every `usize` is a valid value
/// and no negative value can be stored.
pub type Value = usize;

/// Collision resolution strategies and the home slot function.
pub mod probe;

/// The fixed-capacity table and its slot store.
pub mod hash_table;

/// Error types returned by table operations.
pub mod error;

pub mod observer;

/// Table configuration.
pub mod builder;

/// A wrapper that grows by rebuilding into larger fixed-capacity tables.
pub mod growable;

#[cfg(any(test, feature = "stats"))]
pub mod stats;

pub use builder::TableBuilder;
pub use error::CreateError;
pub use error::InsertError;
pub use error::LookupError;
pub use growable::GrowableTable;
pub use hash_table::HashTable;
pub use hash_table::Slot;
pub use observer::ProbeObserver;
pub use observer::ProbeStep;
