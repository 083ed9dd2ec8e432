use core::fmt::Debug;

use crate::Key;

/// Maps `key` to its home slot in `[0, capacity)`.
///
/// `capacity` must be non-zero; every table guarantees this at construction.
#[inline(always)]
pub fn home_slot(key: Key, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (key % capacity as u64) as usize
}

/// A collision resolution strategy.
///
/// `offset` returns the distance from the home slot of the slot visited on
/// the `attempt`-th collision (starting at zero). The table reduces the
/// result modulo its capacity, so implementations may return any value.
pub trait Probe: Clone + Debug {
    /// Offset from the home slot for the given collision attempt.
    fn offset(&self, key: Key, attempt: usize, capacity: usize) -> usize;
}

/// Linear probing: `probe(key, i) = i + 1`.
///
/// The offset does not depend on the key, so keys sharing a home slot follow
/// the same chain. The default strategy; visits every slot of the table before
/// repeating.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinearProbe;

impl Probe for LinearProbe {
    #[inline(always)]
    fn offset(&self, _key: Key, attempt: usize, _capacity: usize) -> usize {
        attempt.wrapping_add(1)
    }
}

/// Quadratic probing over triangular numbers: `probe(key, i) = (i+1)(i+2)/2`.
///
/// Visits every slot only when the capacity is a power of two. With other
/// capacities an insertion can fail with
/// [`InsertError::ProbeExhausted`](crate::InsertError::ProbeExhausted) while
/// free slots remain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuadraticProbe;

impl Probe for QuadraticProbe {
    #[inline]
    fn offset(&self, _key: Key, attempt: usize, capacity: usize) -> usize {
        let n = attempt as u128 + 1;
        ((n * (n + 1) / 2) % capacity as u128) as usize
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        #[inline]
        fn secondary_hash(seed: u64, key: Key, _capacity: usize) -> u64 {
            use core::hash::BuildHasher;

            foldhash::fast::FixedState::with_seed(seed).hash_one(key)
        }
    } else {
        #[inline]
        fn secondary_hash(_seed: u64, key: Key, capacity: usize) -> u64 {
            key / capacity as u64
        }
    }
}

/// Double hashing: `probe(key, i) = (i + 1) * step(key)` with
/// `step(key) = 1 + h2(key) mod (capacity - 1)`.
///
/// Visits every slot when the capacity is prime. With the `foldhash` feature
/// `h2` is a seeded foldhash of the key; otherwise it is `key / capacity`, the
/// part of the key the home slot discards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoubleHashProbe {
    seed: u64,
}

impl DoubleHashProbe {
    /// Creates a double hashing strategy whose secondary hash uses `seed`.
    ///
    /// The seed is ignored without the `foldhash` feature.
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    fn step(&self, key: Key, capacity: usize) -> u128 {
        if capacity <= 1 {
            return 1;
        }

        let h2 = secondary_hash(self.seed, key, capacity);
        1 + (h2 % (capacity as u64 - 1)) as u128
    }
}

impl Default for DoubleHashProbe {
    fn default() -> Self {
        Self::with_seed(0x9e37_79b9_7f4a_7c15)
    }
}

impl Probe for DoubleHashProbe {
    #[inline]
    fn offset(&self, key: Key, attempt: usize, capacity: usize) -> usize {
        let n = attempt as u128 + 1;
        ((n * self.step(key, capacity)) % capacity as u128) as usize
    }
}

/// The slots visited for a key: its home slot followed by `capacity - 1`
/// probed slots.
///
/// Every table operation walks at most one `ProbeSeq`, which bounds it by the
/// table capacity regardless of occupancy.
#[derive(Clone, Debug)]
pub struct ProbeSeq<'a, P> {
    probe: &'a P,
    key: Key,
    home: usize,
    capacity: usize,
    visited: usize,
}

impl<'a, P: Probe> ProbeSeq<'a, P> {
    /// Starts the sequence for `key` in a table of `capacity` slots.
    pub fn new(probe: &'a P, key: Key, capacity: usize) -> Self {
        Self {
            probe,
            key,
            home: if capacity == 0 {
                0
            } else {
                home_slot(key, capacity)
            },
            capacity,
            visited: 0,
        }
    }

    /// The key's home slot.
    pub fn home(&self) -> usize {
        self.home
    }
}

impl<P: Probe> Iterator for ProbeSeq<'_, P> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.visited >= self.capacity {
            return None;
        }

        let slot = if self.visited == 0 {
            self.home
        } else {
            let offset = self.probe.offset(self.key, self.visited - 1, self.capacity);
            (self.home + offset % self.capacity) % self.capacity
        };
        self.visited += 1;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.capacity - self.visited;
        (remaining, Some(remaining))
    }
}

impl<P: Probe> ExactSizeIterator for ProbeSeq<'_, P> {}
