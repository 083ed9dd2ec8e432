use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::Key;
use crate::Value;
use crate::error::CreateError;
use crate::error::InsertError;
use crate::error::LookupError;
use crate::observer::NoObserver;
use crate::observer::Operation;
use crate::observer::ProbeObserver;
use crate::observer::ProbeStep;
use crate::observer::SlotState;
use crate::probe::LinearProbe;
use crate::probe::Probe;
use crate::probe::ProbeSeq;

/// One cell of the slot store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Slot {
    /// Never occupied since creation or the last [`HashTable::clear`].
    /// Probing for any key stops here.
    #[default]
    Empty,
    /// Tombstone left by [`HashTable::delete`]. Probing continues past it and
    /// insertion may reuse it.
    Deleted,
    /// A key bound to its value.
    Live {
        /// Stored key.
        key: Key,
        /// Value bound to `key`.
        value: Value,
    },
}

impl Slot {
    /// Returns `true` if the slot holds a key.
    #[inline(always)]
    pub fn is_live(&self) -> bool {
        matches!(self, Slot::Live { .. })
    }

    #[inline(always)]
    fn state(&self) -> SlotState {
        match *self {
            Slot::Empty => SlotState::Empty,
            Slot::Deleted => SlotState::Deleted,
            Slot::Live { key, .. } => SlotState::Live(key),
        }
    }
}

fn allocate_slots(capacity: usize) -> Result<Box<[Slot]>, CreateError> {
    if capacity == 0 {
        return Err(CreateError::ZeroCapacity);
    }

    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(CreateError::AllocationFailure)?;
    slots.resize(capacity, Slot::Empty);
    Ok(slots.into_boxed_slice())
}

/// A fixed-capacity open-addressing table from [`Key`]s to [`Value`]s.
///
/// Keys are placed at `key mod capacity` and collisions are resolved by the
/// table's [`Probe`] strategy, linear probing by default. Deletion leaves a
/// tombstone so that keys stored further along a probe chain stay reachable;
/// insertion reuses tombstones.
///
/// The capacity never changes. Once every slot is live, insertion fails with
/// [`InsertError::Full`]; see [`GrowableTable`](crate::GrowableTable) for a
/// wrapper that rebuilds into larger tables instead.
///
/// Every operation visits at most `capacity` slots.
///
/// ## Example
///
/// ```rust
/// use slot_index::HashTable;
/// use slot_index::LookupError;
///
/// let mut table = HashTable::with_capacity(17).unwrap();
///
/// // 54 and 71 share home slot 3; 71 is probed into slot 4.
/// assert_eq!(table.insert(54, 0), Ok(3));
/// assert_eq!(table.insert(71, 1), Ok(4));
///
/// assert_eq!(table.search(71), Ok(1));
/// assert_eq!(table.search(5), Err(LookupError::Empty));
/// ```
#[derive(Clone)]
pub struct HashTable<P = LinearProbe> {
    slots: Box<[Slot]>,

    populated: usize,
    tombstones: usize,

    probe: P,
}

impl<P: Debug> Debug for HashTable<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field("populated", &self.populated)
            .field("capacity", &self.slots.len())
            .field("tombstones", &self.tombstones)
            .field("probe", &self.probe)
            .field(
                "slots",
                &self
                    .slots
                    .chunks(16)
                    .map(|row| {
                        row.iter()
                            .map(|slot| match slot {
                                Slot::Empty => "..".to_string(),
                                Slot::Deleted => "xx".to_string(),
                                Slot::Live { key, value } => format!("{key}:{value}"),
                            })
                            .collect::<Vec<String>>()
                            .join(", ")
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl HashTable<LinearProbe> {
    /// Creates a linear probing table with exactly `capacity` slots, all
    /// empty.
    ///
    /// Fails with [`CreateError::ZeroCapacity`] for a zero capacity and with
    /// [`CreateError::AllocationFailure`] if the slot store cannot be
    /// allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_index::CreateError;
    /// # use slot_index::HashTable;
    /// #
    /// let table = HashTable::with_capacity(100).unwrap();
    /// assert_eq!(table.capacity(), 100);
    /// assert!(table.is_empty());
    ///
    /// assert_eq!(
    ///     HashTable::with_capacity(0).unwrap_err(),
    ///     CreateError::ZeroCapacity
    /// );
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self, CreateError> {
        Self::with_capacity_and_probe(capacity, LinearProbe)
    }
}

impl<P: Probe> HashTable<P> {
    /// Creates a table with exactly `capacity` slots that resolves collisions
    /// with `probe`.
    pub fn with_capacity_and_probe(capacity: usize, probe: P) -> Result<Self, CreateError> {
        Ok(Self {
            slots: allocate_slots(capacity)?,
            populated: 0,
            tombstones: 0,
            probe,
        })
    }

    /// Releases the slot store.
    ///
    /// Equivalent to dropping the table; the table cannot be used afterwards.
    pub fn destroy(self) {
        drop(self);
    }

    /// Number of slots. Fixed at creation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Number of tombstones currently in the slot store.
    #[inline]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns `true` if the table holds no live entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns `true` if every slot holds a live entry.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.populated == self.slots.len()
    }

    /// Ratio of live entries to capacity, in `[0, 1]`.
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.populated as f64 / self.slots.len() as f64
    }

    /// The collision resolution strategy.
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// The raw slot store, indexed by slot.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Slots visited for `key`, home slot first.
    pub fn probe_sequence(&self, key: Key) -> ProbeSeq<'_, P> {
        ProbeSeq::new(&self.probe, key, self.slots.len())
    }

    /// Binds `key` to `value` and returns the slot it now occupies.
    ///
    /// The first tombstone on the key's probe sequence is reused; otherwise
    /// the first empty slot is taken. The whole chain up to the first empty
    /// slot is still checked so a key is never stored twice.
    ///
    /// # Errors
    ///
    /// - [`InsertError::Full`] if every slot is live.
    /// - [`InsertError::DuplicateKey`] if `key` is already present.
    /// - [`InsertError::ProbeExhausted`] if no vacant slot lies on the key's
    ///   probe sequence (never with [`LinearProbe`]).
    ///
    /// The table is unchanged on error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_index::HashTable;
    /// # use slot_index::InsertError;
    /// #
    /// let mut table = HashTable::with_capacity(2).unwrap();
    /// assert_eq!(table.insert(7, 0), Ok(1));
    /// assert_eq!(table.insert(7, 1), Err(InsertError::DuplicateKey));
    /// assert_eq!(table.insert(8, 1), Ok(0));
    /// assert_eq!(table.insert(9, 2), Err(InsertError::Full));
    /// ```
    pub fn insert(&mut self, key: Key, value: Value) -> Result<usize, InsertError> {
        self.insert_observed(key, value, &mut NoObserver)
    }

    /// [`insert`](Self::insert), reporting every visited slot to `observer`.
    pub fn insert_observed<O: ProbeObserver>(
        &mut self,
        key: Key,
        value: Value,
        observer: &mut O,
    ) -> Result<usize, InsertError> {
        if self.is_full() {
            return Err(InsertError::Full);
        }

        let mut vacancy = None;
        for (attempt, index) in self.probe_sequence(key).enumerate() {
            let slot = self.slots[index];
            observer.observe(ProbeStep {
                operation: Operation::Insert,
                key,
                attempt,
                slot: index,
                state: slot.state(),
            });

            match slot {
                Slot::Live { key: existing, .. } if existing == key => {
                    return Err(InsertError::DuplicateKey);
                }
                Slot::Live { .. } => {}
                Slot::Deleted => {
                    vacancy.get_or_insert(index);
                }
                Slot::Empty => {
                    vacancy.get_or_insert(index);
                    break;
                }
            }
        }

        let index = vacancy.ok_or(InsertError::ProbeExhausted)?;
        if self.slots[index] == Slot::Deleted {
            self.tombstones -= 1;
        }
        self.slots[index] = Slot::Live { key, value };
        self.populated += 1;

        Ok(index)
    }

    /// Returns the value bound to `key`.
    ///
    /// # Errors
    ///
    /// - [`LookupError::Empty`] if the key's home slot has never been
    ///   occupied.
    /// - [`LookupError::NotFound`] if the key is absent for any other reason.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_index::HashTable;
    /// # use slot_index::LookupError;
    /// #
    /// let mut table = HashTable::with_capacity(7).unwrap();
    /// for (value, key) in [1010, 2021, 3032, 4043, 5054].into_iter().enumerate() {
    ///     table.insert(key, value).unwrap();
    /// }
    ///
    /// assert_eq!(table.search(5054), Ok(4));
    /// assert_eq!(table.search(9999), Err(LookupError::Empty));
    /// ```
    pub fn search(&self, key: Key) -> Result<Value, LookupError> {
        self.search_observed(key, &mut NoObserver)
    }

    /// [`search`](Self::search), reporting every visited slot to `observer`.
    pub fn search_observed<O: ProbeObserver>(
        &self,
        key: Key,
        observer: &mut O,
    ) -> Result<Value, LookupError> {
        self.locate(key, Operation::Search, observer)
            .map(|(_, value)| value)
    }

    /// Returns `true` if `key` is bound in the table.
    pub fn contains_key(&self, key: Key) -> bool {
        self.locate(key, Operation::Search, &mut NoObserver).is_ok()
    }

    /// Returns the slot holding `key`, if present.
    pub fn find_slot(&self, key: Key) -> Option<usize> {
        self.locate(key, Operation::Search, &mut NoObserver)
            .ok()
            .map(|(index, _)| index)
    }

    /// Unbinds `key`, leaving a tombstone in its slot, and returns the value
    /// it was bound to.
    ///
    /// # Errors
    ///
    /// [`LookupError::NotFound`] if `key` is absent; the table is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_index::HashTable;
    /// # use slot_index::LookupError;
    /// #
    /// let mut table = HashTable::with_capacity(10).unwrap();
    /// table.insert(3, 0).unwrap();
    /// table.insert(13, 1).unwrap();
    ///
    /// assert_eq!(table.delete(3), Ok(0));
    /// assert_eq!(table.delete(3), Err(LookupError::NotFound));
    ///
    /// // 13 was probed past slot 3 and is still reachable.
    /// assert_eq!(table.search(13), Ok(1));
    /// ```
    pub fn delete(&mut self, key: Key) -> Result<Value, LookupError> {
        self.delete_observed(key, &mut NoObserver)
    }

    /// [`delete`](Self::delete), reporting every visited slot to `observer`.
    pub fn delete_observed<O: ProbeObserver>(
        &mut self,
        key: Key,
        observer: &mut O,
    ) -> Result<Value, LookupError> {
        let (index, value) = self
            .locate(key, Operation::Delete, observer)
            .map_err(|_| LookupError::NotFound)?;

        self.slots[index] = Slot::Deleted;
        self.populated -= 1;
        self.tombstones += 1;

        Ok(value)
    }

    /// Resets every slot to empty. Capacity is kept.
    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
        self.populated = 0;
        self.tombstones = 0;
    }

    /// Returns an iterator over live `(key, value)` pairs in slot order.
    ///
    /// Slot order depends on capacity, probe strategy and insertion history;
    /// callers should not rely on it.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Builds a new table of `capacity` slots holding every live entry of
    /// this one. Tombstones are not carried over.
    ///
    /// # Errors
    ///
    /// - [`InsertError::Full`] if `capacity` is zero or smaller than
    ///   [`len`](Self::len).
    /// - [`InsertError::AllocationFailure`] if the new slot store cannot be
    ///   allocated.
    /// - [`InsertError::ProbeExhausted`] if a non-linear strategy cannot
    ///   place an entry in the new table.
    pub fn rebuilt(&self, capacity: usize) -> Result<Self, InsertError> {
        if capacity < self.populated.max(1) {
            return Err(InsertError::Full);
        }

        let mut table = Self::with_capacity_and_probe(capacity, self.probe.clone())?;
        for (key, value) in self.iter() {
            table.insert(key, value)?;
        }

        Ok(table)
    }

    /// Walks the probe sequence of `key` until it finds the key, an empty
    /// slot, or the end of the sequence.
    fn locate<O: ProbeObserver>(
        &self,
        key: Key,
        operation: Operation,
        observer: &mut O,
    ) -> Result<(usize, Value), LookupError> {
        for (attempt, index) in self.probe_sequence(key).enumerate() {
            let slot = self.slots[index];
            observer.observe(ProbeStep {
                operation,
                key,
                attempt,
                slot: index,
                state: slot.state(),
            });

            match slot {
                Slot::Empty if attempt == 0 => return Err(LookupError::Empty),
                Slot::Empty => return Err(LookupError::NotFound),
                Slot::Live {
                    key: existing,
                    value,
                } if existing == key => return Ok((index, value)),
                Slot::Live { .. } | Slot::Deleted => {}
            }
        }

        Err(LookupError::NotFound)
    }
}

impl<'a, P: Probe> IntoIterator for &'a HashTable<P> {
    type Item = (Key, Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the live entries of a [`HashTable`].
pub struct Iter<'a> {
    slots: core::slice::Iter<'a, Slot>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = (Key, Value);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Slot::Live { key, value } = *slot {
                self.remaining -= 1;
                return Some((key, value));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}
