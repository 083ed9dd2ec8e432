use crate::Key;
use crate::Value;
use crate::builder::TableBuilder;
use crate::error::CreateError;
use crate::error::InsertError;
use crate::error::LookupError;
use crate::hash_table::HashTable;
use crate::hash_table::Iter;
use crate::probe::LinearProbe;
use crate::probe::Probe;

/// A [`HashTable`] that is rebuilt into a larger one instead of filling up.
///
/// Before an insertion would bring the load factor to `max_load_factor` or
/// beyond, every live entry is re-inserted into a table of double the
/// capacity. When tombstones exceed `tombstone_threshold` of the capacity the
/// table is rebuilt at its current capacity to clear them. The inner table
/// itself never resizes; growth always replaces it wholesale.
///
/// Rebuilding moves entries, so the slot returned by
/// [`insert`](Self::insert) is only valid until the next insertion.
///
/// # Examples
///
/// ```rust
/// use slot_index::GrowableTable;
///
/// let mut table = GrowableTable::with_capacity(2).unwrap();
/// for key in 0..100 {
///     table.insert(key, key as usize).unwrap();
/// }
///
/// assert_eq!(table.len(), 100);
/// assert!(table.load_factor() < 0.7);
/// assert_eq!(table.search(42), Ok(42));
/// ```
#[derive(Clone, Debug)]
pub struct GrowableTable<P = LinearProbe> {
    table: HashTable<P>,
    max_load_factor: f64,
    tombstone_threshold: f64,
}

impl GrowableTable<LinearProbe> {
    /// Creates a linear probing table with the default thresholds and
    /// `capacity` initial slots.
    pub fn with_capacity(capacity: usize) -> Result<Self, CreateError> {
        TableBuilder::new(capacity).build_growable()
    }
}

impl<P: Probe> GrowableTable<P> {
    pub(crate) fn from_parts(
        table: HashTable<P>,
        max_load_factor: f64,
        tombstone_threshold: f64,
    ) -> Self {
        Self {
            table,
            max_load_factor,
            tombstone_threshold,
        }
    }

    /// The current fixed-capacity table.
    pub fn as_table(&self) -> &HashTable<P> {
        &self.table
    }

    /// Unwraps the current fixed-capacity table.
    pub fn into_inner(self) -> HashTable<P> {
        self.table
    }

    /// Load factor the table stays below.
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Tombstone fraction that triggers an in-place rebuild.
    pub fn tombstone_threshold(&self) -> f64 {
        self.tombstone_threshold
    }

    /// Number of slots in the current table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the table holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Ratio of live entries to current capacity.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Binds `key` to `value`, growing first if needed, and returns the slot
    /// the key occupies in the current table.
    ///
    /// # Errors
    ///
    /// - [`InsertError::DuplicateKey`] if `key` is already present.
    /// - [`InsertError::AllocationFailure`] if a larger table is needed and
    ///   cannot be allocated.
    ///
    /// Never returns [`InsertError::Full`].
    pub fn insert(&mut self, key: Key, value: Value) -> Result<usize, InsertError> {
        if self.table.contains_key(key) {
            return Err(InsertError::DuplicateKey);
        }

        self.reserve_one()?;
        loop {
            match self.table.insert(key, value) {
                Err(InsertError::ProbeExhausted) => {
                    let capacity = self.doubled(self.table.capacity())?;
                    self.rebuild(capacity)?;
                }
                result => return result,
            }
        }
    }

    /// Returns the value bound to `key`. See [`HashTable::search`].
    pub fn search(&self, key: Key) -> Result<Value, LookupError> {
        self.table.search(key)
    }

    /// Returns `true` if `key` is bound in the table.
    pub fn contains_key(&self, key: Key) -> bool {
        self.table.contains_key(key)
    }

    /// Unbinds `key` and returns its value. See [`HashTable::delete`].
    pub fn delete(&mut self, key: Key) -> Result<Value, LookupError> {
        self.table.delete(key)
    }

    /// Removes every entry, keeping the current capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over live `(key, value)` pairs.
    pub fn iter(&self) -> Iter<'_> {
        self.table.iter()
    }

    /// Makes room for one more entry without reaching the load factor limit.
    fn reserve_one(&mut self) -> Result<(), InsertError> {
        let capacity = self.table.capacity();
        let required = self.table.len() + 1;

        let mut target = capacity;
        // Same division as `HashTable::load_factor` so the bound holds exactly.
        while required as f64 / target as f64 >= self.max_load_factor {
            target = self.doubled(target)?;
        }

        if target != capacity
            || self.table.tombstones() as f64 > self.tombstone_threshold * capacity as f64
        {
            self.rebuild(target)?;
        }

        Ok(())
    }

    /// Replaces the inner table with a rebuilt one of at least `capacity`
    /// slots, doubling further if the probe strategy cannot place an entry.
    fn rebuild(&mut self, mut capacity: usize) -> Result<(), InsertError> {
        loop {
            match self.table.rebuilt(capacity) {
                Ok(table) => {
                    self.table = table;
                    return Ok(());
                }
                Err(InsertError::ProbeExhausted) => capacity = self.doubled(capacity)?,
                Err(err) => return Err(err),
            }
        }
    }

    fn doubled(&self, capacity: usize) -> Result<usize, InsertError> {
        capacity
            .checked_mul(2)
            .ok_or(InsertError::AllocationFailure)
    }
}

impl<'a, P: Probe> IntoIterator for &'a GrowableTable<P> {
    type Item = (Key, Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::probe::QuadraticProbe;

    #[test]
    fn grows_instead_of_filling() {
        let mut table = GrowableTable::with_capacity(1).unwrap();
        for key in 0..1000u64 {
            table.insert(key * 7, key as usize).unwrap();
            assert!(table.load_factor() < 0.7, "{:?}", table.as_table());
        }

        assert_eq!(table.len(), 1000);
        for key in 0..1000u64 {
            assert_eq!(table.search(key * 7), Ok(key as usize));
        }
    }

    #[test]
    fn capacity_doubles() {
        let mut table = GrowableTable::with_capacity(10).unwrap();
        for key in 0..6u64 {
            table.insert(key, 0).unwrap();
        }
        assert_eq!(table.capacity(), 10);

        // The seventh entry would reach 0.7.
        table.insert(6, 0).unwrap();
        assert_eq!(table.capacity(), 20);
    }

    #[test]
    fn duplicate_does_not_grow() {
        let mut table = GrowableTable::with_capacity(10).unwrap();
        for key in 0..6u64 {
            table.insert(key, 0).unwrap();
        }
        assert_eq!(table.insert(3, 1), Err(InsertError::DuplicateKey));
        assert_eq!(table.capacity(), 10);
        assert_eq!(table.search(3), Ok(0));
    }

    #[test]
    fn tombstones_trigger_in_place_rebuild() {
        let mut table = TableBuilder::new(20)
            .tombstone_threshold(0.1)
            .build_growable()
            .unwrap();
        for key in 0..10u64 {
            table.insert(key, 0).unwrap();
        }
        for key in 0..3u64 {
            table.delete(key).unwrap();
        }
        assert_eq!(table.as_table().tombstones(), 3);

        table.insert(100, 1).unwrap();
        assert_eq!(table.capacity(), 20);
        assert_eq!(table.as_table().tombstones(), 0);
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn quadratic_probe_grows_past_exhaustion() {
        let mut table = TableBuilder::new(3)
            .probe(QuadraticProbe)
            .max_load_factor(1.0)
            .build_growable()
            .unwrap();
        for key in [0u64, 3, 6, 9, 12] {
            table.insert(key, key as usize).unwrap();
        }
        for key in [0u64, 3, 6, 9, 12] {
            assert_eq!(table.search(key), Ok(key as usize));
        }
    }

    #[test]
    fn into_inner_returns_table() {
        let mut table = GrowableTable::with_capacity(4).unwrap();
        table.insert(1, 1).unwrap();
        let inner = table.into_inner();
        assert_eq!(inner.search(1), Ok(1));
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn random_workload_matches_model() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut table = GrowableTable::with_capacity(3).unwrap();
        let mut model = BTreeMap::new();

        for step in 0..10_000usize {
            let key = rng.random_range(0..2_000u64);
            if rng.random_bool(0.6) {
                let result = table.insert(key, step);
                if model.contains_key(&key) {
                    assert_eq!(result, Err(InsertError::DuplicateKey));
                } else {
                    assert!(result.is_ok());
                    model.insert(key, step);
                }
            } else {
                assert_eq!(table.delete(key).ok(), model.remove(&key));
            }
            assert_eq!(table.len(), model.len());
            assert!(table.load_factor() < table.max_load_factor());
        }

        assert_eq!(table.iter().collect::<BTreeMap<_, _>>(), model);
        table.clear();
        assert!(table.is_empty());
    }
}
