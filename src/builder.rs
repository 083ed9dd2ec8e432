use crate::error::CreateError;
use crate::growable::GrowableTable;
use crate::hash_table::HashTable;
use crate::probe::LinearProbe;
use crate::probe::Probe;

/// Load factor a [`GrowableTable`] stays below unless configured otherwise.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.7;

/// Smallest accepted `max_load_factor`. Below it a growable table would need
/// more than ten slots per entry.
pub const MIN_MAX_LOAD_FACTOR: f64 = 0.1;

/// Fraction of tombstones that makes a [`GrowableTable`] rebuild in place
/// unless configured otherwise.
pub const DEFAULT_TOMBSTONE_THRESHOLD: f64 = 0.2;

/// Configures and builds tables.
///
/// # Examples
///
/// ```rust
/// # use slot_index::TableBuilder;
/// # use slot_index::probe::QuadraticProbe;
/// #
/// let table = TableBuilder::new(64).probe(QuadraticProbe).build().unwrap();
/// assert_eq!(table.capacity(), 64);
///
/// let growable = TableBuilder::new(8)
///     .max_load_factor(0.5)
///     .build_growable()
///     .unwrap();
/// assert_eq!(growable.max_load_factor(), 0.5);
/// ```
#[derive(Clone, Debug)]
pub struct TableBuilder<P = LinearProbe> {
    capacity: usize,
    probe: P,
    max_load_factor: f64,
    tombstone_threshold: f64,
}

impl TableBuilder<LinearProbe> {
    /// Starts a linear probing configuration with `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            probe: LinearProbe,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            tombstone_threshold: DEFAULT_TOMBSTONE_THRESHOLD,
        }
    }
}

impl<P: Probe> TableBuilder<P> {
    /// Sets the number of slots. For a growable table this is the initial
    /// capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Replaces the collision resolution strategy.
    pub fn probe<Q: Probe>(self, probe: Q) -> TableBuilder<Q> {
        TableBuilder {
            capacity: self.capacity,
            probe,
            max_load_factor: self.max_load_factor,
            tombstone_threshold: self.tombstone_threshold,
        }
    }

    /// Load factor a growable table grows to stay below. Must be in
    /// `[MIN_MAX_LOAD_FACTOR, 1]`.
    pub fn max_load_factor(mut self, load_factor: f64) -> Self {
        self.max_load_factor = load_factor;
        self
    }

    /// Tombstone fraction past which a growable table rebuilds at the same
    /// capacity. Must be in `[0, 1)`.
    pub fn tombstone_threshold(mut self, ratio: f64) -> Self {
        self.tombstone_threshold = ratio;
        self
    }

    /// Builds a fixed-capacity table. Growth thresholds are not used.
    pub fn build(self) -> Result<HashTable<P>, CreateError> {
        HashTable::with_capacity_and_probe(self.capacity, self.probe)
    }

    /// Builds a table that grows past its initial capacity.
    ///
    /// Fails with [`CreateError::InvalidThreshold`] if either threshold is
    /// out of range, in addition to the failures of [`build`](Self::build).
    pub fn build_growable(self) -> Result<GrowableTable<P>, CreateError> {
        if !(self.max_load_factor >= MIN_MAX_LOAD_FACTOR && self.max_load_factor <= 1.0) {
            return Err(CreateError::InvalidThreshold);
        }
        if !(self.tombstone_threshold >= 0.0 && self.tombstone_threshold < 1.0) {
            return Err(CreateError::InvalidThreshold);
        }

        let max_load_factor = self.max_load_factor;
        let tombstone_threshold = self.tombstone_threshold;
        Ok(GrowableTable::from_parts(
            self.build()?,
            max_load_factor,
            tombstone_threshold,
        ))
    }
}
