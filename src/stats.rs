//! Probe-length statistics for tuning capacity and probe strategy.
//!
//! Available with the `stats` feature (and always under `cfg(test)`). The
//! `print` helpers additionally require `std`.

use alloc::vec;
use alloc::vec::Vec;

use crate::hash_table::HashTable;
use crate::hash_table::Slot;
use crate::probe::Probe;

/// Number of live entries at each probe distance.
///
/// Index `d` counts the entries stored `d` steps along their probe sequence;
/// index `0` counts entries sitting in their home slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    bins: Vec<usize>,
}

impl ProbeHistogram {
    /// Entry counts per probe distance.
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    /// Total number of entries counted.
    pub fn total(&self) -> usize {
        self.bins.iter().sum()
    }

    /// Largest probe distance of any entry, or `None` for an empty table.
    pub fn max_distance(&self) -> Option<usize> {
        self.bins.iter().rposition(|&count| count != 0)
    }

    /// Mean probe distance over all entries, `0.0` for an empty table.
    pub fn mean_distance(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }

        let weighted: usize = self
            .bins
            .iter()
            .enumerate()
            .map(|(distance, count)| distance * count)
            .sum();
        weighted as f64 / total as f64
    }

    /// Pretty-prints the histogram as a horizontal bar chart on stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", self.total());

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            let partial = match units % 8 {
                1 => Some('▏'),
                2 => Some('▎'),
                3 => Some('▍'),
                4 => Some('▌'),
                5 => Some('▋'),
                6 => Some('▊'),
                7 => Some('▉'),
                _ => None,
            };
            bar.extend(partial);
            bar
        };

        let width = self.bins.len().saturating_sub(1).to_string().len().max(2);
        for (distance, &count) in self.bins.iter().enumerate() {
            println!("{distance:>width$} | {} ({count})", make_bar(count));
        }
    }
}

/// Occupancy and probe statistics for a table.
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live entries.
    pub populated: usize,
    /// Number of slots.
    pub capacity: usize,
    /// Number of tombstones.
    pub tombstones: usize,
    /// Number of never-occupied slots.
    pub empty_slots: usize,
    /// Load factor (populated / capacity).
    pub load_factor: f64,
    /// Longest probe distance of any live entry.
    pub max_probe_distance: usize,
    /// Mean probe distance of live entries.
    pub mean_probe_distance: f64,
    /// Bytes used by the slot store.
    pub total_bytes: usize,
}

impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Slot Index Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slots: {} live, {} tombstones, {} empty",
            self.populated, self.tombstones, self.empty_slots
        );
        println!(
            "Probe distance: max {}, mean {:.3}",
            self.max_probe_distance, self.mean_probe_distance
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

impl<P: Probe> HashTable<P> {
    /// Computes how far each live entry sits along its own probe sequence.
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut bins = vec![0usize; 1];

        for (index, slot) in self.slots().iter().enumerate() {
            let Slot::Live { key, .. } = *slot else {
                continue;
            };

            let distance = self
                .probe_sequence(key)
                .position(|candidate| candidate == index)
                .unwrap_or(self.capacity());
            if bins.len() <= distance {
                bins.resize(distance + 1, 0);
            }
            bins[distance] += 1;
        }

        ProbeHistogram { bins }
    }

    /// Returns occupancy and probe statistics for debugging.
    pub fn debug_stats(&self) -> DebugStats {
        let histogram = self.probe_histogram();
        let empty_slots = self
            .slots()
            .iter()
            .filter(|slot| **slot == Slot::Empty)
            .count();

        DebugStats {
            populated: self.len(),
            capacity: self.capacity(),
            tombstones: self.tombstones(),
            empty_slots,
            load_factor: self.load_factor(),
            max_probe_distance: histogram.max_distance().unwrap_or(0),
            mean_probe_distance: histogram.mean_distance(),
            total_bytes: core::mem::size_of_val(self.slots()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_probe_distances() {
        let mut table = HashTable::with_capacity(10).unwrap();
        for key in [3u64, 13, 23, 5] {
            table.insert(key, 0).unwrap();
        }

        // 3 -> slot 3, 13 -> slot 4, 23 -> slot 5, 5 -> home 5 taken -> slot 6
        let histogram = table.probe_histogram();
        assert_eq!(histogram.bins(), [1, 2, 1]);
        assert_eq!(histogram.total(), 4);
        assert_eq!(histogram.max_distance(), Some(2));
        assert_eq!(histogram.mean_distance(), 1.0);
    }

    #[test]
    fn histogram_of_empty_table() {
        let table = HashTable::with_capacity(4).unwrap();
        let histogram = table.probe_histogram();
        assert_eq!(histogram.total(), 0);
        assert_eq!(histogram.max_distance(), None);
        assert_eq!(histogram.mean_distance(), 0.0);
    }

    #[test]
    fn debug_stats_reports_occupancy() {
        let mut table = HashTable::with_capacity(8).unwrap();
        for key in 0..4u64 {
            table.insert(key * 8, key as usize).unwrap();
        }
        table.delete(0).unwrap();

        let stats = table.debug_stats();
        assert_eq!(stats.populated, 3);
        assert_eq!(stats.capacity, 8);
        assert_eq!(stats.tombstones, 1);
        assert_eq!(stats.empty_slots, 4);
        assert_eq!(stats.load_factor, 3.0 / 8.0);
        assert_eq!(stats.max_probe_distance, 3);
        assert_eq!(stats.mean_probe_distance, 2.0);
        assert_eq!(stats.total_bytes, 8 * core::mem::size_of::<Slot>());
    }

    #[cfg(feature = "std")]
    #[test]
    fn print_does_not_panic() {
        let mut table = HashTable::with_capacity(16).unwrap();
        for key in 0..12u64 {
            table.insert(key * 3, 0).unwrap();
        }
        table.probe_histogram().print();
        table.debug_stats().print();
        HashTable::with_capacity(1).unwrap().probe_histogram().print();
    }
}
