//! Live progress counters updated concurrently by worker threads.
//!
//! [`Progress`] holds one atomic slot per [`ProgressSnapshot`] field. Any
//! number of threads may call [`increment`](Progress::increment)
//! concurrently; a reporting path periodically calls
//! [`snapshot`](Progress::snapshot) or
//! [`snapshot_and_reset`](Progress::snapshot_and_reset) to ship the
//! accumulated values to a client.
//!
//! # Consistency contract
//!
//! Every operation here is *piecewise* atomic: each individual field is
//! updated, read, or drained with a single atomic instruction, but no
//! operation covers all seventeen fields as one transaction. Increments
//! concurrent with a drain may land in either the drained result or the
//! post-reset state, independently per field. Progress reporting tolerates
//! this (the counters are eventually consistent, and every increment is
//! counted exactly once per field); callers that need a consistent
//! cross-field cut must quiesce the writers first.
//!
//! All atomics use `Ordering::Relaxed`: the counters carry no cross-field
//! causal dependency that a consumer relies on synchronously, so nothing
//! stronger is bought by acquire/release.
//!
//! # Sharing
//!
//! The executing query context owns one `Progress` per query; worker
//! threads hold a shared reference (typically through `Arc`) for the
//! duration of their work:
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//!
//! use progresso::progress::Progress;
//! use progresso::snapshot::ReadProgress;
//!
//! let progress = Arc::new(Progress::new());
//! let mut handles = vec![];
//!
//! for _ in 0..4 {
//!     let p = Arc::clone(&progress);
//!     handles.push(thread::spawn(move || {
//!         for _ in 0..1000 {
//!             p.increment(ReadProgress::new(1, 100));
//!         }
//!     }));
//! }
//!
//! for h in handles {
//!     h.join().unwrap();
//! }
//!
//! let values = progress.snapshot_and_reset();
//! assert_eq!(values.read_rows, 4000);
//! assert_eq!(values.read_bytes, 400_000);
//! assert!(progress.snapshot().is_empty());
//! ```

use std::fmt::Debug;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

use crate::snapshot::{ProgressSnapshot, FIELD_COUNT};

/// The concurrently-mutated progress counter set.
///
/// Each field lives in its own [`CachePadded`] slot. Different pipeline
/// stages bump disjoint field subsets (sources bump `read_*`, sinks bump
/// `written_*`), so per-field cache-line padding keeps their increments
/// from invalidating each other's cache lines.
///
/// The counters wrap on overflow per fixed-width unsigned arithmetic,
/// matching the wire format's width; overflow is not checked or reported.
pub struct Progress {
    read_rows: CachePadded<AtomicU64>,
    read_bytes: CachePadded<AtomicU64>,
    read_compressed_bytes: CachePadded<AtomicU64>,
    os_read_bytes: CachePadded<AtomicU64>,
    read_decompressed_blocks: CachePadded<AtomicU64>,
    read_decompressed_bytes: CachePadded<AtomicU64>,
    selected_bytes: CachePadded<AtomicU64>,
    selected_marks: CachePadded<AtomicU64>,
    selected_rows: CachePadded<AtomicU64>,
    selected_parts: CachePadded<AtomicU64>,
    total_rows_to_read: CachePadded<AtomicU64>,
    total_bytes_to_read: CachePadded<AtomicU64>,
    written_rows: CachePadded<AtomicU64>,
    written_bytes: CachePadded<AtomicU64>,
    result_rows: CachePadded<AtomicU64>,
    result_bytes: CachePadded<AtomicU64>,
    elapsed_ns: CachePadded<AtomicU64>,
}

impl Progress {
    /// Creates a counter set with every field zero.
    pub const fn new() -> Self {
        const ZERO: CachePadded<AtomicU64> = CachePadded::new(AtomicU64::new(0));
        Progress {
            read_rows: ZERO,
            read_bytes: ZERO,
            read_compressed_bytes: ZERO,
            os_read_bytes: ZERO,
            read_decompressed_blocks: ZERO,
            read_decompressed_bytes: ZERO,
            selected_bytes: ZERO,
            selected_marks: ZERO,
            selected_rows: ZERO,
            selected_parts: ZERO,
            total_rows_to_read: ZERO,
            total_bytes_to_read: ZERO,
            written_rows: ZERO,
            written_bytes: ZERO,
            result_rows: ZERO,
            result_bytes: ZERO,
            elapsed_ns: ZERO,
        }
    }

    /// Slots in struct declaration order.
    ///
    /// Must stay in sync with `ProgressSnapshot::to_array`; the field-wise
    /// loops below rely on the two orders matching.
    fn slots(&self) -> [&AtomicU64; FIELD_COUNT] {
        [
            &self.read_rows,
            &self.read_bytes,
            &self.read_compressed_bytes,
            &self.os_read_bytes,
            &self.read_decompressed_blocks,
            &self.read_decompressed_bytes,
            &self.selected_bytes,
            &self.selected_marks,
            &self.selected_rows,
            &self.selected_parts,
            &self.total_rows_to_read,
            &self.total_bytes_to_read,
            &self.written_rows,
            &self.written_bytes,
            &self.result_rows,
            &self.result_bytes,
            &self.elapsed_ns,
        ]
    }

    /// Adds each field of `delta` to the corresponding counter.
    ///
    /// Returns `true` if the delta carries row-level progress worth
    /// notifying a client about, i.e. `delta.read_rows != 0 ||
    /// delta.written_rows != 0`.
    ///
    /// Each field is added with its own relaxed `fetch_add`; there is no
    /// ordering guarantee between fields (see the module docs).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progresso::progress::Progress;
    /// use progresso::snapshot::{ReadProgress, WriteProgress};
    ///
    /// let progress = Progress::new();
    /// assert!(progress.increment(ReadProgress::new(100, 5000)));
    /// assert!(progress.increment(WriteProgress::new(3, 96)));
    /// assert!(!progress.increment(ReadProgress::new(0, 512)));
    /// ```
    #[inline]
    pub fn increment(&self, delta: impl Into<ProgressSnapshot>) -> bool {
        let delta = delta.into();
        for (slot, value) in self.slots().into_iter().zip(delta.to_array()) {
            slot.fetch_add(value, Ordering::Relaxed);
        }
        delta.read_rows != 0 || delta.written_rows != 0
    }

    /// Sets every counter back to zero.
    ///
    /// Each field is reset independently. Intended for reusing an instance
    /// between queries; callers must make sure no increments are in flight,
    /// or concurrent updates may be lost.
    pub fn reset(&self) {
        for slot in self.slots() {
            slot.store(0, Ordering::Relaxed);
        }
    }

    /// Copies the current counter values into a [`ProgressSnapshot`]
    /// without modifying live state.
    ///
    /// Each field is exact at the instant of its own relaxed load; under
    /// concurrent increments the snapshot is not one consistent cut across
    /// fields (see the module docs).
    #[inline]
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::from_array(self.slots().map(|slot| slot.load(Ordering::Relaxed)))
    }

    /// Drains the counters: atomically exchanges each field with zero and
    /// returns the values exchanged out.
    ///
    /// Per field, no concurrent increment is lost or double-counted: an
    /// increment lands either in the returned snapshot or in the zeroed
    /// counter. Across fields the drain is not one transaction; increments
    /// straddling the call may split between the two, independently per
    /// field.
    #[inline]
    pub fn snapshot_and_reset(&self) -> ProgressSnapshot {
        ProgressSnapshot::from_array(self.slots().map(|slot| slot.swap(0, Ordering::Relaxed)))
    }

    /// Drains the counters into a fresh live instance.
    ///
    /// Same exchange as [`snapshot_and_reset`](Self::snapshot_and_reset),
    /// but the drained values come back pre-loaded into a new `Progress`,
    /// ready to keep accumulating.
    pub fn take(&self) -> Progress {
        let drained = Progress::new();
        for (dst, src) in drained.slots().into_iter().zip(self.slots()) {
            dst.store(src.swap(0, Ordering::Relaxed), Ordering::Relaxed);
        }
        drained
    }

    /// Replaces this instance's values with `other`'s, field by field.
    ///
    /// Each field is a relaxed load from `other` followed by a relaxed
    /// store into `self`; the transfer is not atomic across fields and not
    /// a swap. Used to move accumulated progress between owners at scope
    /// boundaries. Callers must quiesce mutation of `other` for the
    /// duration, or accept the piecewise caveat.
    pub fn assign(&self, other: &Progress) {
        for (dst, src) in self.slots().into_iter().zip(other.slots()) {
            dst.store(src.load(Ordering::Relaxed), Ordering::Relaxed);
        }
    }

    /// Decodes counter values from `reader` and stores them into the live
    /// counters.
    ///
    /// Decodes a fresh [`ProgressSnapshot`] at `peer_revision` (see
    /// [`crate::wire`]) and relaxed-stores every field, so fields the peer
    /// did not transmit are stored as zero.
    pub fn read_from<R: Read>(&self, reader: &mut R, peer_revision: u64) -> io::Result<()> {
        let values = ProgressSnapshot::decode(reader, peer_revision)?;
        for (slot, value) in self.slots().into_iter().zip(values.to_array()) {
            slot.store(value, Ordering::Relaxed);
        }
        Ok(())
    }

    /// Encodes the current counter values to `writer`.
    ///
    /// Takes a [`snapshot`](Self::snapshot) and encodes it at
    /// `peer_revision` (see [`crate::wire`]).
    pub fn write_to<W: Write>(&self, writer: &mut W, peer_revision: u64) -> io::Result<()> {
        self.snapshot().encode(writer, peer_revision)
    }

    /// Renders the current counter values as the JSON text record
    /// (see [`crate::render`]).
    pub fn write_json<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.snapshot().write_json(writer)
    }
}

impl Default for Progress {
    /// Creates a counter set with every field zero.
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Progress {
    /// Renders the current snapshot.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Progress").field(&self.snapshot()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{ReadProgress, WriteProgress};

    #[test]
    fn test_new_is_all_zero() {
        let progress = Progress::new();
        assert!(progress.snapshot().is_empty());
    }

    #[test]
    fn test_increment_accumulates() {
        let progress = Progress::new();
        progress.increment(ProgressSnapshot {
            read_rows: 100,
            read_bytes: 5000,
            ..Default::default()
        });
        let returned = progress.increment(ProgressSnapshot {
            read_rows: 50,
            written_rows: 3,
            ..Default::default()
        });
        assert!(returned);

        let drained = progress.snapshot_and_reset();
        assert_eq!(
            drained,
            ProgressSnapshot {
                read_rows: 150,
                read_bytes: 5000,
                written_rows: 3,
                ..Default::default()
            }
        );
        assert!(progress.snapshot().is_empty());
    }

    #[test]
    fn test_increment_return_value() {
        let progress = Progress::new();
        assert!(!progress.increment(ProgressSnapshot::new()));
        assert!(!progress.increment(ProgressSnapshot {
            read_bytes: 1024,
            selected_rows: 10,
            elapsed_ns: 99,
            ..Default::default()
        }));
        assert!(progress.increment(ReadProgress::new(1, 0)));
        assert!(progress.increment(WriteProgress::new(1, 0)));
    }

    #[test]
    fn test_increment_wraps_on_overflow() {
        let progress = Progress::new();
        progress.increment(ProgressSnapshot {
            read_rows: u64::MAX,
            ..Default::default()
        });
        progress.increment(ReadProgress::new(2, 0));
        assert_eq!(progress.snapshot().read_rows, 1);
    }

    #[test]
    fn test_reset() {
        let progress = Progress::new();
        progress.increment(ReadProgress::new(10, 20));
        progress.increment(WriteProgress::new(30, 40));
        progress.reset();
        assert_eq!(progress.snapshot(), ProgressSnapshot::new());
    }

    #[test]
    fn test_snapshot_does_not_modify() {
        let progress = Progress::new();
        progress.increment(ReadProgress::new(5, 50));
        assert_eq!(progress.snapshot().read_rows, 5);
        assert_eq!(progress.snapshot().read_rows, 5);
    }

    #[test]
    fn test_snapshot_and_reset_covers_every_field() {
        let progress = Progress::new();
        let mut values = [0u64; FIELD_COUNT];
        for (i, v) in values.iter_mut().enumerate() {
            *v = i as u64 + 1;
        }
        let full = ProgressSnapshot::from_array(values);
        progress.increment(full);

        assert_eq!(progress.snapshot_and_reset(), full);
        assert!(progress.snapshot().is_empty());
    }

    #[test]
    fn test_take() {
        let progress = Progress::new();
        progress.increment(ReadProgress::new(7, 700));

        let drained = progress.take();
        assert_eq!(drained.snapshot().read_rows, 7);
        assert_eq!(drained.snapshot().read_bytes, 700);
        assert!(progress.snapshot().is_empty());

        // The drained instance is live and keeps accumulating.
        drained.increment(ReadProgress::new(3, 300));
        assert_eq!(drained.snapshot().read_rows, 10);
    }

    #[test]
    fn test_assign() {
        let source = Progress::new();
        source.increment(ReadProgress::new(11, 1100));
        source.increment(WriteProgress::new(2, 64));

        let target = Progress::new();
        target.increment(ReadProgress::new(999, 999));
        target.assign(&source);

        assert_eq!(target.snapshot(), source.snapshot());
        // Not a swap: the source keeps its values.
        assert_eq!(source.snapshot().read_rows, 11);
    }

    #[test]
    fn test_concurrent_increments_then_drain() {
        use std::sync::Arc;
        use std::thread;

        const THREADS: usize = 8;
        const ITERATIONS: usize = 10_000;

        let progress = Arc::new(Progress::new());
        let mut handles = vec![];

        for t in 0..THREADS {
            let p = Arc::clone(&progress);
            handles.push(thread::spawn(move || {
                for _ in 0..ITERATIONS {
                    if t % 2 == 0 {
                        p.increment(ReadProgress::new(1, 10));
                    } else {
                        p.increment(WriteProgress::new(1, 10));
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let expected = (THREADS / 2 * ITERATIONS) as u64;
        let drained = progress.snapshot_and_reset();
        assert_eq!(drained.read_rows, expected);
        assert_eq!(drained.read_bytes, expected * 10);
        assert_eq!(drained.written_rows, expected);
        assert_eq!(drained.written_bytes, expected * 10);
        assert!(progress.snapshot().is_empty());
    }

    #[test]
    fn test_concurrent_drains_lose_nothing() {
        use std::sync::Arc;
        use std::thread;

        const THREADS: usize = 4;
        const ITERATIONS: usize = 10_000;

        let progress = Arc::new(Progress::new());
        let mut handles = vec![];

        for _ in 0..THREADS {
            let p = Arc::clone(&progress);
            handles.push(thread::spawn(move || {
                for _ in 0..ITERATIONS {
                    p.increment(ReadProgress::new(1, 1));
                }
            }));
        }

        // Drain concurrently with the increments; per field, every
        // increment lands either in a drained snapshot or in the final
        // residue, never in both.
        let mut drained_total = 0u64;
        for _ in 0..100 {
            drained_total += progress.snapshot_and_reset().read_rows;
        }

        for handle in handles {
            handle.join().unwrap();
        }

        drained_total += progress.snapshot_and_reset().read_rows;
        assert_eq!(drained_total, (THREADS * ITERATIONS) as u64);
    }

    #[test]
    fn test_debug_renders_snapshot() {
        let progress = Progress::new();
        progress.increment(ReadProgress::new(21, 0));
        let rendered = format!("{progress:?}");
        assert!(rendered.starts_with("Progress("));
        assert!(rendered.contains("read_rows: 21"));
    }
}
