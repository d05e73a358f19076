//! Snapshot value types for progress counters.
//!
//! A [`ProgressSnapshot`] is a plain copy of every counter at one instant:
//! no atomics, no sharing, just seventeen `u64` fields. It is what crosses
//! the wire (see [`crate::wire`]), what gets rendered for display (see
//! [`crate::render`]), and what worker threads hand to
//! [`Progress::increment`](crate::progress::Progress::increment) as a delta.
//!
//! [`ReadProgress`] and [`WriteProgress`] are shorthand aggregates for the
//! two producer sides of a query pipeline; both convert into a full
//! snapshot with every other field zero.
//!
//! # Examples
//!
//! ```rust
//! use progresso::snapshot::{ProgressSnapshot, ReadProgress};
//!
//! let delta: ProgressSnapshot = ReadProgress::new(100, 5000).into();
//! assert_eq!(delta.read_rows, 100);
//! assert_eq!(delta.read_bytes, 5000);
//! assert_eq!(delta.written_rows, 0);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of counter fields carried by a snapshot.
pub(crate) const FIELD_COUNT: usize = 17;

/// A point-in-time copy of all progress counters.
///
/// All fields are non-negative counts or durations and are only ever
/// increased, except by a full reset. `total_rows_to_read` and
/// `total_bytes_to_read` carry a monotonically revised estimate rather than
/// an accumulated count, but are stored and merged like every other field.
///
/// When taken from a live [`Progress`](crate::progress::Progress) under
/// concurrent increments, each field is exact at the instant of its own
/// read, but the snapshot as a whole is not one consistent cut across
/// fields. See the crate-level docs for the consistency contract.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProgressSnapshot {
    /// Rows read from storage.
    pub read_rows: u64,
    /// Uncompressed bytes read from storage.
    pub read_bytes: u64,
    /// Compressed bytes read from storage.
    pub read_compressed_bytes: u64,
    /// Bytes read from the OS (before decompression).
    pub os_read_bytes: u64,
    /// Blocks decompressed while reading.
    pub read_decompressed_blocks: u64,
    /// Bytes produced by decompression.
    pub read_decompressed_bytes: u64,
    /// Bytes selected for processing after pruning.
    pub selected_bytes: u64,
    /// Index marks selected for processing.
    pub selected_marks: u64,
    /// Rows selected for processing after pruning.
    pub selected_rows: u64,
    /// Data parts selected for processing.
    pub selected_parts: u64,
    /// Current estimate of the total rows the query will read.
    pub total_rows_to_read: u64,
    /// Current estimate of the total bytes the query will read.
    pub total_bytes_to_read: u64,
    /// Rows written out.
    pub written_rows: u64,
    /// Bytes written out.
    pub written_bytes: u64,
    /// Rows in the result set.
    pub result_rows: u64,
    /// Bytes in the result set.
    pub result_bytes: u64,
    /// Elapsed execution time, nanoseconds.
    pub elapsed_ns: u64,
}

impl ProgressSnapshot {
    /// Creates a snapshot with every field zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if every field is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progresso::snapshot::ProgressSnapshot;
    ///
    /// assert!(ProgressSnapshot::new().is_empty());
    /// assert!(!ProgressSnapshot { read_rows: 1, ..Default::default() }.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.to_array().iter().all(|&v| v == 0)
    }

    /// Field values in struct declaration order.
    ///
    /// The order must stay in sync with [`from_array`](Self::from_array)
    /// and `Progress::slots`; the wire and rendering orders are defined
    /// separately in their own modules.
    pub(crate) fn to_array(&self) -> [u64; FIELD_COUNT] {
        [
            self.read_rows,
            self.read_bytes,
            self.read_compressed_bytes,
            self.os_read_bytes,
            self.read_decompressed_blocks,
            self.read_decompressed_bytes,
            self.selected_bytes,
            self.selected_marks,
            self.selected_rows,
            self.selected_parts,
            self.total_rows_to_read,
            self.total_bytes_to_read,
            self.written_rows,
            self.written_bytes,
            self.result_rows,
            self.result_bytes,
            self.elapsed_ns,
        ]
    }

    /// Rebuilds a snapshot from values in struct declaration order.
    pub(crate) fn from_array(values: [u64; FIELD_COUNT]) -> Self {
        let [read_rows, read_bytes, read_compressed_bytes, os_read_bytes, read_decompressed_blocks, read_decompressed_bytes, selected_bytes, selected_marks, selected_rows, selected_parts, total_rows_to_read, total_bytes_to_read, written_rows, written_bytes, result_rows, result_bytes, elapsed_ns] =
            values;
        Self {
            read_rows,
            read_bytes,
            read_compressed_bytes,
            os_read_bytes,
            read_decompressed_blocks,
            read_decompressed_bytes,
            selected_bytes,
            selected_marks,
            selected_rows,
            selected_parts,
            total_rows_to_read,
            total_bytes_to_read,
            written_rows,
            written_bytes,
            result_rows,
            result_bytes,
            elapsed_ns,
        }
    }
}

/// Progress reported by the reading side of a pipeline.
///
/// Converts into a [`ProgressSnapshot`] with all other fields zero, so a
/// source thread can report without spelling out the full struct:
///
/// ```rust
/// use progresso::progress::Progress;
/// use progresso::snapshot::ReadProgress;
///
/// let progress = Progress::new();
/// progress.increment(ReadProgress::new(100, 5000));
/// assert_eq!(progress.snapshot().read_rows, 100);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadProgress {
    /// Rows read since the last report.
    pub read_rows: u64,
    /// Bytes read since the last report.
    pub read_bytes: u64,
    /// Revised estimate of total rows to read, or zero to leave it alone.
    pub total_rows_to_read: u64,
}

impl ReadProgress {
    /// Creates a read-side delta with no estimate revision.
    pub fn new(read_rows: u64, read_bytes: u64) -> Self {
        Self {
            read_rows,
            read_bytes,
            total_rows_to_read: 0,
        }
    }
}

impl From<ReadProgress> for ProgressSnapshot {
    fn from(read: ReadProgress) -> Self {
        Self {
            read_rows: read.read_rows,
            read_bytes: read.read_bytes,
            total_rows_to_read: read.total_rows_to_read,
            ..Default::default()
        }
    }
}

/// Progress reported by the writing side of a pipeline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteProgress {
    /// Rows written since the last report.
    pub written_rows: u64,
    /// Bytes written since the last report.
    pub written_bytes: u64,
}

impl WriteProgress {
    /// Creates a write-side delta.
    pub fn new(written_rows: u64, written_bytes: u64) -> Self {
        Self {
            written_rows,
            written_bytes,
        }
    }
}

impl From<WriteProgress> for ProgressSnapshot {
    fn from(write: WriteProgress) -> Self {
        Self {
            written_rows: write.written_rows,
            written_bytes: write.written_bytes,
            ..Default::default()
        }
    }
}
