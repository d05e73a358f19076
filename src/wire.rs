//! Revision-gated binary codec for progress snapshots.
//!
//! Progress crosses the wire as a bare sequence of LEB128 varints (see
//! [`crate::varint`]) in a fixed order, with no framing and no field tags.
//! Compatibility across client/server revisions is handled by *revision
//! gating*: the first eleven fields are always present, and every field
//! added since is appended at the end behind a minimum-revision threshold.
//! Both sides pass the revision of the *remote* peer, negotiated by the
//! surrounding protocol layer, so an old peer's stream is decoded with the
//! old peer's revision and the absent trailing fields simply keep their
//! zero defaults.
//!
//! The whole format is the `WIRE_FORMAT` table below: one ordered list of
//! `(min_revision, getter, setter)` entries walked identically by
//! [`ProgressSnapshot::encode`] and [`ProgressSnapshot::decode`], so the
//! two paths cannot disagree on thresholds or order. Appending a field is
//! one new table row behind a new `pub const` revision.
//!
//! The wire order is historical and differs from the struct's declaration
//! order (`read_bytes` travels tenth); it must never be reordered.
//! `total_bytes_to_read`, `result_rows`, and `result_bytes` are local-only
//! fields and never cross the wire.
//!
//! Stream failures (truncation, malformed varints) propagate unmodified as
//! [`std::io::Error`]; this module adds no error handling of its own.

use std::io::{self, Read, Write};

use crate::snapshot::ProgressSnapshot;
use crate::varint::{read_var_u64, write_var_u64};

/// First protocol revision whose progress packets carry
/// `written_rows` and `written_bytes`.
pub const REVISION_WITH_WRITE_INFO: u64 = 54420;

/// First protocol revision whose progress packets carry `elapsed_ns`.
pub const REVISION_WITH_QUERY_TIME_IN_PROGRESS: u64 = 54460;

/// One wire field: where it lives in a snapshot and the revision that
/// introduced it. `min_revision: 0` marks the unconditional core fields.
struct WireField {
    min_revision: u64,
    get: fn(&ProgressSnapshot) -> u64,
    set: fn(&mut ProgressSnapshot, u64),
}

/// The wire format, in transmission order. Append-only: new fields go at
/// the end, behind a new revision constant.
const WIRE_FORMAT: [WireField; 14] = [
    WireField {
        min_revision: 0,
        get: |v| v.read_rows,
        set: |v, x| v.read_rows = x,
    },
    WireField {
        min_revision: 0,
        get: |v| v.read_compressed_bytes,
        set: |v, x| v.read_compressed_bytes = x,
    },
    WireField {
        min_revision: 0,
        get: |v| v.os_read_bytes,
        set: |v, x| v.os_read_bytes = x,
    },
    WireField {
        min_revision: 0,
        get: |v| v.read_decompressed_blocks,
        set: |v, x| v.read_decompressed_blocks = x,
    },
    WireField {
        min_revision: 0,
        get: |v| v.read_decompressed_bytes,
        set: |v, x| v.read_decompressed_bytes = x,
    },
    WireField {
        min_revision: 0,
        get: |v| v.selected_bytes,
        set: |v, x| v.selected_bytes = x,
    },
    WireField {
        min_revision: 0,
        get: |v| v.selected_marks,
        set: |v, x| v.selected_marks = x,
    },
    WireField {
        min_revision: 0,
        get: |v| v.selected_rows,
        set: |v, x| v.selected_rows = x,
    },
    WireField {
        min_revision: 0,
        get: |v| v.selected_parts,
        set: |v, x| v.selected_parts = x,
    },
    WireField {
        min_revision: 0,
        get: |v| v.read_bytes,
        set: |v, x| v.read_bytes = x,
    },
    WireField {
        min_revision: 0,
        get: |v| v.total_rows_to_read,
        set: |v, x| v.total_rows_to_read = x,
    },
    WireField {
        min_revision: REVISION_WITH_WRITE_INFO,
        get: |v| v.written_rows,
        set: |v, x| v.written_rows = x,
    },
    WireField {
        min_revision: REVISION_WITH_WRITE_INFO,
        get: |v| v.written_bytes,
        set: |v, x| v.written_bytes = x,
    },
    WireField {
        min_revision: REVISION_WITH_QUERY_TIME_IN_PROGRESS,
        get: |v| v.elapsed_ns,
        set: |v, x| v.elapsed_ns = x,
    },
];

impl ProgressSnapshot {
    /// Encodes this snapshot to `writer` for a peer at `peer_revision`.
    ///
    /// Writes the fields of `WIRE_FORMAT` in order, skipping those the
    /// peer's revision predates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progresso::snapshot::ProgressSnapshot;
    /// use progresso::wire::REVISION_WITH_QUERY_TIME_IN_PROGRESS;
    ///
    /// let values = ProgressSnapshot { read_rows: 7, ..Default::default() };
    /// let mut buf = Vec::new();
    /// values.encode(&mut buf, REVISION_WITH_QUERY_TIME_IN_PROGRESS).unwrap();
    ///
    /// let decoded =
    ///     ProgressSnapshot::decode(&mut buf.as_slice(), REVISION_WITH_QUERY_TIME_IN_PROGRESS)
    ///         .unwrap();
    /// assert_eq!(decoded.read_rows, 7);
    /// ```
    pub fn encode<W: Write>(&self, writer: &mut W, peer_revision: u64) -> io::Result<()> {
        for field in &WIRE_FORMAT {
            if peer_revision >= field.min_revision {
                write_var_u64((field.get)(self), writer)?;
            }
        }
        Ok(())
    }

    /// Decodes a snapshot from `reader` sent by a peer at `peer_revision`.
    ///
    /// Reads the fields of `WIRE_FORMAT` in order, skipping those the
    /// peer's revision predates; skipped fields stay zero. An old peer's
    /// stream decoded with the old peer's revision is therefore complete,
    /// not an error.
    pub fn decode<R: Read>(reader: &mut R, peer_revision: u64) -> io::Result<Self> {
        let mut values = ProgressSnapshot::default();
        for field in &WIRE_FORMAT {
            if peer_revision >= field.min_revision {
                (field.set)(&mut values, read_var_u64(reader)?);
            }
        }
        Ok(values)
    }
}
