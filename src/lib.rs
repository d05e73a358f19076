//! # Progresso - Lock-Free Query-Progress Counters
//!
//! A Rust library for aggregating progress metrics during long-running,
//! multi-threaded query execution: many worker threads independently report
//! rows and bytes read, written, and selected, while a reporting path
//! periodically drains the totals and ships them to a remote client over a
//! versioned binary protocol.
//!
//! ## The Problem
//!
//! Progress counters sit on the hottest path of a query pipeline. Guarding
//! the counter set with a mutex makes every row batch pay for a lock that
//! exists only so a once-per-second reporter can read a handful of numbers,
//! and contention grows with every worker thread added.
//!
//! The reporter, on the other hand, needs more than a read: it must *drain*
//! the counters (capture everything accumulated since the last report and
//! reset to zero) without losing increments that race with the capture.
//!
//! ## The Solution: Piecewise-Atomic Counters
//!
//! This library keeps one independently-synchronized atomic slot per
//! counter field. Increments are per-field relaxed `fetch_add`s; a drain is
//! a per-field atomic exchange with zero. Per field, nothing is ever lost
//! or double-counted. What is deliberately given up is *cross-field*
//! consistency: a snapshot taken under concurrent increments may reflect
//! slightly different moments for different fields, and increments that
//! straddle a drain may split between the drained result and the residue.
//!
//! For progress reporting this is the right trade-off. The consumer
//! displays eventually-consistent totals; no consumer decision hangs on two
//! fields being from the same instant. The contract is documented on every
//! operation rather than hidden behind a lock that would pretend otherwise.
//!
//! ### Design Principles
//!
//! 1. **Per-Field Atomics**: each of the seventeen counters is its own
//!    [`AtomicU64`](std::sync::atomic::AtomicU64); there is no cross-field
//!    lock anywhere in the crate.
//!
//! 2. **Cache Line Padding**: each slot is wrapped in
//!    [`crossbeam_utils::CachePadded`]. Source stages bump `read_*` fields
//!    while sink stages bump `written_*` fields; padding keeps those
//!    updates from invalidating each other's cache lines (false sharing).
//!
//! 3. **Relaxed Ordering**: all atomic operations use `Ordering::Relaxed`.
//!    The counters carry no cross-field causal dependency that a consumer
//!    relies on synchronously, so stronger orderings would cost fences and
//!    buy nothing.
//!
//! 4. **Append-Only Wire Format**: the binary encoding is a fixed-order
//!    varint sequence where every field added after the initial eleven is
//!    gated behind a protocol-revision threshold. Old and new peers
//!    interoperate by encoding and decoding with the *remote* side's
//!    negotiated revision. See [`wire`].
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//!
//! use progresso::progress::Progress;
//! use progresso::snapshot::{ReadProgress, WriteProgress};
//! use progresso::wire::REVISION_WITH_QUERY_TIME_IN_PROGRESS;
//!
//! // One instance per query, shared with the workers.
//! let progress = Arc::new(Progress::new());
//!
//! let workers: Vec<_> = (0..4)
//!     .map(|_| {
//!         let p = Arc::clone(&progress);
//!         thread::spawn(move || {
//!             for _ in 0..1000 {
//!                 // Returns true when the delta is worth notifying about.
//!                 p.increment(ReadProgress::new(10, 800));
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for w in workers {
//!     w.join().unwrap();
//! }
//! progress.increment(WriteProgress::new(100, 4096));
//!
//! // The reporting path drains and encodes for the negotiated revision.
//! let values = progress.snapshot_and_reset();
//! assert_eq!(values.read_rows, 40_000);
//! assert_eq!(values.written_rows, 100);
//!
//! let mut packet = Vec::new();
//! values
//!     .encode(&mut packet, REVISION_WITH_QUERY_TIME_IN_PROGRESS)
//!     .unwrap();
//!
//! // Or render for an HTTP display consumer.
//! assert!(values.to_json().starts_with(r#"{"read_rows":"40000""#));
//! ```
//!
//! ## Thread Safety
//!
//! [`Progress`](progress::Progress) is `Send + Sync` and is meant to be
//! shared across threads via `Arc`. Any number of threads may increment
//! concurrently. Snapshot, drain, and reset are intended for a single
//! reporting path; running them concurrently with increments is safe and
//! loses nothing per field, but the piecewise cross-field caveat above
//! applies. [`reset`](progress::Progress::reset) and
//! [`assign`](progress::Progress::assign) additionally require quiescent
//! writers to transfer an exact total.
//!
//! ## Errors and Overflow
//!
//! Counters wrap on overflow per fixed-width unsigned arithmetic (matching
//! the wire format's width); nothing checks or reports it. The codec paths
//! return [`std::io::Error`] exactly as produced by the underlying stream
//! or varint reader. Nothing is caught, wrapped, or retried here; the
//! protocol layer above decides what a read failure means for the
//! connection.
//!
//! ## Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | `Serialize`/`Deserialize` derives on the snapshot types |
//!
//! The JSON text record of [`render`] does not depend on any feature; its
//! quoting and field order are a stable contract (see the module docs).

pub mod progress;
pub mod render;
pub mod snapshot;
pub mod varint;
pub mod wire;
