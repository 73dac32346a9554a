#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Inclusive prefix sum (scan) over integer sequences, parallelized across scoped worker threads.
//!
//! The scan transforms a sequence so that every output position holds the sum of all input
//! elements up to and including that position:
//!
//! ```
//! use inclusive_scan::inclusive_scan;
//!
//! let output = inclusive_scan(&[1, 2, 3, 4, 5, 6, 7, 8], 2)?;
//!
//! assert_eq!(output, vec![1, 3, 6, 10, 15, 21, 28, 36]);
//! # Ok::<(), inclusive_scan::Error>(())
//! ```
//!
//! # Operating principles
//!
//! The input is partitioned into one contiguous chunk per worker ([`ChunkPlan`]). The scan then
//! runs in two phases separated by a barrier:
//!
//! 1. **Local scan.** Each populated chunk gets a fresh thread that scans the chunk in isolation,
//!    writing directly into its own part of the output buffer and reporting the chunk total.
//! 2. **Offset application.** Once every chunk has reported, the chunk totals are scanned on the
//!    calling thread and each chunk after the first gets a fresh thread that adds the total of
//!    all preceding chunks to every element it owns.
//!
//! Every worker receives an exclusive sub-slice of the output buffer, so there is no shared
//! mutable state and no locking. The first chunk is complete after phase 1 and never gets a
//! phase 2 worker.
//!
//! Small inputs (below [`PARALLEL_THRESHOLD`]) and single-worker requests skip the two-phase
//! scheme entirely and are scanned on the calling thread.
//!
//! # Arithmetic
//!
//! Accumulation uses wrapping addition for every [`ScanElement`], so overflow wraps around the
//! same way in the sequential and parallel paths, in debug and release builds alike.
//!
//! # Observability
//!
//! Calls emit `tracing` events (`debug` per parallel call, `trace` per chunk) and record `nm`
//! metrics on the calling thread:
//!
//! * `inclusive_scan_calls`
//! * `inclusive_scan_sequential_fallbacks`
//! * `inclusive_scan_populated_chunks`
//! * `inclusive_scan_duration_ms`

mod chunk_plan;
mod error;
mod fan_out;
mod metrics;
mod scan;

pub use chunk_plan::*;
pub use error::*;
pub use fan_out::*;
pub use scan::*;
