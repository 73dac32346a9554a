//! Metrics for the inclusive scan.
//!
//! All events are observed on the thread that called into the scan, never on the worker
//! threads, so the per-thread event instances outlive the observations.

use nm::{Event, Magnitude};

/// Histogram buckets for the number of chunks that received a worker thread.
const POPULATED_CHUNKS_BUCKETS: &[Magnitude] = &[1, 2, 4, 8, 16, 32, 64, 128];

/// Histogram buckets for the wall-clock duration of one scan call in milliseconds.
const DURATION_MS_BUCKETS: &[Magnitude] = &[0, 1, 2, 5, 10, 20, 50, 100, 200, 500, 1000];

thread_local! {
    /// Every call to `inclusive_scan()` that passed argument validation.
    pub(crate) static CALLS: Event = Event::builder()
        .name("inclusive_scan_calls")
        .build();

    /// Calls that took the single-pass sequential path instead of fanning out.
    pub(crate) static SEQUENTIAL_FALLBACKS: Event = Event::builder()
        .name("inclusive_scan_sequential_fallbacks")
        .build();

    /// The number of populated chunks in a two-phase scan.
    pub(crate) static POPULATED_CHUNKS: Event = Event::builder()
        .name("inclusive_scan_populated_chunks")
        .histogram(POPULATED_CHUNKS_BUCKETS)
        .build();

    /// The wall-clock duration of a two-phase scan, including both barriers.
    pub(crate) static DURATION_MS: Event = Event::builder()
        .name("inclusive_scan_duration_ms")
        .histogram(DURATION_MS_BUCKETS)
        .build();
}
