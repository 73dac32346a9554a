use std::num::NonZero;

use argh::FromArgs;
use new_zealand::nz;

/// Input sizes used when no `--size` is given.
pub(crate) const DEFAULT_SIZES: &[usize] = &[100_000, 1_000_000, 10_000_000];

/// Upper bound of the default worker sweep, regardless of processor count.
pub(crate) const MAX_DEFAULT_WORKERS: NonZero<usize> = nz!(32);

/// How many workers per hardware thread the default sweep goes up to.
pub(crate) const DEFAULT_WORKERS_PER_HARDWARE_THREAD: NonZero<usize> = nz!(4);

/// Benchmarks the parallel inclusive scan against sequential and pooled scans across input
/// sizes and worker counts.
#[derive(Debug, FromArgs)]
pub(crate) struct Args {
    /// number of elements to scan; repeat to benchmark several sizes
    /// (default: 100000, 1000000, 10000000)
    #[argh(option)]
    pub(crate) size: Vec<usize>,

    /// highest worker count in the sweep
    /// (default: min(32, 4 x hardware threads))
    #[argh(option)]
    pub(crate) max_workers: Option<NonZero<usize>>,

    /// seed for the random input data (default: random, printed at start)
    #[argh(option)]
    pub(crate) seed: Option<u64>,

    /// print the collected scan metrics at the end of the run
    #[argh(switch)]
    pub(crate) metrics: bool,

    /// emit debug-level logs to stderr
    #[argh(switch, short = 'v')]
    pub(crate) verbose: bool,
}

impl Args {
    /// The sizes to benchmark, in the order given.
    pub(crate) fn sizes(&self) -> Vec<usize> {
        if self.size.is_empty() {
            DEFAULT_SIZES.to_vec()
        } else {
            self.size.clone()
        }
    }

    /// The highest worker count in the sweep, derived from the hardware if not given.
    pub(crate) fn max_workers(&self, hardware_threads: NonZero<usize>) -> NonZero<usize> {
        self.max_workers
            .unwrap_or_else(|| default_max_workers(hardware_threads))
    }
}

/// `min(32, hardware_threads * 4)`: enough to show where oversubscription stops paying off.
pub(crate) fn default_max_workers(hardware_threads: NonZero<usize>) -> NonZero<usize> {
    hardware_threads
        .saturating_mul(DEFAULT_WORKERS_PER_HARDWARE_THREAD)
        .min(MAX_DEFAULT_WORKERS)
}
