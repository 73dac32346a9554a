//! Console presentation of experiment results.

use std::fmt::{self, Display};
use std::num::NonZero;

/// The width of the separator line under table headers.
const TABLE_WIDTH: usize = 40;

fn speedup(baseline_millis: f64, millis: f64) -> f64 {
    baseline_millis / millis
}

/// Outcome of the sequential baseline experiment.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SequentialReport {
    pub(crate) size: usize,
    pub(crate) millis: f64,
}

impl Display for SequentialReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Experiment 1: Sequential scan ===")?;
        writeln!(f, "Data size: {}", self.size)?;
        write!(f, "Execution time: {:.3} ms", self.millis)
    }
}

/// One scan implementation in the library policies experiment.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PolicyRow {
    pub(crate) name: &'static str,
    pub(crate) millis: f64,
}

/// Outcome of the library policies experiment. The first row is the reference.
#[derive(Clone, Debug)]
pub(crate) struct PolicyReport {
    pub(crate) size: usize,
    pub(crate) rows: Vec<PolicyRow>,
}

impl Display for PolicyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Experiment 2: Library scan policies ===")?;
        write!(f, "Data size: {}", self.size)?;

        for row in &self.rows {
            write!(f, "\n{}: {:.3} ms", row.name, row.millis)?;
        }

        let Some((reference, others)) = self.rows.split_first() else {
            return Ok(());
        };

        if !others.is_empty() {
            writeln!(f)?;
        }

        for row in others {
            write!(
                f,
                "\nAcceleration ({}): {:.2}x",
                row.name,
                speedup(reference.millis, row.millis)
            )?;
        }

        Ok(())
    }
}

/// One worker count in the sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SweepRow {
    pub(crate) workers: usize,
    pub(crate) millis: f64,
}

/// Outcome of the worker sweep experiment.
#[derive(Clone, Debug)]
pub(crate) struct SweepReport {
    size: usize,
    hardware_threads: NonZero<usize>,
    max_workers: NonZero<usize>,
    baseline_millis: f64,
    rows: Vec<SweepRow>,
    best: SweepRow,
}

impl SweepReport {
    /// # Panics
    ///
    /// Panics if `rows` is empty.
    pub(crate) fn new(
        size: usize,
        hardware_threads: NonZero<usize>,
        max_workers: NonZero<usize>,
        baseline_millis: f64,
        rows: Vec<SweepRow>,
    ) -> Self {
        // The earliest of equally fast rows wins, preferring fewer threads.
        let best = rows
            .iter()
            .copied()
            .reduce(|best, row| if row.millis < best.millis { row } else { best })
            .expect("a sweep always measures at least one worker count");

        Self {
            size,
            hardware_threads,
            max_workers,
            baseline_millis,
            rows,
            best,
        }
    }

    pub(crate) fn rows(&self) -> &[SweepRow] {
        &self.rows
    }

    pub(crate) fn best(&self) -> SweepRow {
        self.best
    }

    /// Whether the optimum was reached early enough that the rest of the sweep shows
    /// the cost of oversubscription.
    fn optimum_is_early(&self) -> bool {
        self.best.workers < self.max_workers.get() / 2
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "thread counts are far below the range where f64 loses precision"
    )]
    fn best_to_hardware_ratio(&self) -> f64 {
        self.best.workers as f64 / self.hardware_threads.get() as f64
    }
}

impl Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Experiment 3: Two-phase parallel scan ===")?;
        writeln!(f, "Data size: {}", self.size)?;
        writeln!(f, "Hardware threads: {}", self.hardware_threads)?;
        writeln!(f)?;
        writeln!(f, "{:>5}{:>15}{:>20}", "K", "Time (ms)", "Acceleration")?;
        writeln!(f, "{}", "-".repeat(TABLE_WIDTH))?;

        for row in &self.rows {
            writeln!(
                f,
                "{:>5}{:>15.3}{:>19.2}x",
                row.workers,
                row.millis,
                speedup(self.baseline_millis, row.millis)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "=== Results ===")?;
        writeln!(f, "Best K: {}", self.best.workers)?;
        writeln!(f, "Time at best K: {:.3} ms", self.best.millis)?;
        writeln!(
            f,
            "Maximum acceleration: {:.2}x",
            speedup(self.baseline_millis, self.best.millis)
        )?;
        write!(
            f,
            "Ratio of K to hardware threads: {:.2}",
            self.best_to_hardware_ratio()
        )?;

        if self.optimum_is_early() {
            writeln!(f)?;
            writeln!(f)?;
            writeln!(f, "=== Time growth analysis ===")?;
            writeln!(
                f,
                "After reaching the optimal K={}, time begins to increase due to the overhead",
                self.best.workers
            )?;
            write!(f, "of creating and synchronizing threads.")?;
        }

        Ok(())
    }
}

/// Describes how the running binary was compiled, since scan timings depend heavily on it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BuildProfile {
    debug_assertions: bool,
}

impl BuildProfile {
    pub(crate) fn current() -> Self {
        Self {
            debug_assertions: cfg!(debug_assertions),
        }
    }
}

impl Display for BuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Build profile ===")?;
        writeln!(
            f,
            "Debug assertions: {}",
            if self.debug_assertions {
                "enabled (unoptimized build)"
            } else {
                "disabled (optimized build)"
            }
        )?;
        writeln!(f, "To compare optimization levels:")?;
        writeln!(f, "1. Without optimization: cargo run -p scan_sweep")?;
        writeln!(f, "2. With optimization: cargo run -p scan_sweep --release")?;
        write!(f, "Compare the execution time for both builds.")
    }
}
