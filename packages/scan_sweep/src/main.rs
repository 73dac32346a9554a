#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Benchmarks the two-phase parallel inclusive scan from the `inclusive_scan` package.
//!
//! For every requested input size, random data in `[1, 100]` is generated from a seeded
//! generator and three experiments are run:
//!
//! 1. **Sequential scan**: one single-pass scan, timed.
//! 2. **Library scan policies**: the single-pass scan, an iterator-adapter scan and a
//!    two-pass scan on the rayon thread pool, with the speedup of each over the first.
//! 3. **Two-phase parallel scan**: `inclusive_scan()` with every worker count from 1 up to
//!    `--max-workers`, with the speedup of each over a sequential baseline, the best worker
//!    count and its ratio to the number of hardware threads.
//!
//! Every measured result is checked against the sequential result; any disagreement ends the
//! run with a failure exit code.
//!
//! # Usage
//!
//! ```text
//! scan_sweep [--size <n>]... [--max-workers <k>] [--seed <u64>] [--metrics] [-v]
//! ```
//!
//! Timings are single measurements, meant to show trends rather than be statistically sound.
//! Use the `inclusive_scan_workers` Criterion benchmark for rigorous numbers.

use std::io;
use std::num::NonZero;
use std::process::ExitCode;

use many_cpus::ProcessorSet;
use new_zealand::nz;
use tracing::{Level, error, info};

mod args;
mod data;
mod error;
mod experiments;
mod measure;
mod pooled;
mod report;

pub(crate) use args::*;
pub(crate) use data::*;
pub(crate) use error::*;
pub(crate) use experiments::*;
pub(crate) use measure::*;
pub(crate) use pooled::*;
pub(crate) use report::*;

#[cfg_attr(test, mutants::skip)] // Exercised end to end, not by unit tests.
fn main() -> ExitCode {
    let args: Args = argh::from_env();

    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "benchmark sweep failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

/// The number of processors this process may run on.
fn hardware_threads() -> NonZero<usize> {
    ProcessorSet::builder()
        .take_all()
        .and_then(|processors| NonZero::new(processors.len()))
        .unwrap_or(nz!(1))
}

fn run(args: &Args) -> Result<(), SweepError> {
    let hardware_threads = hardware_threads();
    let max_workers = args.max_workers(hardware_threads);
    let sizes = args.sizes();

    let mut generator = DataGenerator::new(args.seed);

    info!(
        seed = generator.seed(),
        hardware_threads = hardware_threads.get(),
        max_workers = max_workers.get(),
        ?sizes,
        "starting inclusive scan sweep"
    );

    println!("Parallel inclusive scan benchmark");
    println!("Seed: {} (pass --seed to repeat this run)", generator.seed());
    println!("{}", "=".repeat(49));

    for size in sizes {
        println!("\n\n### Testing on size: {size} elements ###");

        let data = generator.generate(size);

        let (sequential, expected) = sequential_baseline(&data);
        println!("\n{sequential}");

        let policies = library_policies(&data, &expected)?;
        println!("\n{policies}");

        let sweep = worker_sweep(&data, &expected, max_workers, hardware_threads)?;
        println!("\n{sweep}");
    }

    println!("\n{}", BuildProfile::current());

    if args.metrics {
        println!("\n=== Metrics ===");
        print!("{}", nm::Report::collect());
    }

    Ok(())
}
