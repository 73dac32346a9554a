//! Shows how an input is split into chunks for the worker threads and scans it in parallel.

use std::num::NonZero;

use inclusive_scan::{ChunkPlan, inclusive_scan, sequential_inclusive_scan};

fn main() {
    const LEN: usize = 10_000;
    const WORKERS: usize = 6;

    println!("=== inclusive_scan basic example ===");

    let plan = ChunkPlan::new(LEN, NonZero::new(WORKERS).unwrap());

    println!(
        "{LEN} elements over {WORKERS} workers: chunks of {}, {} populated",
        plan.chunk_len(),
        plan.populated_chunks()
    );

    for (index, range) in plan.ranges().enumerate() {
        println!("Chunk {index}: {range:?}");
    }

    let input = (1..=LEN as u64).collect::<Vec<_>>();

    let output = inclusive_scan(&input, WORKERS).unwrap();
    assert_eq!(output, sequential_inclusive_scan(&input));

    println!("Last running total: {}", output[LEN - 1]);

    // A zero worker count is rejected instead of being silently adjusted.
    let error = inclusive_scan(&input, 0).unwrap_err();
    println!("With zero workers: {error}");

    println!("Example completed successfully!");
}
