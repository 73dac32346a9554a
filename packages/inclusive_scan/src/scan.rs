use std::num::NonZero;

use num_traits::{WrappingAdd, Zero};
use tracing::{debug, trace};

use crate::metrics::{CALLS, DURATION_MS, POPULATED_CHUNKS, SEQUENTIAL_FALLBACKS};
use crate::{ChunkPlan, Error, Phase, Result, fan_out};

/// Inputs shorter than this are always scanned sequentially, as spawning and joining worker
/// threads costs more than the scan itself at that size.
pub const PARALLEL_THRESHOLD: usize = 1000;

/// A value that can be accumulated by an inclusive scan.
///
/// Accumulation always uses wrapping addition, so sums that exceed the range of the type wrap
/// around exactly like native machine arithmetic does, regardless of build profile. Zero is the
/// starting value of every running total.
///
/// This is implemented for every type with the required capabilities, including all the
/// primitive integer types.
pub trait ScanElement: Copy + Send + Sync + Zero + WrappingAdd {}

impl<T> ScanElement for T where T: Copy + Send + Sync + Zero + WrappingAdd {}

/// Computes the inclusive scan of `input` using up to `workers` worker threads.
///
/// Element `i` of the result is the sum of `input[0..=i]`. The result is identical to that of
/// [`sequential_inclusive_scan()`] for every input and every valid worker count.
///
/// If `workers` is 1 or the input is shorter than [`PARALLEL_THRESHOLD`], the scan runs on the
/// calling thread. Otherwise the input is split into `workers` equal chunks (see [`ChunkPlan`])
/// and the scan happens in two phases, each on freshly spawned threads:
///
/// 1. Every populated chunk is scanned independently, producing a locally correct running
///    total and the total of the whole chunk.
/// 2. After all chunks are done, every chunk except the first adds the combined total of all
///    chunks before it.
///
/// Worker counts beyond the number of available processors are accepted and only cost
/// performance.
///
/// # Errors
///
/// Returns [`Error::InvalidWorkerCount`] if `workers` is zero. No work is done in that case.
///
/// Returns [`Error::ThreadSpawn`] if the operating system refuses to create a worker thread.
///
/// # Panics
///
/// Does not panic on its own. Worker threads cannot panic on valid input.
///
/// # Examples
///
/// ```
/// use inclusive_scan::inclusive_scan;
///
/// let input = (1..=5000_u64).collect::<Vec<_>>();
/// let output = inclusive_scan(&input, 4)?;
///
/// assert_eq!(output[0], 1);
/// assert_eq!(output[4999], 5000 * 5001 / 2);
/// # Ok::<(), inclusive_scan::Error>(())
/// ```
pub fn inclusive_scan<T: ScanElement>(input: &[T], workers: usize) -> Result<Vec<T>> {
    let workers = NonZero::new(workers).ok_or(Error::InvalidWorkerCount { workers })?;

    CALLS.with(|e| e.observe_once());

    if workers.get() == 1 || input.len() < PARALLEL_THRESHOLD {
        trace!(
            len = input.len(),
            workers = workers.get(),
            "inclusive scan running sequentially"
        );

        SEQUENTIAL_FALLBACKS.with(|e| e.observe_once());
        return Ok(sequential_inclusive_scan(input));
    }

    let plan = ChunkPlan::new(input.len(), workers);

    DURATION_MS.with(|e| e.observe_duration_millis(|| two_phase_scan(input, &plan)))
}

/// Computes the inclusive scan of `input` in a single pass on the calling thread.
///
/// # Examples
///
/// ```
/// use inclusive_scan::sequential_inclusive_scan;
///
/// assert_eq!(sequential_inclusive_scan(&[3, 1, 4, 1, 5]), vec![3, 4, 8, 9, 14]);
/// ```
#[must_use]
pub fn sequential_inclusive_scan<T: ScanElement>(input: &[T]) -> Vec<T> {
    let mut output = vec![T::zero(); input.len()];
    sequential_inclusive_scan_into(input, &mut output);
    output
}

/// Writes the inclusive scan of `input` into `output` in a single pass on the calling thread,
/// returning the total of all elements (zero if `input` is empty).
///
/// # Panics
///
/// Panics if `output` is not the same length as `input`.
pub fn sequential_inclusive_scan_into<T: ScanElement>(input: &[T], output: &mut [T]) -> T {
    assert_eq!(
        input.len(),
        output.len(),
        "output buffer must be the same length as the input"
    );

    let mut total = T::zero();

    for (destination, value) in output.iter_mut().zip(input) {
        total = total.wrapping_add(value);
        *destination = total;
    }

    total
}

fn two_phase_scan<T: ScanElement>(input: &[T], plan: &ChunkPlan) -> Result<Vec<T>> {
    observe_plan(plan);

    let mut output = vec![T::zero(); input.len()];

    let chunk_totals = scan_chunks(input, &mut output, plan)?;

    // This is cheap: one element per chunk.
    let offsets = sequential_inclusive_scan(&chunk_totals);

    apply_offsets(&mut output, plan, &offsets)?;

    Ok(output)
}

#[cfg_attr(test, mutants::skip)] // Only feeds logs and metrics, the scan result does not depend on it.
fn observe_plan(plan: &ChunkPlan) {
    debug!(
        len = plan.len(),
        workers = plan.workers().get(),
        chunk_len = plan.chunk_len().get(),
        populated_chunks = plan.populated_chunks(),
        "starting two-phase inclusive scan"
    );

    POPULATED_CHUNKS.with(|e| e.observe(plan.populated_chunks()));
}

/// Scans every populated chunk of `input` into the matching chunk of `output` and returns the
/// total of each chunk, in chunk order.
fn scan_chunks<T: ScanElement>(
    input: &[T],
    output: &mut [T],
    plan: &ChunkPlan,
) -> Result<Box<[T]>> {
    fan_out(
        Phase::LocalScan,
        local_scan_work(input, output, plan),
        |(index, (source, destination))| {
            let total = sequential_inclusive_scan_into(source, destination);
            trace!(chunk = index, len = source.len(), "local scan complete");
            total
        },
    )
}

/// One work item per populated chunk: the chunk index, its input and its output.
///
/// Chunks that start at or beyond the end of the input have no elements and get no item.
fn local_scan_work<'a, T>(
    input: &'a [T],
    output: &'a mut [T],
    plan: &ChunkPlan,
) -> Vec<(usize, (&'a [T], &'a mut [T]))> {
    let chunk_len = plan.chunk_len().get();

    input
        .chunks(chunk_len)
        .zip(output.chunks_mut(chunk_len))
        .enumerate()
        .collect()
}

/// Adds `offsets[t - 1]` to every element of chunk `t` for every chunk after the first.
fn apply_offsets<T: ScanElement>(output: &mut [T], plan: &ChunkPlan, offsets: &[T]) -> Result<()> {
    fan_out(
        Phase::OffsetApply,
        offset_work(output, plan, offsets),
        |(destination, offset)| {
            for value in destination {
                *value = value.wrapping_add(&offset);
            }
        },
    )?;

    Ok(())
}

/// One work item per populated chunk after the first, paired with the offset it must add.
///
/// The first chunk is already globally correct after the local scan and gets no item.
fn offset_work<'a, T: Copy>(
    output: &'a mut [T],
    plan: &ChunkPlan,
    offsets: &[T],
) -> Vec<(&'a mut [T], T)> {
    output
        .chunks_mut(plan.chunk_len().get())
        .skip(1)
        .zip(offsets.iter().copied())
        .collect()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Mutex;
    use std::thread;

    use new_zealand::nz;

    use super::*;

    #[test]
    fn sequential_known_values() {
        assert_eq!(
            sequential_inclusive_scan(&[1, 2, 3, 4, 5, 6, 7, 8]),
            vec![1, 3, 6, 10, 15, 21, 28, 36]
        );
    }

    #[test]
    fn sequential_into_returns_total() {
        let mut output = [0_i64; 3];

        let total = sequential_inclusive_scan_into(&[-4, 10, 2], &mut output);

        assert_eq!(total, 8);
        assert_eq!(output, [-4, 6, 8]);
    }

    #[test]
    fn sequential_into_empty_returns_zero() {
        let total = sequential_inclusive_scan_into::<u32>(&[], &mut []);

        assert_eq!(total, 0);
    }

    #[test]
    #[should_panic(expected = "output buffer must be the same length as the input")]
    fn sequential_into_length_mismatch_panics() {
        let mut output = [0_u8; 2];
        sequential_inclusive_scan_into(&[1_u8, 2, 3], &mut output);
    }

    #[test]
    fn two_phases_on_eight_elements_two_workers() {
        let input = [1, 2, 3, 4, 5, 6, 7, 8];
        let plan = ChunkPlan::new(input.len(), nz!(2));
        let mut output = [0; 8];

        let chunk_totals = scan_chunks(&input, &mut output, &plan).unwrap();

        assert_eq!(output, [1, 3, 6, 10, 5, 11, 18, 26]);
        assert_eq!(&*chunk_totals, &[10, 26]);

        let offsets = sequential_inclusive_scan(&chunk_totals);
        assert_eq!(offsets, vec![10, 36]);

        apply_offsets(&mut output, &plan, &offsets).unwrap();

        assert_eq!(output, [1, 3, 6, 10, 15, 21, 28, 36]);
    }

    #[test]
    fn one_local_worker_per_populated_chunk() {
        for (len, workers) in [(3, 10), (5, 4), (8, 2), (11, 3), (2500, 7), (0, 4)] {
            let input = vec![1_u32; len];
            let mut output = vec![0_u32; len];
            let plan = ChunkPlan::new(len, NonZero::new(workers).unwrap());

            let work = local_scan_work(&input, &mut output, &plan);

            assert_eq!(work.len(), plan.populated_chunks(), "len {len}, workers {workers}");

            for ((index, (source, destination)), range) in work.iter().zip(plan.ranges()) {
                assert_eq!(source.len(), range.len());
                assert_eq!(destination.len(), range.len());
                assert_eq!(source.as_ptr(), input[range.start..].as_ptr(), "chunk {index}");
            }
        }
    }

    #[test]
    fn no_offset_worker_for_first_chunk() {
        for (len, workers) in [(3, 10), (5, 4), (8, 2), (11, 3), (2500, 7)] {
            let mut output = vec![0_u32; len];
            let plan = ChunkPlan::new(len, NonZero::new(workers).unwrap());
            let offsets = vec![1_u32; plan.populated_chunks()];

            let expected_starts = plan
                .ranges()
                .skip(1)
                .map(|range| output[range.start..].as_ptr())
                .collect::<Vec<_>>();

            let work = offset_work(&mut output, &plan, &offsets);

            assert_eq!(
                work.len(),
                plan.populated_chunks() - 1,
                "len {len}, workers {workers}"
            );

            let starts = work
                .iter()
                .map(|(destination, _)| destination.as_ptr())
                .collect::<Vec<_>>();
            assert_eq!(starts, expected_starts);
        }
    }

    #[test]
    fn offset_workers_receive_offsets_of_preceding_chunks() {
        let mut output = [0_i32; 8];
        let plan = ChunkPlan::new(output.len(), nz!(4));

        let work = offset_work(&mut output, &plan, &[3, 10, 21, 36]);

        let offsets = work.iter().map(|&(_, offset)| offset).collect::<Vec<_>>();
        assert_eq!(offsets, vec![3, 10, 21]);
    }

    #[test]
    fn threads_spawned_per_phase_for_starved_workers() {
        let names = Mutex::new(Vec::new());
        let plan = ChunkPlan::new(3, nz!(10));
        let mut output = [0_i32; 3];

        let record = |()| {
            let name = thread::current()
                .name()
                .expect("scan threads are always named")
                .to_owned();
            names.lock().unwrap().push(name);
        };

        let local = local_scan_work(&[7, -3, 12], &mut output, &plan)
            .into_iter()
            .map(|_| ())
            .collect::<Vec<_>>();
        fan_out(Phase::LocalScan, local, record).unwrap();

        let offsets = offset_work(&mut output, &plan, &[7, -3, 12])
            .into_iter()
            .map(|_| ())
            .collect::<Vec<_>>();
        fan_out(Phase::OffsetApply, offsets, record).unwrap();

        let mut names = names.into_inner().unwrap();
        names.sort();

        assert_eq!(
            names,
            vec![
                "inclusive-scan-local-0",
                "inclusive-scan-local-1",
                "inclusive-scan-local-2",
                "inclusive-scan-offset-0",
                "inclusive-scan-offset-1",
            ]
        );
    }

    #[test]
    fn two_phase_with_starved_workers() {
        let input = [7_i32, -3, 12];
        let plan = ChunkPlan::new(input.len(), nz!(10));

        let output = two_phase_scan(&input, &plan).unwrap();

        assert_eq!(output, vec![7, 4, 16]);
    }

    #[test]
    fn two_phase_with_short_last_chunk() {
        let input = (1..=11_u32).collect::<Vec<_>>();
        let plan = ChunkPlan::new(input.len(), nz!(3));

        let output = two_phase_scan(&input, &plan).unwrap();

        assert_eq!(output, sequential_inclusive_scan(&input));
    }

    #[test]
    fn two_phase_on_empty_input() {
        let plan = ChunkPlan::new(0, nz!(4));

        let output = two_phase_scan::<u64>(&[], &plan).unwrap();

        assert!(output.is_empty());
    }

    #[test]
    fn zero_workers_rejected() {
        let result = inclusive_scan(&[1, 2, 3], 0);

        assert!(matches!(
            result,
            Err(Error::InvalidWorkerCount { workers: 0 })
        ));
    }

    #[test]
    fn zero_workers_rejected_even_for_empty_input() {
        let result = inclusive_scan::<i32>(&[], 0);

        assert!(matches!(
            result,
            Err(Error::InvalidWorkerCount { workers: 0 })
        ));
    }

    #[test]
    fn empty_input() {
        for workers in [1, 2, 64] {
            assert!(inclusive_scan::<i32>(&[], workers).unwrap().is_empty());
        }
    }

    #[test]
    fn single_element() {
        for workers in [1, 2, 64] {
            assert_eq!(inclusive_scan(&[5], workers).unwrap(), vec![5]);
        }
    }

    #[test]
    fn concrete_scenario_through_public_entry_point() {
        let output = inclusive_scan(&[1, 2, 3, 4, 5, 6, 7, 8], 2).unwrap();

        assert_eq!(output, vec![1, 3, 6, 10, 15, 21, 28, 36]);
    }

    #[test]
    fn wraps_around_on_overflow() {
        let output = inclusive_scan(&[100_i8, 100, -128], 1).unwrap();

        assert_eq!(output, vec![100, -56, 72]);
    }

    #[test]
    fn parallel_wraparound_matches_sequential() {
        let input = vec![u8::MAX; PARALLEL_THRESHOLD * 3];

        let expected = sequential_inclusive_scan(&input);

        for workers in [2, 3, 7] {
            assert_eq!(inclusive_scan(&input, workers).unwrap(), expected);
        }
    }

    #[test]
    fn at_threshold_goes_parallel_and_matches() {
        let input = (0..PARALLEL_THRESHOLD as u64).collect::<Vec<_>>();

        assert_eq!(
            inclusive_scan(&input, 4).unwrap(),
            sequential_inclusive_scan(&input)
        );
    }
}
