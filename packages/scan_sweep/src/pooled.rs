use inclusive_scan::{ScanElement, sequential_inclusive_scan, sequential_inclusive_scan_into};
use rayon::prelude::*;

/// Two-pass inclusive scan on the rayon global thread pool.
///
/// This is the same chunked algorithm as the core scan, but with pre-warmed pool threads and
/// work stealing instead of fresh threads per call. It serves as the "library parallel" point
/// of comparison.
pub(crate) fn pooled_inclusive_scan<T: ScanElement>(input: &[T]) -> Vec<T> {
    let mut output = vec![T::zero(); input.len()];

    if input.is_empty() {
        return output;
    }

    let chunk_len = input.len().div_ceil(rayon::current_num_threads()).max(1);

    let chunk_totals = output
        .par_chunks_mut(chunk_len)
        .zip(input.par_chunks(chunk_len))
        .map(|(destination, source)| sequential_inclusive_scan_into(source, destination))
        .collect::<Vec<_>>();

    let offsets = sequential_inclusive_scan(&chunk_totals);

    output
        .par_chunks_mut(chunk_len)
        .skip(1)
        .zip(offsets.par_iter())
        .for_each(|(destination, offset)| {
            for value in destination {
                *value = value.wrapping_add(offset);
            }
        });

    output
}
