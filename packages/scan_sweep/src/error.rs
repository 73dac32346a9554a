use thiserror::Error;

/// Errors that can end a benchmark sweep.
#[derive(Debug, Error)]
#[non_exhaustive]
pub(crate) enum SweepError {
    /// The scan under test rejected its arguments or could not start its workers.
    #[error(transparent)]
    Scan(#[from] inclusive_scan::Error),

    /// A measured scan produced a different result than the sequential baseline.
    #[error("{variant} disagrees with the sequential baseline at index {index}")]
    Mismatch {
        /// Which scan variant produced the wrong result.
        variant: String,

        /// The first index at which the results differ.
        index: usize,
    },
}

/// Checks that `actual` is identical to `expected`, naming `variant` in the error if not.
pub(crate) fn verify<T: PartialEq>(
    variant: &str,
    expected: &[T],
    actual: &[T],
) -> Result<(), SweepError> {
    let first_difference = expected
        .iter()
        .zip(actual)
        .position(|(e, a)| e != a)
        .or_else(|| (expected.len() != actual.len()).then_some(expected.len().min(actual.len())));

    match first_difference {
        Some(index) => Err(SweepError::Mismatch {
            variant: variant.to_owned(),
            index,
        }),
        None => Ok(()),
    }
}
