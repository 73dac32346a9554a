use std::time::Instant;

/// Runs `action` once and returns the wall-clock time it took, in milliseconds.
///
/// Anything the action produces has to be captured by the closure itself.
pub(crate) fn measure<F>(action: F) -> f64
where
    F: FnOnce(),
{
    let start = Instant::now();
    action();
    start.elapsed().as_secs_f64() * 1000.0
}
