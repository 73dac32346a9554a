use std::io;

use thiserror::Error;

use crate::Phase;

/// Errors that can occur when computing an inclusive scan.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller asked for zero workers. At least one worker is required to produce a result.
    #[error("invalid worker count {workers}: at least one worker is required")]
    InvalidWorkerCount {
        /// The worker count that was provided.
        workers: usize,
    },

    /// The operating system refused to create a worker thread for one of the scan phases.
    ///
    /// Any workers that were already started for the same phase are joined before this
    /// error is returned, so no partial results remain in flight.
    #[error("failed to spawn {phase} worker thread")]
    ThreadSpawn {
        /// The phase that was starting its workers when spawning failed.
        phase: Phase,

        /// The platform error reported by the thread builder.
        #[source]
        source: io::Error,
    },
}

/// A specialized `Result` type for inclusive scan operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
