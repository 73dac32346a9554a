use std::panic;
use std::thread;

use derive_more::derive::Display;

use crate::{Error, Result};

/// Identifies which half of the two-phase scan a group of worker threads belongs to.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[non_exhaustive]
pub enum Phase {
    /// Every populated chunk computes its own inclusive scan and reports its total.
    #[display("local scan")]
    LocalScan,

    /// Every chunk after the first adds the combined total of its predecessors.
    #[display("offset application")]
    OffsetApply,
}

impl Phase {
    fn thread_name_fragment(self) -> &'static str {
        match self {
            Self::LocalScan => "local",
            Self::OffsetApply => "offset",
        }
    }
}

/// Executes `work` once per item, each on its own freshly spawned scoped thread, and returns
/// the results in item order once every thread has finished.
///
/// Each item is moved into exactly one thread. When the items are disjoint `&mut` sub-slices
/// of one buffer, this is what guarantees that no two workers can touch the same element.
///
/// Returning from this function is the phase barrier: no worker spawned here is still running
/// afterwards, whether the call succeeds or fails. If a worker panics, the panic is resumed on
/// the calling thread.
pub(crate) fn fan_out<I, R, F>(phase: Phase, items: Vec<I>, work: F) -> Result<Box<[R]>>
where
    I: Send,
    R: Send,
    F: Fn(I) -> R + Sync,
{
    let work = &work;

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(items.len());

        for (index, item) in items.into_iter().enumerate() {
            let handle = thread::Builder::new()
                .name(format!(
                    "inclusive-scan-{}-{index}",
                    phase.thread_name_fragment()
                ))
                .spawn_scoped(scope, move || work(item))
                .map_err(|source| Error::ThreadSpawn { phase, source })?;

            handles.push(handle);
        }

        // If spawning failed above, the scope still joins whatever we did manage to start.
        Ok(handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| panic::resume_unwind(payload))
            })
            .collect())
    })
}
