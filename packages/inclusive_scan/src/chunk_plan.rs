use std::num::NonZero;
use std::ops::Range;

use new_zealand::nz;

/// Partitions the index range `[0, len)` into `workers` contiguous half-open ranges.
///
/// Every range has the same length of `ceil(len / workers)` except that the last populated
/// range may be shorter. When there are more workers than the chunk length allows to fill,
/// the trailing ranges start at or beyond `len` and are empty; they are never handed to a
/// worker thread.
///
/// # Examples
///
/// ```
/// use inclusive_scan::ChunkPlan;
/// use new_zealand::nz;
///
/// let plan = ChunkPlan::new(10, nz!(4));
///
/// assert_eq!(plan.chunk_len().get(), 3);
/// assert_eq!(plan.populated_chunks(), 4);
/// assert_eq!(plan.ranges().collect::<Vec<_>>(), vec![0..3, 3..6, 6..9, 9..10]);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChunkPlan {
    len: usize,
    workers: NonZero<usize>,
    chunk_len: NonZero<usize>,
}

impl ChunkPlan {
    /// Plans the partition of a sequence of `len` elements among `workers` workers.
    #[must_use]
    pub fn new(len: usize, workers: NonZero<usize>) -> Self {
        // An empty sequence still gets a nonzero chunk length so that slice chunking
        // operations remain valid; it simply produces no chunks.
        let chunk_len = NonZero::new(len.div_ceil(workers.get())).unwrap_or(nz!(1));

        Self {
            len,
            workers,
            chunk_len,
        }
    }

    /// The number of elements being partitioned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no elements to partition.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of workers the plan was made for, including any without a populated chunk.
    #[must_use]
    pub fn workers(&self) -> NonZero<usize> {
        self.workers
    }

    /// The length of every chunk except possibly the last populated one.
    #[must_use]
    pub fn chunk_len(&self) -> NonZero<usize> {
        self.chunk_len
    }

    /// The number of chunks that contain at least one element.
    ///
    /// This is never greater than [`workers()`](Self::workers) and is zero for an empty plan.
    #[must_use]
    pub fn populated_chunks(&self) -> usize {
        self.len.div_ceil(self.chunk_len.get())
    }

    /// Returns the index range of the chunk assigned to worker `index`, or `None` if that
    /// chunk is empty or the index is beyond the worker count.
    #[must_use]
    pub fn range(&self, index: usize) -> Option<Range<usize>> {
        if index >= self.workers.get() {
            return None;
        }

        let start = index.checked_mul(self.chunk_len.get())?;

        if start >= self.len {
            return None;
        }

        let end = start.saturating_add(self.chunk_len.get()).min(self.len);

        Some(start..end)
    }

    /// Iterates over the index ranges of all populated chunks, in order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.workers.get()).map_while(|index| self.range(index))
    }
}
