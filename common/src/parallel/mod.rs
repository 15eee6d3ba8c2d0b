//! Row-parallel iteration over row-major buffers.

use rayon::prelude::*;


/// Multiplier for number of chunks relative to CPU threads.
const CHUNKS_PER_THREAD: usize = 3;

/// Rows per chunk so that each worker gets a few chunks to balance uneven rows.
#[inline]
fn auto_chunk_rows(height: usize) -> usize {
    let num_chunks = rayon::current_num_threads() * CHUNKS_PER_THREAD;
    (height / num_chunks).max(1)
}

/// Extension trait for row-aligned mutable parallel chunks with automatic sizing.
pub trait ParRowsMutAuto<'a, T: Send + 'a> {
    /// Splits a row-major slice of `width`-wide rows into parallel chunks of
    /// whole rows, yielding `(chunk_start_row, chunk)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if `width` is 0 or the slice length is not a multiple of it.
    fn par_rows_mut_auto(
        &'a mut self,
        width: usize,
    ) -> impl IndexedParallelIterator<Item = (usize, &'a mut [T])>;
}

impl<'a, T: Send + 'a> ParRowsMutAuto<'a, T> for [T] {
    fn par_rows_mut_auto(
        &'a mut self,
        width: usize,
    ) -> impl IndexedParallelIterator<Item = (usize, &'a mut [T])> {
        assert!(width > 0, "row width must be > 0");
        assert_eq!(
            self.len() % width,
            0,
            "slice length must be a multiple of the row width"
        );

        let height = self.len() / width;
        let chunk_rows = auto_chunk_rows(height);
        self.par_chunks_mut(width * chunk_rows)
            .enumerate()
            .map(move |(idx, chunk)| (idx * chunk_rows, chunk))
    }
}
