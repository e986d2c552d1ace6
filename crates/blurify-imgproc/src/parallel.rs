use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The number of rows per block must be valid.
    #[error("rows per block must be > 0 for RowBlocks strategy, got {0}")]
    InvalidRowBlock(usize),

    /// The row stride must split the buffer into whole rows.
    #[error("row stride {0} does not divide the buffer length {1}")]
    InvalidRowStride(usize, usize),
}

/// Controls how the rows of an output image are scheduled.
///
/// Every strategy computes the same rows with the same code, so the output does not
/// depend on the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Use the global Rayon thread pool with one task per row.
    #[default]
    ParallelRows,

    /// Use the global Rayon thread pool with blocks of `n` consecutive rows per task.
    RowBlocks(usize),

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

/// Apply a function to every row of a buffer with the given strategy.
///
/// Each worker builds its scratch state once with `init` and reuses it for all the
/// rows it processes.
///
/// # Arguments
///
/// * `dst` - The destination buffer, `row_stride` elements per row.
/// * `row_stride` - The number of elements in one row (width * channels).
/// * `strategy` - The execution strategy.
/// * `init` - Builds the per-worker scratch state.
/// * `op` - Called with the scratch state, the row index and the row slice.
pub fn par_iter_rows_init<T, S, I, F>(
    dst: &mut [T],
    row_stride: usize,
    strategy: ExecutionStrategy,
    init: I,
    op: F,
) -> Result<(), ParallelError>
where
    T: Send,
    I: Fn() -> S + Send + Sync,
    F: Fn(&mut S, usize, &mut [T]) + Send + Sync,
{
    if dst.is_empty() {
        return Ok(());
    }

    if row_stride == 0 || dst.len() % row_stride != 0 {
        return Err(ParallelError::InvalidRowStride(row_stride, dst.len()));
    }

    match strategy {
        ExecutionStrategy::Serial => {
            let mut state = init();
            dst.chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(r, row)| op(&mut state, r, row));
        }
        ExecutionStrategy::ParallelRows => {
            dst.par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each_init(&init, |state, (r, row)| op(state, r, row));
        }
        ExecutionStrategy::RowBlocks(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidRowBlock(n));
            }
            dst.par_chunks_mut(row_stride * n)
                .enumerate()
                .for_each_init(&init, |state, (b, block)| {
                    block
                        .chunks_exact_mut(row_stride)
                        .enumerate()
                        .for_each(|(r, row)| op(state, b * n + r, row));
                });
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_exact_mut(row_stride)
                    .enumerate()
                    .for_each_init(&init, |state, (r, row)| op(state, r, row));
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_rows(strategy: ExecutionStrategy) -> Result<Vec<usize>, ParallelError> {
        let mut dst = vec![0; 12];
        par_iter_rows_init(&mut dst, 3, strategy, Vec::new, |seen, r, row| {
            seen.push(r);
            row.iter_mut()
                .enumerate()
                .for_each(|(c, v)| *v = r * 10 + c);
        })?;
        Ok(dst)
    }

    #[test]
    fn test_execute_all_strategies() -> Result<(), ParallelError> {
        let expected = vec![0, 1, 2, 10, 11, 12, 20, 21, 22, 30, 31, 32];
        for strategy in [
            ExecutionStrategy::Serial,
            ExecutionStrategy::ParallelRows,
            ExecutionStrategy::RowBlocks(1),
            ExecutionStrategy::RowBlocks(3),
            ExecutionStrategy::RowBlocks(8),
            ExecutionStrategy::Fixed(2),
        ] {
            assert_eq!(fill_rows(strategy)?, expected, "{strategy:?}");
        }
        Ok(())
    }

    #[test]
    fn test_execute_row_blocks_invalid() {
        let res = fill_rows(ExecutionStrategy::RowBlocks(0));
        assert_eq!(res, Err(ParallelError::InvalidRowBlock(0)));
    }

    #[test]
    fn test_execute_fixed_error() {
        let res = fill_rows(ExecutionStrategy::Fixed(0));
        assert_eq!(res, Err(ParallelError::InvalidThreadCount(0)));
    }

    #[test]
    fn test_execute_invalid_stride() {
        let mut dst = vec![0u8; 10];
        let res = par_iter_rows_init(&mut dst, 3, ExecutionStrategy::Serial, || (), |_, _, _| {});
        assert_eq!(res, Err(ParallelError::InvalidRowStride(3, 10)));
    }

    #[test]
    fn test_execute_empty_buffer() {
        let mut dst: Vec<u8> = vec![];
        let res = par_iter_rows_init(&mut dst, 0, ExecutionStrategy::Serial, || (), |_, _, _| {});
        assert_eq!(res, Ok(()));
    }
}
