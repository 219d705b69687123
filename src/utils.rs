//! Execution utilities shared by fitting and prediction.

use rayon::prelude::*;

/// Execution strategy for operations that can run in parallel.
///
/// Sequential and parallel execution always produce identical results;
/// the strategy only decides whether rayon gets involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// Run on the current thread
    #[default]
    Sequential,
    /// Use rayon's thread pool
    Parallel,
}

impl Parallelism {
    /// Derive a strategy from a thread-count hint.
    ///
    /// `0` means use all available parallelism, `1` forces sequential
    /// execution, anything larger enables the rayon pool.
    pub fn from_threads(num_threads: usize) -> Self {
        match num_threads {
            1 => Parallelism::Sequential,
            _ => Parallelism::Parallel,
        }
    }

    /// Whether this strategy uses the rayon pool.
    #[inline]
    pub fn is_parallel(&self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Apply `op` to every item, in parallel when enabled.
    pub fn maybe_par_for_each<T, I, F>(&self, items: I, op: F)
    where
        T: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) + Sync + Send,
    {
        if self.is_parallel() {
            items.into_par_iter().for_each(op);
        } else {
            items.into_iter().for_each(op);
        }
    }

    /// Map every item into a vector, in parallel when enabled.
    ///
    /// Output order matches input order in both modes.
    pub fn maybe_par_map<T, I, F, R>(&self, items: I, op: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> R + Sync + Send,
    {
        if self.is_parallel() {
            items.into_par_iter().map(op).collect()
        } else {
            items.into_iter().map(op).collect()
        }
    }
}

/// Run `op` inside a dedicated rayon pool with `num_threads` threads.
///
/// `0` lets rayon pick its default size. Useful for benchmarking thread
/// scaling without touching the global pool.
pub fn run_with_threads<F, R>(num_threads: usize, op: F) -> R
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .expect("Failed to create thread pool");
    pool.install(op)
}
