//! Fork-join tiling scheduler.
//!
//! The column range `[0, width)` of the output is split into contiguous
//! stripes, one per worker. Each worker receives an exclusive mutable view of
//! its stripe in a freshly allocated destination and reads only from the
//! source, so the output does not depend on how workers interleave. Every
//! call joins all workers before returning.
//!
//! Global statistics (sums, min/max, histograms) use [`Scheduler::reduce`]
//! instead: each worker folds its stripe into a partial value and the caller
//! combines the partials.

use std::ops::Range;

use ndarray::{Array3, ArrayViewMut3, Axis};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::trace;

use crate::error::{RasterError, RasterResult};
use crate::raster::{Raster, Rgb, CHANNELS};

/// Half-open column range `[begin, end)` owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition {
    pub begin: usize,
    pub end: usize,
}

impl Partition {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    #[inline]
    pub fn columns(&self) -> Range<usize> {
        self.begin..self.end
    }
}

/// Split `[0, width)` into `workers` contiguous stripes.
///
/// Each stripe is `width / workers` columns wide and the last one absorbs the
/// remainder. The worker count is capped at `width` so no stripe is empty.
/// Returns nothing for a zero width.
pub fn partition_columns(width: usize, workers: usize) -> Vec<Partition> {
    if width == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, width);
    let part = width / workers;

    (0..workers)
        .map(|i| Partition {
            begin: i * part,
            end: if i + 1 == workers { width } else { (i + 1) * part },
        })
        .collect()
}

/// Runs striped filter workers on a dedicated rayon pool.
pub struct Scheduler {
    pool: ThreadPool,
    workers: usize,
}

impl Scheduler {
    /// Start a pool with `workers` threads.
    ///
    /// # Errors
    /// [`RasterError::Config`] for zero workers, or
    /// [`RasterError::ThreadPool`] if the threads cannot be spawned.
    pub fn new(workers: usize) -> RasterResult<Self> {
        Self::with_thread_name(workers, "rasterfx-worker")
    }

    /// Like [`Scheduler::new`] with a custom thread name prefix.
    pub fn with_thread_name(workers: usize, prefix: &str) -> RasterResult<Self> {
        if workers == 0 {
            return Err(RasterError::Config("worker count must be > 0".into()));
        }
        let prefix = prefix.to_owned();
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()?;
        Ok(Self { pool, workers })
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Stripes this scheduler would use for a raster `width` columns wide.
    pub fn partitions(&self, width: usize) -> Vec<Partition> {
        partition_columns(width, self.workers)
    }

    /// Allocate a `height x width` destination and fill it stripe by stripe.
    ///
    /// `worker` gets its partition (in destination columns) and a mutable
    /// view of just that stripe, indexed `[[y, x - partition.begin, c]]`.
    /// Returns after every worker has finished.
    pub fn run_striped<F>(&self, width: usize, height: usize, worker: F) -> Raster
    where
        F: Fn(Partition, ArrayViewMut3<u8>) + Sync,
    {
        let mut output = Array3::<u8>::zeros((height, width, CHANNELS));
        let partitions = self.partitions(width);
        trace!(width, height, stripes = partitions.len(), "dispatching stripes");

        let mut stripes = Vec::with_capacity(partitions.len());
        let mut rest = output.view_mut();
        for part in partitions {
            let (stripe, tail) = rest.split_at(Axis(1), part.len());
            stripes.push((part, stripe));
            rest = tail;
        }

        let worker = &worker;
        self.pool.scope(|scope| {
            for (part, stripe) in stripes {
                scope.spawn(move |_| worker(part, stripe));
            }
        });

        Raster::from_rgb_array(output)
    }

    /// Build a same-sized raster by mapping every sample of `source`.
    pub fn map_pixels<F>(&self, source: &Raster, map: F) -> Raster
    where
        F: Fn(Rgb) -> Rgb + Sync,
    {
        let src = source.view();
        self.run_striped(source.width(), source.height(), |part, mut stripe| {
            for y in 0..source.height() {
                for (local, x) in part.columns().enumerate() {
                    let rgb = map([src[[y, x, 0]], src[[y, x, 1]], src[[y, x, 2]]]);
                    for (c, v) in rgb.into_iter().enumerate() {
                        stripe[[y, local, c]] = v;
                    }
                }
            }
        })
    }

    /// Fold each stripe of a `width`-column raster into a partial value and
    /// combine the partials in stripe order.
    pub fn reduce<T, M, C>(&self, width: usize, init: T, partial: M, combine: C) -> T
    where
        T: Send,
        M: Fn(Partition) -> T + Sync,
        C: Fn(T, T) -> T,
    {
        let partitions = self.partitions(width);
        let partials: Vec<T> = self
            .pool
            .install(|| partitions.par_iter().map(|&part| partial(part)).collect());
        partials.into_iter().fold(init, combine)
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("workers", &self.workers)
            .finish()
    }
}
