//! Error types for rasterfx.
//!
//! Filter entry points never surface these: an invalid call is a silent
//! no-op. They are returned by fallible construction (rasters, kernels,
//! engine configuration) and used internally to describe why a filter call
//! was skipped.

use thiserror::Error;

/// Errors raised while building rasters, kernels or the filter engine.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Sample buffer length does not match the requested dimensions
    #[error("buffer holds {actual} samples, expected {expected} for a {width}x{height} raster")]
    BufferSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    /// Source array does not carry exactly three color channels
    #[error("expected 3 color channels, got {0}")]
    ChannelCount(usize),

    /// Kernel weights cannot form an odd square grid
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Window size is even, below 3, or larger than the raster
    #[error("invalid window size {size} for a {width}x{height} raster")]
    WindowSize {
        size: usize,
        width: usize,
        height: usize,
    },

    /// Raster has no pixels
    #[error("raster is empty")]
    EmptyRaster,

    /// Engine configuration is unusable
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Worker pool could not be started
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for rasterfx operations
pub type RasterResult<T> = Result<T, RasterError>;
