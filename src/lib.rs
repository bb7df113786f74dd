//! rasterfx: parallel filters for 8-bit RGB rasters
//!
//! Filters for an interactive image editor, each run as a fork-join over
//! column stripes of the raster on a reusable worker pool.
//!
//! ## Image Format
//! A [`Raster`] is a (height, width, 3) `u8` array: red, green, blue, no
//! alpha. Pixels are addressed `(x, y)` with `x` the column.
//!
//! ## Filter Architecture
//! Every filter reads the source raster and writes a fresh destination, so
//! results never depend on the worker count. Invalid parameters (even or
//! oversized windows, malformed kernels, empty rasters) are silent no-ops;
//! the reason is logged through `tracing` at debug level.
//!
//! Filters are plain functions in [`filters`] taking a
//! [`Scheduler`](filters::scheduler::Scheduler), or can be dispatched by
//! value through [`FilterEngine::apply`], which also reports completion.
//! Rotation is the only filter that changes raster dimensions.

pub mod config;
pub mod engine;
pub mod error;
pub mod filters;
pub mod raster;

#[cfg(test)]
mod test_utils;

pub use config::EngineConfig;
pub use engine::{Filter, FilterEngine, FilterEvent};
pub use error::{RasterError, RasterResult};
pub use filters::histogram::HistogramTriple;
pub use filters::rotate::MirrorAxis;
pub use filters::scheduler::Scheduler;
pub use raster::{Raster, Rgb, CHANNELS};
