//! Filter modules for the RGB raster editor.
//!
//! ## Architecture
//!
//! Every filter follows the same shape:
//! - **Validate** parameters at the entry point; an invalid call leaves the
//!   raster untouched and is only reported through `tracing` at debug level
//! - **Fork** one worker per column stripe via [`scheduler::Scheduler`]
//! - **Write** into a freshly allocated destination, reading only the source
//! - **Join** all workers, then swap the destination into the caller's raster
//!
//! Because no worker ever reads what another writes, output is identical for
//! every worker count.
//!
//! ## Filter Categories
//!
//! - **Order statistic**: median, erode (minimum), dilate (maximum)
//! - **Convolution**: fixed 5x5 Gaussian blur, custom square kernels
//! - **Color correction**: gray world, linear contrast stretch, gamma
//! - **Geometry**: rotate left/right, mirror about either axis
//! - **Analysis**: per-channel histogram extraction

pub mod color_adjust;
pub mod color_science;
pub mod convolve;
pub mod histogram;
pub mod levels_curves;
pub mod morphology;
pub mod noise;
pub mod rank;
pub mod rotate;
pub mod scheduler;
pub mod window;

use tracing::debug;

use crate::error::{RasterError, RasterResult};
use crate::raster::Raster;

/// Clamp a computed intensity into `[0, 255]` (Overflow Control).
#[inline]
pub fn overflow_control(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

/// Check that a `size` x `size` window fits `raster`: odd, at least 3, and
/// no larger than either dimension.
pub fn check_window_size(raster: &Raster, size: usize) -> RasterResult<()> {
    let (width, height) = (raster.width(), raster.height());
    if raster.is_empty() {
        return Err(RasterError::EmptyRaster);
    }
    if size % 2 == 0 || size < 3 || size > width || size > height {
        return Err(RasterError::WindowSize {
            size,
            width,
            height,
        });
    }
    Ok(())
}

/// Log why `filter` was skipped. Callers then return without touching the
/// raster.
#[inline]
pub(crate) fn skip(filter: &str, reason: &RasterError) {
    debug!(filter, %reason, "filter skipped, raster left unchanged");
}
