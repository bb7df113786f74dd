//! Morphology filters: Dilate, Erode.
//!
//! Grayscale morphology with a square K x K structuring element applied to
//! each color channel independently:
//! - **Erode** takes the window minimum, growing dark regions
//! - **Dilate** takes the window maximum, growing bright regions
//!
//! Both share the incremental histogram scan in [`rank`](super::rank).

use super::rank::{rank_filter, RankStatistic};
use super::scheduler::Scheduler;
use super::{check_window_size, skip};
use crate::raster::Raster;

// ============================================================================
// Erode
// ============================================================================

/// Apply erosion (per-channel window minimum).
///
/// # Arguments
/// * `scheduler` - Worker pool to run the stripes on
/// * `raster` - Raster to filter; replaced with the result
/// * `kernel_size` - Window side K (odd, >= 3, <= width and height)
///
/// Invalid `kernel_size` or an empty raster leaves `raster` unchanged.
pub fn erode(scheduler: &Scheduler, raster: &mut Raster, kernel_size: usize) {
    morph(scheduler, raster, kernel_size, RankStatistic::Minimum, "erode");
}

// ============================================================================
// Dilate
// ============================================================================

/// Apply dilation (per-channel window maximum).
///
/// Same parameters and no-op rules as [`erode`].
pub fn dilate(scheduler: &Scheduler, raster: &mut Raster, kernel_size: usize) {
    morph(scheduler, raster, kernel_size, RankStatistic::Maximum, "dilate");
}

fn morph(
    scheduler: &Scheduler,
    raster: &mut Raster,
    kernel_size: usize,
    statistic: RankStatistic,
    name: &str,
) {
    if let Err(e) = check_window_size(raster, kernel_size) {
        skip(name, &e);
        return;
    }
    let filtered = rank_filter(scheduler, raster, kernel_size, statistic);
    raster.replace(filtered);
}
