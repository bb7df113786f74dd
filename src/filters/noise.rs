//! Noise removal: Median.
//!
//! The median of a K x K window removes salt-and-pepper noise while keeping
//! edges sharp. Computed per channel with the incremental histogram from
//! [`rank`](super::rank), so each pixel costs O(K) histogram updates.

use super::rank::{rank_filter, RankStatistic};
use super::scheduler::Scheduler;
use super::{check_window_size, skip};
use crate::raster::Raster;

// ============================================================================
// Median Filter
// ============================================================================

/// Apply a median filter.
///
/// # Arguments
/// * `scheduler` - Worker pool to run the stripes on
/// * `raster` - Raster to filter; replaced with the result
/// * `kernel_size` - Window side K (odd, >= 3, <= width and height)
///
/// Invalid `kernel_size` or an empty raster leaves `raster` unchanged.
pub fn median(scheduler: &Scheduler, raster: &mut Raster, kernel_size: usize) {
    if let Err(e) = check_window_size(raster, kernel_size) {
        skip("median", &e);
        return;
    }
    let filtered = rank_filter(scheduler, raster, kernel_size, RankStatistic::Median);
    raster.replace(filtered);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::random_raster;

    #[test]
    fn test_median_constant_raster_unchanged() {
        let scheduler = Scheduler::new(2).unwrap();
        let mut raster = Raster::filled(4, 4, [128, 128, 128]);
        median(&scheduler, &mut raster, 3);
        assert_eq!(raster, Raster::filled(4, 4, [128, 128, 128]));
    }

    #[test]
    fn test_median_removes_salt() {
        let scheduler = Scheduler::new(3).unwrap();
        let mut raster = Raster::filled(5, 5, [128, 64, 32]);
        raster.set_pixel(2, 2, [255, 255, 255]);
        median(&scheduler, &mut raster, 3);
        assert_eq!(raster.pixel(2, 2), [128, 64, 32]);
    }

    #[test]
    fn test_median_preserves_edge() {
        let scheduler = Scheduler::new(2).unwrap();
        let mut raster = Raster::new(6, 5);
        for y in 0..5 {
            for x in 3..6 {
                raster.set_pixel(x, y, [255, 255, 255]);
            }
        }
        let before = raster.clone();
        median(&scheduler, &mut raster, 3);
        assert_eq!(raster, before);
    }

    #[test]
    fn test_median_invalid_size_is_noop() {
        let scheduler = Scheduler::new(2).unwrap();
        let original = random_raster(6, 4, 11);
        for size in [0, 1, 2, 4, 5, 7] {
            let mut raster = original.clone();
            median(&scheduler, &mut raster, size);
            assert_eq!(raster, original, "size {size}");
        }
    }

    #[test]
    fn test_median_empty_raster_is_noop() {
        let scheduler = Scheduler::new(2).unwrap();
        let mut raster = Raster::new(0, 0);
        median(&scheduler, &mut raster, 3);
        assert!(raster.is_empty());
    }
}
