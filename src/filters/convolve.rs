//! Convolution filters: Gaussian Blur, Custom Kernel.
//!
//! Both filters compute, per output pixel and channel, the inner product of
//! the reflected K x K window with the kernel (row-major), divide by the
//! kernel's divisor, truncate toward zero and apply Overflow Control.
//!
//! The Gaussian blur reads the source and writes a fresh destination like
//! every other filter, so stripe boundaries never see half-blurred pixels.

use super::scheduler::Scheduler;
use super::window::ChannelWindows;
use super::{check_window_size, overflow_control, skip};
use crate::error::{RasterError, RasterResult};
use crate::raster::{Raster, CHANNELS};

/// Fixed 5x5 Gaussian weights, row-major.
const GAUSSIAN_5X5: [f64; 25] = [
    0.000789, 0.006581, 0.013347, 0.006581, 0.000789, //
    0.006581, 0.054901, 0.111345, 0.054901, 0.006581, //
    0.013347, 0.111345, 0.225821, 0.111345, 0.013347, //
    0.006581, 0.054901, 0.111345, 0.054901, 0.006581, //
    0.000789, 0.006581, 0.013347, 0.006581, 0.000789,
];

// ============================================================================
// Kernel
// ============================================================================

/// Odd-sized square convolution kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f64>,
    divisor: f64,
}

impl Kernel {
    /// Build a kernel from row-major weights.
    ///
    /// The side length is the integer square root of `weights.len()`. The
    /// divisor is the sum of all weights; a zero sum (edge-detection style
    /// kernels) divides by 1 instead.
    ///
    /// # Errors
    /// [`RasterError::InvalidKernel`] unless the weights form an odd square
    /// grid of side >= 3.
    pub fn from_weights(weights: Vec<f64>) -> RasterResult<Self> {
        let size = (weights.len() as f64).sqrt() as usize;
        if size * size != weights.len() {
            return Err(RasterError::InvalidKernel(format!(
                "{} weights do not form a square",
                weights.len()
            )));
        }
        if size % 2 == 0 || size < 3 {
            return Err(RasterError::InvalidKernel(format!(
                "side {size} must be odd and >= 3"
            )));
        }

        let sum: f64 = weights.iter().sum();
        let divisor = if sum == 0.0 { 1.0 } else { sum };
        Ok(Self {
            size,
            weights,
            divisor,
        })
    }

    /// The fixed 5x5 Gaussian blur kernel.
    pub fn gaussian() -> Self {
        let weights = GAUSSIAN_5X5.to_vec();
        let divisor = weights.iter().sum();
        Self {
            size: 5,
            weights,
            divisor,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    /// Normalized inner product of `samples` with the weights, truncated and
    /// clamped to `[0, 255]`.
    #[inline]
    fn apply(&self, samples: &[u8]) -> u8 {
        let sum: f64 = samples
            .iter()
            .zip(&self.weights)
            .map(|(&s, &w)| s as f64 * w)
            .sum();
        overflow_control((sum / self.divisor) as i64)
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Blur with the fixed 5x5 Gaussian kernel.
///
/// Rasters smaller than 5x5 are left unchanged.
pub fn gaussian_blur(scheduler: &Scheduler, raster: &mut Raster) {
    convolve(scheduler, raster, &Kernel::gaussian(), "gaussian_blur");
}

/// Convolve with caller-supplied row-major weights.
///
/// # Arguments
/// * `scheduler` - Worker pool to run the stripes on
/// * `raster` - Raster to filter; replaced with the result
/// * `weights` - K*K weights with K odd, >= 3 and <= width and height
///
/// Weights that do not form a valid kernel leave `raster` unchanged.
pub fn custom_filter(scheduler: &Scheduler, raster: &mut Raster, weights: &[f64]) {
    match Kernel::from_weights(weights.to_vec()) {
        Ok(kernel) => convolve(scheduler, raster, &kernel, "custom_filter"),
        Err(e) => skip("custom_filter", &e),
    }
}

/// Convolve `raster` with a prepared kernel.
pub fn convolve(scheduler: &Scheduler, raster: &mut Raster, kernel: &Kernel, name: &str) {
    if let Err(e) = check_window_size(raster, kernel.size()) {
        skip(name, &e);
        return;
    }

    let src = raster.view();
    let height = raster.height();
    let filtered = scheduler.run_striped(raster.width(), height, |part, mut stripe| {
        let mut windows = ChannelWindows::new(kernel.size());
        for y in 0..height {
            for (local, x) in part.columns().enumerate() {
                windows.fill(src, y, x);
                for c in 0..CHANNELS {
                    stripe[[y, local, c]] = kernel.apply(windows[c].as_slice());
                }
            }
        }
    });
    raster.replace(filtered);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::random_raster;

    #[test]
    fn test_gaussian_kernel_normalizes_to_one() {
        let k = Kernel::gaussian();
        assert_eq!(k.size(), 5);
        let total: f64 = k.weights().iter().map(|w| w / k.divisor()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_weights_rejects_bad_shapes() {
        assert!(Kernel::from_weights(vec![1.0; 8]).is_err());
        assert!(Kernel::from_weights(vec![1.0; 16]).is_err());
        assert!(Kernel::from_weights(vec![1.0; 1]).is_err());
        assert!(Kernel::from_weights(vec![]).is_err());
        assert_eq!(Kernel::from_weights(vec![1.0; 49]).unwrap().size(), 7);
    }

    #[test]
    fn test_zero_sum_kernel_divides_by_one() {
        let k = Kernel::from_weights(vec![0.0, -1.0, 0.0, -1.0, 4.0, -1.0, 0.0, -1.0, 0.0])
            .unwrap();
        assert_eq!(k.divisor(), 1.0);
    }

    #[test]
    fn test_gaussian_blur_constant_raster_unchanged() {
        let scheduler = Scheduler::new(3).unwrap();
        let mut raster = Raster::filled(8, 6, [100, 150, 200]);
        gaussian_blur(&scheduler, &mut raster);
        // Truncation can shave one level off the normalized sum
        for p in raster.pixels() {
            assert!((99..=100).contains(&p[0]), "{p:?}");
            assert!((149..=150).contains(&p[1]), "{p:?}");
            assert!((199..=200).contains(&p[2]), "{p:?}");
        }
    }

    #[test]
    fn test_gaussian_blur_spreads_impulse() {
        let scheduler = Scheduler::new(2).unwrap();
        let mut raster = Raster::new(9, 9);
        raster.set_pixel(4, 4, [255, 255, 255]);
        gaussian_blur(&scheduler, &mut raster);

        let center = raster.pixel(4, 4)[0];
        assert!(center < 255 && center > 0);
        assert!(raster.pixel(5, 4)[0] > 0);
        assert!(raster.pixel(5, 4)[0] < center);
        assert_eq!(raster.pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_gaussian_blur_small_raster_is_noop() {
        let scheduler = Scheduler::new(2).unwrap();
        let original = random_raster(4, 4, 1);
        let mut raster = original.clone();
        gaussian_blur(&scheduler, &mut raster);
        assert_eq!(raster, original);
    }

    #[test]
    fn test_identity_kernel_returns_source() {
        let scheduler = Scheduler::new(4).unwrap();
        let original = random_raster(7, 5, 2);
        let mut raster = original.clone();
        custom_filter(
            &scheduler,
            &mut raster,
            &[0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        );
        assert_eq!(raster, original);
    }

    #[test]
    fn test_custom_filter_saturates_both_ends() {
        let scheduler = Scheduler::new(2).unwrap();
        let mut raster = Raster::filled(3, 3, [200, 200, 200]);
        raster.set_pixel(1, 1, [0, 0, 0]);

        // Sharpen: centre 9*0 - 8*200 = -1600, corner 9*200 - 7*200 = 400
        let mut weights = vec![-1.0; 9];
        weights[4] = 9.0;
        custom_filter(&scheduler, &mut raster, &weights);

        assert_eq!(raster.pixel(1, 1), [0, 0, 0]);
        assert_eq!(raster.pixel(0, 0), [255, 255, 255]);
        assert_eq!(raster.pixel(2, 2), [255, 255, 255]);
    }

    #[test]
    fn test_custom_filter_large_positive_weights_average() {
        let scheduler = Scheduler::new(3).unwrap();
        let mut raster = Raster::filled(5, 5, [90, 90, 90]);
        custom_filter(&scheduler, &mut raster, &[1.0e9; 9]);
        for p in raster.pixels() {
            assert!((89..=90).contains(&p[0]), "{p:?}");
        }
    }

    #[test]
    fn test_custom_filter_invalid_weights_noop() {
        let scheduler = Scheduler::new(2).unwrap();
        let original = random_raster(5, 5, 9);
        for weights in [vec![1.0; 4], vec![1.0; 10], vec![1.0; 49]] {
            let mut raster = original.clone();
            custom_filter(&scheduler, &mut raster, &weights);
            assert_eq!(raster, original);
        }
    }
}
