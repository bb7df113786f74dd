//! Levels filters: Linear Contrast Stretch.
//!
//! Stretches each channel so its darkest sample maps to 0 and its brightest
//! to 255. Pass 1 finds the per-channel range as a parallel reduction; pass 2
//! remaps every sample through a per-channel lookup table.

use super::scheduler::Scheduler;
use super::skip;
use crate::error::RasterError;
use crate::raster::{Raster, CHANNELS};

/// Inclusive `(min, max)` sample range of one channel.
pub type ChannelRange = (u8, u8);

// ============================================================================
// Range Reduction
// ============================================================================

/// Per-channel `(min, max)` over the whole raster.
///
/// An empty raster reports `(255, 0)` for every channel.
pub fn channel_ranges(scheduler: &Scheduler, raster: &Raster) -> [ChannelRange; CHANNELS] {
    let src = raster.view();
    scheduler.reduce(
        raster.width(),
        [(u8::MAX, u8::MIN); CHANNELS],
        |part| {
            let mut ranges = [(u8::MAX, u8::MIN); CHANNELS];
            for y in 0..raster.height() {
                for x in part.columns() {
                    for (c, (lo, hi)) in ranges.iter_mut().enumerate() {
                        let v = src[[y, x, c]];
                        *lo = (*lo).min(v);
                        *hi = (*hi).max(v);
                    }
                }
            }
            ranges
        },
        |mut acc, partial| {
            for ((lo, hi), (p_lo, p_hi)) in acc.iter_mut().zip(partial) {
                *lo = (*lo).min(p_lo);
                *hi = (*hi).max(p_hi);
            }
            acc
        },
    )
}

/// Lookup table mapping `v` to `(v - min) * 255 / (max - min)`, truncated.
///
/// A flat channel (`max == min`) gets the identity table.
pub fn stretch_table((min, max): ChannelRange) -> [u8; 256] {
    let mut table = [0u8; 256];
    for (v, out) in table.iter_mut().enumerate() {
        *out = if max <= min {
            v as u8
        } else {
            let v = (v as u32).clamp(min as u32, max as u32);
            ((v - min as u32) * 255 / (max - min) as u32) as u8
        };
    }
    table
}

// ============================================================================
// Linear Stretch
// ============================================================================

/// Apply a linear contrast stretch to every channel independently.
///
/// A channel whose samples are all equal is left unchanged, as is an empty
/// raster.
pub fn linear_stretch(scheduler: &Scheduler, raster: &mut Raster) {
    if raster.is_empty() {
        skip("linear_stretch", &RasterError::EmptyRaster);
        return;
    }

    let tables = channel_ranges(scheduler, raster).map(stretch_table);
    let stretched = scheduler.map_pixels(raster, |rgb| {
        let mut out = rgb;
        for (v, table) in out.iter_mut().zip(&tables) {
            *v = table[*v as usize];
        }
        out
    });
    raster.replace(stretched);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::random_raster;

    #[test]
    fn test_channel_ranges() {
        let scheduler = Scheduler::new(2).unwrap();
        let raster =
            Raster::from_pixels(3, 1, &[[10, 0, 7], [200, 0, 7], [90, 255, 7]]).unwrap();
        assert_eq!(
            channel_ranges(&scheduler, &raster),
            [(10, 200), (0, 255), (7, 7)]
        );
    }

    #[test]
    fn test_channel_ranges_independent_of_workers() {
        let raster = random_raster(23, 7, 5);
        let single = channel_ranges(&Scheduler::new(1).unwrap(), &raster);
        for workers in [2, 4, 23] {
            let scheduler = Scheduler::new(workers).unwrap();
            assert_eq!(channel_ranges(&scheduler, &raster), single);
        }
    }

    #[test]
    fn test_stretch_table_endpoints() {
        let table = stretch_table((50, 100));
        assert_eq!(table[50], 0);
        assert_eq!(table[100], 255);
        assert_eq!(table[75], 127);
    }

    #[test]
    fn test_stretch_table_flat_is_identity() {
        let table = stretch_table((42, 42));
        for (v, &out) in table.iter().enumerate() {
            assert_eq!(out as usize, v);
        }
    }

    #[test]
    fn test_linear_stretch_full_range_keeps_extremes() {
        let scheduler = Scheduler::new(2).unwrap();
        let mut raster =
            Raster::from_pixels(2, 2, &[[0; 3], [255; 3], [128; 3], [64; 3]]).unwrap();
        linear_stretch(&scheduler, &mut raster);
        assert_eq!(raster.pixel(0, 0), [0; 3]);
        assert_eq!(raster.pixel(1, 0), [255; 3]);
        assert_eq!(raster.pixel(0, 1), [128; 3]);
        assert_eq!(raster.pixel(1, 1), [64; 3]);
    }

    #[test]
    fn test_linear_stretch_expands_narrow_range() {
        let scheduler = Scheduler::new(3).unwrap();
        let mut raster =
            Raster::from_pixels(3, 1, &[[100, 9, 9], [150, 9, 9], [200, 9, 9]]).unwrap();
        linear_stretch(&scheduler, &mut raster);
        assert_eq!(raster.pixel(0, 0), [0, 9, 9]);
        assert_eq!(raster.pixel(1, 0), [127, 9, 9]);
        assert_eq!(raster.pixel(2, 0), [255, 9, 9]);
    }

    #[test]
    fn test_linear_stretch_empty_is_noop() {
        let scheduler = Scheduler::new(2).unwrap();
        let mut raster = Raster::new(4, 0);
        linear_stretch(&scheduler, &mut raster);
        assert_eq!((raster.width(), raster.height()), (4, 0));
    }
}
