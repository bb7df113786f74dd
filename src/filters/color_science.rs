//! Color science filters: Gray World white balance.
//!
//! Gray World assumes the scene averages to neutral gray. Pass 1 sums every
//! channel over the whole raster as a parallel reduction; pass 2 scales each
//! channel by `grand_mean / channel_mean` so all three means meet.

use super::overflow_control;
use super::scheduler::Scheduler;
use super::skip;
use crate::error::RasterError;
use crate::raster::{Raster, CHANNELS};

/// Per-channel sums of a raster, computed stripe by stripe.
pub fn channel_sums(scheduler: &Scheduler, raster: &Raster) -> [u64; CHANNELS] {
    let src = raster.view();
    scheduler.reduce(
        raster.width(),
        [0u64; CHANNELS],
        |part| {
            let mut sums = [0u64; CHANNELS];
            for y in 0..raster.height() {
                for x in part.columns() {
                    for (c, sum) in sums.iter_mut().enumerate() {
                        *sum += src[[y, x, c]] as u64;
                    }
                }
            }
            sums
        },
        |mut acc, partial| {
            for (a, p) in acc.iter_mut().zip(partial) {
                *a += p;
            }
            acc
        },
    )
}

/// Gains that bring each channel mean to the mean of all three.
///
/// A channel whose mean is zero keeps a gain of 1.
pub fn gray_world_gains(sums: [u64; CHANNELS], pixel_count: usize) -> [f64; CHANNELS] {
    let count = pixel_count as f64;
    let means = sums.map(|s| s as f64 / count);
    let grand = means.iter().sum::<f64>() / CHANNELS as f64;
    means.map(|m| if m > 0.0 { grand / m } else { 1.0 })
}

/// Apply Gray World auto white balance.
///
/// Each sample becomes `round(v * gain)` clamped to `[0, 255]`. An empty
/// raster is left unchanged.
pub fn gray_world(scheduler: &Scheduler, raster: &mut Raster) {
    if raster.is_empty() {
        skip("gray_world", &RasterError::EmptyRaster);
        return;
    }

    let sums = channel_sums(scheduler, raster);
    let gains = gray_world_gains(sums, raster.width() * raster.height());

    let balanced = scheduler.map_pixels(raster, |rgb| {
        let mut out = rgb;
        for (v, gain) in out.iter_mut().zip(gains) {
            *v = overflow_control((*v as f64 * gain).round() as i64);
        }
        out
    });
    raster.replace(balanced);
}
