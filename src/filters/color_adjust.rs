//! Color adjustment filters: Gamma.
//!
//! Pixel-wise tone curve `v -> round(c * v^d)` on raw 0-255 intensities. No
//! spatial context is needed, so the curve is baked into a 256-entry lookup
//! table once and then mapped over the raster stripe by stripe.

use super::overflow_control;
use super::scheduler::Scheduler;
use super::skip;
use crate::error::RasterError;
use crate::raster::Raster;

// ============================================================================
// Gamma
// ============================================================================

/// Lookup table for `round(coefficient * v^exponent)` with Overflow Control.
///
/// Non-finite results saturate: `+inf` maps to 255, `-inf` and NaN to 0.
pub fn gamma_table(coefficient: f64, exponent: f64) -> [u8; 256] {
    let mut table = [0u8; 256];
    for (v, out) in table.iter_mut().enumerate() {
        let curved = coefficient * (v as f64).powf(exponent);
        *out = overflow_control(curved.round() as i64);
    }
    table
}

/// Apply gamma correction.
///
/// # Arguments
/// * `scheduler` - Worker pool to run the stripes on
/// * `raster` - Raster to filter; replaced with the result
/// * `coefficient` - Multiplier `c` applied after the power
/// * `exponent` - Power `d`: < 1.0 brightens, > 1.0 darkens
///
/// An empty raster is left unchanged.
pub fn gamma(scheduler: &Scheduler, raster: &mut Raster, coefficient: f64, exponent: f64) {
    if raster.is_empty() {
        skip("gamma", &RasterError::EmptyRaster);
        return;
    }

    let table = gamma_table(coefficient, exponent);
    let corrected = scheduler.map_pixels(raster, |rgb| rgb.map(|v| table[v as usize]));
    raster.replace(corrected);
}
