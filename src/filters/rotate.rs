//! Geometric transforms: quarter-turn rotation and mirroring.
//!
//! ## Rotation Direction
//!
//! With `(x, y)` as (column, row) in a W x H source:
//! - Rotate left (90° CCW): `(x, y) -> (y, W - 1 - x)`, result is H x W
//! - Rotate right (90° CW): `(x, y) -> (H - 1 - y, x)`, result is H x W
//!
//! Every transform is a gather: each destination stripe pulls its pixels
//! from the read-only source, so stripes never overlap.

use super::scheduler::Scheduler;
use super::skip;
use crate::error::RasterError;
use crate::raster::{Raster, CHANNELS};

/// Axis to mirror about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MirrorAxis {
    /// Reverse row order (top <-> bottom).
    Horizontal,
    /// Reverse column order (left <-> right).
    Vertical,
}

// ============================================================================
// Rotation
// ============================================================================

/// Rotate 90 degrees counter-clockwise. Width and height swap.
pub fn rotate_left(scheduler: &Scheduler, raster: &mut Raster) {
    let width = raster.width();
    // dest[[r, c]] = src[[c, W - 1 - r]]
    gather(scheduler, raster, "rotate_left", true, |r, c| (c, width - 1 - r));
}

/// Rotate 90 degrees clockwise. Width and height swap.
pub fn rotate_right(scheduler: &Scheduler, raster: &mut Raster) {
    let height = raster.height();
    // dest[[r, c]] = src[[H - 1 - c, r]]
    gather(scheduler, raster, "rotate_right", true, |r, c| (height - 1 - c, r));
}

// ============================================================================
// Mirror
// ============================================================================

/// Mirror the raster about `axis`. Dimensions are unchanged.
pub fn mirror(scheduler: &Scheduler, raster: &mut Raster, axis: MirrorAxis) {
    let (width, height) = (raster.width(), raster.height());
    match axis {
        MirrorAxis::Horizontal => {
            gather(scheduler, raster, "mirror", false, |r, c| (height - 1 - r, c))
        }
        MirrorAxis::Vertical => {
            gather(scheduler, raster, "mirror", false, |r, c| (r, width - 1 - c))
        }
    }
}

/// Build a new raster where destination `(row, col)` copies the source
/// pixel at `source_of(row, col)`, given as `(row, col)` too.
fn gather<F>(scheduler: &Scheduler, raster: &mut Raster, name: &str, transpose: bool, source_of: F)
where
    F: Fn(usize, usize) -> (usize, usize) + Sync,
{
    if raster.is_empty() {
        skip(name, &RasterError::EmptyRaster);
        return;
    }

    let (out_width, out_height) = if transpose {
        (raster.height(), raster.width())
    } else {
        (raster.width(), raster.height())
    };

    let src = raster.view();
    let transformed = scheduler.run_striped(out_width, out_height, |part, mut stripe| {
        for r in 0..out_height {
            for (local, c) in part.columns().enumerate() {
                let (sr, sc) = source_of(r, c);
                for ch in 0..CHANNELS {
                    stripe[[r, local, ch]] = src[[sr, sc, ch]];
                }
            }
        }
    });
    raster.replace(transformed);
}
