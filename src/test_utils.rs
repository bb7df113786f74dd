//! Raster builders and reference implementations shared by unit tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::filters::rank::RankStatistic;
use crate::filters::window::bounds_control;
use crate::raster::{Raster, CHANNELS};

/// Reproducible raster of uniformly random samples.
pub fn random_raster(width: usize, height: usize, seed: u64) -> Raster {
    let mut rng = StdRng::seed_from_u64(seed);
    let bytes = (0..width * height * CHANNELS)
        .map(|_| rng.random::<u8>())
        .collect();
    Raster::from_raw(width, height, bytes).unwrap()
}

/// Rank filter computed by sorting every reflected window.
pub fn brute_force_rank(raster: &Raster, size: usize, statistic: RankStatistic) -> Raster {
    let (width, height) = (raster.width(), raster.height());
    let half = (size / 2) as isize;
    let mut out = Raster::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let mut rgb = [0u8; CHANNELS];
            for (c, slot) in rgb.iter_mut().enumerate() {
                let mut values = Vec::with_capacity(size * size);
                for dy in -half..=half {
                    for dx in -half..=half {
                        let sy = bounds_control(y as isize + dy, height);
                        let sx = bounds_control(x as isize + dx, width);
                        values.push(raster.pixel(sx, sy)[c]);
                    }
                }
                values.sort_unstable();
                *slot = match statistic {
                    RankStatistic::Median => values[values.len() / 2],
                    RankStatistic::Minimum => values[0],
                    RankStatistic::Maximum => values[values.len() - 1],
                };
            }
            out.set_pixel(x, y, rgb);
        }
    }
    out
}
