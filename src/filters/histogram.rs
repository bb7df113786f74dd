//! Histogram extraction.
//!
//! One pass over the raster counts how often each intensity occurs per
//! channel. Each stripe builds a partial [`HistogramTriple`] and the partials
//! are summed once all workers have joined.

use std::ops::AddAssign;

use super::scheduler::Scheduler;
use crate::raster::{Raster, CHANNELS};

/// Number of intensity levels per channel.
pub const BINS: usize = 256;

/// Per-channel intensity counts of a raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramTriple {
    pub red: [u64; BINS],
    pub green: [u64; BINS],
    pub blue: [u64; BINS],
}

impl Default for HistogramTriple {
    fn default() -> Self {
        Self {
            red: [0; BINS],
            green: [0; BINS],
            blue: [0; BINS],
        }
    }
}

impl HistogramTriple {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts for channel `c` (0 = red, 1 = green, 2 = blue).
    ///
    /// # Panics
    /// If `c >= 3`.
    pub fn channel(&self, c: usize) -> &[u64; BINS] {
        match c {
            0 => &self.red,
            1 => &self.green,
            2 => &self.blue,
            _ => panic!("channel index {c} out of range"),
        }
    }

    fn channels_mut(&mut self) -> [&mut [u64; BINS]; CHANNELS] {
        [&mut self.red, &mut self.green, &mut self.blue]
    }

    /// Count one pixel.
    #[inline]
    pub fn record(&mut self, rgb: [u8; CHANNELS]) {
        self.red[rgb[0] as usize] += 1;
        self.green[rgb[1] as usize] += 1;
        self.blue[rgb[2] as usize] += 1;
    }

    /// Total count in channel `c`; equals the pixel count for a full raster.
    pub fn total(&self, c: usize) -> u64 {
        self.channel(c).iter().sum()
    }
}

impl AddAssign<&HistogramTriple> for HistogramTriple {
    fn add_assign(&mut self, rhs: &HistogramTriple) {
        for (dst, src) in self.channels_mut().into_iter().zip([&rhs.red, &rhs.green, &rhs.blue]) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d += s;
            }
        }
    }
}

/// Count every intensity of every channel in `raster`.
pub fn extract_histogram(scheduler: &Scheduler, raster: &Raster) -> HistogramTriple {
    let src = raster.view();
    scheduler.reduce(
        raster.width(),
        HistogramTriple::new(),
        |part| {
            let mut partial = HistogramTriple::new();
            for y in 0..raster.height() {
                for x in part.columns() {
                    partial.record([src[[y, x, 0]], src[[y, x, 1]], src[[y, x, 2]]]);
                }
            }
            partial
        },
        |mut acc, partial| {
            acc += &partial;
            acc
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::random_raster;

    #[test]
    fn test_histogram_totals_match_pixel_count() {
        let scheduler = Scheduler::new(4).unwrap();
        let raster = random_raster(19, 13, 31);
        let hist = extract_histogram(&scheduler, &raster);
        for c in 0..CHANNELS {
            assert_eq!(hist.total(c), 19 * 13);
        }
    }

    #[test]
    fn test_histogram_counts_values() {
        let scheduler = Scheduler::new(2).unwrap();
        let raster = Raster::from_pixels(
            2,
            2,
            &[[0, 10, 255], [0, 20, 255], [7, 10, 255], [0, 10, 0]],
        )
        .unwrap();
        let hist = extract_histogram(&scheduler, &raster);

        assert_eq!(hist.red[0], 3);
        assert_eq!(hist.red[7], 1);
        assert_eq!(hist.green[10], 3);
        assert_eq!(hist.green[20], 1);
        assert_eq!(hist.blue[255], 3);
        assert_eq!(hist.blue[0], 1);
    }

    #[test]
    fn test_histogram_independent_of_workers() {
        let raster = random_raster(30, 5, 32);
        let single = extract_histogram(&Scheduler::new(1).unwrap(), &raster);
        for workers in [2, 3, 7, 30] {
            let scheduler = Scheduler::new(workers).unwrap();
            assert_eq!(extract_histogram(&scheduler, &raster), single);
        }
    }

    #[test]
    fn test_histogram_empty_raster() {
        let scheduler = Scheduler::new(2).unwrap();
        let hist = extract_histogram(&scheduler, &Raster::new(0, 0));
        assert_eq!(hist, HistogramTriple::default());
    }

    #[test]
    fn test_add_assign_sums_bins() {
        let mut a = HistogramTriple::new();
        a.record([1, 2, 3]);
        let mut b = HistogramTriple::new();
        b.record([1, 5, 3]);
        a += &b;
        assert_eq!(a.red[1], 2);
        assert_eq!(a.green[2], 1);
        assert_eq!(a.green[5], 1);
        assert_eq!(a.blue[3], 2);
    }
}
