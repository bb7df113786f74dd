//! Sliding-window order statistics.
//!
//! Each worker keeps one 256-bin [`WindowHistogram`] per channel and scans
//! its stripe row by row, left to right:
//!
//! 1. At the stripe's first column the histogram is rebuilt from the full
//!    K x K window.
//! 2. At every later column only the new rightmost window column is added.
//! 3. After the statistic is read, the leftmost column is removed so the
//!    histogram is ready for the next one-pixel slide.
//!
//! Histogram upkeep is O(K) per pixel instead of O(K²); the window itself is
//! still gathered per pixel so that boundary reflection stays trivial.

use ndarray::ArrayView3;

use super::scheduler::Scheduler;
use super::window::{ChannelWindows, WindowBuffer};
use crate::raster::{Raster, CHANNELS};

const BINS: usize = 256;

/// Which order statistic to read from a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankStatistic {
    Median,
    Minimum,
    Maximum,
}

/// Per-channel count of sample values inside the current window.
#[derive(Debug, Clone)]
pub struct WindowHistogram {
    bins: [u32; BINS],
    population: u32,
}

impl Default for WindowHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowHistogram {
    pub fn new() -> Self {
        Self {
            bins: [0; BINS],
            population: 0,
        }
    }

    /// Clear and count every sample of `window`.
    pub fn reset(&mut self, window: &WindowBuffer) {
        self.bins = [0; BINS];
        for &v in window.as_slice() {
            self.bins[v as usize] += 1;
        }
        self.population = window.as_slice().len() as u32;
    }

    /// Count the samples of window column `col`.
    pub fn add_column(&mut self, window: &WindowBuffer, col: usize) {
        for v in window.column(col) {
            self.bins[v as usize] += 1;
            self.population += 1;
        }
    }

    /// Uncount the samples of window column `col`.
    pub fn remove_column(&mut self, window: &WindowBuffer, col: usize) {
        for v in window.column(col) {
            debug_assert!(self.bins[v as usize] > 0, "removing uncounted sample {v}");
            self.bins[v as usize] -= 1;
            self.population -= 1;
        }
    }

    /// Number of samples currently counted.
    #[inline]
    pub fn population(&self) -> u32 {
        self.population
    }

    #[inline]
    pub fn count(&self, value: u8) -> u32 {
        self.bins[value as usize]
    }

    /// First value whose running count exceeds half the population.
    pub fn median(&self) -> u8 {
        let half = self.population / 2;
        let mut running = 0;
        for (value, &count) in self.bins.iter().enumerate() {
            running += count;
            if running > half {
                return value as u8;
            }
        }
        0
    }

    /// Smallest value present.
    pub fn minimum(&self) -> u8 {
        self.bins
            .iter()
            .position(|&count| count != 0)
            .map_or(0, |v| v as u8)
    }

    /// Largest value present.
    pub fn maximum(&self) -> u8 {
        self.bins
            .iter()
            .rposition(|&count| count != 0)
            .map_or(0, |v| v as u8)
    }

    pub fn statistic(&self, statistic: RankStatistic) -> u8 {
        match statistic {
            RankStatistic::Median => self.median(),
            RankStatistic::Minimum => self.minimum(),
            RankStatistic::Maximum => self.maximum(),
        }
    }
}

/// Run a `size` x `size` rank filter over `raster` and return the result.
///
/// The caller validates `size`; see [`check_window_size`](super::check_window_size).
pub(crate) fn rank_filter(
    scheduler: &Scheduler,
    raster: &Raster,
    size: usize,
    statistic: RankStatistic,
) -> Raster {
    let src = raster.view();
    let height = raster.height();

    scheduler.run_striped(raster.width(), height, |part, mut stripe| {
        let mut windows = ChannelWindows::new(size);
        let mut hists: [WindowHistogram; CHANNELS] = Default::default();

        for y in 0..height {
            for (local, x) in part.columns().enumerate() {
                slide(&mut windows, &mut hists, src, y, x, local == 0);
                for (c, hist) in hists.iter_mut().enumerate() {
                    stripe[[y, local, c]] = hist.statistic(statistic);
                    hist.remove_column(&windows[c], 0);
                }
            }
        }
    })
}

/// Gather the window at (`y`, `x`) and bring each channel's histogram up to
/// date with it.
#[inline]
fn slide(
    windows: &mut ChannelWindows,
    hists: &mut [WindowHistogram; CHANNELS],
    src: ArrayView3<u8>,
    y: usize,
    x: usize,
    new_row: bool,
) {
    windows.fill(src, y, x);
    let last = windows.size() - 1;
    for (hist, window) in hists.iter_mut().zip(windows.iter()) {
        if new_row {
            hist.reset(window);
        } else {
            hist.add_column(window, last);
        }
    }
}
