//! Window buffers and boundary reflection.
//!
//! Every spatial filter gathers a K x K neighborhood per output pixel into
//! three per-channel [`WindowBuffer`]s. Coordinates that fall outside the
//! raster are reflected back in by [`bounds_control`] (mirror padding about
//! -0.5 and max - 0.5), so no padded copy of the raster is ever allocated.

use std::ops::Index;

use ndarray::ArrayView3;

use crate::raster::CHANNELS;

/// Reflect `x` into `[0, max)`.
///
/// - `x < 0` maps to `-x - 1`
/// - `x >= max` maps to `max - (x - (max - 1))`
/// - anything else is returned unchanged
///
/// Valid for overshoots of at most `max` on either side, which holds for
/// every window that passes [`check_window_size`](super::check_window_size).
#[inline]
pub fn bounds_control(x: isize, max: usize) -> usize {
    let max = max as isize;
    let reflected = if x < 0 {
        -x - 1
    } else if x >= max {
        max - (x - (max - 1))
    } else {
        x
    };
    debug_assert!((0..max).contains(&reflected), "{x} reflects outside 0..{max}");
    reflected as usize
}

/// K x K grid of one channel's samples, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowBuffer {
    size: usize,
    samples: Vec<u8>,
}

impl WindowBuffer {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            samples: vec![0; size * size],
        }
    }

    /// Side length K.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Sample at (`row`, `col`), or `None` when outside the window.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(self.samples[row * self.size + col])
    }

    /// Sample at (`row`, `col`) without the `Option`; bounds are only
    /// debug-asserted.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> u8 {
        debug_assert!(row < self.size && col < self.size);
        self.samples[row * self.size + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        debug_assert!(row < self.size && col < self.size);
        self.samples[row * self.size + col] = value;
    }

    /// Samples of column `col`, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = u8> + '_ {
        self.samples.iter().skip(col).step_by(self.size).copied()
    }

    /// All samples, row-major.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.samples
    }
}

/// The three per-channel windows owned by one worker.
#[derive(Debug, Clone)]
pub struct ChannelWindows {
    size: usize,
    channels: [WindowBuffer; CHANNELS],
}

impl ChannelWindows {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            channels: [
                WindowBuffer::new(size),
                WindowBuffer::new(size),
                WindowBuffer::new(size),
            ],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Gather the window centered on (`row`, `col`) of `source`.
    ///
    /// `source` is indexed `[[y, x, channel]]`; both axes are reflected
    /// independently.
    pub fn fill(&mut self, source: ArrayView3<u8>, row: usize, col: usize) {
        let (height, width, _) = source.dim();
        let half = (self.size / 2) as isize;

        for wy in 0..self.size {
            let sy = bounds_control(row as isize - half + wy as isize, height);
            for wx in 0..self.size {
                let sx = bounds_control(col as isize - half + wx as isize, width);
                for (c, window) in self.channels.iter_mut().enumerate() {
                    window.set(wy, wx, source[[sy, sx, c]]);
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowBuffer> {
        self.channels.iter()
    }
}

impl Index<usize> for ChannelWindows {
    type Output = WindowBuffer;

    fn index(&self, channel: usize) -> &WindowBuffer {
        &self.channels[channel]
    }
}
