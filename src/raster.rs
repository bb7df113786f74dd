//! RGB raster storage.
//!
//! A [`Raster`] is a `(height, width, 3)` array of 8-bit samples in
//! row-major order, the same `[[y, x, channel]]` layout the filters index.
//! Filters never mutate a raster in place: they build a new one and swap it
//! in with [`Raster::replace`].

use ndarray::{Array3, ArrayView3};

use crate::error::{RasterError, RasterResult};

/// Number of color channels per sample.
pub const CHANNELS: usize = 3;

/// One RGB sample: `[red, green, blue]`.
pub type Rgb = [u8; CHANNELS];

/// Width x height grid of RGB samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    data: Array3<u8>,
}

impl Raster {
    /// Create a black raster.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: Array3::<u8>::zeros((height, width, CHANNELS)),
        }
    }

    /// Create a raster where every sample is `rgb`.
    pub fn filled(width: usize, height: usize, rgb: Rgb) -> Self {
        Self {
            data: Array3::from_shape_fn((height, width, CHANNELS), |(_, _, c)| rgb[c]),
        }
    }

    /// Build a raster from row-major samples.
    ///
    /// # Errors
    /// [`RasterError::BufferSize`] if `pixels.len() != width * height`.
    pub fn from_pixels(width: usize, height: usize, pixels: &[Rgb]) -> RasterResult<Self> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(RasterError::BufferSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        let data = Array3::from_shape_fn((height, width, CHANNELS), |(y, x, c)| {
            pixels[y * width + x][c]
        });
        Ok(Self { data })
    }

    /// Build a raster from interleaved `RGBRGB...` bytes.
    ///
    /// # Errors
    /// [`RasterError::BufferSize`] if `bytes.len() != width * height * 3`.
    pub fn from_raw(width: usize, height: usize, bytes: Vec<u8>) -> RasterResult<Self> {
        let actual = bytes.len();
        Array3::from_shape_vec((height, width, CHANNELS), bytes)
            .map(|data| Self { data })
            .map_err(|_| RasterError::BufferSize {
                width,
                height,
                expected: width * height * CHANNELS,
                actual,
            })
    }

    /// Wrap an existing `(height, width, 3)` array.
    ///
    /// # Errors
    /// [`RasterError::ChannelCount`] if the last axis is not 3 long.
    pub fn from_array(data: Array3<u8>) -> RasterResult<Self> {
        let channels = data.dim().2;
        if channels != CHANNELS {
            return Err(RasterError::ChannelCount(channels));
        }
        Ok(Self { data })
    }

    /// Wrap an array the crate built itself with the right shape.
    pub(crate) fn from_rgb_array(data: Array3<u8>) -> Self {
        debug_assert_eq!(data.dim().2, CHANNELS);
        Self { data }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// True when the raster has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Sample at column `x`, row `y`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.pixel(x, y))
    }

    /// Sample at column `x`, row `y`.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the raster.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ]
    }

    /// Overwrite the sample at column `x`, row `y`.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the raster.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: Rgb) {
        for (c, &v) in rgb.iter().enumerate() {
            self.data[[y, x, c]] = v;
        }
    }

    /// Read-only view in `[[y, x, channel]]` order.
    #[inline]
    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    #[inline]
    pub fn as_array(&self) -> &Array3<u8> {
        &self.data
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Interleaved `RGBRGB...` copy of the samples, row-major.
    pub fn to_raw(&self) -> Vec<u8> {
        self.data.iter().copied().collect()
    }

    /// All samples in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        let width = self.width();
        (0..self.height()).flat_map(move |y| (0..width).map(move |x| self.pixel(x, y)))
    }

    /// Swap in a newly built raster, possibly of different dimensions.
    pub fn replace(&mut self, other: Raster) {
        *self = other;
    }
}
