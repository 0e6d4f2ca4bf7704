//! Image buffer types

use crate::view_pipeline::common::error::{Result, ViewError};

/// Value that marks a depth pixel as invalid. Every non-finite value is
/// treated as invalid.
pub const INVALID_DEPTH: f32 = f32::INFINITY;

/// Interleaved, row-major image with `channels` samples per pixel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Image<T> {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<T>,
}

pub type ImageU8 = Image<u8>;
pub type ImageU16 = Image<u16>;
/// Single channel depth or disparity image.
pub type DepthImage = Image<f32>;

impl<T: Copy + Default> Image<T> {
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            data: vec![T::default(); width * height * channels],
        }
    }

    pub fn from_vec(width: usize, height: usize, channels: usize, data: Vec<T>) -> Result<Self> {
        if sample_count(width, height, channels) != Some(data.len()) {
            return Err(ViewError::InvalidDimensions(width, height));
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// True if the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn get(&self, x: usize, y: usize, c: usize) -> T {
        self.data[(y * self.width + x) * self.channels + c]
    }

    pub fn set(&mut self, x: usize, y: usize, c: usize, value: T) {
        self.data[(y * self.width + x) * self.channels + c] = value;
    }

    /// Copies the part of the image described by `region`.
    pub fn crop(&self, region: &Region) -> Result<Self> {
        let (x, y, w, h) = region.resolve(self.width, self.height)?;

        if (x, y, w, h) == (0, 0, self.width, self.height) {
            return Ok(self.clone());
        }

        let row = w * self.channels;
        let mut data = Vec::with_capacity(row * h);

        for k in y..y + h {
            let start = (k * self.width + x) * self.channels;
            data.extend_from_slice(&self.data[start..start + row]);
        }

        Self::from_vec(w, h, self.channels, data)
    }
}

/// Number of samples of an image, `None` if it does not fit into `usize`.
pub fn sample_count(width: usize, height: usize, channels: usize) -> Option<usize> {
    width.checked_mul(height)?.checked_mul(channels)
}

/// Image part in pixels. A non-positive `w` or `h` extends the part to the
/// image border minus `|w|` or `|h|`, so the default value selects the
/// whole image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl Region {
    pub fn new(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self { x, y, w, h }
    }

    pub fn full() -> Self {
        Self::default()
    }

    /// Part at `s` times the resolution, `None` on overflow.
    pub fn scaled(&self, s: usize) -> Option<Self> {
        let s = i64::try_from(s).ok()?;

        Some(Self::new(
            self.x.checked_mul(s)?,
            self.y.checked_mul(s)?,
            self.w.checked_mul(s)?,
            self.h.checked_mul(s)?,
        ))
    }

    /// Resolves the part against an image of the given size. Parts that
    /// reach beyond the border are clipped, empty parts are an error.
    pub fn resolve(&self, width: usize, height: usize) -> Result<(usize, usize, usize, usize)> {
        let (x, w) = resolve_axis(self.x, self.w, width)
            .ok_or(ViewError::InvalidDimensions(width, height))?;
        let (y, h) = resolve_axis(self.y, self.h, height)
            .ok_or(ViewError::InvalidDimensions(width, height))?;

        Ok((x, y, w, h))
    }
}

fn resolve_axis(start: i64, len: i64, extent: usize) -> Option<(usize, usize)> {
    let extent = extent as i64;

    if start < 0 || start >= extent {
        return None;
    }

    let len = if len > 0 { len } else { extent - start + len };
    let len = len.min(extent - start);

    if len <= 0 {
        return None;
    }

    Some((start as usize, len as usize))
}
