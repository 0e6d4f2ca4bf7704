use crate::view_pipeline::image::types::{DepthImage, INVALID_DEPTH, ImageU8, ImageU16};

impl DepthImage {
    pub fn is_valid(&self, x: usize, y: usize) -> bool {
        self.get(x, y, 0).is_finite()
    }

    pub fn set_invalid(&mut self, x: usize, y: usize) {
        self.set(x, y, 0, INVALID_DEPTH);
    }

    /// Marks every pixel that equals `sentinel` as invalid and returns the
    /// number of marked pixels.
    pub fn invalidate_value(&mut self, sentinel: f32) -> usize {
        let mut count = 0;

        for v in self.as_slice_mut().iter_mut().filter(|v| **v == sentinel) {
            *v = INVALID_DEPTH;
            count += 1;
        }

        count
    }

    /// Replaces every valid value `v` by `f(v)`. Invalid pixels are kept.
    pub fn map_valid(&mut self, f: impl Fn(f32) -> f32) {
        for v in self.as_slice_mut().iter_mut().filter(|v| v.is_finite()) {
            *v = f(*v);
        }
    }

    /// Reduces the size by `factor`, rounding up. Each output pixel is the
    /// mean of the valid pixels of its block; blocks without any valid pixel
    /// become invalid. Blocks at the right and bottom border may be partial.
    pub fn downscale_average(&self, factor: usize) -> DepthImage {
        let factor = factor.max(1);

        if factor == 1 {
            return self.clone();
        }

        let channels = self.channels();
        let width = self.width().div_ceil(factor);
        let height = self.height().div_ceil(factor);
        let mut ret = DepthImage::new(width, height, channels);

        for c in 0..channels {
            for k in 0..height {
                for i in 0..width {
                    let mut sum = 0.0f64;
                    let mut n = 0usize;

                    for kk in k * factor..((k + 1) * factor).min(self.height()) {
                        for ii in i * factor..((i + 1) * factor).min(self.width()) {
                            let v = self.get(ii, kk, c);

                            if v.is_finite() {
                                sum += v as f64;
                                n += 1;
                            }
                        }
                    }

                    let value = if n > 0 {
                        (sum / n as f64) as f32
                    } else {
                        INVALID_DEPTH
                    };

                    ret.set(i, k, c, value);
                }
            }
        }

        ret
    }
}

impl ImageU16 {
    pub fn max_value(&self) -> u16 {
        self.as_slice().iter().copied().max().unwrap_or(0)
    }

    /// Rescales linearly so that the maximum becomes 255. An all-zero image
    /// is converted without scaling.
    pub fn to_u8_scaled(&self) -> ImageU8 {
        let max = self.max_value();
        let scale = if max != 0 { 255.0 / max as f64 } else { 1.0 };

        let mut ret = ImageU8::new(self.width(), self.height(), self.channels());

        for (dst, &src) in ret.as_slice_mut().iter_mut().zip(self.as_slice()) {
            *dst = (src as f64 * scale).round().min(255.0) as u8;
        }

        ret
    }
}

impl ImageU8 {
    pub fn to_u16(&self) -> ImageU16 {
        let mut ret = ImageU16::new(self.width(), self.height(), self.channels());

        for (dst, &src) in ret.as_slice_mut().iter_mut().zip(self.as_slice()) {
            *dst = src as u16;
        }

        ret
    }

    /// Reduces the size by `factor`, rounding up, by averaging the samples
    /// of each block.
    pub fn downscale_average(&self, factor: usize) -> ImageU8 {
        let factor = factor.max(1);

        if factor == 1 {
            return self.clone();
        }

        let channels = self.channels();
        let width = self.width().div_ceil(factor);
        let height = self.height().div_ceil(factor);
        let mut ret = ImageU8::new(width, height, channels);

        for k in 0..height {
            for i in 0..width {
                let rows = k * factor..((k + 1) * factor).min(self.height());
                let cols = i * factor..((i + 1) * factor).min(self.width());
                let n = (rows.len() * cols.len()) as u32;

                for c in 0..channels {
                    let mut sum = 0u32;

                    for kk in rows.clone() {
                        for ii in cols.clone() {
                            sum += self.get(ii, kk, c) as u32;
                        }
                    }

                    ret.set(i, k, c, ((sum + n / 2) / n) as u8);
                }
            }
        }

        ret
    }
}
