//! Image codec backend for files on disk.
//!
//! TIFF files are decoded with the tiff library, PFM files in-crate and
//! every other format through the image library, which guesses the format
//! from the file content.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{DynamicImage, ImageDecoder, ImageReader};
use tiff::decoder::{Decoder as TiffDecoder, DecodingResult};
use tracing::debug;

use crate::view_pipeline::common::error::{Result, ViewError};
use crate::view_pipeline::image::io::{ImageHeader, ImageIo};
use crate::view_pipeline::image::pfm;
use crate::view_pipeline::image::types::{DepthImage, Image, ImageU8, ImageU16, Region};

/// Decoded samples with their stored width.
enum Samples {
    U8(ImageU8),
    U16(ImageU16),
    F32(Image<f32>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Codec {
    Pfm,
    Tiff,
    Generic,
}

fn codec_of(path: &Path) -> Codec {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pfm" => Codec::Pfm,
        "tif" | "tiff" => Codec::Tiff,
        _ => Codec::Generic,
    }
}

fn check_exists(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(ViewError::FileNotFound(path.to_path_buf()));
    }

    Ok(())
}

fn decode_error(path: &Path, e: impl std::fmt::Display) -> ViewError {
    ViewError::DecodeError(format!("{}: {}", path.display(), e))
}

fn tiff_channels(colortype: &tiff::ColorType) -> Option<usize> {
    match colortype {
        tiff::ColorType::Gray(_) => Some(1),
        tiff::ColorType::GrayA(_) => Some(2),
        tiff::ColorType::RGB(_) => Some(3),
        tiff::ColorType::RGBA(_) => Some(4),
        _ => None,
    }
}

fn open_tiff(path: &Path) -> Result<TiffDecoder<BufReader<File>>> {
    TiffDecoder::new(BufReader::new(File::open(path)?)).map_err(|e| decode_error(path, e))
}

fn open_generic(path: &Path) -> Result<ImageReader<BufReader<File>>> {
    Ok(ImageReader::open(path)?.with_guessed_format()?)
}

/// Reads images with the image and tiff libraries, and PFM files in-crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardImageIo;

impl StandardImageIo {
    fn decode(&self, path: &Path) -> Result<Samples> {
        check_exists(path)?;
        debug!("Decoding image {}", path.display());

        match codec_of(path) {
            Codec::Pfm => Ok(Samples::F32(pfm::read_pfm(path)?)),
            Codec::Tiff => self.decode_tiff(path),
            Codec::Generic => self.decode_generic(path),
        }
    }

    fn decode_tiff(&self, path: &Path) -> Result<Samples> {
        let mut decoder = open_tiff(path)?;
        let (width, height) = decoder.dimensions().map_err(|e| decode_error(path, e))?;
        let colortype = decoder.colortype().map_err(|e| decode_error(path, e))?;
        let channels = tiff_channels(&colortype)
            .ok_or_else(|| ViewError::UnsupportedFormat(format!("{:?}", colortype)))?;
        let (width, height) = (width as usize, height as usize);

        match decoder.read_image().map_err(|e| decode_error(path, e))? {
            DecodingResult::U8(data) => Ok(Samples::U8(Image::from_vec(width, height, channels, data)?)),
            DecodingResult::U16(data) => Ok(Samples::U16(Image::from_vec(width, height, channels, data)?)),
            DecodingResult::F32(data) => Ok(Samples::F32(Image::from_vec(width, height, channels, data)?)),
            _ => Err(ViewError::UnsupportedFormat(format!(
                "{}: sample type of {:?}",
                path.display(),
                colortype
            ))),
        }
    }

    fn decode_generic(&self, path: &Path) -> Result<Samples> {
        let img = open_generic(path)?
            .decode()
            .map_err(|e| decode_error(path, e))?;
        let (width, height) = (img.width() as usize, img.height() as usize);

        let samples = match img {
            DynamicImage::ImageLuma8(b) => Samples::U8(Image::from_vec(width, height, 1, b.into_raw())?),
            DynamicImage::ImageLumaA8(b) => Samples::U8(Image::from_vec(width, height, 2, b.into_raw())?),
            DynamicImage::ImageRgb8(b) => Samples::U8(Image::from_vec(width, height, 3, b.into_raw())?),
            DynamicImage::ImageRgba8(b) => Samples::U8(Image::from_vec(width, height, 4, b.into_raw())?),
            DynamicImage::ImageLuma16(b) => Samples::U16(Image::from_vec(width, height, 1, b.into_raw())?),
            DynamicImage::ImageLumaA16(b) => Samples::U16(Image::from_vec(width, height, 2, b.into_raw())?),
            DynamicImage::ImageRgb16(b) => Samples::U16(Image::from_vec(width, height, 3, b.into_raw())?),
            DynamicImage::ImageRgba16(b) => Samples::U16(Image::from_vec(width, height, 4, b.into_raw())?),
            DynamicImage::ImageRgb32F(b) => Samples::F32(Image::from_vec(width, height, 3, b.into_raw())?),
            DynamicImage::ImageRgba32F(b) => Samples::F32(Image::from_vec(width, height, 4, b.into_raw())?),
            other => {
                return Err(ViewError::UnsupportedFormat(format!(
                    "{}: {:?}",
                    path.display(),
                    other.color()
                )));
            }
        };

        Ok(samples)
    }
}

impl ImageIo for StandardImageIo {
    fn load_header(&self, path: &str) -> Result<ImageHeader> {
        let path = Path::new(path);
        check_exists(path)?;

        match codec_of(path) {
            Codec::Pfm => pfm::read_pfm_header(path),
            Codec::Tiff => {
                let mut decoder = open_tiff(path)?;
                let (width, height) = decoder.dimensions().map_err(|e| decode_error(path, e))?;
                let colortype = decoder.colortype().map_err(|e| decode_error(path, e))?;
                let channels = tiff_channels(&colortype)
                    .ok_or_else(|| ViewError::UnsupportedFormat(format!("{:?}", colortype)))?;

                Ok(ImageHeader {
                    width: width as usize,
                    height: height as usize,
                    channels,
                })
            }
            Codec::Generic => {
                let decoder = open_generic(path)?
                    .into_decoder()
                    .map_err(|e| decode_error(path, e))?;
                let (width, height) = decoder.dimensions();

                Ok(ImageHeader {
                    width: width as usize,
                    height: height as usize,
                    channels: decoder.color_type().channel_count() as usize,
                })
            }
        }
    }

    fn load_u8(&self, path: &str, region: &Region) -> Result<ImageU8> {
        match self.decode(Path::new(path))? {
            Samples::U8(image) => image.crop(region),
            Samples::U16(_) => Err(ViewError::UnsupportedFormat(format!(
                "{}: 16 bit samples",
                path
            ))),
            Samples::F32(_) => Err(ViewError::UnsupportedFormat(format!(
                "{}: floating point samples",
                path
            ))),
        }
    }

    fn load_u16(&self, path: &str, region: &Region) -> Result<ImageU16> {
        match self.decode(Path::new(path))? {
            Samples::U8(image) => image.crop(region).map(|i| i.to_u16()),
            Samples::U16(image) => image.crop(region),
            Samples::F32(_) => Err(ViewError::UnsupportedFormat(format!(
                "{}: floating point samples",
                path
            ))),
        }
    }

    fn load_depth(&self, path: &str, region: &Region) -> Result<DepthImage> {
        let depth = match self.decode(Path::new(path))? {
            Samples::U8(image) => to_depth(image.crop(region)?, |v| v as f32),
            Samples::U16(image) => to_depth(image.crop(region)?, |v| v as f32),
            Samples::F32(image) => image.crop(region)?,
        };

        if depth.channels() != 1 {
            return Err(ViewError::UnsupportedFormat(format!(
                "{}: depth image with {} channels",
                path,
                depth.channels()
            )));
        }

        Ok(depth)
    }
}

fn to_depth<T: Copy + Default>(image: Image<T>, f: impl Fn(T) -> f32) -> DepthImage {
    let mut ret = DepthImage::new(image.width(), image.height(), image.channels());

    for (dst, &src) in ret.as_slice_mut().iter_mut().zip(image.as_slice()) {
        *dst = f(src);
    }

    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, Luma, RgbImage};

    #[test]
    fn test_png_header_and_region() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("im0.png");
        let img = GrayImage::from_fn(8, 6, |x, y| Luma([(x + 10 * y) as u8]));
        img.save(&path).map_err(|e| decode_error(&path, e))?;
        let name = path.to_string_lossy();

        let io = StandardImageIo;
        assert_eq!(
            io.load_header(&name)?,
            ImageHeader {
                width: 8,
                height: 6,
                channels: 1
            }
        );

        let part = io.load_u8(&name, &Region::new(2, 1, 3, 2))?;
        assert_eq!(part.size(), (3, 2));
        assert_eq!(part.as_slice(), &[12, 13, 14, 22, 23, 24]);
        Ok(())
    }

    #[test]
    fn test_sixteen_bit_png_is_rejected_as_u8() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("wide.png");
        let img: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_fn(4, 4, |x, _| Luma([1000 * x as u16]));
        img.save(&path).map_err(|e| decode_error(&path, e))?;
        let name = path.to_string_lossy();

        let io = StandardImageIo;
        assert!(matches!(
            io.load_u8(&name, &Region::full()),
            Err(ViewError::UnsupportedFormat(_))
        ));

        let wide = io.load_u16(&name, &Region::full())?;
        assert_eq!(wide.max_value(), 3000);
        Ok(())
    }

    #[test]
    fn test_color_image_is_not_depth() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("color.png");
        RgbImage::new(4, 4)
            .save(&path)
            .map_err(|e| decode_error(&path, e))?;

        let io = StandardImageIo;
        let name = path.to_string_lossy();
        assert_eq!(io.load_header(&name)?.channels, 3);
        assert!(io.load_depth(&name, &Region::full()).is_err());
        Ok(())
    }

    #[test]
    fn test_pgm_depth() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("disp0.pgm");
        std::fs::write(&path, b"P5\n3 1\n255\n\x01\x02\x03")?;

        let depth = StandardImageIo.load_depth(&path.to_string_lossy(), &Region::full())?;
        assert_eq!(depth.as_slice(), &[1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let result = StandardImageIo.load_header("/nonexistent/disp0.pfm");
        assert!(matches!(result, Err(ViewError::FileNotFound(_))));
    }
}
