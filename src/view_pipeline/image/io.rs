use crate::view_pipeline::common::error::Result;
use crate::view_pipeline::image::types::{DepthImage, ImageU8, ImageU16, Region};

/// Size and channel count of an image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

/// Image codec backend used by the view loader.
///
/// Every `load_*` method reads the part `region` of the image, given in
/// pixels of the stored, full resolution image.
pub trait ImageIo {
    fn load_header(&self, path: &str) -> Result<ImageHeader>;

    /// Loads an image with 8 bit samples. Sources with wider samples are
    /// rejected.
    fn load_u8(&self, path: &str, region: &Region) -> Result<ImageU8>;

    fn load_u16(&self, path: &str, region: &Region) -> Result<ImageU16>;

    /// Loads a single channel image as floating point depth values.
    fn load_depth(&self, path: &str, region: &Region) -> Result<DepthImage>;
}
