//! Image buffers and codecs
//!
//! This module provides the pixel buffers bound into a view, the image I/O
//! seam used by the resolvers and the standard codec backend behind it.

mod io;
mod ops;
pub mod pfm;
mod standard_io;
mod types;

pub use io::{ImageHeader, ImageIo};
pub use standard_io::StandardImageIo;
pub use types::{DepthImage, INVALID_DEPTH, Image, ImageU8, ImageU16, Region};
