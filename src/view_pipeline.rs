//! Depth view loading pipeline
//!
//! This module resolves view specifications into views, with separate
//! modules for parameter files, camera models, images, companion file
//! resolution and view assembly.

pub mod assembly;
pub mod camera;
pub mod common;
pub mod image;
pub mod properties;
pub mod resolve;

pub use common::{Result, ViewError};

pub use properties::PropertyStore;

pub use camera::{Camera, CameraBase, OrthoCamera, PinholeCamera};

pub use image::{
    DepthImage, INVALID_DEPTH, Image, ImageHeader, ImageIo, ImageU8, ImageU16, Region,
    StandardImageIo,
};

pub use resolve::{
    TextureMatch, ViewSpec, generate_prefixes, list_files_with_prefix, texture_rating,
};

pub use assembly::{SEARCH_PATH_ENV, View, ViewConfig, ViewConfigBuilder, ViewLoader};
