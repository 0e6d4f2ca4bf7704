//! Camera models
//!
//! A view carries either a pinhole or an orthographic camera. Both are
//! constructed from a [`PropertyStore`](crate::view_pipeline::PropertyStore)
//! and follow the image when it is downscaled or cropped.

mod base;
mod model;
mod ortho;
mod pinhole;

pub use base::CameraBase;
pub use model::Camera;
pub use ortho::OrthoCamera;
pub use pinhole::PinholeCamera;
