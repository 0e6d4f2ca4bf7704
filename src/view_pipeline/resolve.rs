//! Companion file resolution
//!
//! This module turns a view specification into the files that make up the
//! view: parameter files found next to the depth image, benchmark
//! calibration files and the texture image.

mod calibration;
mod files;
mod prefixes;
mod spec;
mod texture;

pub use calibration::resolve_properties;
pub use files::list_files_with_prefix;
pub use prefixes::{basename_start, benchmark_digit, generate_prefixes, tile_separator};
pub use spec::ViewSpec;
pub use texture::{TextureMatch, resolve_texture, texture_rating};
