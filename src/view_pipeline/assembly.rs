//! View assembly module
//!
//! This module binds camera, depth image and texture image into a `View`
//! and contains the loader that resolves a view specification into one.

mod config;
mod pipeline;
mod view;


pub use config::{SEARCH_PATH_ENV, ViewConfig, ViewConfigBuilder};
pub use pipeline::ViewLoader;
pub use view::View;
