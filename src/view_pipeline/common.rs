//! Common utilities module
//!
//! This module contains the error type shared across the view pipeline.

pub mod error;

pub use error::{Result, ViewError};
