//! Key/value parameter files
//!
//! This module provides the property store that camera parameters and
//! depth encoding hints are read from, together with the bracket syntax
//! used for matrices and vectors inside property values.

mod store;
pub mod values;

pub use store::PropertyStore;
pub use values::{format_matrix3, format_vector3, parse_matrix3, parse_vector3};
