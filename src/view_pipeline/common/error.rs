use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("File does not exist: {0}")]
    FileNotFound(PathBuf),

    #[error("Format <key>=<value> expected in {path}: {line}")]
    PropertyFormat { path: PathBuf, line: String },

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid value for key {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid view specification: {0}")]
    InvalidSpec(String),

    #[error("Invalid camera matrix: {0}")]
    InvalidCameraMatrix(String),

    #[error(
        "Cannot create camera object from properties (pinhole: {pinhole}; orthographic: {ortho})"
    )]
    CameraConstruction { pinhole: String, ortho: String },

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Size of {what} is {found:?}, expected {expected:?}")]
    SizeMismatch {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ViewError>;
