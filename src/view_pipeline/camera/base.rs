use nalgebra::{Matrix3, Vector3};

use crate::view_pipeline::common::error::Result;
use crate::view_pipeline::properties::PropertyStore;

pub(crate) fn camera_key(key: &str) -> String {
    format!("camera.{}", key)
}

/// Extrinsics and image size shared by all camera models. A world point
/// is `Pw = R * Pc + T`.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraBase {
    pub width: usize,
    pub height: usize,
    pub r: Matrix3<f64>,
    pub t: Vector3<f64>,
    pub zmin: f64,
    pub zmax: f64,
    /// Names of views that this view can be matched against.
    pub matches: Vec<String>,
}

impl Default for CameraBase {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            r: Matrix3::identity(),
            t: Vector3::zeros(),
            zmin: 0.0,
            zmax: f64::MAX,
            matches: Vec::new(),
        }
    }
}

impl CameraBase {
    pub fn from_properties(prop: &PropertyStore) -> Result<Self> {
        let mut zmax = prop.get_value_or(&camera_key("zmax"), -1.0)?;

        if zmax < 0.0 {
            zmax = f64::MAX;
        }

        Ok(Self {
            width: prop.get_value_or(&camera_key("width"), 0)?,
            height: prop.get_value_or(&camera_key("height"), 0)?,
            r: prop.get_matrix3_or(&camera_key("R"), Matrix3::identity())?,
            t: prop.get_vector3_or(&camera_key("T"), Vector3::zeros())?,
            zmin: prop.get_value_or(&camera_key("zmin"), 0.0)?,
            zmax,
            matches: prop.get_string_vector(&camera_key("match"), Some(""), ',')?,
        })
    }

    /// Size after downscaling by `ds`, rounding up.
    pub fn set_downscaled(&mut self, ds: usize) {
        if ds > 1 {
            self.width = self.width.div_ceil(ds);
            self.height = self.height.div_ceil(ds);
        }
    }

    pub fn to_properties(&self, prop: &mut PropertyStore) {
        prop.put_matrix3(&camera_key("R"), &self.r);
        prop.put_vector3(&camera_key("T"), &self.t);

        if self.width != 0 {
            prop.put_value(&camera_key("width"), self.width);
        }

        if self.height != 0 {
            prop.put_value(&camera_key("height"), self.height);
        }

        if self.zmin != 0.0 || self.zmax != f64::MAX {
            prop.put_value(&camera_key("zmin"), self.zmin);
            prop.put_value(&camera_key("zmax"), self.zmax);
        }

        if !self.matches.is_empty() {
            prop.put_string_vector(&camera_key("match"), &self.matches, ',');
        }
    }
}
