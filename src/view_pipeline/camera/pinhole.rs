use nalgebra::Matrix3;

use crate::view_pipeline::camera::base::{CameraBase, camera_key};
use crate::view_pipeline::common::error::{Result, ViewError};
use crate::view_pipeline::properties::{PropertyStore, format_matrix3};

/// Camera in which all rays pass through the center of projection.
///
/// `rho` converts depth to disparity (`d = rho / z`). It is zero when
/// unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct PinholeCamera {
    pub base: CameraBase,
    a: Matrix3<f64>,
    rho: f64,
}

impl PinholeCamera {
    pub fn new(base: CameraBase, a: Matrix3<f64>, rho: f64) -> Result<Self> {
        validate_camera_matrix(&a)?;
        Ok(Self { base, a, rho })
    }

    /// Reads `camera.A` (required), `origin`, `camera.dx`, `camera.dy` and
    /// `rho`. Without an explicit `rho` it is derived from `f * t`.
    pub fn from_properties(prop: &PropertyStore) -> Result<Self> {
        let base = CameraBase::from_properties(prop)?;
        let mut a = prop.get_matrix3(&camera_key("A"))?;

        if prop.get_string_or("origin", "corner") == "center" {
            a[(0, 2)] += 0.5;
            a[(1, 2)] += 0.5;
        }

        a[(0, 2)] += prop.get_value_or::<f64>(&camera_key("dx"), 0.0)?;
        a[(1, 2)] += prop.get_value_or::<f64>(&camera_key("dy"), 0.0)?;

        let mut rho = prop.get_value_or(&camera_key("rho"), 0.0)?;

        if rho == 0.0 {
            rho = prop.get_value_or("rho", 0.0)?;
        }

        if rho == 0.0 {
            let f: f64 = prop.get_value_or("f", 0.0)?;
            let t: f64 = prop.get_value_or("t", 0.0)?;
            rho = f * t;
        }

        Self::new(base, a, rho)
    }

    pub fn a(&self) -> &Matrix3<f64> {
        &self.a
    }

    pub fn set_a(&mut self, a: Matrix3<f64>) -> Result<()> {
        validate_camera_matrix(&a)?;
        self.a = a;
        Ok(())
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    pub fn set_downscaled(&mut self, ds: usize) {
        self.base.set_downscaled(ds);

        if ds > 1 {
            self.a /= ds as f64;
            self.a[(2, 2)] = 1.0;
            self.rho /= ds as f64;
        }
    }

    pub fn set_part(&mut self, x: i64, y: i64) {
        self.a[(0, 2)] -= x as f64;
        self.a[(1, 2)] -= y as f64;
    }

    pub fn to_properties(&self, prop: &mut PropertyStore) {
        self.base.to_properties(prop);
        prop.put_matrix3(&camera_key("A"), &self.a);
        prop.put_value(&camera_key("rho"), self.rho);
    }
}

fn validate_camera_matrix(a: &Matrix3<f64>) -> Result<()> {
    if a[(1, 0)] != 0.0 || a[(2, 0)] != 0.0 || a[(2, 1)] != 0.0 || a[(2, 2)] != 1.0 {
        return Err(ViewError::InvalidCameraMatrix(format_matrix3(a)));
    }

    Ok(())
}
