use crate::view_pipeline::camera::base::CameraBase;
use crate::view_pipeline::common::error::Result;
use crate::view_pipeline::properties::PropertyStore;

/// Camera in which all rays are parallel and orthogonal to the image.
#[derive(Debug, Clone, PartialEq)]
pub struct OrthoCamera {
    pub base: CameraBase,
    /// Pixel size in world units.
    pub resolution: f64,
    /// Depth value step in world units.
    pub depth_resolution: f64,
}

impl OrthoCamera {
    pub fn from_properties(prop: &PropertyStore) -> Result<Self> {
        let mut base = CameraBase::from_properties(prop)?;
        let resolution: f64 = prop.get_value("resolution")?;
        let depth_resolution = prop.get_value_or("depth.resolution", 1.0)?;

        if prop.contains("origin.T") {
            let mut t = prop.get_vector3("origin.T")?;

            if prop.get_string_or("origin", "corner") == "center" {
                t[0] -= resolution / 2.0;
                t[1] += resolution / 2.0;
            }

            base.t = t;
        }

        Ok(Self {
            base,
            resolution,
            depth_resolution,
        })
    }

    pub fn set_downscaled(&mut self, ds: usize) {
        self.base.set_downscaled(ds);

        if ds > 1 {
            self.resolution *= ds as f64;
            self.depth_resolution *= ds as f64;
        }
    }

    pub fn set_part(&mut self, x: i64, y: i64) {
        self.base.t[0] += x as f64 * self.resolution;
        self.base.t[1] -= y as f64 * self.resolution;
    }

    pub fn to_properties(&self, prop: &mut PropertyStore) {
        self.base.to_properties(prop);
        prop.put_value("resolution", self.resolution);
        prop.put_value("depth.resolution", self.depth_resolution);
    }
}
