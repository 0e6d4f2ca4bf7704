use tracing::debug;

use crate::view_pipeline::camera::{CameraBase, OrthoCamera, PinholeCamera};
use crate::view_pipeline::common::error::{Result, ViewError};
use crate::view_pipeline::properties::PropertyStore;

#[derive(Debug, Clone, PartialEq)]
pub enum Camera {
    Pinhole(PinholeCamera),
    Ortho(OrthoCamera),
}

impl Camera {
    /// Tries the pinhole model first and the orthographic model second.
    /// If neither accepts the properties, both diagnostics are returned.
    pub fn from_properties(prop: &PropertyStore) -> Result<Self> {
        let pinhole = match PinholeCamera::from_properties(prop) {
            Ok(camera) => return Ok(Camera::Pinhole(camera)),
            Err(e) => e,
        };

        debug!("Cannot create pinhole camera from properties: {}", pinhole);

        let ortho = match OrthoCamera::from_properties(prop) {
            Ok(camera) => return Ok(Camera::Ortho(camera)),
            Err(e) => e,
        };

        debug!("Cannot create ortho camera from properties: {}", ortho);

        Err(ViewError::CameraConstruction {
            pinhole: pinhole.to_string(),
            ortho: ortho.to_string(),
        })
    }

    pub fn base(&self) -> &CameraBase {
        match self {
            Camera::Pinhole(c) => &c.base,
            Camera::Ortho(c) => &c.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut CameraBase {
        match self {
            Camera::Pinhole(c) => &mut c.base,
            Camera::Ortho(c) => &mut c.base,
        }
    }

    pub fn width(&self) -> usize {
        self.base().width
    }

    pub fn height(&self) -> usize {
        self.base().height
    }

    /// True if the camera knows its image size.
    pub fn has_size(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        let base = self.base_mut();
        base.width = width;
        base.height = height;
    }

    pub fn is_perspective(&self) -> bool {
        matches!(self, Camera::Pinhole(_))
    }

    pub fn set_downscaled(&mut self, ds: usize) {
        match self {
            Camera::Pinhole(c) => c.set_downscaled(ds),
            Camera::Ortho(c) => c.set_downscaled(ds),
        }
    }

    /// Restricts the camera to the image part starting at `(x, y)`. A
    /// non-positive `w` or `h` leaves that dimension unknown.
    pub fn set_part(&mut self, x: i64, y: i64, w: i64, h: i64) {
        self.set_size(w.max(0) as usize, h.max(0) as usize);

        match self {
            Camera::Pinhole(c) => c.set_part(x, y),
            Camera::Ortho(c) => c.set_part(x, y),
        }
    }

    pub fn to_properties(&self, prop: &mut PropertyStore) {
        match self {
            Camera::Pinhole(c) => c.to_properties(prop),
            Camera::Ortho(c) => c.to_properties(prop),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Matrix3;
    use std::path::Path;

    fn props(text: &str) -> PropertyStore {
        PropertyStore::parse(text, Path::new("camera.txt")).unwrap()
    }

    #[test]
    fn test_pinhole_preferred() {
        let prop = props(
            "camera.A=[100 0 32; 0 100 24; 0 0 1]\ncamera.width=64\ncamera.height=48\nresolution=0.5\n",
        );
        let camera = Camera::from_properties(&prop).unwrap();

        assert!(camera.is_perspective());
        assert_eq!((camera.width(), camera.height()), (64, 48));
    }

    #[test]
    fn test_ortho_fallback() {
        let prop = props("resolution=0.5\norigin.T=[10 20 0]\norigin=center\n");
        let camera = Camera::from_properties(&prop).unwrap();

        let Camera::Ortho(ortho) = &camera else {
            panic!("expected orthographic camera");
        };
        assert_relative_eq!(ortho.base.t[0], 9.75);
        assert_relative_eq!(ortho.base.t[1], 20.25);
        assert!(!camera.has_size());
    }

    #[test]
    fn test_construction_failure_carries_both_diagnostics() {
        let err = Camera::from_properties(&props("f=100\n")).unwrap_err();

        let ViewError::CameraConstruction { pinhole, ortho } = &err else {
            panic!("unexpected error: {err}");
        };
        assert!(pinhole.contains("camera.A"));
        assert!(ortho.contains("resolution"));
    }

    #[test]
    fn test_invalid_camera_matrix() {
        let result = PinholeCamera::from_properties(&props("camera.A=[100 0 32; 1 100 24; 0 0 1]\n"));
        assert!(matches!(result, Err(ViewError::InvalidCameraMatrix(_))));
    }

    #[test]
    fn test_rho_from_focal_length_and_baseline() {
        let camera =
            PinholeCamera::from_properties(&props("camera.A=[200 0 10; 0 200 10; 0 0 1]\nf=200\nt=0.5\n"))
                .unwrap();
        assert_relative_eq!(camera.rho(), 100.0);
    }

    #[test]
    fn test_center_origin_and_principal_point_offset() {
        let camera = PinholeCamera::from_properties(&props(
            "camera.A=[200 0 10; 0 200 20; 0 0 1]\norigin=center\ncamera.dx=1\ncamera.dy=-2\n",
        ))
        .unwrap();

        assert_relative_eq!(camera.a()[(0, 2)], 11.5);
        assert_relative_eq!(camera.a()[(1, 2)], 18.5);
    }

    #[test]
    fn test_downscale_and_part_pinhole() {
        let prop = props(
            "camera.A=[100 0 50; 0 100 40; 0 0 1]\ncamera.width=101\ncamera.height=80\nrho=30\n",
        );
        let mut camera = Camera::from_properties(&prop).unwrap();

        camera.set_downscaled(2);
        assert_eq!((camera.width(), camera.height()), (51, 40));

        camera.set_part(5, 4, 20, 10);
        assert_eq!((camera.width(), camera.height()), (20, 10));

        let Camera::Pinhole(pinhole) = &camera else {
            panic!("expected pinhole camera");
        };
        assert_relative_eq!(pinhole.a()[(0, 0)], 50.0);
        assert_relative_eq!(pinhole.a()[(0, 2)], 20.0);
        assert_relative_eq!(pinhole.a()[(1, 2)], 16.0);
        assert_relative_eq!(pinhole.a()[(2, 2)], 1.0);
        assert_relative_eq!(pinhole.rho(), 15.0);
    }

    #[test]
    fn test_downscale_and_part_ortho() {
        let mut camera =
            Camera::from_properties(&props("resolution=0.5\ncamera.T=[0 0 0]\n")).unwrap();

        camera.set_downscaled(2);
        camera.set_part(3, 2, 0, 0);

        let Camera::Ortho(ortho) = &camera else {
            panic!("expected orthographic camera");
        };
        assert_relative_eq!(ortho.resolution, 1.0);
        assert_relative_eq!(ortho.depth_resolution, 2.0);
        assert_relative_eq!(ortho.base.t[0], 3.0);
        assert_relative_eq!(ortho.base.t[1], -2.0);
        assert!(!camera.has_size());
    }

    #[test]
    fn test_properties_round_trip() {
        let prop = props(
            "camera.A=[100 0 50; 0 100 40; 0 0 1]\ncamera.width=64\ncamera.height=48\ncamera.T=[0.2 0 0]\nrho=12\ncamera.match=b.pfm\n",
        );
        let camera = Camera::from_properties(&prop).unwrap();

        let mut written = PropertyStore::new();
        camera.to_properties(&mut written);

        assert_eq!(Camera::from_properties(&written).unwrap(), camera);
        assert_eq!(written.get_matrix3("camera.R").unwrap(), Matrix3::identity());
    }
}
