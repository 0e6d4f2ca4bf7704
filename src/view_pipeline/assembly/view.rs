use crate::view_pipeline::camera::Camera;
use crate::view_pipeline::common::error::{Result, ViewError};
use crate::view_pipeline::image::{DepthImage, ImageU8};

fn known(size: (usize, usize)) -> bool {
    size.0 > 0 && size.1 > 0
}

/// Camera, texture image and depth image of one view.
///
/// Camera, image and depth always agree in size wherever a size is known.
/// The setters panic if a new part contradicts the parts already set; a
/// camera without size takes the size of the images.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    camera: Option<Camera>,
    image: ImageU8,
    depth: DepthImage,
    depth_step: f32,
}

impl Default for View {
    fn default() -> Self {
        Self {
            camera: None,
            image: ImageU8::default(),
            depth: DepthImage::default(),
            depth_step: 1.0,
        }
    }
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes camera and images. The depth step is kept.
    pub fn clear(&mut self) {
        self.camera = None;
        self.image = ImageU8::default();
        self.depth = DepthImage::default();
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn image(&self) -> &ImageU8 {
        &self.image
    }

    pub fn depth(&self) -> &DepthImage {
        &self.depth
    }

    pub fn depth_step(&self) -> f32 {
        self.depth_step
    }

    pub fn set_depth_step(&mut self, step: f32) {
        self.depth_step = step;
    }

    /// Size of the view, taken from the depth image, the image or the
    /// camera, whichever is known first. `(0, 0)` if nothing is known.
    pub fn size(&self) -> (usize, usize) {
        if known(self.depth.size()) {
            return self.depth.size();
        }

        if known(self.image.size()) {
            return self.image.size();
        }

        self.camera
            .as_ref()
            .map(|c| (c.width(), c.height()))
            .filter(|s| known(*s))
            .unwrap_or((0, 0))
    }

    /// Checks that a part of size `found` can be added to the view.
    pub fn check_size(&self, what: &'static str, found: (usize, usize)) -> Result<()> {
        let expected = self.size();

        if known(found) && known(expected) && found != expected {
            return Err(ViewError::SizeMismatch {
                what,
                expected,
                found,
            });
        }

        Ok(())
    }

    pub fn set_camera(&mut self, camera: Option<Camera>) {
        let Some(mut camera) = camera else {
            self.camera = None;
            return;
        };

        if camera.has_size() {
            let size = (camera.width(), camera.height());

            if known(self.image.size()) {
                assert_eq!(size, self.image.size(), "camera size differs from image size");
            }

            if known(self.depth.size()) {
                assert_eq!(size, self.depth.size(), "camera size differs from depth size");
            }
        } else {
            let (width, height) = self.size();
            camera.set_size(width, height);
        }

        self.camera = Some(camera);
    }

    pub fn set_image(&mut self, image: ImageU8) {
        if known(image.size()) {
            if let Some(camera) = self.camera.as_ref().filter(|c| c.has_size()) {
                assert_eq!(
                    (camera.width(), camera.height()),
                    image.size(),
                    "image size differs from camera size"
                );
            }

            if known(self.depth.size()) {
                assert_eq!(self.depth.size(), image.size(), "image size differs from depth size");
            }
        }

        self.image = image;
        self.adopt_size();
    }

    pub fn set_depth_image(&mut self, depth: DepthImage) {
        if known(depth.size()) {
            if let Some(camera) = self.camera.as_ref().filter(|c| c.has_size()) {
                assert_eq!(
                    (camera.width(), camera.height()),
                    depth.size(),
                    "depth size differs from camera size"
                );
            }

            if known(self.image.size()) {
                assert_eq!(self.image.size(), depth.size(), "depth size differs from image size");
            }
        }

        self.depth = depth;
        self.adopt_size();
    }

    fn adopt_size(&mut self) {
        let (width, height) = self.size();

        if let Some(camera) = self.camera.as_mut().filter(|c| !c.has_size()) {
            camera.set_size(width, height);
        }
    }
}
