use tracing::{debug, info, instrument, warn};

use crate::view_pipeline::{
    assembly::{config::ViewConfig, view::View},
    camera::Camera,
    common::error::{Result, ViewError},
    image::{ImageIo, ImageU8, StandardImageIo},
    properties::PropertyStore,
    resolve::{self, TextureMatch, ViewSpec},
};

/// Loads views from view specifications `path[,key=value]*`.
pub struct ViewLoader<I: ImageIo> {
    io: I,
    config: ViewConfig,
}

impl ViewLoader<StandardImageIo> {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            io: StandardImageIo,
            config,
        }
    }
}

impl<I: ImageIo> ViewLoader<I> {
    pub fn with_custom(io: I, config: ViewConfig) -> Self {
        Self { io, config }
    }

    pub fn resolve_properties(&self, spec: &ViewSpec) -> Result<PropertyStore> {
        resolve::resolve_properties(spec, self.config.search_path())
    }

    pub fn resolve_texture(&self, spec: &ViewSpec) -> Result<Option<TextureMatch>> {
        resolve::resolve_texture(&self.io, spec, self.config.search_path())
    }

    /// Loads a new view.
    pub fn load_view(&self, spec: &str) -> Result<View> {
        let mut view = View::new();
        self.load(&mut view, spec)?;
        Ok(view)
    }

    /// Replaces the content of `view` by the view described by `spec`.
    ///
    /// The camera is created from the resolved parameters, downscaled and
    /// restricted to the requested part. The depth image is loaded for the
    /// same part, invalid values are marked, and it is downscaled and
    /// normalized by `disp.scale` and `disp.offset`. A texture image is
    /// optional; failing to find or load it only leaves the view without
    /// an image.
    #[instrument(skip(self, view))]
    pub fn load(&self, view: &mut View, spec: &str) -> Result<()> {
        view.clear();

        let spec = ViewSpec::parse(spec)?;
        let ds = spec.ds;
        let region = spec.region().scaled(ds).ok_or_else(|| {
            ViewError::InvalidSpec(format!(
                "part of {} exceeds the image range at ds={}",
                spec.path, ds
            ))
        })?;

        let prop = {
            let _span = tracing::info_span!("resolve_properties").entered();
            self.resolve_properties(&spec)?
        };

        let mut camera = {
            let _span = tracing::info_span!("create_camera").entered();
            Camera::from_properties(&prop)?
        };

        view.set_depth_step(prop.get_value_or("step", 1.0)?);

        {
            let _span = tracing::info_span!("select_part", ds, x = spec.x, y = spec.y).entered();

            camera.set_downscaled(ds);

            let mut w = spec.w;
            let mut h = spec.h;

            if w <= 0 && camera.width() > 0 {
                w = w.saturating_add((camera.width() as i64).saturating_sub(spec.x));
            }

            if h <= 0 && camera.height() > 0 {
                h = h.saturating_add((camera.height() as i64).saturating_sub(spec.y));
            }

            camera.set_part(spec.x, spec.y, w, h);
            view.set_camera(Some(camera));
        }

        let mut depth = {
            let _span = tracing::info_span!("load_depth").entered();
            self.io.load_depth(&spec.path, &region)?
        };

        match prop.get_value::<f32>("disp.inv") {
            Ok(inv) => {
                let count = depth.invalidate_value(inv);
                debug!("Marked {} pixels with value {} as invalid", count, inv);
            }
            Err(ViewError::KeyNotFound(_)) => {}
            Err(e) => warn!("Ignoring invalid value marker: {}", e),
        }

        if ds > 1 {
            let _span = tracing::info_span!("downscale_depth", ds).entered();
            depth = depth.downscale_average(ds);
        }

        let scale: f32 = prop.get_value_or("disp.scale", 1.0)?;
        let offset: f32 = prop.get_value_or("disp.offset", 0.0)?;

        if ds > 1 || scale != 1.0 || offset != 0.0 {
            let dscale = if ds > 1 { 1.0 / ds as f32 } else { 1.0 };
            depth.map_valid(|v| (scale * v + offset) * dscale);
        }

        view.check_size("depth image", depth.size())?;
        view.set_depth_image(depth);

        if self.config.load_texture {
            let _span = tracing::info_span!("load_texture").entered();

            match self.resolve_texture(&spec) {
                Ok(Some(found)) => self.load_texture(view, &spec, &found),
                Ok(None) => {}
                Err(e) => warn!("Cannot resolve texture image of {}: {}", spec.path, e),
            }
        }

        let (width, height) = view.size();
        info!(
            width,
            height,
            texture = !view.image().is_empty(),
            "View loaded"
        );
        Ok(())
    }

    fn load_texture(&self, view: &mut View, spec: &ViewSpec, found: &TextureMatch) {
        let Some((iscale, region)) = found
            .scale
            .checked_mul(spec.ds)
            .and_then(|iscale| spec.region().scaled(iscale).map(|r| (iscale, r)))
        else {
            warn!("Cannot load image: {} (part exceeds the image range)", found.path);
            return;
        };

        let image = match self.io.load_u8(&found.path, &region) {
            Ok(image) => image,
            Err(e) if self.config.wide_texture_fallback => {
                debug!("Cannot load {} with 8 bits ({}), trying 16 bits", found.path, e);

                match self.io.load_u16(&found.path, &region) {
                    Ok(image) => image.to_u8_scaled(),
                    Err(e) => {
                        warn!("Cannot load image: {} ({})", found.path, e);
                        return;
                    }
                }
            }
            Err(e) => {
                warn!("Cannot load image: {} ({})", found.path, e);
                return;
            }
        };

        let image: ImageU8 = image.downscale_average(iscale);

        if let Err(e) = view.check_size("texture image", image.size()) {
            warn!("Cannot use image: {} ({})", found.path, e);
            return;
        }

        view.set_image(image);
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ViewConfig) {
        self.config = config;
    }
}
