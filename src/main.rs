use argh::FromArgs;
use depth_view_rs::logger;
use depth_view_rs::view_pipeline::{PropertyStore, ViewConfig, ViewLoader};

use anyhow::Context;
use tracing::{error, info};

/// Loads a depth view and reports what it consists of
#[derive(Debug, FromArgs)]
struct Args {
    /// view specification: <depth image>[,ds=<n>][,x=..,y=..,w=..,h=..][,p=<file>][,i=<file>]
    #[argh(positional)]
    spec: String,

    /// directories searched for parameter and texture files, overrides
    /// DEPTH_VIEW_SEARCH_PATH
    #[argh(option, short = 's')]
    search_path: Option<String>,

    /// do not look for a texture image
    #[argh(switch)]
    no_texture: bool,

    /// write the camera parameters of the loaded view to this file
    #[argh(option, short = 'o')]
    camera_out: Option<String>,
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let args: Args = argh::from_env();

    let env = ViewConfig::from_env();
    let config = ViewConfig::builder()
        .search_path(args.search_path.or(env.search_path))
        .load_texture(!args.no_texture)
        .build();

    let loader = ViewLoader::new(config);
    info!("Search path: {:?}", loader.config().search_path());

    let view = loader
        .load_view(&args.spec)
        .inspect_err(|e| error!("Loading view failed: {}", e))
        .with_context(|| format!("Cannot load view {}", args.spec))?;

    let (width, height) = view.size();
    let valid = view
        .depth()
        .as_slice()
        .iter()
        .filter(|v| v.is_finite())
        .count();

    info!("Size: {}x{}", width, height);
    info!("Valid depth values: {} of {}", valid, width * height);
    info!("Depth step: {}", view.depth_step());
    info!(
        "Texture: {}",
        if view.image().is_empty() {
            "none".to_string()
        } else {
            format!("{} channel(s)", view.image().channels())
        }
    );

    if let Some(camera) = view.camera() {
        info!(
            "Camera: {}",
            if camera.is_perspective() {
                "pinhole"
            } else {
                "orthographic"
            }
        );

        if let Some(path) = &args.camera_out {
            let mut prop = PropertyStore::new();
            camera.to_properties(&mut prop);
            let comment = format!("Camera of {}", args.spec);
            prop.save(path, Some(comment.as_str()))
                .with_context(|| format!("Cannot write {}", path))?;
            info!("Camera parameters written to {}", path);
        }
    }

    Ok(())
}
