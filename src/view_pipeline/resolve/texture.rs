use std::collections::HashSet;

use tracing::{debug, info};

use crate::view_pipeline::common::error::Result;
use crate::view_pipeline::image::{ImageHeader, ImageIo};
use crate::view_pipeline::resolve::files::list_files_with_prefix;
use crate::view_pipeline::resolve::prefixes::{basename_start, generate_prefixes};
use crate::view_pipeline::resolve::spec::ViewSpec;

/// Keywords of texture names from least to most preferred.
const PREFERRED_KEYWORDS: [&str; 7] = ["intensity", "img", "image", "mono", "color", "rgb", "left"];

/// Keywords that push a texture name to the lowest rating.
const DEMOTED_KEYWORDS: [&str; 1] = ["right"];

/// Texture image chosen for a depth image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureMatch {
    pub path: String,
    /// Integer factor by which the texture is larger than the depth image.
    pub scale: usize,
}

/// Preference of a texture file name, compared case-insensitively. A
/// demoted keyword gives 0; otherwise the rank of the most preferred
/// keyword found, or 0 if there is none.
pub fn texture_rating(name: &str) -> u32 {
    let name = name.to_lowercase();

    if DEMOTED_KEYWORDS.iter().any(|k| name.contains(k)) {
        return 0;
    }

    PREFERRED_KEYWORDS
        .iter()
        .rposition(|k| name.contains(k))
        .map_or(0, |i| i as u32 + 1)
}

/// Integer factor `ds` for which the candidate shrinks to the size of the
/// depth image when divided by `ds` and rounded up.
fn upscale_factor(candidate: &ImageHeader, depth: &ImageHeader) -> Option<usize> {
    if depth.width == 0 || depth.height == 0 || candidate.width == 0 {
        return None;
    }

    let ds = candidate.width.div_ceil(depth.width);

    (candidate.width.div_ceil(ds) == depth.width && candidate.height.div_ceil(ds) == depth.height)
        .then_some(ds)
}

/// Rewrites `scene_left_3.tif` into the tile reference `scene:3.tif` form
/// used for tiled depth images.
fn tile_reference(name: &str) -> String {
    let spos = basename_start(name);

    let Some(first) = name[spos..].find('_').map(|p| p + spos) else {
        return name.to_string();
    };

    match name.rfind('_') {
        Some(last) if last > first => format!("{}:{}", &name[..first], &name[last + 1..]),
        _ => name.to_string(),
    }
}

/// Finds the texture image of a view.
///
/// An explicit `i=` option is used as is. Benchmark disparity images
/// `dispN.*` use a same sized `imN.*` image. Otherwise files that share a
/// prefix with the depth image are rated by name, trying prefixes from the
/// most specific one and stopping at the first prefix with any match.
pub fn resolve_texture<I: ImageIo + ?Sized>(
    io: &I,
    spec: &ViewSpec,
    search_path: Option<&str>,
) -> Result<Option<TextureMatch>> {
    if let Some(image) = &spec.image {
        return Ok(Some(TextureMatch {
            path: image.clone(),
            scale: 1,
        }));
    }

    if let Some(digit) = spec.benchmark_digit() {
        if let Some(found) = benchmark_texture(io, &spec.path, digit)? {
            info!("Using texture image: {}", found.path);
            return Ok(Some(found));
        }
    }

    let found = search_texture(io, &spec.path, spec.is_tiled(), search_path)?;

    match &found {
        Some(found) => info!("Using texture image: {}", found.path),
        None => info!("No texture image found for {}", spec.path),
    }

    Ok(found)
}

fn benchmark_texture<I: ImageIo + ?Sized>(
    io: &I,
    depth_path: &str,
    digit: char,
) -> Result<Option<TextureMatch>> {
    let depth = io.load_header(depth_path)?;
    let prefix = format!("{}im{}.", &depth_path[..basename_start(depth_path)], digit);

    // a candidate is replaced as long as the current choice is single
    // channel, so a color image wins over gray ones
    let mut channels = depth.channels;
    let mut found = None;

    for name in list_files_with_prefix(&prefix) {
        let header = match io.load_header(&name) {
            Ok(header) => header,
            Err(e) => {
                debug!("Skipping {}: {}", name, e);
                continue;
            }
        };

        if let Some(scale) = upscale_factor(&header, &depth) {
            debug!("Found suitable image: {}", name);

            if channels == 1 {
                channels = header.channels;
                found = Some(TextureMatch { path: name, scale });
            }
        }
    }

    Ok(found)
}

fn search_texture<I: ImageIo + ?Sized>(
    io: &I,
    depth_path: &str,
    tiled: bool,
    search_path: Option<&str>,
) -> Result<Option<TextureMatch>> {
    let depth = io.load_header(depth_path)?;

    let mut checked = HashSet::new();
    checked.insert(depth_path.to_string());

    for prefix in generate_prefixes(depth_path, search_path) {
        let mut best: Option<(u32, TextureMatch)> = None;

        for name in list_files_with_prefix(&prefix) {
            let candidate = if tiled { tile_reference(&name) } else { name.clone() };

            if candidate.ends_with(".txt") || candidate.ends_with(".TXT") {
                continue;
            }

            if !checked.insert(candidate.clone()) {
                continue;
            }

            let header = match io.load_header(&candidate) {
                Ok(header) => header,
                Err(e) => {
                    debug!("Skipping {}: {}", candidate, e);
                    continue;
                }
            };

            let Some(scale) = upscale_factor(&header, &depth) else {
                continue;
            };

            debug!("Found suitable image: {}", candidate);

            let rating = texture_rating(candidate.get(prefix.len()..).unwrap_or_default());

            if best.as_ref().is_none_or(|(r, _)| rating > *r) {
                best = Some((rating, TextureMatch { path: name, scale }));
            }
        }

        if let Some((_, found)) = best {
            return Ok(Some(found));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_order() {
        assert_eq!(texture_rating("left_image.png"), 7);
        assert_eq!(texture_rating("image.png"), 3);
        assert_eq!(texture_rating("right_image.png"), 0);
        assert!(texture_rating("left_image.png") > texture_rating("image.png"));
        assert!(texture_rating("image.png") > texture_rating("right_image.png"));
    }

    #[test]
    fn test_rating_is_case_insensitive() {
        assert_eq!(texture_rating("_RGB.TIF"), 6);
        assert_eq!(texture_rating("_Right_RGB.tif"), 0);
        assert_eq!(texture_rating("_0001.png"), 0);
    }

    #[test]
    fn test_upscale_factor() {
        let depth = ImageHeader {
            width: 320,
            height: 240,
            channels: 1,
        };
        let same = ImageHeader { width: 320, height: 240, channels: 3 };
        let double = ImageHeader { width: 640, height: 480, channels: 1 };
        let odd = ImageHeader { width: 639, height: 479, channels: 1 };
        let other = ImageHeader { width: 640, height: 400, channels: 1 };

        assert_eq!(upscale_factor(&same, &depth), Some(1));
        assert_eq!(upscale_factor(&double, &depth), Some(2));
        assert_eq!(upscale_factor(&odd, &depth), Some(2));
        assert_eq!(upscale_factor(&other, &depth), None);
    }

    #[test]
    fn test_tile_reference() {
        assert_eq!(tile_reference("/d/scene_left_3.tif"), "/d/scene:3.tif");
        assert_eq!(tile_reference("/d_x/scene.tif"), "/d_x/scene.tif");
        assert_eq!(tile_reference("/d/scene_left.tif"), "/d/scene_left.tif");
    }
}
