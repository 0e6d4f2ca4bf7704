use tracing::debug;

use crate::view_pipeline::common::error::{Result, ViewError};
use crate::view_pipeline::image::Region;
use crate::view_pipeline::resolve::prefixes;

/// Parsed form of `path[,key=value]*`.
///
/// Recognized keys are `ds` (downscale factor), `x`, `y`, `w`, `h` (image
/// part in downscaled pixels), `p` (parameter file, repeatable) and `i`
/// (texture image). Other keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSpec {
    pub path: String,
    pub ds: usize,
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
    pub params: Vec<String>,
    pub image: Option<String>,
}

fn parse_int<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ViewError::InvalidSpec(format!("{}={}", key, value)))
}

impl ViewSpec {
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.split(',');
        let path = parts.next().unwrap_or_default().to_string();

        if path.is_empty() {
            return Err(ViewError::InvalidSpec(format!("no depth image in '{}'", text)));
        }

        let mut spec = ViewSpec {
            path,
            ds: 1,
            x: 0,
            y: 0,
            w: 0,
            h: 0,
            params: Vec::new(),
            image: None,
        };

        for part in parts {
            let Some((key, value)) = part.split_once('=') else {
                debug!("Ignoring view option without value: {}", part);
                continue;
            };

            match key {
                "ds" => spec.ds = parse_int(key, value)?,
                "x" => spec.x = parse_int(key, value)?,
                "y" => spec.y = parse_int(key, value)?,
                "w" => spec.w = parse_int(key, value)?,
                "h" => spec.h = parse_int(key, value)?,
                "p" => spec.params.push(value.to_string()),
                "i" => spec.image = Some(value.to_string()),
                _ => debug!("Ignoring unknown view option: {}", part),
            }
        }

        if spec.ds == 0 {
            return Err(ViewError::InvalidSpec("ds=0".to_string()));
        }

        Ok(spec)
    }

    /// Requested image part in downscaled pixels.
    pub fn region(&self) -> Region {
        Region::new(self.x, self.y, self.w, self.h)
    }

    pub fn basename_start(&self) -> usize {
        prefixes::basename_start(&self.path)
    }

    /// True if the depth image is a tile reference like `scene.tif:3`.
    pub fn is_tiled(&self) -> bool {
        prefixes::tile_separator(&self.path).is_some()
    }

    pub fn benchmark_digit(&self) -> Option<char> {
        prefixes::benchmark_digit(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path() {
        let spec = ViewSpec::parse("/data/disp0.pfm").unwrap();

        assert_eq!(spec.path, "/data/disp0.pfm");
        assert_eq!(spec.ds, 1);
        assert_eq!(spec.region(), Region::full());
        assert!(spec.params.is_empty());
        assert_eq!(spec.image, None);
        assert_eq!(spec.basename_start(), 6);
        assert_eq!(spec.benchmark_digit(), Some('0'));
        assert!(!spec.is_tiled());
    }

    #[test]
    fn test_all_options() {
        let spec =
            ViewSpec::parse("d.pfm,ds=2,x=10,y=20,w=-5,h=100,p=a.txt,p=b.txt,i=one.png,i=two.png,foo=bar")
                .unwrap();

        assert_eq!(spec.ds, 2);
        assert_eq!(spec.region(), Region::new(10, 20, -5, 100));
        assert_eq!(spec.params, vec!["a.txt", "b.txt"]);
        assert_eq!(spec.image.as_deref(), Some("two.png"));
    }

    #[test]
    fn test_malformed_values() {
        assert!(matches!(
            ViewSpec::parse("d.pfm,ds=two"),
            Err(ViewError::InvalidSpec(_))
        ));
        assert!(ViewSpec::parse("d.pfm,ds=0").is_err());
        assert!(ViewSpec::parse(",ds=2").is_err());
    }
}
