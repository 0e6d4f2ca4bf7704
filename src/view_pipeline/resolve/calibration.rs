use nalgebra::{Matrix3, Vector3};
use tracing::{debug, info, warn};

use crate::view_pipeline::common::error::Result;
use crate::view_pipeline::properties::PropertyStore;
use crate::view_pipeline::resolve::prefixes::{basename_start, generate_prefixes};
use crate::view_pipeline::resolve::spec::ViewSpec;

const PARAMETER_SUFFIXES: [&str; 4] = [".txt", ".TXT", "_param.txt", "_PARAM.TXT"];

/// Collects the parameters of a view.
///
/// Explicit `p=` files are loaded in order and nothing else is searched;
/// a failure to load one of them is an error. Otherwise parameter files
/// next to the depth image (and in the search path) are merged from the
/// least to the most specific prefix, and benchmark calibration files
/// are converted on top. Unusable candidates are skipped.
pub fn resolve_properties(spec: &ViewSpec, search_path: Option<&str>) -> Result<PropertyStore> {
    let mut prop = PropertyStore::new();

    if !spec.params.is_empty() {
        for name in &spec.params {
            prop.load(name)?;
            info!("Using parameter file: {}", name);
        }

        return Ok(prop);
    }

    for prefix in generate_prefixes(&spec.path, search_path).iter().rev() {
        for suffix in PARAMETER_SUFFIXES {
            let name = format!("{}{}", prefix, suffix);

            match PropertyStore::probe(&name) {
                Ok(Some(loaded)) => {
                    info!("Using parameter file: {}", name);
                    prop.merge(loaded);
                }
                Ok(None) => {}
                Err(e) => debug!("Skipping parameter file {}: {}", name, e),
            }
        }
    }

    if let Some(digit) = spec.benchmark_digit() {
        match benchmark_calibration(&spec.path, digit) {
            Ok(Some(calib)) => {
                for (key, value) in calib.iter() {
                    prop.put_string(key, value);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Cannot use benchmark calibration for {}: {}", spec.path, e),
        }
    }

    Ok(prop)
}

/// Converts the `calib.txt` file next to a benchmark disparity image
/// `dispN.*` into camera parameters of camera `N`. The cameras are
/// rectified and displaced along x by `N * baseline`.
fn benchmark_calibration(depth_path: &str, digit: char) -> Result<Option<PropertyStore>> {
    let name = format!("{}calib.txt", &depth_path[..basename_start(depth_path)]);

    let Some(calib) = PropertyStore::probe(&name)? else {
        return Ok(None);
    };

    info!("Using benchmark calibration file: {}", name);

    let a = calib.get_matrix3(&format!("cam{}", digit))?;
    let baseline: f64 = calib.get_value("baseline")?;
    let index = digit.to_digit(10).unwrap_or(0) as f64;

    let mut prop = PropertyStore::new();
    prop.put_string("camera.width", calib.get_string_or("width", "0"));
    prop.put_string("camera.height", calib.get_string_or("height", "0"));
    prop.put_matrix3("camera.A", &a);
    prop.put_value("f", a[(0, 0)]);
    prop.put_value("t", baseline);
    prop.put_string("disp.offset", calib.get_string_or("doffs", "0"));
    prop.put_matrix3("camera.R", &Matrix3::identity());
    prop.put_vector3("camera.T", &Vector3::new(baseline * index, 0.0, 0.0));

    Ok(Some(prop))
}
