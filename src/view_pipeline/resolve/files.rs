use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::view_pipeline::resolve::prefixes::basename_start;

/// Sorted paths of all files whose path starts with `prefix`. The result
/// keeps the directory spelling of `prefix`. An unreadable directory yields
/// no files.
pub fn list_files_with_prefix(prefix: &str) -> BTreeSet<String> {
    let (dir_part, name_part) = prefix.split_at(basename_start(prefix));
    let dir = if dir_part.is_empty() {
        Path::new(".")
    } else {
        Path::new(dir_part)
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot list {}: {}", dir.display(), e);
            return BTreeSet::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name.starts_with(name_part))
        .map(|name| format!("{}{}", dir_part, name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_matching_files_only() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        for name in ["im0.png", "im0.pgm", "im1.png", "disp0.pfm"] {
            fs::write(dir.path().join(name), b"")?;
        }
        fs::create_dir(dir.path().join("im0.dir"))?;

        let prefix = format!("{}/im0.", dir.path().display());
        let files = list_files_with_prefix(&prefix);

        assert_eq!(
            files.into_iter().collect::<Vec<_>>(),
            vec![
                format!("{}/im0.pgm", dir.path().display()),
                format!("{}/im0.png", dir.path().display()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_missing_directory() {
        assert!(list_files_with_prefix("/nonexistent/dir/scene").is_empty());
    }
}
