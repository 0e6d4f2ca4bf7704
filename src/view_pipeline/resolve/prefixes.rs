/// Separator between the directories of a search path.
pub const SEARCH_PATH_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

const DIR_SEPARATOR: char = if cfg!(windows) { '\\' } else { '/' };

/// Byte index at which the file name of `path` starts.
pub fn basename_start(path: &str) -> usize {
    path.rfind(['/', '\\']).map_or(0, |pos| pos + 1)
}

/// Position of the `:` that separates a tile selector from the file name,
/// e.g. `scene.tif:3`. Drive letters like `C:\` are not tile selectors.
pub fn tile_separator(path: &str) -> Option<usize> {
    let pos = path.rfind(':')?;

    if path[pos..].starts_with(":\\") || pos <= basename_start(path) {
        return None;
    }

    Some(pos)
}

/// Camera index of a benchmark disparity file such as `disp0.pfm` or
/// `disp1GT.pfm`.
pub fn benchmark_digit(path: &str) -> Option<char> {
    let name = &path[basename_start(path)..];

    if name.len() < 9 || !name.starts_with("disp") {
        return None;
    }

    name[4..].chars().next().filter(char::is_ascii_digit)
}

/// Candidate file name prefixes for companion files of `depth_path`, most
/// specific first.
///
/// The tile selector, the extension and then each trailing `_token` are
/// stripped in turn, never cutting into the directory part. With a search
/// path, every prefix is repeated for each of its directories after the
/// plain prefixes.
pub fn generate_prefixes(depth_path: &str, search_path: Option<&str>) -> Vec<String> {
    let spos = basename_start(depth_path);
    let mut list = Vec::new();

    if let Some(pos) = tile_separator(depth_path) {
        list.push(depth_path[..pos].to_string());
    }

    let mut end = depth_path.len();

    // a leading dot is not an extension, but tokens are only stripped
    // before it
    if let Some(pos) = depth_path[spos..].rfind('.').map(|p| p + spos) {
        if pos > spos {
            list.push(depth_path[..pos].to_string());
        }

        end = pos;
    }

    while let Some(pos) = depth_path[spos..end].rfind('_').map(|p| p + spos) {
        if pos <= spos {
            break;
        }

        list.push(depth_path[..pos].to_string());
        end = pos;
    }

    let plain = list.len();

    for dir in search_path
        .unwrap_or_default()
        .split(SEARCH_PATH_SEPARATOR)
        .filter(|d| !d.is_empty())
    {
        let mut dir = dir.to_string();

        if !dir.ends_with(DIR_SEPARATOR) {
            dir.push(DIR_SEPARATOR);
        }

        for k in 0..plain {
            let prefix = format!("{}{}", dir, &list[k][spos..]);
            list.push(prefix);
        }
    }

    list
}
