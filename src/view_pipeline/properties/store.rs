use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::str::FromStr;

use nalgebra::{Matrix3, Vector3};
use tracing::debug;

use crate::view_pipeline::common::error::{Result, ViewError};
use crate::view_pipeline::properties::values::{
    format_matrix3, format_vector3, parse_matrix3, parse_vector3,
};

/// Ordered map from keys to the values stored for them.
///
/// Loading a file appends to the values of keys that already exist, so
/// every value read from disk stays available through [`get_all`]. Scalar
/// getters see the most recently inserted value, which makes merging
/// several files "last loaded wins". [`put_string`] replaces all values of
/// a key.
///
/// [`get_all`]: PropertyStore::get_all
/// [`put_string`]: PropertyStore::put_string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    entries: BTreeMap<String, Vec<String>>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `key=value` lines. `#` starts a comment, blank lines are
    /// skipped and any other line without `=` is a format error.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let mut store = Self::new();

        for line in text.lines() {
            let line = line.trim();
            let line = match line.find('#') {
                Some(pos) => &line[..pos],
                None => line,
            };

            if line.is_empty() {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| ViewError::PropertyFormat {
                path: origin.to_path_buf(),
                line: line.to_string(),
            })?;

            store.insert(key.trim(), value.trim());
        }

        Ok(store)
    }

    /// Loads a file and merges its entries into this store. Nothing is
    /// merged if the file is malformed.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();

        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ViewError::FileNotFound(path.to_path_buf()),
            _ => ViewError::IoError(e),
        })?;

        let loaded = Self::parse(&text, path)?;
        self.merge(loaded);

        Ok(())
    }

    /// Reads a file if it exists. A missing file is `Ok(None)`.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();

        if !path.is_file() {
            debug!("No parameter file at {}", path.display());
            return Ok(None);
        }

        let mut store = Self::new();
        store.load(path)?;

        Ok(Some(store))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P, comment: Option<&str>) -> Result<()> {
        let mut out = fs::File::create(path)?;

        if let Some(comment) = comment {
            writeln!(out, "# {}", comment)?;
        }

        for (key, value) in self.iter() {
            writeln!(out, "{}={}", key, value)?;
        }

        Ok(())
    }

    /// Appends the entries of `other`, keeping the values already present.
    pub fn merge(&mut self, other: PropertyStore) {
        for (key, values) in other.entries {
            self.entries.entry(key).or_default().extend(values);
        }
    }

    fn insert(&mut self, key: &str, value: &str) {
        self.entries
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in key order, duplicates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_string(&self, key: &str) -> Result<&str> {
        self.entries
            .get(key)
            .and_then(|vs| vs.last())
            .map(String::as_str)
            .ok_or_else(|| ViewError::KeyNotFound(key.to_string()))
    }

    pub fn get_string_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_string(key).unwrap_or(default)
    }

    pub fn get_value<T: FromStr>(&self, key: &str) -> Result<T> {
        let value = self.get_string(key)?;
        parse_value(key, value)
    }

    /// Like [`get_value`](Self::get_value), but a missing key yields
    /// `default`. A present but malformed value is still an error.
    pub fn get_value_or<T: FromStr>(&self, key: &str, default: T) -> Result<T> {
        match self.get_string(key) {
            Ok(value) => parse_value(key, value),
            Err(_) => Ok(default),
        }
    }

    pub fn get_string_vector(
        &self,
        key: &str,
        default: Option<&str>,
        sep: char,
    ) -> Result<Vec<String>> {
        let value = match (self.get_string(key), default) {
            (Ok(value), _) => value,
            (Err(_), Some(default)) => default,
            (Err(e), None) => return Err(e),
        };

        if value.is_empty() {
            return Ok(Vec::new());
        }

        Ok(value.split(sep).map(str::to_string).collect())
    }

    pub fn get_matrix3(&self, key: &str) -> Result<Matrix3<f64>> {
        let value = self.get_string(key)?;
        parse_matrix3(value).ok_or_else(|| invalid(key, value))
    }

    pub fn get_matrix3_or(&self, key: &str, default: Matrix3<f64>) -> Result<Matrix3<f64>> {
        match self.get_string(key) {
            Ok(value) => parse_matrix3(value).ok_or_else(|| invalid(key, value)),
            Err(_) => Ok(default),
        }
    }

    pub fn get_vector3(&self, key: &str) -> Result<Vector3<f64>> {
        let value = self.get_string(key)?;
        parse_vector3(value).ok_or_else(|| invalid(key, value))
    }

    pub fn get_vector3_or(&self, key: &str, default: Vector3<f64>) -> Result<Vector3<f64>> {
        match self.get_string(key) {
            Ok(value) => parse_vector3(value).ok_or_else(|| invalid(key, value)),
            Err(_) => Ok(default),
        }
    }

    /// Replaces every value stored for `key`.
    pub fn put_string(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_string(), vec![value.into()]);
    }

    pub fn put_value<T: Display>(&mut self, key: &str, value: T) {
        self.put_string(key, value.to_string());
    }

    pub fn put_matrix3(&mut self, key: &str, value: &Matrix3<f64>) {
        self.put_string(key, format_matrix3(value));
    }

    pub fn put_vector3(&mut self, key: &str, value: &Vector3<f64>) {
        self.put_string(key, format_vector3(value));
    }

    pub fn put_string_vector(&mut self, key: &str, values: &[String], sep: char) {
        self.put_string(key, values.join(&sep.to_string()));
    }
}

fn invalid(key: &str, value: &str) -> ViewError {
    ViewError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| invalid(key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn origin() -> PathBuf {
        PathBuf::from("test.txt")
    }

    #[test]
    fn test_parse_comments_and_whitespace() {
        let text = "# camera definition\n\n  camera.width = 640 \nf=100 # focal length\n   \n";
        let store = PropertyStore::parse(text, &origin()).unwrap();

        assert_eq!(store.get_string("camera.width").unwrap(), "640");
        assert_eq!(store.get_value::<f64>("f").unwrap(), 100.0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_first_equals_splits_key_and_value() {
        let store = PropertyStore::parse("expr = a=b\n", &origin()).unwrap();
        assert_eq!(store.get_string("expr").unwrap(), "a=b");
    }

    #[test]
    fn test_line_without_equals_is_format_error() {
        let result = PropertyStore::parse("width=3\nheight\n", &origin());
        assert!(matches!(result, Err(ViewError::PropertyFormat { .. })));
    }

    #[test]
    fn test_duplicate_keys_keep_every_value() {
        let store = PropertyStore::parse("t=1\nt=2\nt=3\n", &origin()).unwrap();

        assert_eq!(store.get_all("t"), ["1", "2", "3"]);
        assert_eq!(store.get_value::<i32>("t").unwrap(), 3);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_later_load_wins() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let first = dir.path().join("a.txt");
        let second = dir.path().join("b.txt");
        fs::write(&first, "f=1\nrho=5\n")?;
        fs::write(&second, "f=2\n")?;

        let mut store = PropertyStore::new();
        store.load(&first)?;
        store.load(&second)?;

        assert_eq!(store.get_value::<f64>("f")?, 2.0);
        assert_eq!(store.get_value::<f64>("rho")?, 5.0);
        assert_eq!(store.get_all("f"), ["1", "2"]);
        Ok(())
    }

    #[test]
    fn test_malformed_file_merges_nothing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bad.txt");
        fs::write(&path, "f=1\nnot a property\n")?;

        let mut store = PropertyStore::new();
        assert!(store.load(&path).is_err());
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn test_probe_missing_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(PropertyStore::probe(dir.path().join("missing.txt"))?.is_none());
        Ok(())
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let mut store = PropertyStore::new();
        let result = store.load("/nonexistent/params.txt");
        assert!(matches!(result, Err(ViewError::FileNotFound(_))));
    }

    #[test]
    fn test_save_then_load_is_equal() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("saved.txt");

        let mut store = PropertyStore::parse("b=2\na=1\na=3\nc = x y\n", &origin())?;
        store.put_matrix3("camera.R", &Matrix3::identity());
        store.save(&path, Some("saved by test"))?;

        let mut reloaded = PropertyStore::new();
        reloaded.load(&path)?;

        assert_eq!(reloaded, store);
        Ok(())
    }

    #[test]
    fn test_defaults_and_missing_keys() {
        let store = PropertyStore::parse("disp.scale=abc\n", &origin()).unwrap();

        assert_eq!(store.get_value_or("disp.offset", 0.0f32).unwrap(), 0.0);
        assert!(store.get_value_or("disp.scale", 1.0f32).is_err());
        assert!(matches!(
            store.get_string("missing"),
            Err(ViewError::KeyNotFound(_))
        ));
        assert_eq!(store.get_string_or("missing", "corner"), "corner");
    }

    #[test]
    fn test_put_replaces_all_values() {
        let mut store = PropertyStore::parse("k=1\nk=2\n", &origin()).unwrap();
        store.put_value("k", 7);

        assert_eq!(store.get_all("k"), ["7"]);
    }

    #[test]
    fn test_string_vector() {
        let store = PropertyStore::parse("camera.match=a.pgm,b.pgm\nempty=\n", &origin()).unwrap();

        assert_eq!(
            store.get_string_vector("camera.match", None, ',').unwrap(),
            vec!["a.pgm".to_string(), "b.pgm".to_string()]
        );
        assert!(store.get_string_vector("empty", None, ',').unwrap().is_empty());
        assert!(store.get_string_vector("missing", Some(""), ',').unwrap().is_empty());
        assert!(store.get_string_vector("missing", None, ',').is_err());
    }
}
