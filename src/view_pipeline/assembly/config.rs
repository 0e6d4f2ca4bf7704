//! View loading configuration types

use tracing::debug;

/// Environment variable holding the parameter search path.
pub const SEARCH_PATH_ENV: &str = "DEPTH_VIEW_SEARCH_PATH";

/// Configuration for loading views
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Directories that are searched for parameter and texture files after
    /// the directory of the depth image, separated by `:` (`;` on Windows)
    pub search_path: Option<String>,
    /// Whether to look for and load a texture image
    pub load_texture: bool,
    /// Whether textures with more than 8 bits are loaded and rescaled to
    /// 8 bits instead of being dropped
    pub wide_texture_fallback: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            search_path: None,
            load_texture: true,
            wide_texture_fallback: true,
        }
    }
}

impl ViewConfig {
    pub fn builder() -> ViewConfigBuilder {
        ViewConfigBuilder::default()
    }

    /// Default configuration with the search path taken from the
    /// environment.
    pub fn from_env() -> Self {
        let search_path = std::env::var(SEARCH_PATH_ENV)
            .ok()
            .filter(|s| !s.is_empty());

        debug!("Search path from environment: {:?}", search_path);

        Self {
            search_path,
            ..Self::default()
        }
    }

    pub fn search_path(&self) -> Option<&str> {
        self.search_path.as_deref()
    }
}

/// Builder for ViewConfig
#[derive(Default)]
pub struct ViewConfigBuilder {
    search_path: Option<Option<String>>,
    load_texture: Option<bool>,
    wide_texture_fallback: Option<bool>,
}

impl ViewConfigBuilder {
    pub fn search_path(mut self, search_path: Option<String>) -> Self {
        self.search_path = Some(search_path);
        self
    }

    pub fn load_texture(mut self, enable: bool) -> Self {
        self.load_texture = Some(enable);
        self
    }

    pub fn wide_texture_fallback(mut self, enable: bool) -> Self {
        self.wide_texture_fallback = Some(enable);
        self
    }

    pub fn build(self) -> ViewConfig {
        let default = ViewConfig::default();
        ViewConfig {
            search_path: self.search_path.unwrap_or(default.search_path),
            load_texture: self.load_texture.unwrap_or(default.load_texture),
            wide_texture_fallback: self
                .wide_texture_fallback
                .unwrap_or(default.wide_texture_fallback),
        }
    }
}
