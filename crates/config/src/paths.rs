use std::path::{Path, PathBuf};

/// Environment variable overriding the calibration directory
pub const ASSETS_ENV: &str = "AUTOSKETCH_ASSETS";

/// Calibration directory used when nothing else is configured
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Locations of the calibration files inside an assets directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    root: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::from_env()
    }
}

impl AssetPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use `AUTOSKETCH_ASSETS` if set, otherwise `./assets`
    pub fn from_env() -> Self {
        match std::env::var_os(ASSETS_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::new(DEFAULT_ASSETS_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn palette(&self) -> PathBuf {
        self.root.join("palette.json")
    }

    pub fn canvas(&self) -> PathBuf {
        self.root.join("canvas_config.json")
    }

    pub fn exact_color(&self) -> PathBuf {
        self.root.join("exact_color_config.json")
    }

    pub fn brushes(&self) -> PathBuf {
        self.root.join("brushes_config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        let paths = AssetPaths::new("/tmp/calib");
        assert_eq!(paths.palette(), Path::new("/tmp/calib/palette.json"));
        assert_eq!(paths.canvas(), Path::new("/tmp/calib/canvas_config.json"));
        assert_eq!(paths.exact_color(), Path::new("/tmp/calib/exact_color_config.json"));
        assert_eq!(paths.brushes(), Path::new("/tmp/calib/brushes_config.json"));
    }
}
