//! Configuration management module
//!
//! Handles loading, saving, and validation of the benchmark configuration.
//! With no config file present the defaults reproduce the fixed run:
//! a 1000 x 1000 grid written next to the working directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;
use crate::models::Shape;
use crate::{
    IoCompareError, Result, APP_NAME, CONFIG_FILE, DEFAULT_BASENAME, DEFAULT_COLS, DEFAULT_ROWS,
};

/// Upper bound on the number of cells in one dataset
pub const MAX_ELEMENTS: usize = 1 << 31;

/// Benchmark configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Number of rows in the generated grid
    pub rows: usize,
    /// Number of columns in the generated grid
    pub cols: usize,
    /// Directory that receives the output files
    pub output_dir: PathBuf,
    /// Common prefix of the output file names
    pub basename: String,
    /// Fixed seed for the generator; the wall clock is used when absent
    pub seed: Option<u64>,
    /// Compare every read result against the generated dataset
    pub verify: bool,
    /// Leave the output files in place after the run
    pub keep_files: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            output_dir: PathBuf::from("."),
            basename: DEFAULT_BASENAME.to_string(),
            seed: None,
            verify: true,
            keep_files: true,
        }
    }
}

impl BenchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.rows, self.cols)
    }

    /// Path of the output file written by `kind`
    pub fn output_path(&self, kind: BackendKind) -> PathBuf {
        self.output_dir
            .join(format!("{}{}", self.basename, kind.file_suffix()))
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(IoCompareError::Config(format!(
                "Dataset dimensions must be greater than 0, got {}",
                self.shape()
            )));
        }

        match self.rows.checked_mul(self.cols) {
            Some(n) if n <= MAX_ELEMENTS => {}
            _ => {
                return Err(IoCompareError::Config(format!(
                    "Dataset too large: {} (max: {} elements)",
                    self.shape(),
                    MAX_ELEMENTS
                )))
            }
        }

        if self.basename.is_empty() {
            return Err(IoCompareError::Config(
                "Output basename must not be empty".to_string(),
            ));
        }

        if self.basename.contains(['/', '\\']) {
            return Err(IoCompareError::Config(format!(
                "Output basename must not contain a path separator: {}",
                self.basename
            )));
        }

        if !self.output_dir.exists() {
            return Err(IoCompareError::Config(format!(
                "Output directory does not exist: {}",
                self.output_dir.display()
            )));
        }

        if !self.output_dir.is_dir() {
            return Err(IoCompareError::Config(format!(
                "Output path is not a directory: {}",
                self.output_dir.display()
            )));
        }

        Ok(())
    }

    /// Set the grid dimensions
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.rows = shape.rows;
        self.cols = shape.cols;
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the output file prefix
    pub fn with_basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = basename.into();
        self
    }

    /// Use a fixed generator seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_keep_files(mut self, keep: bool) -> Self {
        self.keep_files = keep;
        self
    }

    /// Load configuration from the standard config file location.
    /// Returns the default configuration if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load and validate configuration from `path`
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            IoCompareError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            IoCompareError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate and save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                IoCompareError::Config(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(path, content).map_err(|e| {
            IoCompareError::Config(format!(
                "Failed to write config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Standard configuration file path: `$CONFIG_DIR/iocompare/iocompare.toml`
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            IoCompareError::Config("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_fixed_run() {
        let config = BenchConfig::default();
        assert_eq!(config.shape(), Shape::new(1000, 1000));
        assert_eq!(config.basename, "data_comparison");
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_output_paths() {
        let config = BenchConfig::new().with_output_dir("/data");
        assert_eq!(
            config.output_path(BackendKind::Hdf5),
            PathBuf::from("/data/data_comparison_hdf5.h5")
        );
        assert_eq!(
            config.output_path(BackendKind::Adios2),
            PathBuf::from("/data/data_comparison_adios2.bp")
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero = BenchConfig::new().with_shape(Shape::new(0, 10));
        assert!(matches!(zero.validate(), Err(IoCompareError::Config(_))));

        let huge = BenchConfig::new().with_shape(Shape::new(usize::MAX, 2));
        assert!(huge.validate().is_err());

        let empty = BenchConfig::new().with_basename("");
        assert!(empty.validate().is_err());

        let nested = BenchConfig::new().with_basename("a/b");
        assert!(nested.validate().is_err());

        let missing = BenchConfig::new().with_output_dir("/definitely/not/here");
        assert!(missing.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_file_as_output_dir() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();

        let config = BenchConfig::new().with_output_dir(&file);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf").join(CONFIG_FILE);

        let config = BenchConfig::new()
            .with_shape(Shape::new(4, 8))
            .with_output_dir(dir.path())
            .with_seed(7)
            .with_keep_files(false);
        config.save_to(&path).unwrap();

        let loaded = BenchConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "rows = 2\ncols = 3\n").unwrap();

        let loaded = BenchConfig::load_from(&path).unwrap();
        assert_eq!(loaded.shape(), Shape::new(2, 3));
        assert_eq!(loaded.basename, DEFAULT_BASENAME);
        assert!(loaded.verify);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "rows = \"many\"").unwrap();

        let err = BenchConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, IoCompareError::Config(_)));
    }

    #[test]
    fn test_config_file_path() {
        let path = BenchConfig::config_file_path();
        assert!(path.is_ok());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("iocompare"));
        assert!(path.to_string_lossy().ends_with("iocompare.toml"));
    }
}
