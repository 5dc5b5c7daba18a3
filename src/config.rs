//! Configuration for sigma-huffman

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CompressError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Largest source (or decoded output) accepted, in bytes.
    pub max_input_size: u64,
    pub io_buffer_size: usize,
    pub payload_extension: String,
    pub table_extension: String,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            max_input_size: 100 * 1024 * 1024, // 100 MB
            io_buffer_size: 65536,
            payload_extension: "huf".to_string(),
            table_extension: "tab".to_string(),
        }
    }
}

impl CompressionConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| CompressError::ConfigError(e.to_string()))?;
        if config.io_buffer_size == 0 {
            return Err(CompressError::ConfigError(
                "io_buffer_size must be non-zero".into(),
            ));
        }
        Ok(config)
    }

    /// `input.txt` -> `input.txt.huf`
    pub fn payload_path_for(&self, input: &Path) -> PathBuf {
        with_appended_extension(input, &self.payload_extension)
    }

    /// `input.txt` -> `input.txt.tab`
    pub fn table_path_for(&self, input: &Path) -> PathBuf {
        with_appended_extension(input, &self.table_extension)
    }
}

fn with_appended_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
