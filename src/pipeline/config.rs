// Batch conversion configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::core::writer::DEFAULT_EXTENSION;

/// Directories and behavior for one batch conversion run.
///
/// Loadable from a JSON file; command-line flags override individual fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub row_quarantine_dir: PathBuf,
    pub file_quarantine_dir: PathBuf,
    #[serde(default = "default_overwrite")]
    pub overwrite_existing: bool,
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_overwrite() -> bool {
    true
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl BatchConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./csvFiles"),
            output_dir: PathBuf::from("./generatedAdibins"),
            row_quarantine_dir: PathBuf::from("./quarantine/rows"),
            file_quarantine_dir: PathBuf::from("./quarantine/files"),
            overwrite_existing: true,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}
