// Adibin file output

use crate::core::error::{AdibinError, Result};
use crate::core::format::EncodedContainer;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSION: &str = "adibin";

/// Persists encoded containers under a fixed output directory.
pub struct AdibinWriter {
    output_dir: PathBuf,
    overwrite_existing: bool,
    extension: String,
}

impl AdibinWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            overwrite_existing: true,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn overwrite_existing(mut self, overwrite: bool) -> Self {
        self.overwrite_existing = overwrite;
        self
    }

    pub fn extension(mut self, extension: &str) -> Self {
        self.extension = extension.to_string();
        self
    }

    /// `<output_dir>/<basename>_<alarmId>_<timeSinceAdmission>.<ext>`
    pub fn destination(&self, basename: &str, alarm_id: &str, time_since_admission: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}_{}.{}",
            basename, alarm_id, time_since_admission, self.extension
        ))
    }

    /// Write the three sections as one stream, creating missing parent
    /// directories. I/O failures propagate to the caller; there is no retry.
    pub fn write(
        &self,
        container: &EncodedContainer,
        basename: &str,
        alarm_id: &str,
        time_since_admission: &str,
    ) -> Result<PathBuf> {
        let path = self.destination(basename, alarm_id, time_since_admission);
        if !self.overwrite_existing && path.exists() {
            return Err(AdibinError::OutputExists(path));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(&path)?;
        file.write_all(&container.file_header)?;
        file.write_all(&container.channel_headers)?;
        file.write_all(&container.sample_data)?;
        Ok(path)
    }
}
