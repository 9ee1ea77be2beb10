// Two-tier quarantine stores for failing rows and unreadable files

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::error::{AdibinError, Result};
use crate::core::format::CanonicalRecord;
use crate::core::row::parse_row;

/// One quarantined row, loss-free relative to what could be parsed.
///
/// `record` holds the canonical parse when the row was parseable and only a
/// later stage failed; otherwise `raw_fields` carries the row verbatim.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuarantinedRow {
    pub source_file: String,
    pub error: String,
    pub quarantined_at: String,
    pub record: Option<CanonicalRecord>,
    pub raw_fields: Option<Vec<String>>,
}

pub struct QuarantineStore {
    row_dir: PathBuf,
    file_dir: PathBuf,
}

impl QuarantineStore {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(row_dir: P, file_dir: Q) -> Self {
        Self {
            row_dir: row_dir.as_ref().to_path_buf(),
            file_dir: file_dir.as_ref().to_path_buf(),
        }
    }

    /// Persist one failing row as a JSON document keyed by
    /// `basename_alarmId_timeSinceAdmission`. The row is re-parsed in
    /// isolation; when even the parse fails the raw fields are stored
    /// instead, falling back to the row index for the key if the identifier
    /// fields are unreadable too.
    pub fn quarantine_row(
        &self,
        basename: &str,
        row_index: usize,
        row: &csv::StringRecord,
        error: &AdibinError,
    ) -> Result<PathBuf> {
        let record = parse_row(row).ok();

        let key = match &record {
            Some(record) => record.output_key(basename),
            None => match (row.get(0), row.get(1)) {
                (Some(alarm_id), Some(time_since_admission)) => {
                    format!("{}_{}_{}", basename, alarm_id, time_since_admission)
                }
                _ => format!("{}_row{}", basename, row_index),
            },
        };

        let raw_fields = if record.is_some() {
            None
        } else {
            Some(row.iter().map(str::to_string).collect())
        };

        let document = QuarantinedRow {
            source_file: basename.to_string(),
            error: error.to_string(),
            quarantined_at: Utc::now().to_rfc3339(),
            record,
            raw_fields,
        };

        fs::create_dir_all(&self.row_dir)?;
        let path = self.row_dir.join(format!("{}.json", key));
        fs::write(&path, serde_json::to_vec_pretty(&document)?)?;
        Ok(path)
    }

    /// Move an unreadable source file aside, unmodified.
    pub fn quarantine_file(&self, source: &Path) -> Result<PathBuf> {
        let name = source.file_name().ok_or_else(|| {
            AdibinError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "source path has no file name",
            ))
        })?;

        fs::create_dir_all(&self.file_dir)?;
        let dest = self.file_dir.join(name);
        fs::rename(source, &dest)?;
        Ok(dest)
    }
}
