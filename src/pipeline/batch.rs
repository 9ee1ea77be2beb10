// Batch CSV to adibin conversion

use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{debug, error, info, warn};

use crate::core::encoder::AdibinEncoder;
use crate::core::error::Result;
use crate::core::row::parse_row;
use crate::core::units::ChannelUnits;
use crate::core::writer::AdibinWriter;
use crate::pipeline::config::BatchConfig;
use crate::pipeline::quarantine::QuarantineStore;

/// Counts for one batch run. The quarantine totals are the only failure
/// signal; a clean run has all of them at zero.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub files_seen: usize,
    pub files_converted: usize,
    pub files_quarantined: usize,
    pub rows_converted: usize,
    pub rows_quarantined: usize,
    pub quarantine_failures: usize,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.files_quarantined == 0 && self.rows_quarantined == 0 && self.quarantine_failures == 0
    }
}

/// Drives parse -> encode -> write over every row of every CSV file in the
/// input directory, absorbing failures into the two quarantine tiers.
pub struct BatchConverter {
    config: BatchConfig,
    encoder: AdibinEncoder,
    writer: AdibinWriter,
    quarantine: QuarantineStore,
}

impl BatchConverter {
    pub fn new(config: BatchConfig) -> Self {
        Self::with_units(config, ChannelUnits::default())
    }

    pub fn with_units(config: BatchConfig, units: ChannelUnits) -> Self {
        let writer = AdibinWriter::new(&config.output_dir)
            .overwrite_existing(config.overwrite_existing)
            .extension(&config.extension);
        let quarantine =
            QuarantineStore::new(&config.row_quarantine_dir, &config.file_quarantine_dir);
        Self {
            config,
            encoder: AdibinEncoder::new(units),
            writer,
            quarantine,
        }
    }

    /// Convert every `*.csv` file under the input directory. Row and file
    /// failures land in the quarantine stores and never abort the run; only
    /// failure to scan the input directory itself propagates.
    pub fn run(&self) -> Result<RunSummary> {
        let files = self.scan_input_dir()?;
        let mut summary = RunSummary {
            files_seen: files.len(),
            ..RunSummary::default()
        };

        info!(
            "converting {} csv files from {}",
            files.len(),
            self.config.input_dir.display()
        );

        for (index, path) in files.iter().enumerate() {
            info!("({}/{}) {}", index + 1, files.len(), path.display());
            self.convert_file(path, &mut summary);
        }

        info!(
            "batch finished: {}/{} files converted, {} rows written, {} rows quarantined, {} files quarantined",
            summary.files_converted,
            summary.files_seen,
            summary.rows_converted,
            summary.rows_quarantined,
            summary.files_quarantined
        );
        Ok(summary)
    }

    fn scan_input_dir(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.config.input_dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
            if path.is_file() && is_csv {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn convert_file(&self, path: &Path, summary: &mut RunSummary) {
        let basename = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());

        match self.convert_rows(path, &basename, summary) {
            Ok(()) => summary.files_converted += 1,
            Err(err) => {
                warn!("quarantining file {}: {}", path.display(), err);
                match self.quarantine.quarantine_file(path) {
                    Ok(dest) => {
                        summary.files_quarantined += 1;
                        info!("moved to {}", dest.display());
                    }
                    Err(quarantine_err) => {
                        summary.quarantine_failures += 1;
                        error!(
                            "file quarantine failed for {}: {}",
                            path.display(),
                            quarantine_err
                        );
                    }
                }
            }
        }
    }

    // Err from this function means the reader itself failed (open error or a
    // record-level stream error); row-scoped failures are absorbed into the
    // row quarantine and never surface here.
    fn convert_rows(&self, path: &Path, basename: &str, summary: &mut RunSummary) -> Result<()> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        for (row_index, result) in reader.records().enumerate() {
            let row = result?;

            match self.convert_row(&row, basename) {
                Ok(dest) => {
                    summary.rows_converted += 1;
                    debug!("wrote {}", dest.display());
                }
                Err(err) => {
                    warn!("quarantining row {} of {}: {}", row_index, basename, err);
                    match self.quarantine.quarantine_row(basename, row_index, &row, &err) {
                        Ok(_) => summary.rows_quarantined += 1,
                        Err(quarantine_err) => {
                            summary.quarantine_failures += 1;
                            error!(
                                "row quarantine failed for {} row {}: {}",
                                basename, row_index, quarantine_err
                            );
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn convert_row(&self, row: &csv::StringRecord, basename: &str) -> Result<PathBuf> {
        let record = parse_row(row)?;
        let container = self.encoder.encode(&record)?;
        self.writer.write(
            &container,
            basename,
            &record.alarm_id,
            &record.time_since_admission,
        )
    }
}
