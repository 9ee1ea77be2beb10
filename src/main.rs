use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn, Level};

use adibin::pipeline::{BatchConfig, BatchConverter};
use adibin::AdibinReader;

#[derive(Parser)]
#[command(name = "adibin-converter")]
#[command(about = "Converts bedside monitor CSV exports to ADI binary waveform containers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every CSV file in a directory to adibin containers
    Convert {
        /// Directory of source CSV files
        #[arg(long)]
        input_dir: Option<PathBuf>,
        /// Destination directory for adibin output
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Directory for quarantined rows
        #[arg(long)]
        row_quarantine_dir: Option<PathBuf>,
        /// Directory for quarantined files
        #[arg(long)]
        file_quarantine_dir: Option<PathBuf>,
        /// JSON config file; flags override its fields
        #[arg(long)]
        config: Option<PathBuf>,
        /// Fail rows whose destination file already exists
        #[arg(long)]
        no_overwrite: bool,
    },
    /// Decode one adibin container and print its contents
    Inspect {
        /// Container to decode
        file: PathBuf,
        /// Samples to preview per channel
        #[arg(long, default_value_t = 8)]
        samples: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input_dir,
            output_dir,
            row_quarantine_dir,
            file_quarantine_dir,
            config,
            no_overwrite,
        } => {
            let mut config = match config {
                Some(path) => BatchConfig::from_file(&path)?,
                None => BatchConfig::default(),
            };
            if let Some(dir) = input_dir {
                config.input_dir = dir;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(dir) = row_quarantine_dir {
                config.row_quarantine_dir = dir;
            }
            if let Some(dir) = file_quarantine_dir {
                config.file_quarantine_dir = dir;
            }
            if no_overwrite {
                config.overwrite_existing = false;
            }

            let summary = BatchConverter::new(config).run()?;
            if !summary.is_clean() {
                warn!(
                    "run finished with {} quarantined rows and {} quarantined files - inspect the quarantine directories",
                    summary.rows_quarantined, summary.files_quarantined
                );
            }
        }
        Commands::Inspect { file, samples } => {
            let reader = AdibinReader::open(&file)?;
            let header = reader.header();

            info!("version: {}", header.version);
            info!("secs per tick: {}", header.secs_per_tick);
            info!(
                "created: {:04}-{:02}-{:02} {:02}:{:02}:{}",
                header.year, header.month, header.day, header.hour, header.minute, header.second
            );
            info!("channels: {}", header.n_channels);
            info!("samples per channel: {}", header.samples_per_channel);
            info!("data format: {}", header.data_format);

            for channel in reader.channels() {
                let preview: Vec<f64> = channel.samples.iter().take(samples).copied().collect();
                info!(
                    "[{}] {} ({}) scale={} offset={} range=[{}, {}] samples={:?}",
                    channel.index,
                    channel.title,
                    channel.units,
                    channel.scale,
                    channel.offset,
                    channel.range_low,
                    channel.range_high,
                    preview
                );
            }
        }
    }

    Ok(())
}
