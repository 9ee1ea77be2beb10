// Example usage of the adibin reader

use adibin::{AdibinReader, Result};
use tracing::{info, Level};
use tracing_subscriber;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/recording.adibin".to_string());

    let reader = AdibinReader::open(&path)?;
    let header = reader.header();

    info!("format version: {}", header.version);
    info!("tick duration: {}s", header.secs_per_tick);
    info!("channels: {}", header.n_channels);
    info!("samples per channel: {}", header.samples_per_channel);

    for channel in reader.channels() {
        info!("  [{}] {} ({})", channel.index, channel.title, channel.units);
        info!(
            "      scale: {} offset: {} range: [{}, {}]",
            channel.scale, channel.offset, channel.range_low, channel.range_high
        );
        if let Some(first) = channel.samples.first() {
            info!("      first raw code: {}", first);
            // Physical units are the caller's job
            info!("      first scaled: {}", first * channel.scale + channel.offset);
        }
    }

    // Look up one ECG lead by title
    if let Some(lead) = reader.channel_by_title("II") {
        let preview: Vec<f64> = lead.samples.iter().take(16).copied().collect();
        info!("lead II preview: {:?}", preview);
    }

    Ok(())
}
