// CSV row parsing into canonical records

use serde::Deserialize;

use crate::core::compression::inflate_blob;
use crate::core::error::{AdibinError, Result};
use crate::core::format::CanonicalRecord;

/// One channel as described by the decompressed row JSON.
#[derive(Debug, Deserialize)]
struct ChannelDescriptor {
    #[serde(rename = "Label")]
    label: String,
    #[serde(rename = "Text")]
    text: String,
}

/// Parse one CSV row: `[alarmId, timeSinceAdmission, base64(zlib(JSON))]`.
///
/// Any malformed part fails the whole row; there is no partial recovery.
pub fn parse_row(row: &csv::StringRecord) -> Result<CanonicalRecord> {
    let alarm_id = row.get(0).ok_or(AdibinError::MissingField(0))?.to_string();
    let time_since_admission = row.get(1).ok_or(AdibinError::MissingField(1))?.to_string();
    let blob = row.get(2).ok_or(AdibinError::MissingField(2))?;

    let raw = inflate_blob(blob)?;
    let descriptors: Vec<ChannelDescriptor> = serde_json::from_slice(&raw)?;
    if descriptors.is_empty() {
        return Err(AdibinError::EmptyChannelList);
    }

    let mut labels = Vec::with_capacity(descriptors.len());
    let mut samples = Vec::with_capacity(descriptors.len());
    for descriptor in &descriptors {
        let label = descriptor.label.to_uppercase();
        samples.push(parse_samples(&label, &descriptor.text)?);
        labels.push(label);
    }

    let samples_per_channel = pad_to_uniform_length(&mut samples);

    Ok(CanonicalRecord {
        alarm_id,
        time_since_admission,
        labels,
        samples,
        samples_per_channel,
    })
}

fn parse_samples(label: &str, text: &str) -> Result<Vec<i32>> {
    text.split(',')
        .map(|token| {
            token
                .trim()
                .parse::<i32>()
                .map_err(|_| AdibinError::InvalidSampleToken {
                    label: label.to_string(),
                    token: token.to_string(),
                })
        })
        .collect()
}

/// Reconcile per-channel sample counts to the maximum observed length.
/// Shorter channels are right-padded with zero. Returns the common length.
pub fn pad_to_uniform_length(channels: &mut [Vec<i32>]) -> usize {
    let max_len = channels.iter().map(Vec::len).max().unwrap_or(0);
    for channel in channels.iter_mut() {
        channel.resize(max_len, 0);
    }
    max_len
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(channels: &[(&str, &str)]) -> String {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine;
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let descriptors: Vec<serde_json::Value> = channels
            .iter()
            .map(|(label, text)| serde_json::json!({ "Label": label, "Text": text }))
            .collect();
        let json = serde_json::to_vec(&descriptors).unwrap();

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&json).unwrap();
        STANDARD.encode(encoder.finish().unwrap())
    }

    fn row(alarm_id: &str, tsa: &str, channels: &[(&str, &str)]) -> csv::StringRecord {
        csv::StringRecord::from(vec![
            alarm_id.to_string(),
            tsa.to_string(),
            blob(channels),
        ])
    }

    #[test]
    fn test_parses_equal_length_channels() {
        let record = parse_row(&row("A1", "00:05:00", &[("i", "1,2,3"), ("ii", "4,5,6")])).unwrap();

        assert_eq!(record.alarm_id, "A1");
        assert_eq!(record.time_since_admission, "00:05:00");
        assert_eq!(record.labels, vec!["I", "II"]);
        assert_eq!(record.samples, vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(record.samples_per_channel, 3);
    }

    #[test]
    fn test_pads_short_channels_with_zero() {
        let record = parse_row(&row("A1", "00:05:00", &[("I", "1,2,3"), ("II", "4,5")])).unwrap();

        assert_eq!(record.samples_per_channel, 3);
        assert_eq!(record.samples[1], vec![4, 5, 0]);
    }

    #[test]
    fn test_padding_is_idempotent() {
        let mut channels = vec![vec![1, 2, 3], vec![4, 5, 0]];
        let before = channels.clone();

        assert_eq!(pad_to_uniform_length(&mut channels), 3);
        assert_eq!(channels, before);
    }

    #[test]
    fn test_rejects_short_rows() {
        let record = csv::StringRecord::from(vec!["A1", "00:05:00"]);
        let err = parse_row(&record).unwrap_err();
        assert!(matches!(err, AdibinError::MissingField(2)));
    }

    #[test]
    fn test_rejects_non_integer_samples() {
        let err = parse_row(&row("A1", "00:05:00", &[("I", "1,x,3")])).unwrap_err();
        assert!(matches!(
            err,
            AdibinError::InvalidSampleToken { ref label, ref token } if label == "I" && token == "x"
        ));
    }

    #[test]
    fn test_rejects_empty_channel_list() {
        let err = parse_row(&row("A1", "00:05:00", &[])).unwrap_err();
        assert!(matches!(err, AdibinError::EmptyChannelList));
    }

    #[test]
    fn test_rejects_bad_json() {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine;
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"{ not a channel array").unwrap();
        let bad = STANDARD.encode(encoder.finish().unwrap());

        let record = csv::StringRecord::from(vec!["A1".to_string(), "00:05:00".to_string(), bad]);
        let err = parse_row(&record).unwrap_err();
        assert!(matches!(err, AdibinError::Json(_)));
    }
}
