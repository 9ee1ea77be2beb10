// Canonical record to adibin byte sections

use crate::core::constants::*;
use crate::core::error::{AdibinError, Result};
use crate::core::format::{CanonicalRecord, EncodedContainer};
use crate::core::units::{Calibration, ChannelUnits};

/// Encodes canonical records into the three container sections.
///
/// The calibration table is explicit construction state so tests can swap in
/// custom channel sets.
pub struct AdibinEncoder {
    units: ChannelUnits,
}

impl AdibinEncoder {
    pub fn new(units: ChannelUnits) -> Self {
        Self { units }
    }

    /// Encode one record. Fails atomically: a label missing from the unit
    /// table or an oversized text field produces no partial buffers.
    pub fn encode(&self, record: &CanonicalRecord) -> Result<EncodedContainer> {
        let n_channels = record.n_channels();
        let samples_per_channel = record.samples_per_channel;

        for (label, channel) in record.labels.iter().zip(&record.samples) {
            if channel.len() != samples_per_channel {
                return Err(AdibinError::CorruptedData(format!(
                    "channel {} carries {} samples, expected {}",
                    label,
                    channel.len(),
                    samples_per_channel
                )));
            }
        }

        // Resolve every calibration up front so an unknown label fails the
        // whole record before any section is built.
        let mut calibrations = Vec::with_capacity(n_channels);
        for label in &record.labels {
            let calibration = self
                .units
                .lookup(label)
                .ok_or_else(|| AdibinError::UnknownChannel(label.clone()))?;
            calibrations.push(calibration);
        }

        let file_header = encode_file_header(n_channels as i32, samples_per_channel as i32);
        let channel_headers = encode_channel_headers(&record.labels, &calibrations)?;
        let sample_data = encode_samples(&record.samples, samples_per_channel);

        Ok(EncodedContainer {
            file_header,
            channel_headers,
            sample_data,
        })
    }
}

impl Default for AdibinEncoder {
    fn default() -> Self {
        Self::new(ChannelUnits::default())
    }
}

fn encode_file_header(n_channels: i32, samples_per_channel: i32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(FILE_HEADER_SIZE);
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&SECS_PER_TICK.to_le_bytes());
    buf.extend_from_slice(&STAMP_YEAR.to_le_bytes());
    buf.extend_from_slice(&STAMP_MONTH.to_le_bytes());
    buf.extend_from_slice(&STAMP_DAY.to_le_bytes());
    buf.extend_from_slice(&STAMP_HOUR.to_le_bytes());
    buf.extend_from_slice(&STAMP_MINUTE.to_le_bytes());
    buf.extend_from_slice(&STAMP_SECOND.to_le_bytes());
    buf.extend_from_slice(&STAMP_TRIGGER.to_le_bytes());
    buf.extend_from_slice(&n_channels.to_le_bytes());
    buf.extend_from_slice(&samples_per_channel.to_le_bytes());
    buf.extend_from_slice(&TIME_CHANNEL.to_le_bytes());
    buf.extend_from_slice(&(WRITE_FORMAT as i32).to_le_bytes());
    buf
}

fn encode_channel_headers(labels: &[String], calibrations: &[&Calibration]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(labels.len() * CHANNEL_HEADER_SIZE);
    for (label, calibration) in labels.iter().zip(calibrations) {
        write_text_field(&mut buf, "title", label, TITLE_FIELD_SIZE)?;
        write_text_field(&mut buf, "units", &calibration.units, UNITS_FIELD_SIZE)?;
        buf.extend_from_slice(&calibration.scale.to_le_bytes());
        buf.extend_from_slice(&CHANNEL_OFFSET.to_le_bytes());
        buf.extend_from_slice(&CHANNEL_RANGE_HIGH.to_le_bytes());
        buf.extend_from_slice(&CHANNEL_RANGE_LOW.to_le_bytes());
    }
    Ok(buf)
}

// Zero-padded fixed-width text slot; overflow is an error, never a truncation.
fn write_text_field(buf: &mut Vec<u8>, field: &'static str, value: &str, width: usize) -> Result<()> {
    let bytes = value.as_bytes();
    if bytes.len() > width {
        return Err(AdibinError::FieldTooLong {
            field,
            value: value.to_string(),
            limit: width,
        });
    }
    buf.extend_from_slice(bytes);
    buf.resize(buf.len() + (width - bytes.len()), 0);
    Ok(())
}

// Sample-major interleaving: all channels' values for sample s, then s+1.
// Values outside i16 wrap; the fixed 16-bit format makes that precision
// loss part of the contract.
fn encode_samples(channels: &[Vec<i32>], samples_per_channel: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(channels.len() * samples_per_channel * 2);
    for sample in 0..samples_per_channel {
        for channel in channels {
            buf.extend_from_slice(&(channel[sample] as i16).to_le_bytes());
        }
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format::CanonicalRecord;

    fn record(labels: &[&str], samples: &[&[i32]]) -> CanonicalRecord {
        let samples: Vec<Vec<i32>> = samples.iter().map(|s| s.to_vec()).collect();
        let samples_per_channel = samples.first().map_or(0, Vec::len);
        CanonicalRecord {
            alarm_id: "A1".to_string(),
            time_since_admission: "00:05:00".to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            samples,
            samples_per_channel,
        }
    }

    #[test]
    fn test_section_sizes() {
        let container = AdibinEncoder::default()
            .encode(&record(&["I", "II"], &[&[1, 2, 3], &[4, 5, 6]]))
            .unwrap();

        assert_eq!(container.file_header.len(), FILE_HEADER_SIZE);
        assert_eq!(container.channel_headers.len(), 2 * CHANNEL_HEADER_SIZE);
        assert_eq!(container.sample_data.len(), 2 * 3 * 2);
        assert_eq!(container.total_len(), 68 + 192 + 12);
    }

    #[test]
    fn test_file_header_fields() {
        let container = AdibinEncoder::default()
            .encode(&record(&["I", "II"], &[&[1, 2, 3], &[4, 5, 6]]))
            .unwrap();
        let header = &container.file_header;

        assert_eq!(&header[0..4], b"CFWB");
        assert_eq!(i32::from_le_bytes(header[4..8].try_into().unwrap()), 1);
        assert_eq!(
            f64::from_le_bytes(header[8..16].try_into().unwrap()),
            1.0 / 240.0
        );
        assert_eq!(i32::from_le_bytes(header[16..20].try_into().unwrap()), 1776);
        assert_eq!(i32::from_le_bytes(header[52..56].try_into().unwrap()), 2);
        assert_eq!(i32::from_le_bytes(header[56..60].try_into().unwrap()), 3);
        assert_eq!(i32::from_le_bytes(header[64..68].try_into().unwrap()), 3);
    }

    #[test]
    fn test_sample_major_interleaving() {
        let container = AdibinEncoder::default()
            .encode(&record(&["I", "II"], &[&[1, 2, 3], &[4, 5, 0]]))
            .unwrap();

        let values: Vec<i16> = container
            .sample_data
            .chunks(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        assert_eq!(values, vec![1, 4, 2, 5, 3, 0]);
    }

    #[test]
    fn test_channel_header_calibration() {
        let container = AdibinEncoder::default()
            .encode(&record(&["SPO2"], &[&[97, 98]]))
            .unwrap();
        let header = &container.channel_headers;

        assert_eq!(&header[0..4], b"SPO2");
        assert!(header[4..32].iter().all(|&b| b == 0));
        assert_eq!(&header[32..33], b"%");
        assert_eq!(f64::from_le_bytes(header[64..72].try_into().unwrap()), 1.0);
        assert_eq!(f64::from_le_bytes(header[72..80].try_into().unwrap()), 0.0);
        assert_eq!(f64::from_le_bytes(header[80..88].try_into().unwrap()), 1.0);
        assert_eq!(f64::from_le_bytes(header[88..96].try_into().unwrap()), 0.0);
    }

    #[test]
    fn test_unknown_channel_fails() {
        let err = AdibinEncoder::default()
            .encode(&record(&["XYZ"], &[&[1]]))
            .unwrap_err();
        assert!(matches!(err, AdibinError::UnknownChannel(ref label) if label == "XYZ"));
    }

    #[test]
    fn test_oversized_title_fails() {
        let long = "X".repeat(33);
        let units = ChannelUnits::empty().with_entry(&long, "mV", 1.0);

        let err = AdibinEncoder::new(units)
            .encode(&record(&[long.as_str()], &[&[1]]))
            .unwrap_err();
        assert!(matches!(err, AdibinError::FieldTooLong { field: "title", .. }));
    }

    #[test]
    fn test_out_of_range_samples_wrap() {
        let container = AdibinEncoder::default()
            .encode(&record(&["I"], &[&[70000]]))
            .unwrap();

        let value = i16::from_le_bytes([container.sample_data[0], container.sample_data[1]]);
        assert_eq!(value, 70000i32 as i16);
    }

    #[test]
    fn test_unreconciled_record_fails() {
        let mut bad = record(&["I", "II"], &[&[1, 2, 3], &[4, 5, 6]]);
        bad.samples[1].pop();

        let err = AdibinEncoder::default().encode(&bad).unwrap_err();
        assert!(matches!(err, AdibinError::CorruptedData(_)));
    }
}
