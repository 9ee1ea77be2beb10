// Adibin container reader

use crate::core::constants::*;
use crate::core::error::{AdibinError, Result};
use crate::core::format::{ChannelRecord, FileHeader};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Decoded view of one container: file metadata plus per-channel records.
///
/// Sample values are returned as raw codes; scale and offset are metadata
/// for the caller to apply.
#[derive(Debug)]
pub struct AdibinReader {
    header: FileHeader,
    channels: Vec<ChannelRecord>,
}

impl AdibinReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::read_from(file)
    }

    /// Decode a container from any byte source positioned at offset 0.
    /// Truncated input and unknown format codes are hard errors; no partial
    /// result is returned.
    pub fn read_from<R: Read>(mut source: R) -> Result<Self> {
        let header = Self::read_header(&mut source)?;

        let format = SampleFormat::from_i32(header.data_format)
            .ok_or(AdibinError::UnsupportedDataFormat(header.data_format))?;

        if header.n_channels < 0 || header.samples_per_channel < 0 {
            return Err(AdibinError::CorruptedData(format!(
                "negative section counts: {} channels, {} samples per channel",
                header.n_channels, header.samples_per_channel
            )));
        }

        let n_channels = header.n_channels as usize;
        let samples_per_channel = header.samples_per_channel as usize;

        let mut channels = Vec::with_capacity(n_channels);
        for index in 0..n_channels {
            channels.push(Self::read_channel_header(
                &mut source,
                index,
                samples_per_channel,
            )?);
        }

        Self::read_samples(&mut source, format, &mut channels, samples_per_channel)?;

        Ok(Self { header, channels })
    }

    fn read_header<R: Read>(source: &mut R) -> Result<FileHeader> {
        let mut buf = [0u8; FILE_HEADER_SIZE];
        source.read_exact(&mut buf).map_err(truncated)?;

        let magic = &buf[0..4];
        if magic != MAGIC {
            return Err(AdibinError::InvalidMagic {
                expected: MAGIC.to_vec(),
                got: magic.to_vec(),
            });
        }

        Ok(FileHeader {
            version: i32::from_le_bytes(buf[4..8].try_into().unwrap()),
            secs_per_tick: f64::from_le_bytes(buf[8..16].try_into().unwrap()),
            year: i32::from_le_bytes(buf[16..20].try_into().unwrap()),
            month: i32::from_le_bytes(buf[20..24].try_into().unwrap()),
            day: i32::from_le_bytes(buf[24..28].try_into().unwrap()),
            hour: i32::from_le_bytes(buf[28..32].try_into().unwrap()),
            minute: i32::from_le_bytes(buf[32..36].try_into().unwrap()),
            second: f64::from_le_bytes(buf[36..44].try_into().unwrap()),
            trigger: f64::from_le_bytes(buf[44..52].try_into().unwrap()),
            n_channels: i32::from_le_bytes(buf[52..56].try_into().unwrap()),
            samples_per_channel: i32::from_le_bytes(buf[56..60].try_into().unwrap()),
            time_channel: i32::from_le_bytes(buf[60..64].try_into().unwrap()),
            data_format: i32::from_le_bytes(buf[64..68].try_into().unwrap()),
        })
    }

    fn read_channel_header<R: Read>(
        source: &mut R,
        index: usize,
        samples_per_channel: usize,
    ) -> Result<ChannelRecord> {
        let mut buf = [0u8; CHANNEL_HEADER_SIZE];
        source.read_exact(&mut buf).map_err(truncated)?;

        let title = read_text_field(&buf[0..TITLE_FIELD_SIZE])?;
        let units = read_text_field(&buf[TITLE_FIELD_SIZE..TITLE_FIELD_SIZE + UNITS_FIELD_SIZE])?;

        Ok(ChannelRecord {
            index,
            title,
            units,
            scale: f64::from_le_bytes(buf[64..72].try_into().unwrap()),
            offset: f64::from_le_bytes(buf[72..80].try_into().unwrap()),
            range_high: f64::from_le_bytes(buf[80..88].try_into().unwrap()),
            range_low: f64::from_le_bytes(buf[88..96].try_into().unwrap()),
            samples: Vec::with_capacity(samples_per_channel),
        })
    }

    // The sample block is sample-major: value (c, s) lives at position
    // s * n_channels + c.
    fn read_samples<R: Read>(
        source: &mut R,
        format: SampleFormat,
        channels: &mut [ChannelRecord],
        samples_per_channel: usize,
    ) -> Result<()> {
        let width = format.bytes_per_sample();
        let mut buf = vec![0u8; channels.len() * samples_per_channel * width];
        source.read_exact(&mut buf).map_err(truncated)?;

        let mut offset = 0;
        for _sample in 0..samples_per_channel {
            for channel in channels.iter_mut() {
                let raw = &buf[offset..offset + width];
                let value = match format {
                    SampleFormat::Double => f64::from_le_bytes(raw.try_into().unwrap()),
                    SampleFormat::Float => f64::from(f32::from_le_bytes(raw.try_into().unwrap())),
                    SampleFormat::Short => f64::from(i16::from_le_bytes(raw.try_into().unwrap())),
                };
                channel.samples.push(value);
                offset += width;
            }
        }
        Ok(())
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn channels(&self) -> &[ChannelRecord] {
        &self.channels
    }

    pub fn channel_by_title(&self, title: &str) -> Option<&ChannelRecord> {
        self.channels.iter().find(|channel| channel.title == title)
    }

    pub fn into_channels(self) -> Vec<ChannelRecord> {
        self.channels
    }
}

fn truncated(err: std::io::Error) -> AdibinError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        AdibinError::CorruptedData("container shorter than its header declares".to_string())
    } else {
        AdibinError::Io(err)
    }
}

fn read_text_field(bytes: &[u8]) -> Result<String> {
    let text = String::from_utf8(bytes.to_vec())?;
    Ok(text.trim_end_matches('\0').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoder::AdibinEncoder;
    use crate::core::format::CanonicalRecord;

    fn encoded(labels: &[&str], samples: &[&[i32]]) -> Vec<u8> {
        let samples: Vec<Vec<i32>> = samples.iter().map(|s| s.to_vec()).collect();
        let samples_per_channel = samples.first().map_or(0, Vec::len);
        let record = CanonicalRecord {
            alarm_id: "A1".to_string(),
            time_since_admission: "00:05:00".to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            samples,
            samples_per_channel,
        };
        AdibinEncoder::default()
            .encode(&record)
            .unwrap()
            .into_bytes()
    }

    #[test]
    fn test_round_trip() {
        let bytes = encoded(&["I", "II"], &[&[1, 2, 3], &[4, 5, 0]]);
        let reader = AdibinReader::read_from(bytes.as_slice()).unwrap();

        let header = reader.header();
        assert_eq!(header.version, 1);
        assert_eq!(header.n_channels, 2);
        assert_eq!(header.samples_per_channel, 3);
        assert_eq!(header.sample_format(), Some(SampleFormat::Short));

        let channels = reader.channels();
        assert_eq!(channels[0].title, "I");
        assert_eq!(channels[0].units, "mV");
        assert_eq!(channels[0].scale, 2.44);
        assert_eq!(channels[0].samples, vec![1.0, 2.0, 3.0]);
        assert_eq!(channels[1].title, "II");
        assert_eq!(channels[1].samples, vec![4.0, 5.0, 0.0]);
    }

    #[test]
    fn test_lookup_by_title() {
        let bytes = encoded(&["I", "RESP"], &[&[1], &[2]]);
        let reader = AdibinReader::read_from(bytes.as_slice()).unwrap();

        let resp = reader.channel_by_title("RESP").unwrap();
        assert_eq!(resp.index, 1);
        assert_eq!(resp.units, "Imp");
        assert!(reader.channel_by_title("AVL").is_none());
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = encoded(&["I"], &[&[1, 2]]);
        bytes[0..4].copy_from_slice(b"NOPE");

        let err = AdibinReader::read_from(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, AdibinError::InvalidMagic { .. }));
    }

    #[test]
    fn test_rejects_unknown_data_format() {
        let mut bytes = encoded(&["I"], &[&[1, 2]]);
        bytes[64..68].copy_from_slice(&9i32.to_le_bytes());

        let err = AdibinReader::read_from(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, AdibinError::UnsupportedDataFormat(9)));
    }

    #[test]
    fn test_rejects_truncated_container() {
        let bytes = encoded(&["I"], &[&[1, 2, 3]]);

        let err = AdibinReader::read_from(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, AdibinError::CorruptedData(_)));

        let err = AdibinReader::read_from(&bytes[..40]).unwrap_err();
        assert!(matches!(err, AdibinError::CorruptedData(_)));
    }
}
