// Data structures for the adibin container

use serde::{Deserialize, Serialize};

use crate::core::constants::SampleFormat;

/// Fixed-size file header, 68 bytes on the wire, all fields little-endian.
#[derive(Debug, Clone, PartialEq)]
pub struct FileHeader {
    pub version: i32,
    pub secs_per_tick: f64,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: f64,
    pub trigger: f64,
    pub n_channels: i32,
    pub samples_per_channel: i32,
    pub time_channel: i32,
    pub data_format: i32,
}

impl FileHeader {
    pub fn sample_format(&self) -> Option<SampleFormat> {
        SampleFormat::from_i32(self.data_format)
    }
}

/// One decoded channel: calibration metadata plus raw sample codes.
///
/// Samples are NOT scaled; a consumer wanting physical units computes
/// `value * scale + offset` itself.
#[derive(Debug, Clone)]
pub struct ChannelRecord {
    pub index: usize,
    pub title: String,
    pub units: String,
    pub scale: f64,
    pub offset: f64,
    pub range_high: f64,
    pub range_low: f64,
    pub samples: Vec<f64>,
}

/// One parsed CSV row, reconciled and ready for encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub alarm_id: String,
    pub time_since_admission: String,
    pub labels: Vec<String>,
    pub samples: Vec<Vec<i32>>,
    pub samples_per_channel: usize,
}

impl CanonicalRecord {
    pub fn n_channels(&self) -> usize {
        self.labels.len()
    }

    /// Derived output key: `basename_alarmId_timeSinceAdmission`.
    pub fn output_key(&self, basename: &str) -> String {
        format!(
            "{}_{}_{}",
            basename, self.alarm_id, self.time_since_admission
        )
    }
}

/// The three encoded sections of one container, ready for concatenation.
#[derive(Debug, Clone)]
pub struct EncodedContainer {
    pub file_header: Vec<u8>,
    pub channel_headers: Vec<u8>,
    pub sample_data: Vec<u8>,
}

impl EncodedContainer {
    pub fn total_len(&self) -> usize {
        self.file_header.len() + self.channel_headers.len() + self.sample_data.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        let mut bytes = self.file_header;
        bytes.extend_from_slice(&self.channel_headers);
        bytes.extend_from_slice(&self.sample_data);
        bytes
    }
}
