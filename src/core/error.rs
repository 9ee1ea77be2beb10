// Error handling for the adibin converter

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdibinError>;

#[derive(Error, Debug)]
pub enum AdibinError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid magic bytes: expected {expected:?}, got {got:?}")]
    InvalidMagic { expected: Vec<u8>, got: Vec<u8> },

    #[error("Unsupported data format code: {0}")]
    UnsupportedDataFormat(i32),

    #[error("Corrupted container: {0}")]
    CorruptedData(String),

    #[error("CSV row is missing field {0}")]
    MissingField(usize),

    #[error("Invalid base64 channel blob: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid sample token {token:?} in channel {label}")]
    InvalidSampleToken { label: String, token: String },

    #[error("Row carries no channels")]
    EmptyChannelList,

    #[error("Channel label not in unit table: {0}")]
    UnknownChannel(String),

    #[error("Channel {field} {value:?} exceeds {limit} bytes")]
    FieldTooLong {
        field: &'static str,
        value: String,
        limit: usize,
    },

    #[error("Output file already exists: {}", .0.display())]
    OutputExists(std::path::PathBuf),

    #[error("Invalid UTF-8 string")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
