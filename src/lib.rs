// ADI binary waveform converter
// Main library entry point

pub mod core;
pub mod pipeline;

// Re-export main types
pub use crate::core::encoder::AdibinEncoder;
pub use crate::core::error::{AdibinError, Result};
pub use crate::core::format::{CanonicalRecord, ChannelRecord, EncodedContainer, FileHeader};
pub use crate::core::reader::AdibinReader;
pub use crate::core::row::parse_row;
pub use crate::core::units::ChannelUnits;
pub use crate::core::writer::AdibinWriter;
pub use crate::pipeline::{BatchConfig, BatchConverter, RunSummary};
