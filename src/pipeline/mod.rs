pub mod batch;
pub mod config;
pub mod quarantine;

pub use self::batch::{BatchConverter, RunSummary};
pub use self::config::BatchConfig;
pub use self::quarantine::{QuarantineStore, QuarantinedRow};
