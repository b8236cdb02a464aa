pub mod bucket;
pub mod categorize;
pub mod config;
pub mod error;
pub mod raw_log;
pub mod sample;

pub use bucket::{Bucket, InstallerKind, SAMPLE_COLUMNS};
pub use categorize::{categorize, extract_feature, has_common_version};
pub use config::{Config, MapConfig};
pub use error::{BucketsError, Result};
pub use raw_log::{collect_inputs, EnrichedRecord, LogRecord, MapStats, RawLogMapper};
pub use sample::{verify_samples, Mismatch, Sample, SampleFailure, VerifyReport};
