use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BucketsError {
    #[error("Malformed log line {line_no}: expected {expected} fields, found {found}")]
    MalformedLine {
        line_no: usize,
        expected: usize,
        found: usize,
    },

    #[error("Log line {line_no} is not valid UTF-8")]
    InvalidEncoding { line_no: usize },

    #[error("Malformed sample line: '{line}'")]
    MalformedSample { line: String },

    #[error("Can not categorize: {file_name}")]
    Uncategorizable { file_name: String },

    #[error("Input not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("{count} sample(s) did not match their expected buckets")]
    SampleMismatch { count: usize },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid value for {key}: '{value}' (expected true or false)")]
    InvalidConfigValue { key: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BucketsError>;

impl BucketsError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InputNotFound { .. } => 2,
            Self::MalformedLine { .. } | Self::InvalidEncoding { .. } => 3,
            Self::MalformedSample { .. } => 4,
            Self::Uncategorizable { .. } => 5,
            Self::ConfigParse { .. }
            | Self::ConfigKeyNotFound { .. }
            | Self::InvalidConfigValue { .. } => 6,
            Self::SampleMismatch { .. } => 7,
            _ => 1,
        }
    }
}
