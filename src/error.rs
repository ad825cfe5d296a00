use crate::models::SampleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarmCastError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Upstream weather data unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Malformed sample: {0}")]
    MalformedSample(#[from] SampleError),

    #[error("No forecast samples to aggregate")]
    EmptyInput,

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, FarmCastError>;
