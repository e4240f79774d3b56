use chrono::{DateTime, Utc};

/// Errors raised while configuring or constructing a client, and while
/// decoding response bodies.
///
/// Failures of an individual request are not represented here: they are
/// returned as the transport's own error type, and rejections by the server
/// are reported through [`crate::InfluxStatus`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to open http transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0} environment variable is not defined")]
    MissingConfig(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("timestamp {0} cannot be represented at nanosecond precision")]
    TimestampOutOfRange(DateTime<Utc>),

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}
