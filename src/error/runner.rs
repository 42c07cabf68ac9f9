use thiserror::Error;

use super::ValidationError;

/// Argument errors that abort a batch before any request is sent.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Endpoint must not be empty.")]
    EmptyEndpoint,
    #[error("Invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported endpoint scheme '{scheme}'. Use http or https.")]
    UnsupportedScheme { scheme: String },
    #[error("Invalid max concurrency: {source}")]
    InvalidConcurrency {
        #[source]
        source: ValidationError,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
}
