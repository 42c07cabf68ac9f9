use thiserror::Error;

/// Failure taxonomy for a single request. Every variant is recorded on the
/// request's outcome; none of them abort a batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestFailure {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Invalid JSON response: {0}")]
    Decode(String),
    #[error("Application error: {0}")]
    Application(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Timeout,
    Decode,
    Application,
}

impl RequestFailure {
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            RequestFailure::Network(_) => FailureKind::Network,
            RequestFailure::Timeout(_) => FailureKind::Timeout,
            RequestFailure::Decode(_) => FailureKind::Decode,
            RequestFailure::Application(_) => FailureKind::Application,
        }
    }

    /// Classifies a `reqwest` error raised while sending or reading a body.
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            RequestFailure::Timeout(err.to_string())
        } else if err.is_decode() {
            RequestFailure::Decode(err.to_string())
        } else {
            RequestFailure::Network(err.to_string())
        }
    }
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FailureKind::Network => "network",
            FailureKind::Timeout => "timeout",
            FailureKind::Decode => "decode",
            FailureKind::Application => "application",
        }
    }
}
