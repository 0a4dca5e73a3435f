//! Error types for the position streaming pipeline.

use std::sync::Arc;

/// The main error type for the position streaming pipeline.
///
/// Every runtime variant is terminal: a failed request cycle closes the
/// whole sequence. Callers that need resilience wrap the source and
/// reconstruct it. Sources are `Arc`-wrapped so errors stay cheap to clone
/// when they are delivered both out-of-band to the sink and to the caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Construction was given a missing or out-of-range argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The endpoint answered with a non-success status code
    #[error("endpoint responded with error: {0}")]
    UpstreamStatus(u16),

    /// The request failed at the transport level
    #[error("upstream request failed: {0}")]
    Transport(#[source] Arc<reqwest::Error>),

    /// The endpoint answered with a success status but no body
    #[error("endpoint did not provide a response body")]
    EmptyResponse,

    /// The response body was present but not parseable as a record
    #[error("endpoint returned a malformed body: {0}")]
    MalformedResponse(#[source] Arc<serde_json::Error>),

    /// A sink failed while accepting a record or a signal
    #[error("sink error: {0}")]
    Sink(String),
}

impl Error {
    /// Create an `InvalidArgument` error with a message
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Create a sink error with a message
    pub fn sink<S: Into<String>>(message: S) -> Self {
        Error::Sink(message.into())
    }

    /// Whether this error originated upstream of the pipeline
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::UpstreamStatus(_)
                | Error::Transport(_)
                | Error::EmptyResponse
                | Error::MalformedResponse(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(Arc::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedResponse(Arc::new(err))
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_taxonomy() {
        assert_eq!(
            Error::invalid_argument("`id` is a required parameter").to_string(),
            "invalid argument: `id` is a required parameter"
        );
        assert_eq!(
            Error::UpstreamStatus(503).to_string(),
            "endpoint responded with error: 503"
        );
        assert_eq!(
            Error::EmptyResponse.to_string(),
            "endpoint did not provide a response body"
        );
        assert_eq!(Error::sink("rejected").to_string(), "sink error: rejected");
    }

    #[test]
    fn upstream_classification() {
        assert!(Error::UpstreamStatus(500).is_upstream());
        assert!(Error::EmptyResponse.is_upstream());
        assert!(!Error::invalid_argument("rate").is_upstream());
        assert!(!Error::sink("full").is_upstream());
    }
}
