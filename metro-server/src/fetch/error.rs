//! Fetch error types.

/// Errors from fetching a stop's status page.
///
/// Any of these aborts the current board only; the caller shows the message
/// and keeps serving.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The directory entry does not hold a usable URL
    #[error("invalid lookup URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// No response within the configured timeout
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Connection, TLS, body decoding or other transport failure
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The operator answered with a non-2xx status
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Classify a reqwest error raised while fetching `url`.
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Http {
                url: url.to_string(),
                source: err,
            }
        }
    }
}
