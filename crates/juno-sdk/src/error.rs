use thiserror::Error;

/// Failure talking to the Juno backend.
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("invalid response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("no API key configured for {0}")]
    MissingApiKey(String),

    #[error("cannot build URL for {endpoint} from base {base}")]
    InvalidUrl { endpoint: String, base: String },
}

impl SdkError {
    /// HTTP status returned by the backend, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
