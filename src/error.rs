use thiserror::Error;

#[derive(Debug, Error)]
pub enum Search1ApiError {
    #[error("Invalid parameter: {0}")]
    Validation(String),

    #[error("Configuration missing: {0}")]
    ConfigMissing(String),

    #[error("Configuration invalid: {0}")]
    ConfigInvalid(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("API error ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Response is not valid JSON: {message}")]
    Decode { message: String, body: String },

    #[error("JSON encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Search1ApiError {
    /// Missing or unusable credentials/settings, raised before any request.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigMissing(_) | Self::ConfigInvalid(_))
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// HTTP status of the response that caused the error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication(_) => Some(403),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Search1ApiError>;
