//! Error types for the authority client
//!
//! Transport failures and application rejections are kept apart here so they
//! can be logged precisely, even though the submission flow treats both as
//! "the move did not happen".

/// Errors that can occur talking to the authority
#[derive(Debug, thiserror::Error)]
pub enum AuthorityError {
    /// The request never completed (connection refused, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The authority answered but declined the request
    #[error("Authority rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The authority answered with something we cannot interpret
    #[error("Unexpected response from authority: {message}")]
    Protocol { message: String },

    /// The configured base URL or a derived endpoint is not a valid URL
    #[error("Invalid authority URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authority without an HTTP transport could not be reached
    #[error("Authority unavailable: {message}")]
    Unavailable { message: String },
}

impl AuthorityError {
    pub fn protocol(message: impl Into<String>) -> Self {
        AuthorityError::Protocol {
            message: message.into(),
        }
    }
}

/// Result type alias for authority operations
pub type AuthorityResult<T> = Result<T, AuthorityError>;
