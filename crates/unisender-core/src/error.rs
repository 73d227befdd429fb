//! Error types for the UniSender client

use thiserror::Error;

/// Main error type for all client and workflow operations
#[derive(Error, Debug)]
pub enum UnisenderError {
    #[error("UniSender client error: Unknown API method '{0}'")]
    UnknownOperation(String),

    #[error("UniSender client error: Request failed [status: {status}] [URL: {url}] Details: {detail}")]
    Transport {
        status: u16,
        url: String,
        detail: String,
    },

    #[error("UniSender client error: Request failed [status: {status}] [URL: {url}] Details: {message}")]
    Remote {
        status: u16,
        url: String,
        message: String,
    },

    #[error("UniSender client error: The recipient list should not be empty!")]
    EmptyRecipients,

    #[error("UniSender client error: Recipient number {0} has no \"email\" field")]
    MissingRecipientEmail(usize),

    #[error("UniSender client error: Please fill \"email_data\" required field(s): {}", .0.join(", "))]
    MissingRequiredFields(Vec<String>),

    #[error("UniSender client error: Please fill correct \"email_data\" fields")]
    InvalidEmailData,

    #[error("UniSender client error: Could not resolve mailing list '{0}'")]
    ListResolution(String),

    #[error("Unexpected API response: {0}")]
    UnexpectedResponse(String),

    #[error("{source}. Campaign number: {index}")]
    Batch {
        index: usize,
        #[source]
        source: Box<UnisenderError>,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),
}

impl UnisenderError {
    /// True for failures reported by the remote side of a completed request
    pub fn is_request_failure(&self) -> bool {
        matches!(self, UnisenderError::Transport { .. } | UnisenderError::Remote { .. })
    }
}

/// Result type for UniSender operations
pub type Result<T> = std::result::Result<T, UnisenderError>;
