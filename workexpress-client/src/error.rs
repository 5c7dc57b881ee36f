//! Client error types

use shared::ErrorCode;
use shared::batch::BuildError;
use thiserror::Error;

/// Client error type
///
/// Every HTTP-boundary failure is converted into one of these; callers
/// branch on [`ClientError::code`] to pick a user-facing message.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No session token available
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Query is not a tracking code
    #[error("Advanced search is not implemented: {0}")]
    AdvancedSearchUnsupported(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Package already belongs to an invoice
    #[error("Package {tracking_number} is already invoiced")]
    AlreadyInvoiced {
        tracking_number: String,
        invoice_number: Option<String>,
    },

    /// HTTP request failed before a response arrived
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Error code the UI branches on
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::NotAuthenticated => ErrorCode::NotAuthenticated,
            ClientError::NotFound(_) => ErrorCode::NotFound,
            ClientError::AdvancedSearchUnsupported(_) => ErrorCode::AdvancedSearchUnsupported,
            ClientError::Validation(_) => ErrorCode::ValidationFailed,
            ClientError::AlreadyInvoiced { .. } => ErrorCode::AlreadyInvoiced,
            ClientError::Network(_) => ErrorCode::NetworkError,
            ClientError::Server { .. } => ErrorCode::ServerError,
            ClientError::InvalidResponse(_) => ErrorCode::InternalError,
            ClientError::Config(_) => ErrorCode::ConfigError,
            ClientError::Io(_) => ErrorCode::InternalError,
        }
    }

    /// Message suitable for a toast. Never includes transport internals.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::NotFound(_) => "No package found for that tracking number".to_string(),
            ClientError::Validation(msg) => msg.clone(),
            ClientError::AlreadyInvoiced {
                tracking_number,
                invoice_number: Some(number),
            } => format!("Package {} is already on invoice {}", tracking_number, number),
            ClientError::Server { message, .. } if !message.is_empty() => message.clone(),
            other => other.code().message().to_string(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidResponse(err.to_string())
    }
}

impl From<BuildError> for ClientError {
    fn from(err: BuildError) -> Self {
        ClientError::Validation(err.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ClientError::NotAuthenticated.code(), ErrorCode::NotAuthenticated);
        assert_eq!(
            ClientError::AdvancedSearchUnsupported("ab".into()).code(),
            ErrorCode::AdvancedSearchUnsupported
        );
        assert_eq!(
            ClientError::Server { status: 500, message: String::new() }.code(),
            ErrorCode::ServerError
        );
    }

    #[test]
    fn test_user_message() {
        let err = ClientError::AlreadyInvoiced {
            tracking_number: "WEX1".into(),
            invoice_number: Some("INV-7".into()),
        };
        assert_eq!(err.user_message(), "Package WEX1 is already on invoice INV-7");

        let err = ClientError::Server { status: 502, message: String::new() };
        assert_eq!(err.user_message(), "Server returned an error");

        let err = ClientError::Server { status: 400, message: "customer_id must be alphanumeric".into() };
        assert_eq!(err.user_message(), "customer_id must be alphanumeric");
    }

    #[test]
    fn test_build_error_becomes_validation() {
        let err: ClientError = BuildError::MissingClient { tracking_number: "WEX1".into() }.into();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}
