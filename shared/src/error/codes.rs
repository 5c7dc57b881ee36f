//! Unified error codes for the WorkExpress back office
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Tracking / batch building errors
//! - 5xxx: Invoice errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the UI layer can branch
/// on them without matching on error strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// No session token available
    NotAuthenticated = 1001,

    // ==================== 4xxx: Tracking / Batch ====================
    /// Query is not a tracking code and free-text search is not available
    AdvancedSearchUnsupported = 4001,
    /// Package has no client assigned
    MissingClient = 4101,
    /// Client plan rate is zero or missing
    MissingRate = 4102,

    // ==================== 5xxx: Invoice ====================
    /// Package already belongs to an invoice
    AlreadyInvoiced = 5001,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Configuration error
    ConfigError = 9005,
    /// Backend answered with a non-success status
    ServerError = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",

            ErrorCode::NotAuthenticated => "User is not authenticated",

            ErrorCode::AdvancedSearchUnsupported => "Advanced search is not implemented",
            ErrorCode::MissingClient => "Package has no client assigned",
            ErrorCode::MissingRate => "Client has no plan rate",

            ErrorCode::AlreadyInvoiced => "Package is already invoiced",

            ErrorCode::InternalError => "Internal error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::ServerError => "Server returned an error",
        }
    }

    /// Whether the error only affects one package or group and the rest of a
    /// batch may proceed
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, ErrorCode::NotAuthenticated | ErrorCode::ConfigError)
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            1001 => Ok(ErrorCode::NotAuthenticated),
            4001 => Ok(ErrorCode::AdvancedSearchUnsupported),
            4101 => Ok(ErrorCode::MissingClient),
            4102 => Ok(ErrorCode::MissingRate),
            5001 => Ok(ErrorCode::AlreadyInvoiced),
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::ServerError),
            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::AdvancedSearchUnsupported.code(), 4001);
        assert_eq!(ErrorCode::AlreadyInvoiced.code(), 5001);
        assert_eq!(ErrorCode::ServerError.code(), 9006);
    }

    #[test]
    fn test_try_from_round_trips() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::MissingClient,
            ErrorCode::MissingRate,
            ErrorCode::NetworkError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::AlreadyInvoiced).unwrap();
        assert_eq!(json, "5001");
        let back: ErrorCode = serde_json::from_str("1001").unwrap();
        assert_eq!(back, ErrorCode::NotAuthenticated);
        assert!(serde_json::from_str::<ErrorCode>("7").is_err());
    }

    #[test]
    fn test_recoverable() {
        assert!(ErrorCode::AlreadyInvoiced.is_recoverable());
        assert!(ErrorCode::ServerError.is_recoverable());
        assert!(!ErrorCode::NotAuthenticated.is_recoverable());
    }
}
