//! Error codes shared by the domain and client layers
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Tracking / batch building errors
//! - 5xxx: Invoice errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::ErrorCode;
//!
//! let code = ErrorCode::try_from(5001).unwrap();
//! assert_eq!(code, ErrorCode::AlreadyInvoiced);
//! assert_eq!(code.message(), "Package is already invoiced");
//! ```

mod codes;

pub use codes::{ErrorCode, InvalidErrorCode};
