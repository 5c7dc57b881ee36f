//! Backend services
//!
//! Each service wraps an [`HttpClient`](crate::http::HttpClient) and turns
//! wire payloads into domain types through [`crate::wire`].

pub mod invoices;
pub mod packages;
pub mod tracking;
pub mod users;

pub use invoices::{
    BatchProgress, FailedGroup, GroupStatus, InvoiceService, SkippedGroup, SubmissionReport,
    SubmissionSummary, SubmittedGroup,
};
pub use packages::{Dimensions, PackageService, Weights};
pub use tracking::{TrackingService, is_tracking_code};
pub use users::{ClientDirectory, DebouncedClientFilter, UserService};
