//! WorkExpress Client - back-office client for the WorkExpress backend
//!
//! Tracking search with carrier fallback, client lookup, package updates and
//! bulk invoice creation from a staged batch.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod services;
pub mod state;
pub mod wire;

pub use auth::{AuthContext, TOKEN_COOKIE};
pub use client::WorkExpressClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use services::{
    BatchProgress, ClientDirectory, DebouncedClientFilter, Dimensions, GroupStatus, InvoiceService,
    PackageService, SubmissionReport, SubmissionSummary, TrackingService, UserService, Weights,
};
pub use state::{Debouncer, InFlightSet, MutationState, RecentSearches, SearchSequencer};

// Re-export shared types for convenience
pub use shared::batch::{BuildError, ClearPolicy, PendingBatch};
pub use shared::models::{ClientRef, InvoiceGroup, TrackingRecord};
pub use shared::{ErrorCode, derive_slot_code, normalize_insurance_flag};
