//! Shared types for the WorkExpress back office
//!
//! Domain models and the pure business rules used by every client layer:
//! slot codes, insurance normalisation, money rounding and the pending
//! invoice batch.

pub mod batch;
pub mod error;
pub mod insurance;
pub mod models;
pub mod money;
pub mod slot;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use batch::{BuildError, ClearPolicy, PendingBatch};
pub use error::ErrorCode;
pub use insurance::normalize_insurance_flag;
pub use models::{
    CarrierDetails, ClientRef, CreatedInvoice, InvoiceGroup, InvoiceItem, InvoicePackageLine,
    InvoicePayload, InvoiceVerification, TrackingRecord,
};
pub use slot::derive_slot_code;
