//! Data models
//!
//! Domain types as the UI layer sees them. Backend wire formats are mapped
//! into these by the client's adapter stage; nothing here knows about
//! field-name variants.

pub mod client;
pub mod invoice;
pub mod tracking;

// Re-exports
pub use client::*;
pub use invoice::*;
pub use tracking::*;
