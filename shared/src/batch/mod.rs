//! Pending invoice batch
//!
//! Packages with an assigned client are staged here, grouped by client,
//! until the user triggers bulk invoice creation. One [`InvoiceGroup`] exists
//! per distinct client id; a group disappears as soon as its last line is
//! removed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ErrorCode;
use crate::models::{InvoiceGroup, InvoicePackageLine, TrackingRecord};
use crate::money::{exact_sum, line_price};


/// Why a package could not be staged
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// Package has no client assigned
    #[error("package {tracking_number} has no client assigned")]
    MissingClient { tracking_number: String },

    /// Client plan rate is zero or missing
    #[error("client {client_id} has no plan rate")]
    MissingRate { client_id: String },

    /// Package is already staged in the batch
    #[error("package {package_id} is already staged")]
    DuplicatePackage { package_id: String },

    /// Client's rate differs from the rate its staged group was priced at
    #[error("client {client_id} is staged at rate {staged}, package priced at {rate}")]
    RateMismatch {
        client_id: String,
        staged: f64,
        rate: f64,
    },
}

impl BuildError {
    pub fn code(&self) -> ErrorCode {
        match self {
            BuildError::MissingClient { .. } => ErrorCode::MissingClient,
            BuildError::MissingRate { .. } => ErrorCode::MissingRate,
            BuildError::DuplicatePackage { .. } | BuildError::RateMismatch { .. } => {
                ErrorCode::ValidationFailed
            }
        }
    }
}

/// When a submitted batch is cleared in full.
///
/// Groups that were not cleared stay staged so the user can retry them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearPolicy {
    /// Clear when nothing failed, or when successes are more than half of
    /// all groups
    #[default]
    StrictMajority,
    /// Clear only when nothing failed
    NoFailures,
    /// Never clear in full; only settled groups are removed
    Never,
}

impl ClearPolicy {
    /// Whether the whole batch should be cleared after a submission
    pub fn should_clear_all(&self, succeeded: usize, failed: usize, total: usize) -> bool {
        match self {
            ClearPolicy::StrictMajority => failed == 0 || succeeded * 2 > total,
            ClearPolicy::NoFailures => failed == 0,
            ClearPolicy::Never => false,
        }
    }
}

/// Ordered collection of invoice groups staged in the UI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingBatch {
    groups: Vec<InvoiceGroup>,
}

impl PendingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[InvoiceGroup] {
        &self.groups
    }

    pub fn group(&self, client_id: &str) -> Option<&InvoiceGroup> {
        self.groups.iter().find(|g| g.client_id == client_id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of staged packages across all groups
    pub fn package_count(&self) -> usize {
        self.groups.iter().map(|g| g.packages.len()).sum()
    }

    /// Grand total across all groups
    pub fn total(&self) -> f64 {
        exact_sum(self.groups.iter().map(|g| g.total))
    }

    pub fn contains_package(&self, package_id: &str) -> bool {
        self.groups.iter().any(|g| g.contains(package_id))
    }

    /// Stage a package for invoicing.
    ///
    /// The line goes into the group for the record's client, creating the
    /// group if needed, and the group total is recomputed.
    pub fn add_package(&mut self, record: &TrackingRecord) -> Result<&InvoiceGroup, BuildError> {
        let client = record.client.as_ref().ok_or_else(|| BuildError::MissingClient {
            tracking_number: record.tracking_number.clone(),
        })?;
        let plan_rate = client.usable_rate().ok_or_else(|| BuildError::MissingRate {
            client_id: client.id.clone(),
        })?;

        let package_id = record.identity().to_string();
        if self.contains_package(&package_id) {
            return Err(BuildError::DuplicatePackage { package_id });
        }

        let line = InvoicePackageLine {
            package_id,
            tracking_number: record.tracking_number.clone(),
            weight: record.weight,
            price: line_price(record.weight, plan_rate),
            has_insurance: client.shipping_insurance,
            insurance_price: None,
        };

        let index = match self.groups.iter().position(|g| g.client_id == client.id) {
            Some(index) if self.groups[index].plan_rate != plan_rate => {
                return Err(BuildError::RateMismatch {
                    client_id: client.id.clone(),
                    staged: self.groups[index].plan_rate,
                    rate: plan_rate,
                });
            }
            Some(index) => index,
            None => {
                self.groups
                    .push(InvoiceGroup::new(client.id.clone(), client.name.clone(), plan_rate));
                self.groups.len() - 1
            }
        };

        let group = &mut self.groups[index];
        tracing::debug!(
            client_id = %group.client_id,
            package_id = %line.package_id,
            price = line.price,
            "Staged package for invoicing"
        );
        group.packages.push(line);
        group.recompute_total();
        Ok(&self.groups[index])
    }

    /// Remove a staged line. Removing a line that is not staged is a no-op.
    ///
    /// The group is dropped when its last line goes.
    pub fn remove_package(&mut self, client_id: &str, package_id: &str) -> Option<InvoicePackageLine> {
        let index = self.groups.iter().position(|g| g.client_id == client_id)?;
        let group = &mut self.groups[index];
        let line_index = group.packages.iter().position(|l| l.package_id == package_id)?;
        let line = group.packages.remove(line_index);

        if group.is_empty() {
            self.groups.remove(index);
        } else {
            group.recompute_total();
        }
        Some(line)
    }

    /// Drop a whole group
    pub fn remove_group(&mut self, client_id: &str) -> Option<InvoiceGroup> {
        let index = self.groups.iter().position(|g| g.client_id == client_id)?;
        Some(self.groups.remove(index))
    }

    /// Drop the lines whose package id is in `package_ids`.
    ///
    /// Lines staged after the ids were collected are kept. Groups left empty
    /// are dropped.
    pub fn remove_packages<'a, I>(&mut self, package_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ids: HashSet<&str> = package_ids.into_iter().collect();
        for group in &mut self.groups {
            let before = group.packages.len();
            group.packages.retain(|line| !ids.contains(line.package_id.as_str()));
            if group.packages.len() != before {
                group.recompute_total();
            }
        }
        self.groups.retain(|g| !g.is_empty());
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}
