//! Invoice verification, creation and bulk submission
//!
//! Each staged group moves through
//! `Pending → Verifying → (AlreadyInvoiced | Submitting) → (Succeeded | Failed)`.
//! Groups are submitted concurrently and never block each other: one group
//! failing only lands that group in the report's `failed` list.

use std::fmt;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use serde_json::Value;
use shared::batch::{ClearPolicy, PendingBatch};
use shared::models::{CreatedInvoice, InvoiceGroup, InvoicePayload, InvoiceVerification};
use urlencoding::encode;

use crate::http::HttpClient;
use crate::wire::{created_invoice_from_value, verification_from_value};
use crate::{ClientError, ClientResult};

/// Lifecycle of one group during a batch submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    Pending,
    Verifying,
    AlreadyInvoiced,
    Submitting,
    Succeeded,
    Failed,
}

impl GroupStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GroupStatus::AlreadyInvoiced | GroupStatus::Succeeded | GroupStatus::Failed
        )
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GroupStatus::Pending => "pending",
            GroupStatus::Verifying => "verifying",
            GroupStatus::AlreadyInvoiced => "already_invoiced",
            GroupStatus::Submitting => "submitting",
            GroupStatus::Succeeded => "succeeded",
            GroupStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Progress after one group resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchProgress {
    /// Groups resolved so far (success, skip and failure all count)
    pub completed: usize,
    pub total: usize,
    /// Group that just resolved
    pub client_id: String,
    pub status: GroupStatus,
}

impl BatchProgress {
    /// Fraction complete in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Group invoiced by this submission
#[derive(Debug, Clone)]
pub struct SubmittedGroup {
    pub group: InvoiceGroup,
    pub invoice: CreatedInvoice,
}

/// Group skipped because one of its packages was already invoiced
#[derive(Debug, Clone)]
pub struct SkippedGroup {
    pub group: InvoiceGroup,
    pub tracking_number: String,
    pub invoice_number: Option<String>,
}

/// Group whose verification or creation failed
#[derive(Debug)]
pub struct FailedGroup {
    pub group: InvoiceGroup,
    pub error: ClientError,
}

enum GroupOutcome {
    Succeeded(SubmittedGroup),
    Skipped(SkippedGroup),
    Failed(FailedGroup),
}

impl GroupOutcome {
    fn group(&self) -> &InvoiceGroup {
        match self {
            GroupOutcome::Succeeded(g) => &g.group,
            GroupOutcome::Skipped(g) => &g.group,
            GroupOutcome::Failed(g) => &g.group,
        }
    }

    fn status(&self) -> GroupStatus {
        match self {
            GroupOutcome::Succeeded(_) => GroupStatus::Succeeded,
            GroupOutcome::Skipped(_) => GroupStatus::AlreadyInvoiced,
            GroupOutcome::Failed(_) => GroupStatus::Failed,
        }
    }
}

/// Counts of a finished submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Outcome of a batch submission, grouped by result
#[derive(Debug, Default)]
pub struct SubmissionReport {
    pub succeeded: Vec<SubmittedGroup>,
    pub skipped: Vec<SkippedGroup>,
    pub failed: Vec<FailedGroup>,
}

impl SubmissionReport {
    fn record(&mut self, outcome: GroupOutcome) {
        match outcome {
            GroupOutcome::Succeeded(g) => self.succeeded.push(g),
            GroupOutcome::Skipped(g) => self.skipped.push(g),
            GroupOutcome::Failed(g) => self.failed.push(g),
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.skipped.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn summary(&self) -> SubmissionSummary {
        SubmissionSummary {
            succeeded: self.succeeded.len(),
            skipped: self.skipped.len(),
            failed: self.failed.len(),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Whether `policy` calls for clearing the whole batch
    pub fn should_clear_all(&self, policy: ClearPolicy) -> bool {
        policy.should_clear_all(self.succeeded.len(), self.failed.len(), self.total())
    }

    /// Update the pending batch after submission.
    ///
    /// When the policy calls for a full clear every submitted line is
    /// removed; otherwise only the lines of settled (succeeded and skipped)
    /// groups. Lines staged after the submission started are kept. Returns
    /// `true` on a full clear.
    pub fn apply_to(&self, batch: &mut PendingBatch, policy: ClearPolicy) -> bool {
        let clear_all = self.should_clear_all(policy);
        let settled = self
            .succeeded
            .iter()
            .map(|g| &g.group)
            .chain(self.skipped.iter().map(|g| &g.group));
        let removed: Vec<&InvoiceGroup> = if clear_all {
            settled.chain(self.failed.iter().map(|g| &g.group)).collect()
        } else {
            settled.collect()
        };
        batch.remove_packages(
            removed
                .iter()
                .flat_map(|g| g.packages.iter().map(|line| line.package_id.as_str())),
        );
        clear_all
    }
}

/// Invoice service
#[derive(Debug, Clone)]
pub struct InvoiceService<C> {
    http: C,
}

impl<C: HttpClient> InvoiceService<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }

    /// `GET /invoices/verify-package/{trackingNumber}`
    pub async fn verify_package(&self, tracking_number: &str) -> ClientResult<InvoiceVerification> {
        let body: Value = self
            .http
            .get(&format!("invoices/verify-package/{}", encode(tracking_number)))
            .await?;
        verification_from_value(body)
    }

    /// Fail with `AlreadyInvoiced` if the package is on an invoice
    pub async fn ensure_not_invoiced(&self, tracking_number: &str) -> ClientResult<()> {
        let verification = self.verify_package(tracking_number).await?;
        if verification.is_invoiced {
            return Err(ClientError::AlreadyInvoiced {
                tracking_number: tracking_number.to_string(),
                invoice_number: verification.invoice_number,
            });
        }
        Ok(())
    }

    /// `POST /invoices`
    pub async fn create_invoice(&self, payload: &InvoicePayload) -> ClientResult<CreatedInvoice> {
        let body: Value = self.http.post("invoices", payload).await?;
        Ok(created_invoice_from_value(body))
    }

    /// Submit every group, concurrently.
    ///
    /// `on_progress` is called once per group, in completion order. The call
    /// only fails up front when there is no session token; per-group
    /// failures end up in the report.
    pub async fn submit_batch<F>(
        &self,
        groups: &[InvoiceGroup],
        mut on_progress: F,
    ) -> ClientResult<SubmissionReport>
    where
        F: FnMut(BatchProgress),
    {
        if !self.http.auth().is_authenticated() {
            return Err(ClientError::NotAuthenticated);
        }

        let total = groups.len();
        tracing::info!(groups = total, "Submitting invoice batch");

        let mut in_flight: FuturesUnordered<_> =
            groups.iter().map(|group| self.submit_group(group)).collect();

        let mut report = SubmissionReport::default();
        let mut completed = 0;
        while let Some(outcome) = in_flight.next().await {
            completed += 1;
            on_progress(BatchProgress {
                completed,
                total,
                client_id: outcome.group().client_id.clone(),
                status: outcome.status(),
            });
            report.record(outcome);
        }

        tracing::info!(
            succeeded = report.succeeded.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Invoice batch finished"
        );
        Ok(report)
    }

    async fn submit_group(&self, group: &InvoiceGroup) -> GroupOutcome {
        let client_id = group.client_id.as_str();
        tracing::debug!(client_id, status = %GroupStatus::Verifying, "Group status");

        for line in &group.packages {
            match self.verify_package(&line.tracking_number).await {
                Ok(verification) if verification.is_invoiced => {
                    tracing::warn!(
                        client_id,
                        tracking_number = %line.tracking_number,
                        invoice_number = ?verification.invoice_number,
                        "Package already invoiced, skipping group"
                    );
                    return GroupOutcome::Skipped(SkippedGroup {
                        group: group.clone(),
                        tracking_number: line.tracking_number.clone(),
                        invoice_number: verification.invoice_number,
                    });
                }
                Ok(_) => {}
                Err(error) => return Self::failed(group, error),
            }
        }

        if group.is_empty() {
            return Self::failed(group, ClientError::Validation("group has no packages".into()));
        }
        let Some(payload) = InvoicePayload::from_group(group) else {
            return Self::failed(
                group,
                ClientError::Validation(format!("invalid customer id: {}", group.client_id)),
            );
        };

        tracing::debug!(client_id, status = %GroupStatus::Submitting, "Group status");
        match self.create_invoice(&payload).await {
            Ok(invoice) => {
                tracing::info!(
                    client_id,
                    invoice_number = ?invoice.invoice_number,
                    total = payload.total_amount,
                    "Invoice created"
                );
                GroupOutcome::Succeeded(SubmittedGroup {
                    group: group.clone(),
                    invoice,
                })
            }
            Err(error) => Self::failed(group, error),
        }
    }

    fn failed(group: &InvoiceGroup, error: ClientError) -> GroupOutcome {
        tracing::warn!(client_id = %group.client_id, error = %error, "Invoice group failed");
        GroupOutcome::Failed(FailedGroup {
            group: group.clone(),
            error,
        })
    }
}
