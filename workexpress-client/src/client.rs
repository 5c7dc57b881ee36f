//! WorkExpressClient - the entry point the dashboard talks to
//!
//! Owns the HTTP client, the pending invoice batch and the request-state
//! helpers, and wires them to the backend services.

use std::sync::Mutex;

use shared::batch::{ClearPolicy, PendingBatch};
use shared::models::{InvoiceGroup, InvoicePackageLine, TrackingRecord};

use crate::auth::AuthContext;
use crate::http::{HttpClient, NetworkHttpClient};
use crate::services::{
    BatchProgress, DebouncedClientFilter, InvoiceService, PackageService, SubmissionReport,
    SubmissionSummary, TrackingService, UserService,
};
use crate::state::{InFlightSet, MutationState, RecentSearches, SearchSequencer};
use crate::{ClientConfig, ClientError, ClientResult};

/// In-flight key for the batch submission
const SUBMIT_KEY: &str = "invoice-batch:submit";

/// High-level client
#[derive(Debug)]
pub struct WorkExpressClient<C = NetworkHttpClient> {
    http: C,
    config: ClientConfig,
    sequencer: SearchSequencer,
    in_flight: InFlightSet,
    pending: tokio::sync::Mutex<PendingBatch>,
    recent: Mutex<RecentSearches>,
    submission: Mutex<MutationState<SubmissionSummary>>,
}

impl WorkExpressClient<NetworkHttpClient> {
    /// Create a network client with an explicit session
    pub fn new(config: ClientConfig, auth: AuthContext) -> ClientResult<Self> {
        let http = NetworkHttpClient::new(&config, auth)?;
        Ok(Self::with_http(http, config))
    }

    /// Create a network client from the environment (see [`ClientConfig::from_env`])
    pub fn from_env() -> ClientResult<Self> {
        let config = ClientConfig::from_env();
        let http = NetworkHttpClient::from_config(&config)?;
        Ok(Self::with_http(http, config))
    }
}

impl<C: HttpClient + Clone> WorkExpressClient<C> {
    pub fn with_http(http: C, config: ClientConfig) -> Self {
        let recent = RecentSearches::new(config.recent_searches);
        Self {
            http,
            config,
            sequencer: SearchSequencer::new(),
            in_flight: InFlightSet::new(),
            pending: tokio::sync::Mutex::new(PendingBatch::new()),
            recent: Mutex::new(recent),
            submission: Mutex::new(MutationState::Idle),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.http.auth().is_authenticated()
    }

    // ========== Services ==========

    pub fn tracking(&self) -> TrackingService<C> {
        TrackingService::new(self.http.clone())
    }

    pub fn users(&self) -> UserService<C> {
        UserService::new(self.http.clone())
    }

    pub fn packages(&self) -> PackageService<C> {
        PackageService::new(self.http.clone())
    }

    pub fn invoices(&self) -> InvoiceService<C> {
        InvoiceService::new(self.http.clone())
    }

    /// Load the client list into a filter debounced by `config.search_debounce`
    pub async fn client_filter(&self) -> ClientResult<DebouncedClientFilter> {
        let directory = self.users().directory().await?;
        Ok(DebouncedClientFilter::new(directory, self.config.search_debounce))
    }

    pub fn in_flight(&self) -> &InFlightSet {
        &self.in_flight
    }

    // ========== Search ==========

    /// Search a tracking number; `Ok(None)` if a newer search superseded it.
    ///
    /// Successful searches go to the recent-search history.
    pub async fn search(&self, query: &str) -> ClientResult<Option<Vec<TrackingRecord>>> {
        let result = self.tracking().search_latest(&self.sequencer, query).await?;
        if result.as_ref().is_some_and(|records| !records.is_empty()) {
            lock(&self.recent).push(query);
        }
        Ok(result)
    }

    pub fn recent_searches(&self) -> Vec<String> {
        lock(&self.recent).entries().map(str::to_string).collect()
    }

    /// Replace the history, e.g. after [`RecentSearches::load`]
    pub fn restore_recent_searches(&self, history: RecentSearches) {
        *lock(&self.recent) = history;
    }

    pub fn recent_searches_snapshot(&self) -> RecentSearches {
        lock(&self.recent).clone()
    }

    // ========== Pending invoice batch ==========

    /// Stage a package for invoicing after checking it is not already invoiced.
    ///
    /// Rejected while the same package is being staged, or while a batch
    /// submission is running.
    pub async fn stage_package(&self, record: &TrackingRecord) -> ClientResult<InvoiceGroup> {
        if self.in_flight.is_in_flight(SUBMIT_KEY) {
            return Err(submission_busy());
        }
        if record.client.is_none() {
            return Err(shared::BuildError::MissingClient {
                tracking_number: record.tracking_number.clone(),
            }
            .into());
        }
        let _guard = self
            .in_flight
            .try_begin(format!("stage:{}", record.identity()))
            .ok_or_else(|| ClientError::Validation("Package is already being added".into()))?;

        self.invoices()
            .ensure_not_invoiced(&record.tracking_number)
            .await?;

        // A submission may have started while the package was being verified
        let mut pending = self.pending.lock().await;
        if self.in_flight.is_in_flight(SUBMIT_KEY) {
            return Err(submission_busy());
        }
        let group = pending.add_package(record)?.clone();
        Ok(group)
    }

    /// Remove a staged package; no-op if it is not staged
    pub async fn unstage_package(&self, client_id: &str, package_id: &str) -> Option<InvoicePackageLine> {
        self.pending.lock().await.remove_package(client_id, package_id)
    }

    pub async fn pending_batch(&self) -> PendingBatch {
        self.pending.lock().await.clone()
    }

    /// Submit the pending batch and update it according to `policy`.
    ///
    /// A second call while one is running fails with a validation error.
    pub async fn submit_pending<F>(&self, policy: ClearPolicy, on_progress: F) -> ClientResult<SubmissionReport>
    where
        F: FnMut(BatchProgress),
    {
        let _guard = self
            .in_flight
            .try_begin(SUBMIT_KEY)
            .ok_or_else(submission_busy)?;

        let groups = self.pending.lock().await.groups().to_vec();
        lock(&self.submission).start();

        let result = self.invoices().submit_batch(&groups, on_progress).await;
        match &result {
            Ok(report) => {
                let cleared = report.apply_to(&mut *self.pending.lock().await, policy);
                tracing::info!(cleared_all = cleared, ?policy, "Pending batch updated");
                lock(&self.submission).succeed(report.summary());
            }
            Err(err) => lock(&self.submission).fail(err),
        }
        result
    }

    pub fn submission_state(&self) -> MutationState<SubmissionSummary> {
        lock(&self.submission).clone()
    }
}

fn submission_busy() -> ClientError {
    ClientError::Validation("A batch submission is in progress".into())
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
