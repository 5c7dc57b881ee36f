//! Mutation state machine and in-flight request guards

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use shared::ErrorCode;

use crate::ClientError;

/// State of one mutation (assign, stage, submit...)
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MutationState<T> {
    #[default]
    Idle,
    Pending,
    Success(T),
    Error(ErrorCode, String),
}

impl<T> MutationState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationState::Pending)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, MutationState::Idle)
    }

    pub fn start(&mut self) {
        *self = MutationState::Pending;
    }

    pub fn succeed(&mut self, value: T) {
        *self = MutationState::Success(value);
    }

    pub fn fail(&mut self, error: &ClientError) {
        *self = MutationState::Error(error.code(), error.user_message());
    }

    pub fn reset(&mut self) {
        *self = MutationState::Idle;
    }

    /// Record the outcome of a finished request
    pub fn settle<E>(&mut self, result: &Result<T, E>)
    where
        T: Clone,
        E: std::borrow::Borrow<ClientError>,
    {
        match result {
            Ok(value) => self.succeed(value.clone()),
            Err(err) => self.fail(err.borrow()),
        }
    }
}

/// Keys with a request in flight.
///
/// A key can only be claimed once at a time; the claim is released when the
/// returned guard drops.
#[derive(Debug, Clone, Default)]
pub struct InFlightSet {
    keys: Arc<Mutex<HashSet<String>>>,
}

impl InFlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claim `key`; `None` if it is already in flight
    pub fn try_begin(&self, key: impl Into<String>) -> Option<InFlightGuard> {
        let key = key.into();
        if !self.lock().insert(key.clone()) {
            tracing::debug!(key = %key, "Request already in flight");
            return None;
        }
        Some(InFlightGuard {
            keys: Arc::clone(&self.keys),
            key,
        })
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Releases its key on drop
#[derive(Debug)]
pub struct InFlightGuard {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl InFlightGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.key);
    }
}
