//! Tracking search
//!
//! Lookup order: internal package database, then the external carrier
//! integration when the internal lookup answers 404.

use serde_json::Value;
use shared::models::TrackingRecord;
use urlencoding::encode;

use crate::http::HttpClient;
use crate::state::SearchSequencer;
use crate::wire::{external_cargo_from_value, package_from_value};
use crate::{ClientError, ClientResult};

/// Minimum length of a tracking code
const MIN_TRACKING_LEN: usize = 6;

/// Whether a query looks like a tracking code: 6+ ASCII letters/digits
pub fn is_tracking_code(query: &str) -> bool {
    query.len() >= MIN_TRACKING_LEN && query.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Tracking Search Service
#[derive(Debug, Clone)]
pub struct TrackingService<C> {
    http: C,
}

impl<C: HttpClient> TrackingService<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }

    /// Resolve a tracking query.
    ///
    /// Queries that are not tracking codes return
    /// [`ClientError::AdvancedSearchUnsupported`] without touching the
    /// network. A 404 from both sources is [`ClientError::NotFound`].
    pub async fn search(&self, query: &str) -> ClientResult<Vec<TrackingRecord>> {
        let query = query.trim();
        if !is_tracking_code(query) {
            return Err(ClientError::AdvancedSearchUnsupported(query.to_string()));
        }
        let segment = encode(query);

        match self.http.get::<Value>(&format!("packages/tracking/{}", segment)).await {
            Ok(body) => {
                let record = package_from_value(body, query)?;
                tracing::info!(tracking_number = %record.tracking_number, "Package found");
                Ok(vec![record])
            }
            Err(ClientError::NotFound(_)) => {
                tracing::debug!(tracking_number = %query, "Not in package database, trying carrier lookup");
                self.search_external(query, &segment).await
            }
            Err(err) => {
                tracing::warn!(tracking_number = %query, error = %err, "Tracking lookup failed");
                Err(err)
            }
        }
    }

    async fn search_external(&self, query: &str, segment: &str) -> ClientResult<Vec<TrackingRecord>> {
        let body = match self
            .http
            .get::<Value>(&format!("cargo/external-tracking/{}", segment))
            .await
        {
            Ok(Value::Null) | Err(ClientError::NotFound(_)) => {
                tracing::info!(tracking_number = %query, "Tracking number not found");
                return Err(ClientError::NotFound(query.to_string()));
            }
            Ok(body) => body,
            Err(err) => return Err(err),
        };
        let record = external_cargo_from_value(body, query)?;
        tracing::info!(tracking_number = %record.tracking_number, "Package found at external carrier");
        Ok(vec![record])
    }

    /// Search, publishing the result only if no newer search started meanwhile.
    ///
    /// Returns `Ok(None)` for a superseded search, whatever its outcome.
    pub async fn search_latest(
        &self,
        sequencer: &SearchSequencer,
        query: &str,
    ) -> ClientResult<Option<Vec<TrackingRecord>>> {
        let ticket = sequencer.begin();
        let result = self.search(query).await;
        if !sequencer.is_current(ticket) {
            tracing::debug!(query, "Discarding superseded search result");
            return Ok(None);
        }
        result.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_tracking_code() {
        assert!(is_tracking_code("WEX123"));
        assert!(is_tracking_code("1Z999AA10123456784"));
        assert!(!is_tracking_code("ab"));
        assert!(!is_tracking_code("WEX12"));
        assert!(!is_tracking_code("WEX 123"));
        assert!(!is_tracking_code("WEX-123456"));
        assert!(!is_tracking_code("ÑANDÚ12345"));
    }
}
