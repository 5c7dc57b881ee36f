//! Tracking Record Model

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ClientRef;
use crate::slot::derive_slot_code;

/// A single package's shipment state as known to the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingRecord {
    /// Backend id; absent for records that only exist at the external carrier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub tracking_number: String,
    pub package_status: String,
    pub weight: f64,
    pub volumetric_weight: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientRef>,
    /// Persisted warehouse slot, if the backend has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_value: Option<f64>,
    /// Present when the record came from the external carrier lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<CarrierDetails>,
}

impl TrackingRecord {
    /// Identity: backend id when present, else the tracking number
    pub fn identity(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.tracking_number)
    }

    /// Slot code to display: the persisted position, or one derived from the
    /// tracking number. Never written back.
    pub fn slot_code(&self) -> String {
        match self.position.as_deref().map(str::trim) {
            Some(position) if !position.is_empty() => position.to_string(),
            _ => derive_slot_code(&self.tracking_number),
        }
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Whether this record was resolved through the external carrier
    pub fn is_external(&self) -> bool {
        self.carrier.is_some()
    }
}

/// Extra fields reported by the external carrier lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipper: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Creation date exactly as the carrier reported it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
}

impl CarrierDetails {
    /// Best-effort parse of `date_created`.
    ///
    /// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and bare `YYYY-MM-DD`
    /// (interpreted as UTC midnight).
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.date_created.as_deref()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}
