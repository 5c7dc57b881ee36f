//! Package measurement updates and client assignment

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::TrackingRecord;
use urlencoding::encode;

use super::users::UserService;
use crate::http::HttpClient;
use crate::{ClientError, ClientResult};

/// Body of `POST /packages/{id}/dimensions`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

/// Body of `PUT /packages/{id}/weights`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub weight: f64,
    pub volumetric_weight: f64,
}

impl Dimensions {
    fn validate(&self) -> ClientResult<()> {
        require_measure("length", self.length)?;
        require_measure("width", self.width)?;
        require_measure("height", self.height)
    }

    /// Copy onto a record after the backend accepted the update
    pub fn apply_to(&self, record: &mut TrackingRecord) {
        record.length = self.length;
        record.width = self.width;
        record.height = self.height;
    }
}

impl Weights {
    fn validate(&self) -> ClientResult<()> {
        require_measure("weight", self.weight)?;
        require_measure("volumetric_weight", self.volumetric_weight)
    }

    pub fn apply_to(&self, record: &mut TrackingRecord) {
        record.weight = self.weight;
        record.volumetric_weight = self.volumetric_weight;
    }
}

/// Measurements must be finite and non-negative
fn require_measure(field: &str, value: f64) -> ClientResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ClientError::Validation(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Package service
#[derive(Debug, Clone)]
pub struct PackageService<C> {
    http: C,
}

impl<C: HttpClient + Clone> PackageService<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }

    pub async fn update_dimensions(&self, package_id: &str, dimensions: Dimensions) -> ClientResult<()> {
        dimensions.validate()?;
        let _: Value = self
            .http
            .post(&format!("packages/{}/dimensions", encode(package_id)), &dimensions)
            .await?;
        tracing::info!(package_id, ?dimensions, "Updated package dimensions");
        Ok(())
    }

    pub async fn update_weights(&self, package_id: &str, weights: Weights) -> ClientResult<()> {
        weights.validate()?;
        let _: Value = self
            .http
            .put(&format!("packages/{}/weights", encode(package_id)), &weights)
            .await?;
        tracing::info!(package_id, ?weights, "Updated package weights");
        Ok(())
    }

    /// Attach a client to a record, enriched from `GET /users/{id}`.
    ///
    /// The assignment is local; the record is returned with `client` set.
    pub async fn assign_client(&self, mut record: TrackingRecord, client_id: &str) -> ClientResult<TrackingRecord> {
        if client_id.trim().is_empty() {
            return Err(ClientError::Validation("client id is required".into()));
        }
        let client = UserService::new(self.http.clone()).get_client(client_id).await?;
        tracing::info!(
            tracking_number = %record.tracking_number,
            client_id = %client.id,
            "Assigned client to package"
        );
        record.client = Some(client);
        Ok(record)
    }
}
