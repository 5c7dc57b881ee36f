//! Backend wire formats and the adapter into domain types
//!
//! The backend is inconsistent about field names (`tracking` vs
//! `trackingNumber`, `user` vs `client`, camelCase vs snake_case) and
//! sends numbers as strings in places. All of that is absorbed here, once,
//! so the rest of the crate only ever sees [`shared::models`] types.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use shared::insurance::normalize_insurance_flag;
use shared::models::{
    CarrierDetails, ClientRef, CreatedInvoice, InvoiceVerification, TrackingRecord,
};

use crate::{ClientError, ClientResult};

// ============================================================================
// Lenient field helpers
// ============================================================================

/// Number from a JSON number or numeric string
fn number_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Non-empty string from a JSON string or number
fn string_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<Value>::deserialize(d)?
        .as_ref()
        .and_then(number_from_value)
        .unwrap_or(0.0))
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(number_from_value))
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(string_from_value))
}

/// Unwrap `{ "data": ... }` envelopes
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if matches!(map.get("data"), Some(Value::Object(_) | Value::Array(_))) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// First object of a payload that may be a single object or a list
fn first_object(value: Value) -> Option<Value> {
    match unwrap_envelope(value) {
        Value::Array(items) => items.into_iter().find(Value::is_object),
        obj @ Value::Object(_) => Some(obj),
        _ => None,
    }
}

// ============================================================================
// Clients
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireClient {
    #[serde(default, alias = "_id", alias = "userId", alias = "user_id", deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, alias = "first_name", deserialize_with = "lenient_string")]
    first_name: Option<String>,
    #[serde(default, alias = "last_name", deserialize_with = "lenient_string")]
    last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    email: Option<String>,
    #[serde(default, alias = "plan_rate", deserialize_with = "lenient_opt_f64")]
    plan_rate: Option<f64>,
    #[serde(default, alias = "plan_name", deserialize_with = "lenient_string")]
    plan_name: Option<String>,
    #[serde(default)]
    plan: Option<Value>,
    #[serde(default, alias = "branch_name", deserialize_with = "lenient_string")]
    branch_name: Option<String>,
    #[serde(default)]
    branch: Option<Value>,
    #[serde(default, alias = "shipping_insurance")]
    shipping_insurance: Option<Value>,
}

impl WireClient {
    fn into_client(self) -> Option<ClientRef> {
        let id = self.id?;

        let name = self.name.unwrap_or_else(|| {
            [self.first_name.as_deref(), self.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ")
        });

        let plan_rate = self
            .plan_rate
            .or_else(|| {
                let plan = self.plan.as_ref()?;
                plan.get("rate")
                    .or_else(|| plan.get("price"))
                    .and_then(number_from_value)
            })
            .unwrap_or(0.0);

        let plan_name = self.plan_name.or_else(|| match self.plan.as_ref()? {
            Value::Object(plan) => plan.get("name").and_then(string_from_value),
            other => string_from_value(other),
        });

        let branch_name = self.branch_name.or_else(|| match self.branch.as_ref()? {
            Value::Object(branch) => branch.get("name").and_then(string_from_value),
            other => string_from_value(other),
        });

        Some(ClientRef {
            id,
            name,
            email: self.email.unwrap_or_default(),
            plan_rate,
            plan_name,
            branch_name,
            shipping_insurance: normalize_insurance_flag(self.shipping_insurance.as_ref()),
        })
    }
}

/// Map one client object; `None` when it has no id
pub fn client_from_value(value: Value) -> Option<ClientRef> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value::<WireClient>(value)
        .ok()
        .and_then(WireClient::into_client)
}

/// Map the `/users/all` payload. Entries without an id are dropped.
pub fn clients_from_value(value: Value) -> ClientResult<Vec<ClientRef>> {
    let list = match unwrap_envelope(value) {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("users") {
            Some(Value::Array(items)) => items,
            _ => return Err(ClientError::InvalidResponse("expected a list of users".into())),
        },
        _ => return Err(ClientError::InvalidResponse("expected a list of users".into())),
    };
    let total = list.len();
    let clients: Vec<ClientRef> = list.into_iter().filter_map(client_from_value).collect();
    if clients.len() < total {
        tracing::warn!(dropped = total - clients.len(), "Dropped user entries without an id");
    }
    Ok(clients)
}

// ============================================================================
// Internal packages
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePackage {
    #[serde(default, alias = "_id", deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, alias = "tracking_number", alias = "tracking", deserialize_with = "lenient_string")]
    tracking_number: Option<String>,
    #[serde(default, alias = "package_status", alias = "status", deserialize_with = "lenient_string")]
    package_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    weight: f64,
    #[serde(default, alias = "volumetric_weight", deserialize_with = "lenient_f64")]
    volumetric_weight: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    length: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    width: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    height: f64,
    #[serde(default)]
    client: Option<Value>,
    #[serde(default)]
    user: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    position: Option<String>,
    #[serde(default, alias = "declared_value", deserialize_with = "lenient_opt_f64")]
    declared_value: Option<f64>,
}

/// Map an internal package payload.
///
/// `user` stands in for `client` when `client` is absent. `fallback_tracking`
/// fills the tracking number if the payload omits it.
pub fn package_from_value(value: Value, fallback_tracking: &str) -> ClientResult<TrackingRecord> {
    let object = first_object(value)
        .ok_or_else(|| ClientError::InvalidResponse("expected a package object".into()))?;
    let wire: WirePackage = serde_json::from_value(object)?;

    let client = match wire.client {
        Some(client) if !client.is_null() => client_from_value(client),
        _ => wire.user.and_then(client_from_value),
    };

    Ok(TrackingRecord {
        id: wire.id,
        tracking_number: wire
            .tracking_number
            .unwrap_or_else(|| fallback_tracking.to_string()),
        package_status: wire.package_status.unwrap_or_else(|| "unknown".to_string()),
        weight: wire.weight,
        volumetric_weight: wire.volumetric_weight,
        length: wire.length,
        width: wire.width,
        height: wire.height,
        client,
        position: wire.position,
        declared_value: wire.declared_value,
        carrier: None,
    })
}

// ============================================================================
// External carrier cargo
// ============================================================================

#[derive(Debug, Deserialize)]
struct WireExternalCargo {
    #[serde(default, deserialize_with = "lenient_string")]
    tracking: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    total_weight: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    vol_weight: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    cargo_length: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    cargo_width: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    cargo_height: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    shipper: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    mode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    datecreated: Option<String>,
}

/// Map the external carrier payload; unparsable numbers become `0`
pub fn external_cargo_from_value(value: Value, fallback_tracking: &str) -> ClientResult<TrackingRecord> {
    let object = first_object(value)
        .ok_or_else(|| ClientError::InvalidResponse("expected a cargo object".into()))?;
    let wire: WireExternalCargo = serde_json::from_value(object)?;

    Ok(TrackingRecord {
        id: None,
        tracking_number: wire.tracking.unwrap_or_else(|| fallback_tracking.to_string()),
        package_status: wire.status.unwrap_or_else(|| "unknown".to_string()),
        weight: wire.total_weight,
        volumetric_weight: wire.vol_weight,
        length: wire.cargo_length,
        width: wire.cargo_width,
        height: wire.cargo_height,
        client: None,
        position: None,
        declared_value: None,
        carrier: Some(CarrierDetails {
            shipper: wire.shipper,
            mode: wire.mode,
            date_created: wire.datecreated,
        }),
    })
}

// ============================================================================
// Invoices
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireVerification {
    #[serde(default, alias = "is_invoiced")]
    is_invoiced: Option<Value>,
    #[serde(default, alias = "invoice_details", alias = "invoice")]
    invoice_details: Option<Value>,
}

/// Map `GET /invoices/verify-package/{trackingNumber}`
pub fn verification_from_value(value: Value) -> ClientResult<InvoiceVerification> {
    let object = first_object(value)
        .ok_or_else(|| ClientError::InvalidResponse("expected a verification object".into()))?;
    let wire: WireVerification = serde_json::from_value(object)?;
    let details = wire.invoice_details.filter(Value::is_object);

    let field = |names: &[&str]| {
        let details = details.as_ref()?;
        names.iter().find_map(|n| details.get(*n).and_then(string_from_value))
    };

    Ok(InvoiceVerification {
        is_invoiced: normalize_insurance_flag(wire.is_invoiced.as_ref()),
        invoice_number: field(&["invoice_number", "invoiceNumber", "number"]),
        invoice_status: field(&["status", "invoice_status", "invoiceStatus"]),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCreatedInvoice {
    #[serde(default, alias = "_id", deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, alias = "invoice_number", deserialize_with = "lenient_string")]
    invoice_number: Option<String>,
    #[serde(default, alias = "total_amount", deserialize_with = "lenient_opt_f64")]
    total_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    status: Option<String>,
}

/// Map the `POST /invoices` response (bare, `{data}` or `{invoice}` wrapped)
pub fn created_invoice_from_value(value: Value) -> CreatedInvoice {
    let value = match unwrap_envelope(value) {
        Value::Object(mut map) if map.get("invoice").is_some_and(Value::is_object) => {
            map.remove("invoice").unwrap_or(Value::Null)
        }
        other => other,
    };
    match serde_json::from_value::<WireCreatedInvoice>(value) {
        Ok(wire) => CreatedInvoice {
            id: wire.id,
            invoice_number: wire.invoice_number,
            total_amount: wire.total_amount,
            status: wire.status,
        },
        Err(err) => {
            tracing::debug!(error = %err, "Invoice created but response body was not recognised");
            CreatedInvoice::default()
        }
    }
}
