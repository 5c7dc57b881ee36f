//! Invoice Models
//!
//! Staged invoice lines and groups, plus the payload the backend's invoice
//! creation endpoint accepts.

use serde::{Deserialize, Serialize};

use crate::money::{exact_sum, sum_prices, to_decimal, to_f64};

/// One package staged for invoicing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePackageLine {
    pub package_id: String,
    pub tracking_number: String,
    pub weight: f64,
    /// `weight × plan_rate`, unrounded
    pub price: f64,
    pub has_insurance: bool,
    /// Only set when the backend supplies it; never computed client-side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_price: Option<f64>,
}

/// The staged lines for one client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceGroup {
    pub client_id: String,
    pub client_name: String,
    pub plan_rate: f64,
    pub packages: Vec<InvoicePackageLine>,
    pub total: f64,
}

impl InvoiceGroup {
    pub fn new(client_id: impl Into<String>, client_name: impl Into<String>, plan_rate: f64) -> Self {
        Self {
            client_id: client_id.into(),
            client_name: client_name.into(),
            plan_rate,
            packages: Vec::new(),
            total: 0.0,
        }
    }

    /// Recompute `total` from the line prices
    pub fn recompute_total(&mut self) {
        self.total = exact_sum(self.packages.iter().map(|line| line.price));
    }

    pub fn contains(&self, package_id: &str) -> bool {
        self.packages.iter().any(|line| line.package_id == package_id)
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Insurance flag for the whole group.
    ///
    /// Taken from the first line; lines of one client share the client's flag.
    pub fn shipping_insurance(&self) -> bool {
        self.packages.first().is_some_and(|line| line.has_insurance)
    }
}

/// Body of `POST /invoices`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoicePayload {
    /// Alphanumeric only
    pub customer_id: String,
    pub total_amount: f64,
    pub price_plan: f64,
    pub shipping_insurance: bool,
    pub invoice_items: Vec<InvoiceItem>,
}

/// One line of an invoice payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub name: String,
    pub description: String,
    pub price: f64,
}

impl InvoicePayload {
    /// Build the payload for a group.
    ///
    /// Returns `None` when the client id has no alphanumeric characters left
    /// after sanitising.
    pub fn from_group(group: &InvoiceGroup) -> Option<Self> {
        let customer_id = sanitize_customer_id(&group.client_id);
        if customer_id.is_empty() {
            return None;
        }

        let invoice_items = group
            .packages
            .iter()
            .map(|line| InvoiceItem {
                name: format!("Package {}", line.tracking_number),
                description: format!(
                    "Weight: {} lb | Rate: ${:.2}/lb",
                    line.weight, group.plan_rate
                ),
                price: to_f64(to_decimal(line.price)),
            })
            .collect();

        Some(Self {
            customer_id,
            total_amount: sum_prices(group.packages.iter().map(|line| line.price)),
            price_plan: group.plan_rate,
            shipping_insurance: group.shipping_insurance(),
            invoice_items,
        })
    }
}

/// Strip everything but ASCII letters and digits from a customer id
pub fn sanitize_customer_id(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Result of `GET /invoices/verify-package/{trackingNumber}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceVerification {
    pub is_invoiced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_status: Option<String>,
}

/// Invoice returned by `POST /invoices`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedInvoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
