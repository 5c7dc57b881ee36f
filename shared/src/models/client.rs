//! Client (customer) Model

use serde::{Deserialize, Serialize};

/// Client assigned to a package.
///
/// `shipping_insurance` is already normalised to a strict boolean; see
/// [`crate::insurance::normalize_insurance_flag`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRef {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Price per pound under the client's subscription plan
    pub plan_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub shipping_insurance: bool,
}

impl ClientRef {
    /// Plan rate if it can be used for pricing (finite and non-zero)
    pub fn usable_rate(&self) -> Option<f64> {
        (self.plan_rate.is_finite() && self.plan_rate != 0.0).then_some(self.plan_rate)
    }

    /// Case-insensitive match over name, email and id
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
            || self.email.to_lowercase().contains(needle_lower)
            || self.id.to_lowercase().contains(needle_lower)
    }
}
