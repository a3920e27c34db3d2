use serde::{Deserialize, Serialize};

use crate::fields::deserialize_id;
use crate::policy::PolicyType;

/// Catalog entry describing a purchasable coverage. Read-only on the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceProduct {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: PolicyType,
    #[serde(default)]
    pub description: String,
    pub base_price: f64,
    #[serde(default)]
    pub coverage_details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl InsuranceProduct {
    /// Products without an explicit flag are treated as on sale.
    pub fn is_available(&self) -> bool { self.is_active.unwrap_or(true) }
}
