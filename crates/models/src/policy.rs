use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::fields::{deserialize_date, deserialize_id};
use crate::product::InsuranceProduct;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyType {
    Car,
    Home,
    Health,
    Life,
    Travel,
    Business,
}

impl PolicyType {
    pub const ALL: [PolicyType; 6] = [
        PolicyType::Car,
        PolicyType::Home,
        PolicyType::Health,
        PolicyType::Life,
        PolicyType::Travel,
        PolicyType::Business,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PolicyType::Car => "Car",
            PolicyType::Home => "Home",
            PolicyType::Health => "Health",
            PolicyType::Life => "Life",
            PolicyType::Travel => "Travel",
            PolicyType::Business => "Business",
        }
    }
}

impl std::str::FromStr for PolicyType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PolicyType::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::validation(format!("unknown policy type '{s}'")))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyStatus {
    Active,
    Expired,
    Cancelled,
    #[default]
    Pending,
}

/// An issued instance of an insurance product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
    pub premium: f64,
    pub coverage_limit: f64,
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: PolicyStatus,
    pub insurance_product: InsuranceProduct,
}

impl Policy {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(self.premium.is_finite() && self.premium >= 0.0) {
            return Err(ModelError::validation("premium must be a non-negative amount"));
        }
        if !(self.coverage_limit.is_finite() && self.coverage_limit > 0.0) {
            return Err(ModelError::validation("coverage limit must be positive"));
        }
        validate_period(self.start_date, self.end_date)
    }

    pub fn is_active(&self) -> bool { self.status == PolicyStatus::Active }

    /// Whole days from `today` until the end date; negative once expired.
    pub fn days_until_end(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days()
    }

    /// Patch that renews the policy on `today`: the period restarts today and
    /// the end date moves one year past the previous end date.
    ///
    /// A policy that lapsed more than a year ago gets a fresh one-year term
    /// from `today` so the end date never precedes the start date.
    pub fn renewal(&self, today: NaiveDate) -> Result<PolicyPatch, ModelError> {
        if self.is_active() {
            return Err(ModelError::validation("active policies cannot be renewed"));
        }
        let extended = add_year(self.end_date)?;
        let end_date = if extended < today { add_year(today)? } else { extended };
        Ok(PolicyPatch {
            start_date: Some(today),
            end_date: Some(end_date),
            status: Some(PolicyStatus::Active),
            ..PolicyPatch::default()
        })
    }
}

/// Partial policy used for shallow merges into a cached entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyPatch {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub policy_type: Option<PolicyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PolicyStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_product: Option<InsuranceProduct>,
}

impl PolicyPatch {
    pub fn apply(self, policy: &mut Policy) {
        if let Some(v) = self.policy_type { policy.policy_type = v; }
        if let Some(v) = self.premium { policy.premium = v; }
        if let Some(v) = self.coverage_limit { policy.coverage_limit = v; }
        if let Some(v) = self.start_date { policy.start_date = v; }
        if let Some(v) = self.end_date { policy.end_date = v; }
        if let Some(v) = self.status { policy.status = v; }
        if let Some(v) = self.insurance_product { policy.insurance_product = v; }
    }
}

/// `POST /policies` request body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicyRequest {
    pub policy_number: String,
    pub status: PolicyStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub premium: f64,
    pub coverage_limit: f64,
    /// Filled from the session right before the request is sent.
    #[serde(default)]
    pub user_id: String,
    pub insurance_product_id: String,
}

impl CreatePolicyRequest {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.insurance_product_id.trim().is_empty() {
            return Err(ModelError::validation("insurance product required"));
        }
        if !(self.premium.is_finite() && self.premium >= 0.0) {
            return Err(ModelError::validation("premium must be a non-negative amount"));
        }
        if !(self.coverage_limit.is_finite() && self.coverage_limit > 0.0) {
            return Err(ModelError::validation("coverage limit must be positive"));
        }
        validate_period(self.start_date, self.end_date)
    }
}

fn validate_period(start: NaiveDate, end: NaiveDate) -> Result<(), ModelError> {
    if end < start {
        return Err(ModelError::validation(format!(
            "end date {end} precedes start date {start}"
        )));
    }
    Ok(())
}

pub fn add_year(date: NaiveDate) -> Result<NaiveDate, ModelError> {
    date.checked_add_months(Months::new(12))
        .ok_or_else(|| ModelError::Date(format!("{date} plus one year is out of range")))
}
