use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::errors::ModelError;
use crate::fields::{deserialize_date, deserialize_id};

/// Claim lifecycle. Serialized as upper-case names; numeric ordinals
/// (`0` = `SUBMITTED` .. `4` = `CLOSED`) are accepted on input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    #[default]
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    Closed,
}

impl ClaimStatus {
    const ORDERED: [ClaimStatus; 5] = [
        ClaimStatus::Submitted,
        ClaimStatus::UnderReview,
        ClaimStatus::Approved,
        ClaimStatus::Rejected,
        ClaimStatus::Closed,
    ];

    /// Still waiting on an adjudication decision.
    pub fn is_pending(self) -> bool {
        matches!(self, ClaimStatus::Submitted | ClaimStatus::UnderReview)
    }

    pub fn label(self) -> &'static str {
        match self {
            ClaimStatus::Submitted => "Submitted",
            ClaimStatus::UnderReview => "Under review",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
            ClaimStatus::Closed => "Closed",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "SUBMITTED" => Some(ClaimStatus::Submitted),
            "UNDER_REVIEW" => Some(ClaimStatus::UnderReview),
            "APPROVED" => Some(ClaimStatus::Approved),
            "REJECTED" => Some(ClaimStatus::Rejected),
            "CLOSED" => Some(ClaimStatus::Closed),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for ClaimStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Ordinal(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Name(name) => ClaimStatus::from_name(&name.to_ascii_uppercase())
                .ok_or_else(|| de::Error::custom(format!("unknown claim status '{name}'"))),
            Raw::Ordinal(n) => usize::try_from(n)
                .ok()
                .and_then(|i| ClaimStatus::ORDERED.get(i).copied())
                .ok_or_else(|| de::Error::custom(format!("claim status ordinal {n} out of range"))),
        }
    }
}

/// A request for payout against a policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(alias = "insuranceId")]
    pub policy_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub status: ClaimStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial claim used for shallow merges into a cached entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ClaimStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ClaimPatch {
    pub fn apply(self, claim: &mut Claim) {
        if let Some(v) = self.description { claim.description = v; }
        if let Some(v) = self.amount { claim.amount = v; }
        if let Some(v) = self.status { claim.status = v; }
        if let Some(v) = self.documents { claim.documents = Some(v); }
        if let Some(v) = self.updated_at { claim.updated_at = Some(v); }
    }
}

pub const MIN_DESCRIPTION_CHARS: usize = 5;

/// `POST /claims` request body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClaimRequest {
    pub policy_id: String,
    #[serde(default)]
    pub user_id: String,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
}

impl CreateClaimRequest {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.policy_id.trim().is_empty() {
            return Err(ModelError::validation("Please select an insurance policy"));
        }
        if self.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(ModelError::validation(format!(
                "Description must be at least {MIN_DESCRIPTION_CHARS} characters"
            )));
        }
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(ModelError::validation("Amount must be a positive number"));
        }
        Ok(())
    }
}
