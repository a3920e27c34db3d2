//! Client-side price indications shown during purchase. The backend remains
//! the pricing authority.

use std::str::FromStr;

use models::errors::ModelError;
use models::PolicyType;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoverageLevel {
    Basic,
    #[default]
    Standard,
    Premium,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaymentFrequency {
    Monthly,
    #[default]
    Annually,
}

impl CoverageLevel {
    pub fn label(self) -> &'static str {
        match self {
            CoverageLevel::Basic => "Basic",
            CoverageLevel::Standard => "Standard",
            CoverageLevel::Premium => "Premium",
        }
    }
}

impl FromStr for CoverageLevel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(CoverageLevel::Basic),
            "standard" => Ok(CoverageLevel::Standard),
            "premium" => Ok(CoverageLevel::Premium),
            other => Err(ModelError::validation(format!("unknown coverage level '{other}'"))),
        }
    }
}

impl PaymentFrequency {
    pub fn suffix(self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "/month",
            PaymentFrequency::Annually => "/year",
        }
    }
}

impl FromStr for PaymentFrequency {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(PaymentFrequency::Monthly),
            "annually" | "annual" | "yearly" => Ok(PaymentFrequency::Annually),
            other => Err(ModelError::validation(format!("unknown payment frequency '{other}'"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quote {
    pub policy_type: PolicyType,
    pub level: CoverageLevel,
    pub frequency: PaymentFrequency,
    pub coverage: f64,
    /// Amount due per payment period.
    pub premium: f64,
}

/// `[basic, standard, premium]` coverage amounts.
fn coverage_table(policy_type: PolicyType) -> [f64; 3] {
    match policy_type {
        PolicyType::Home => [100_000.0, 250_000.0, 500_000.0],
        PolicyType::Car => [30_000.0, 50_000.0, 100_000.0],
        PolicyType::Life => [100_000.0, 500_000.0, 1_000_000.0],
        PolicyType::Health => [50_000.0, 100_000.0, 250_000.0],
        PolicyType::Travel => [10_000.0, 25_000.0, 50_000.0],
        PolicyType::Business => [250_000.0, 500_000.0, 1_000_000.0],
    }
}

/// `[basic, standard, premium]` annual premiums.
fn annual_premium_table(policy_type: PolicyType) -> [f64; 3] {
    match policy_type {
        PolicyType::Home => [800.0, 1200.0, 2000.0],
        PolicyType::Car => [600.0, 800.0, 1500.0],
        PolicyType::Life => [200.0, 350.0, 800.0],
        PolicyType::Health => [300.0, 450.0, 900.0],
        PolicyType::Travel => [50.0, 90.0, 150.0],
        PolicyType::Business => [1500.0, 2500.0, 4000.0],
    }
}

fn column(level: CoverageLevel) -> usize {
    match level {
        CoverageLevel::Basic => 0,
        CoverageLevel::Standard => 1,
        CoverageLevel::Premium => 2,
    }
}

pub fn quote(policy_type: PolicyType, level: CoverageLevel, frequency: PaymentFrequency) -> Quote {
    let coverage = coverage_table(policy_type)[column(level)];
    let annual = annual_premium_table(policy_type)[column(level)];
    let premium = match frequency {
        PaymentFrequency::Monthly => (annual / 12.0).round(),
        PaymentFrequency::Annually => annual,
    };
    Quote { policy_type, level, frequency, coverage, premium }
}
