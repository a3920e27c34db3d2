#![cfg(test)]
use chrono::NaiveDate;
use models::{Claim, ClaimStatus, InsuranceProduct, Policy, PolicyStatus, PolicyType, User, UserRole};

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn sample_user(id: &str) -> User {
    User {
        id: id.to_string(),
        first_name: "John".into(),
        last_name: "Tan".into(),
        email: "john@x.com".into(),
        google_id: None,
        created_at: None,
        updated_at: None,
        last_login: None,
        role: UserRole::User,
        avatar: None,
    }
}

pub fn admin_user(id: &str) -> User {
    User { first_name: "Aida".into(), email: "aida@x.com".into(), role: UserRole::Admin, ..sample_user(id) }
}

pub fn sample_product(id: &str, product_type: PolicyType) -> InsuranceProduct {
    InsuranceProduct {
        id: id.to_string(),
        name: format!("{} Shield", product_type.label()),
        product_type,
        description: "Standard cover".into(),
        base_price: 800.0,
        coverage_details: "Fire, theft".into(),
        is_active: Some(true),
    }
}

pub fn sample_policy(id: &str) -> Policy {
    Policy {
        id: id.to_string(),
        policy_type: PolicyType::Home,
        premium: 1200.0,
        coverage_limit: 250_000.0,
        start_date: day(2025, 1, 1),
        end_date: day(2026, 1, 1),
        status: PolicyStatus::Active,
        insurance_product: sample_product("prod-home", PolicyType::Home),
    }
}

pub fn sample_claim(id: &str, policy_id: &str) -> Claim {
    Claim {
        id: id.to_string(),
        policy_id: policy_id.to_string(),
        user_id: Some("1".into()),
        date: day(2025, 3, 10),
        description: "Burst pipe in kitchen".into(),
        amount: 1500.0,
        status: ClaimStatus::Submitted,
        documents: None,
        created_at: None,
        updated_at: None,
    }
}
