//! Wire and domain types shared by the insurance client crates.
//!
//! Every type here mirrors a JSON shape exchanged with the backend API or
//! persisted in local storage, so field names follow the backend's camelCase.

pub mod errors;
pub mod fields;
pub mod user;
pub mod product;
pub mod policy;
pub mod claim;

pub use claim::{Claim, ClaimPatch, ClaimStatus, CreateClaimRequest};
pub use policy::{CreatePolicyRequest, Policy, PolicyPatch, PolicyStatus, PolicyType};
pub use product::InsuranceProduct;
pub use user::{LoginData, LoginRequest, User, UserRole};
