use chrono::NaiveDate;
use models::{Claim, ClaimPatch, Policy, PolicyPatch};
use serde::{Deserialize, Serialize};

/// Locally known policies and claims.
///
/// Policies are unique by id: `add_policies` skips ids already present, so
/// re-adding never overwrites. Claims are appended unconditionally, duplicates
/// included. Both behaviours are kept as they are observed upstream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainCache {
    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub claims: Vec<Claim>,
}

impl DomainCache {
    /// Append policies whose id is not yet known, in first-seen order.
    /// Returns how many were appended.
    pub fn add_policies<I>(&mut self, incoming: I) -> usize
    where
        I: IntoIterator<Item = Policy>,
    {
        let before = self.policies.len();
        for policy in incoming {
            if !self.policies.iter().any(|p| p.id == policy.id) {
                self.policies.push(policy);
            }
        }
        self.policies.len() - before
    }

    /// Shallow-merge `patch` into the policy with `id`; false if absent.
    pub fn update_policy(&mut self, id: &str, patch: PolicyPatch) -> bool {
        match self.policies.iter_mut().find(|p| p.id == id) {
            Some(policy) => {
                patch.apply(policy);
                true
            }
            None => false,
        }
    }

    pub fn remove_policy(&mut self, id: &str) -> bool {
        let before = self.policies.len();
        self.policies.retain(|p| p.id != id);
        self.policies.len() != before
    }

    /// Append claims without any id check.
    pub fn add_claims<I>(&mut self, incoming: I) -> usize
    where
        I: IntoIterator<Item = Claim>,
    {
        let before = self.claims.len();
        self.claims.extend(incoming);
        self.claims.len() - before
    }

    /// Shallow-merge `patch` into every claim with `id`; false if none matched.
    pub fn update_claim(&mut self, id: &str, patch: ClaimPatch) -> bool {
        let mut matched = false;
        for claim in self.claims.iter_mut().filter(|c| c.id == id) {
            patch.clone().apply(claim);
            matched = true;
        }
        matched
    }

    /// Remove every claim with `id`; false if none matched.
    pub fn remove_claim(&mut self, id: &str) -> bool {
        let before = self.claims.len();
        self.claims.retain(|c| c.id != id);
        self.claims.len() != before
    }

    /// Reconcile server data: known ids take the server's record, unknown ids
    /// are appended. Returns `(appended, replaced)`.
    pub fn sync_policies(&mut self, fetched: Vec<Policy>) -> (usize, usize) {
        let mut replaced = 0;
        let mut fresh = Vec::new();
        for policy in fetched {
            match self.policies.iter_mut().find(|p| p.id == policy.id) {
                Some(existing) => {
                    *existing = policy;
                    replaced += 1;
                }
                None => fresh.push(policy),
            }
        }
        (self.add_policies(fresh), replaced)
    }

    /// Claim counterpart of [`DomainCache::sync_policies`]. Server records
    /// replace every cached duplicate of their id.
    pub fn sync_claims(&mut self, fetched: Vec<Claim>) -> (usize, usize) {
        let mut replaced = 0;
        let mut appended = 0;
        for claim in fetched {
            let mut hit = false;
            for existing in self.claims.iter_mut().filter(|c| c.id == claim.id) {
                *existing = claim.clone();
                hit = true;
            }
            if hit {
                replaced += 1;
            } else {
                self.claims.push(claim);
                appended += 1;
            }
        }
        (appended, replaced)
    }

    pub fn policy(&self, id: &str) -> Option<&Policy> {
        self.policies.iter().find(|p| p.id == id)
    }

    pub fn active_policies(&self) -> impl Iterator<Item = &Policy> {
        self.policies.iter().filter(|p| p.is_active())
    }

    pub fn pending_claims(&self) -> impl Iterator<Item = &Claim> {
        self.claims.iter().filter(|c| c.status.is_pending())
    }

    pub fn claims_for_policy<'a>(&'a self, policy_id: &'a str) -> impl Iterator<Item = &'a Claim> {
        self.claims.iter().filter(move |c| c.policy_id == policy_id)
    }

    /// Policies ending within `1..=window_days` days of `today`, soonest first.
    pub fn upcoming_renewals(&self, today: NaiveDate, window_days: i64) -> Vec<&Policy> {
        let mut due: Vec<&Policy> = self
            .policies
            .iter()
            .filter(|p| {
                let left = p.days_until_end(today);
                left > 0 && left <= window_days
            })
            .collect();
        due.sort_by_key(|p| p.end_date);
        due
    }

    pub fn total_active_coverage(&self) -> f64 {
        self.active_policies().map(|p| p.coverage_limit).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{day, sample_claim, sample_policy};
    use models::{ClaimStatus, PolicyStatus};

    #[test]
    fn add_policies_dedupes_in_first_seen_order() {
        let mut cache = DomainCache::default();
        let added = cache.add_policies(vec![
            sample_policy("a"),
            sample_policy("b"),
            sample_policy("a"),
            sample_policy("c"),
        ]);
        assert_eq!(added, 3);
        let ids: Vec<&str> = cache.policies.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn re_adding_policy_is_not_an_upsert() {
        let mut cache = DomainCache::default();
        cache.add_policies([sample_policy("a")]);

        let mut changed = sample_policy("a");
        changed.premium = 1.0;
        changed.status = PolicyStatus::Cancelled;
        assert_eq!(cache.add_policies([changed]), 0);

        let kept = cache.policy("a").unwrap();
        assert_eq!(kept.premium, sample_policy("a").premium);
        assert_eq!(kept.status, PolicyStatus::Active);
    }

    #[test]
    fn claims_keep_duplicate_ids() {
        let mut cache = DomainCache::default();
        cache.add_claims([sample_claim("c1", "a")]);
        cache.add_claims([sample_claim("c1", "a")]);
        assert_eq!(cache.claims.len(), 2);

        // update and remove hit every duplicate
        let patch = ClaimPatch { status: Some(ClaimStatus::Approved), ..ClaimPatch::default() };
        assert!(cache.update_claim("c1", patch));
        assert!(cache.claims.iter().all(|c| c.status == ClaimStatus::Approved));
        assert!(cache.remove_claim("c1"));
        assert!(cache.claims.is_empty());
    }

    #[test]
    fn update_and_remove_of_missing_id_are_noops() {
        let mut cache = DomainCache::default();
        cache.add_policies([sample_policy("a")]);
        let before = cache.clone();

        assert!(!cache.update_policy("zzz", PolicyPatch { premium: Some(5.0), ..PolicyPatch::default() }));
        assert!(!cache.remove_policy("zzz"));
        assert!(!cache.update_claim("zzz", ClaimPatch::default()));
        assert!(!cache.remove_claim("zzz"));
        assert_eq!(cache, before);
    }

    #[test]
    fn update_policy_merges_fields() {
        let mut cache = DomainCache::default();
        cache.add_policies([sample_policy("a")]);
        let patch = PolicyPatch { status: Some(PolicyStatus::Expired), ..PolicyPatch::default() };
        assert!(cache.update_policy("a", patch));
        let p = cache.policy("a").unwrap();
        assert_eq!(p.status, PolicyStatus::Expired);
        assert_eq!(p.coverage_limit, sample_policy("a").coverage_limit);
    }

    #[test]
    fn sync_replaces_known_and_appends_new() {
        let mut cache = DomainCache::default();
        cache.add_policies([sample_policy("a")]);
        cache.add_claims([sample_claim("c1", "a"), sample_claim("c1", "a")]);

        let mut server_a = sample_policy("a");
        server_a.status = PolicyStatus::Expired;
        assert_eq!(cache.sync_policies(vec![server_a, sample_policy("b")]), (1, 1));
        assert_eq!(cache.policy("a").unwrap().status, PolicyStatus::Expired);

        let mut server_c1 = sample_claim("c1", "a");
        server_c1.status = ClaimStatus::Rejected;
        assert_eq!(cache.sync_claims(vec![server_c1, sample_claim("c2", "b")]), (1, 1));
        assert_eq!(cache.claims.len(), 3);
        assert_eq!(cache.claims_for_policy("a").filter(|c| c.status == ClaimStatus::Rejected).count(), 2);
    }

    #[test]
    fn derived_views() {
        let today = day(2025, 6, 1);
        let mut cache = DomainCache::default();

        let mut soon = sample_policy("soon");
        soon.end_date = day(2025, 6, 20);
        let mut later = sample_policy("later");
        later.end_date = day(2025, 12, 1);
        let mut lapsed = sample_policy("lapsed");
        lapsed.status = PolicyStatus::Expired;
        lapsed.end_date = day(2025, 5, 1);
        let mut sooner = sample_policy("sooner");
        sooner.status = PolicyStatus::Pending;
        sooner.end_date = day(2025, 6, 5);
        cache.add_policies([soon, later, lapsed, sooner]);

        let mut decided = sample_claim("c2", "soon");
        decided.status = ClaimStatus::Closed;
        cache.add_claims([sample_claim("c1", "soon"), decided]);

        assert_eq!(cache.active_policies().count(), 2);
        assert_eq!(cache.pending_claims().count(), 1);
        let due: Vec<&str> = cache.upcoming_renewals(today, 30).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(due, ["sooner", "soon"]);
        assert_eq!(cache.total_active_coverage(), 2.0 * sample_policy("x").coverage_limit);
    }
}
