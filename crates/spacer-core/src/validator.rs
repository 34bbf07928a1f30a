//! The constraint validator.
//!
//! Given a candidate event, every other stored event, and every separation
//! rule, decide whether the candidate may be committed. All rules must pass
//! against all other events (conjunction); on failure the first violation
//! found is reported with enough detail for a precise rejection message.
//!
//! This is a pure function of its three inputs: no store access, no
//! internal state, safe to call from any number of threads. Serializing
//! the surrounding read-validate-write sequence is the planner's job.
//!
//! Fixed edge-case policies:
//! - a gap exactly equal to `min_days` is allowed; only `gap < min_days`
//!   violates,
//! - the candidate is only compared against *other* events, so a rule whose
//!   two groups both match the candidate's own tags is not a violation by
//!   itself,
//! - rules are undirected ([`SeparationRule::links`]) and order-independent,
//! - tag matching is exact string equality over normalized tags.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::event::Event;
use crate::rule::SeparationRule;

/// A specific (rule, other event) pair whose day gap is below the rule's
/// minimum.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error(
    "separation rule {rule_id} requires {required_gap_days} day(s) from event \
     {conflicting_event_id}, but the gap is {actual_gap_days} day(s)"
)]
pub struct Violation {
    pub rule_id: String,
    pub conflicting_event_id: String,
    pub actual_gap_days: i64,
    pub required_gap_days: u32,
}

/// Absolute distance between two calendar days, in whole days.
pub fn day_gap(a: NaiveDate, b: NaiveDate) -> i64 {
    (a - b).num_days().abs()
}

/// Decide whether `candidate` may be committed alongside `others`.
///
/// `others` is the full event set minus the candidate's own prior identity
/// when updating; an entry sharing the candidate's id is skipped so a stale
/// copy of the event never conflicts with its own edit.
pub fn validate(
    candidate: &Event,
    others: &[Event],
    rules: &[SeparationRule],
) -> Result<(), Violation> {
    for rule in rules {
        for other in others {
            if other.id == candidate.id {
                continue;
            }
            if !rule.links(&candidate.tags, &other.tags) {
                continue;
            }
            let gap = day_gap(candidate.date, other.date);
            if gap < i64::from(rule.min_days) {
                log::debug!(
                    "rule {} blocks event '{}': {} day(s) from event {}, need {}",
                    rule.id,
                    candidate.title,
                    gap,
                    other.id,
                    rule.min_days
                );
                return Err(Violation {
                    rule_id: rule.id.clone(),
                    conflicting_event_id: other.id.clone(),
                    actual_gap_days: gap,
                    required_gap_days: rule.min_days,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::TagSet;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(id: &str, d: NaiveDate, tags: &str) -> Event {
        Event {
            id: id.to_string(),
            title: format!("Event {id}"),
            date: d,
            tags: TagSet::parse(tags),
        }
    }

    fn rule(id: &str, group1: &str, group2: &str, min_days: u32) -> SeparationRule {
        SeparationRule {
            id: id.to_string(),
            group1: TagSet::parse(group1),
            group2: TagSet::parse(group2),
            min_days,
        }
    }

    #[test]
    fn accepts_with_no_rules() {
        let a = event("a", date(2023, 6, 1), "running");
        let b = event("b", date(2023, 6, 1), "running");
        assert!(validate(&a, &[b], &[]).is_ok());
    }

    #[test]
    fn rejects_gap_below_minimum_with_detail() {
        let r = rule("r1", "running", "swimming", 2);
        let existing = event("a", date(2023, 6, 1), "running");
        let candidate = event("b", date(2023, 6, 2), "swimming");

        let violation = validate(&candidate, &[existing], &[r]).unwrap_err();
        assert_eq!(violation.rule_id, "r1");
        assert_eq!(violation.conflicting_event_id, "a");
        assert_eq!(violation.actual_gap_days, 1);
        assert_eq!(violation.required_gap_days, 2);
    }

    #[test]
    fn gap_equal_to_minimum_is_allowed() {
        let r = rule("r1", "running", "swimming", 2);
        let existing = event("a", date(2023, 6, 1), "running");
        let candidate = event("b", date(2023, 6, 3), "swimming");
        assert!(validate(&candidate, &[existing], &[r]).is_ok());
    }

    #[test]
    fn symmetric_regardless_of_which_event_carries_which_group() {
        let r = rule("r1", "running", "swimming", 2);
        let runner = event("a", date(2023, 6, 1), "running");
        let swimmer = event("b", date(2023, 6, 2), "swimming");

        // swimmer added second
        assert!(validate(&swimmer, std::slice::from_ref(&runner), std::slice::from_ref(&r)).is_err());
        // runner added second
        assert!(validate(&runner, std::slice::from_ref(&swimmer), std::slice::from_ref(&r)).is_err());
    }

    #[test]
    fn unrelated_tags_never_block() {
        let r = rule("r1", "running", "swimming", 30);
        let existing = event("a", date(2023, 6, 1), "rowing");
        let candidate = event("b", date(2023, 6, 1), "climbing");
        assert!(validate(&candidate, &[existing], &[r]).is_ok());
    }

    #[test]
    fn candidate_matching_both_groups_alone_is_not_a_violation() {
        let r = rule("r1", "running", "swimming", 7);
        let candidate = event("a", date(2023, 6, 1), "running,swimming");
        assert!(validate(&candidate, &[], &[r]).is_ok());
    }

    #[test]
    fn stale_copy_of_the_candidate_is_skipped() {
        let r = rule("r1", "yoga", "yoga", 3);
        let stale = event("a", date(2023, 6, 1), "yoga");
        let edited = event("a", date(2023, 6, 2), "yoga");
        assert!(validate(&edited, &[stale], &[r]).is_ok());
    }

    #[test]
    fn self_referential_rule_blocks_two_events_sharing_the_tag() {
        let r = rule("r1", "yoga", "yoga", 3);
        let existing = event("a", date(2023, 6, 1), "yoga");
        let candidate = event("b", date(2023, 6, 2), "yoga");
        let violation = validate(&candidate, &[existing], &[r]).unwrap_err();
        assert_eq!(violation.actual_gap_days, 1);
    }

    #[test]
    fn zero_minimum_never_blocks() {
        let r = rule("r1", "running", "swimming", 0);
        let existing = event("a", date(2023, 6, 1), "running");
        let candidate = event("b", date(2023, 6, 1), "swimming");
        assert!(validate(&candidate, &[existing], &[r]).is_ok());
    }

    #[test]
    fn all_rules_must_pass() {
        let passing = rule("r1", "running", "cycling", 1);
        let failing = rule("r2", "running", "swimming", 5);
        let existing = event("a", date(2023, 6, 1), "swimming");
        let candidate = event("b", date(2023, 6, 3), "running,cycling");

        let violation = validate(&candidate, &[existing], &[passing, failing]).unwrap_err();
        assert_eq!(violation.rule_id, "r2");
    }

    #[test]
    fn tag_matching_is_exact_after_normalization() {
        let r = rule("r1", "Running", "swimming", 5);
        let existing = event("a", date(2023, 6, 1), "RUNNING ");
        let near_miss = event("b", date(2023, 6, 2), "run");
        let hit = event("c", date(2023, 6, 2), "swimming");
        assert!(validate(&near_miss, std::slice::from_ref(&existing), std::slice::from_ref(&r)).is_ok());
        assert!(validate(&hit, &[existing], &[r]).is_err());
    }

    prop_compose! {
        fn arb_date()(offset in 0i64..3650) -> NaiveDate {
            date(2020, 1, 1) + chrono::Duration::days(offset)
        }
    }

    proptest! {
        // Swapping which event carries group1 vs group2 yields the same
        // accept/reject outcome.
        #[test]
        fn prop_outcome_is_symmetric(d1 in arb_date(), d2 in arb_date(), min_days in 0u32..60) {
            let r = rule("r", "running", "swimming", min_days);
            let runner = event("a", d1, "running");
            let swimmer = event("b", d2, "swimming");

            let swimmer_second = validate(&swimmer, std::slice::from_ref(&runner), std::slice::from_ref(&r));
            let runner_second = validate(&runner, std::slice::from_ref(&swimmer), std::slice::from_ref(&r));
            prop_assert_eq!(swimmer_second.is_ok(), runner_second.is_ok());
        }

        // The accept/reject decision is exactly the strict day-gap
        // comparison, in either insertion order.
        #[test]
        fn prop_decision_matches_day_gap(d1 in arb_date(), d2 in arb_date(), min_days in 0u32..60) {
            let r = rule("r", "running", "swimming", min_days);
            let first = event("a", d1, "running");
            let second = event("b", d2, "swimming");

            let accepted = validate(&second, std::slice::from_ref(&first), std::slice::from_ref(&r)).is_ok();
            prop_assert_eq!(accepted, day_gap(d1, d2) >= i64::from(min_days));
        }

        // Events sharing no rule-referenced tag never block each other,
        // however close the dates.
        #[test]
        fn prop_no_interaction_without_shared_tags(d1 in arb_date(), d2 in arb_date(), min_days in 0u32..60) {
            let r = rule("r", "running", "swimming", min_days);
            let first = event("a", d1, "rowing");
            let second = event("b", d2, "climbing");
            prop_assert!(validate(&second, &[first], &[r]).is_ok());
        }
    }
}
