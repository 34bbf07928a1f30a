//! Separation rules: minimum day gaps between tag groups.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::tag::TagSet;

/// A stored separation rule.
///
/// Requires at least `min_days` whole days between any event matching
/// `group1` and any event matching `group2`. Each group is a set of
/// alternative tags; one shared tag on each side is enough to link two
/// events. Rules are undirected: which event carries which group does not
/// matter. The groups need not be disjoint, and `group1 == group2` reads
/// as "no two events sharing this tag within N days".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparationRule {
    pub id: String,
    pub group1: TagSet,
    pub group2: TagSet,
    pub min_days: u32,
}

impl SeparationRule {
    /// Whether this rule links two tag sets, checked in both directions.
    pub fn links(&self, a: &TagSet, b: &TagSet) -> bool {
        (self.group1.intersects(a) && self.group2.intersects(b))
            || (self.group2.intersects(a) && self.group1.intersects(b))
    }
}

/// Draft for a new rule, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDraft {
    pub group1: TagSet,
    pub group2: TagSet,
    pub min_days: u32,
}

impl RuleDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.group1.is_empty() {
            return Err(ValidationError::EmptyTagGroup { side: "group1" });
        }
        if self.group2.is_empty() {
            return Err(ValidationError::EmptyTagGroup { side: "group2" });
        }
        Ok(())
    }

    pub(crate) fn into_rule(self, id: String) -> SeparationRule {
        SeparationRule {
            id,
            group1: self.group1,
            group2: self.group2,
            min_days: self.min_days,
        }
    }
}

/// Partial update for a rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulePatch {
    pub group1: Option<TagSet>,
    pub group2: Option<TagSet>,
    pub min_days: Option<u32>,
}

impl RulePatch {
    pub fn is_empty(&self) -> bool {
        self.group1.is_none() && self.group2.is_none() && self.min_days.is_none()
    }

    pub fn apply_to(&self, rule: &mut SeparationRule) {
        if let Some(group1) = &self.group1 {
            rule.group1 = group1.clone();
        }
        if let Some(group2) = &self.group2 {
            rule.group2 = group2.clone();
        }
        if let Some(min_days) = self.min_days {
            rule.min_days = min_days;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(group1: &str, group2: &str) -> SeparationRule {
        SeparationRule {
            id: "r1".to_string(),
            group1: TagSet::parse(group1),
            group2: TagSet::parse(group2),
            min_days: 2,
        }
    }

    #[test]
    fn links_in_both_directions() {
        let rule = rule("running", "swimming");
        let running = TagSet::parse("running");
        let swimming = TagSet::parse("swimming");
        assert!(rule.links(&running, &swimming));
        assert!(rule.links(&swimming, &running));
    }

    #[test]
    fn no_link_without_both_sides() {
        let rule = rule("running", "swimming");
        let running = TagSet::parse("running");
        let rowing = TagSet::parse("rowing");
        assert!(!rule.links(&running, &rowing));
        assert!(!rule.links(&running, &running));
    }

    #[test]
    fn self_referential_rule_links_events_sharing_the_tag() {
        let rule = rule("yoga", "yoga");
        let yoga = TagSet::parse("yoga");
        let other = TagSet::parse("cycling");
        assert!(rule.links(&yoga, &yoga));
        assert!(!rule.links(&yoga, &other));
    }

    #[test]
    fn either_group_alternative_is_enough() {
        let rule = rule("running,cycling", "swimming");
        let cycling = TagSet::parse("cycling");
        let swimming = TagSet::parse("swimming");
        assert!(rule.links(&cycling, &swimming));
    }

    #[test]
    fn draft_requires_both_groups() {
        let draft = RuleDraft {
            group1: TagSet::parse("running"),
            group2: TagSet::new(),
            min_days: 2,
        };
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::EmptyTagGroup { side: "group2" })
        ));
    }
}
