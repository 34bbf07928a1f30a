//! Planner: the event-management layer over the store and the validator.
//!
//! Every event insert or edit runs as one read-validate-write sequence on
//! an immediate SQLite transaction: fetch all rules and all other events,
//! run [`crate::validator::validate`] against that snapshot, then commit or
//! roll back. The immediate transaction serializes writers from its first
//! statement, so two concurrent candidates can never both validate against
//! a stale snapshot and jointly violate a rule. Partial application is
//! never observable: a rejected candidate leaves the store untouched.

use uuid::Uuid;

use crate::error::{CoreError, DatabaseError, Result};
use crate::event::{Event, EventDraft, EventPatch};
use crate::rule::{RuleDraft, RulePatch, SeparationRule};
use crate::storage::{planner_db, PlannerDb};
use crate::validator::validate;

/// Planner over a [`PlannerDb`].
pub struct Planner {
    db: PlannerDb,
}

impl Planner {
    /// Open the planner over the default on-disk database.
    pub fn open() -> Result<Self> {
        Ok(Self {
            db: PlannerDb::open()?,
        })
    }

    /// Wrap an already-opened database.
    pub fn new(db: PlannerDb) -> Self {
        Self { db }
    }

    // === Events ===

    /// Validate and commit a new event atomically.
    ///
    /// # Errors
    /// `InvalidInput` if the draft has no tags, `Rejected` with the
    /// violation detail if any separation rule blocks it.
    pub fn add_event(&mut self, draft: EventDraft) -> Result<Event> {
        draft.validate()?;

        let tx = self
            .db
            .immediate_transaction()
            .map_err(DatabaseError::from)?;
        let rules = planner_db::list_rule_rows(&tx).map_err(DatabaseError::from)?;
        let others = planner_db::list_event_rows(&tx).map_err(DatabaseError::from)?;

        let event = draft.into_event(Uuid::new_v4().to_string());
        validate(&event, &others, &rules)?;

        planner_db::insert_event(&tx, &event).map_err(DatabaseError::from)?;
        tx.commit().map_err(DatabaseError::from)?;

        log::info!("event {} added on {}", event.id, event.date);
        Ok(event)
    }

    /// Apply a partial edit, re-validating the post-edit state against
    /// every rule and every event except this one's prior identity.
    pub fn update_event(&mut self, id: &str, patch: &EventPatch) -> Result<Event> {
        let tx = self
            .db
            .immediate_transaction()
            .map_err(DatabaseError::from)?;

        let mut event = planner_db::get_event_row(&tx, id)
            .map_err(DatabaseError::from)?
            .ok_or_else(|| CoreError::NotFound {
                kind: "event",
                id: id.to_string(),
            })?;
        patch.apply_to(&mut event);
        if event.tags.is_empty() {
            return Err(crate::error::ValidationError::EmptyTags.into());
        }

        let rules = planner_db::list_rule_rows(&tx).map_err(DatabaseError::from)?;
        let others = planner_db::list_event_rows(&tx).map_err(DatabaseError::from)?;
        validate(&event, &others, &rules)?;

        planner_db::update_event_row(&tx, &event).map_err(DatabaseError::from)?;
        tx.commit().map_err(DatabaseError::from)?;

        log::info!("event {} updated", event.id);
        Ok(event)
    }

    /// Delete an event. Never needs validation: removal can only reduce
    /// future conflicts.
    pub fn delete_event(&mut self, id: &str) -> Result<()> {
        let removed = self.db.delete_event(id).map_err(DatabaseError::from)?;
        if removed == 0 {
            return Err(CoreError::NotFound {
                kind: "event",
                id: id.to_string(),
            });
        }
        log::info!("event {id} deleted");
        Ok(())
    }

    pub fn get_event(&self, id: &str) -> Result<Event> {
        self.db
            .get_event(id)
            .map_err(DatabaseError::from)?
            .ok_or_else(|| CoreError::NotFound {
                kind: "event",
                id: id.to_string(),
            })
    }

    /// All events, earliest first.
    pub fn list_events(&self) -> Result<Vec<Event>> {
        Ok(self.db.list_events().map_err(DatabaseError::from)?)
    }

    // === Rules ===
    //
    // Rule changes are single-statement writes and never re-validate
    // existing events: an event admitted under a previous rule set stays.

    pub fn add_rule(&mut self, draft: RuleDraft) -> Result<SeparationRule> {
        draft.validate()?;
        let rule = draft.into_rule(Uuid::new_v4().to_string());
        self.db.create_rule(&rule).map_err(DatabaseError::from)?;
        log::info!(
            "rule {} added: {} <-{}d-> {}",
            rule.id,
            rule.group1,
            rule.min_days,
            rule.group2
        );
        Ok(rule)
    }

    pub fn update_rule(&mut self, id: &str, patch: &RulePatch) -> Result<SeparationRule> {
        let mut rule = self
            .db
            .get_rule(id)
            .map_err(DatabaseError::from)?
            .ok_or_else(|| CoreError::NotFound {
                kind: "rule",
                id: id.to_string(),
            })?;
        patch.apply_to(&mut rule);

        let draft = RuleDraft {
            group1: rule.group1.clone(),
            group2: rule.group2.clone(),
            min_days: rule.min_days,
        };
        draft.validate()?;

        let changed = self.db.update_rule(&rule).map_err(DatabaseError::from)?;
        if changed == 0 {
            return Err(CoreError::NotFound {
                kind: "rule",
                id: id.to_string(),
            });
        }
        Ok(rule)
    }

    pub fn delete_rule(&mut self, id: &str) -> Result<()> {
        let removed = self.db.delete_rule(id).map_err(DatabaseError::from)?;
        if removed == 0 {
            return Err(CoreError::NotFound {
                kind: "rule",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn get_rule(&self, id: &str) -> Result<SeparationRule> {
        self.db
            .get_rule(id)
            .map_err(DatabaseError::from)?
            .ok_or_else(|| CoreError::NotFound {
                kind: "rule",
                id: id.to_string(),
            })
    }

    pub fn list_rules(&self) -> Result<Vec<SeparationRule>> {
        Ok(self.db.list_rules().map_err(DatabaseError::from)?)
    }
}
