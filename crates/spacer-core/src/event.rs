//! Event model: drafts, stored events, and partial patches.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::tag::TagSet;

/// A stored event.
///
/// The id is opaque and stable once assigned. The title has no effect on
/// validation; the date is a plain calendar day with no time-of-day. The
/// tag set is non-empty for every event that made it past the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub tags: TagSet,
}

/// Draft for a new event, pending validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub date: NaiveDate,
    pub tags: TagSet,
}

impl EventDraft {
    /// Check the draft's own invariants before any rule is consulted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tags.is_empty() {
            return Err(ValidationError::EmptyTags);
        }
        Ok(())
    }

    pub(crate) fn into_event(self, id: String) -> Event {
        Event {
            id,
            title: self.title,
            date: self.date,
            tags: self.tags,
        }
    }
}

/// Partial update for an event, applied before re-validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub tags: Option<TagSet>,
}

impl EventPatch {
    /// Is this patch empty, meaning no fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.date.is_none() && self.tags.is_none()
    }

    /// Apply the patch to an event in place.
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(tags) = &self.tags {
            event.tags = tags.clone();
        }
    }
}
