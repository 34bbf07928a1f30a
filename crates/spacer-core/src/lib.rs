//! # Spacer Core Library
//!
//! Core business logic for Spacer, a planner for tagged calendar events
//! with user-defined spacing constraints ("running and swimming must be at
//! least 2 days apart"). The CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Validator**: the pure decision function -- given a candidate event,
//!   all other events, and all separation rules, accept or reject with a
//!   structured violation
//! - **Planner**: the event-management layer that runs read-validate-write
//!   atomically on the SQLite store
//! - **Storage**: SQLite-based event/rule storage and TOML-based
//!   configuration
//! - **Intent**: keyword-level parsing of natural-language rule text into
//!   rule drafts, behind an injected classifier
//!
//! ## Key Components
//!
//! - [`validate`]: the constraint check itself
//! - [`Planner`]: transactional event and rule operations
//! - [`PlannerDb`]: event and rule persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod event;
pub mod intent;
pub mod planner;
pub mod rule;
pub mod storage;
pub mod tag;
pub mod validator;

pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use event::{Event, EventDraft, EventPatch};
pub use intent::{Classifier, IntentError, LexiconClassifier, RuleIntentParser, Sentiment};
pub use planner::Planner;
pub use rule::{RuleDraft, RulePatch, SeparationRule};
pub use storage::{Config, PlannerDb};
pub use tag::TagSet;
pub use validator::{day_gap, validate, Violation};
