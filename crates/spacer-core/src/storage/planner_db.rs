//! SQLite-based storage for events and separation rules.
//!
//! Pure storage: no validation logic lives here. Tags and tag groups are
//! stored as JSON arrays of normalized strings, dates as ISO 8601 text.
//! The planner runs its read-validate-write sequence on an immediate
//! transaction obtained from [`PlannerDb::immediate_transaction`]; the
//! row-level helpers take a plain `&Connection` so they work both on the
//! bare connection and inside a transaction.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

use crate::error::{CoreError, DatabaseError};
use crate::event::Event;
use crate::rule::SeparationRule;
use crate::tag::TagSet;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(column: usize, raw: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

fn parse_tags(column: usize, raw: &str) -> Result<TagSet, rusqlite::Error> {
    serde_json::from_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

fn row_to_event(row: &rusqlite::Row) -> Result<Event, rusqlite::Error> {
    let date_str: String = row.get(2)?;
    let tags_str: String = row.get(3)?;
    Ok(Event {
        id: row.get(0)?,
        title: row.get(1)?,
        date: parse_date(2, &date_str)?,
        tags: parse_tags(3, &tags_str)?,
    })
}

fn row_to_rule(row: &rusqlite::Row) -> Result<SeparationRule, rusqlite::Error> {
    let group1_str: String = row.get(1)?;
    let group2_str: String = row.get(2)?;
    Ok(SeparationRule {
        id: row.get(0)?,
        group1: parse_tags(1, &group1_str)?,
        group2: parse_tags(2, &group2_str)?,
        min_days: row.get(3)?,
    })
}

// === Row-level helpers, usable inside a transaction ===

pub(crate) fn insert_event(conn: &Connection, event: &Event) -> Result<(), rusqlite::Error> {
    let tags_json = serde_json::to_string(&event.tags).unwrap();
    conn.execute(
        "INSERT INTO events (id, title, date, tags) VALUES (?1, ?2, ?3, ?4)",
        params![
            event.id,
            event.title,
            event.date.format(DATE_FORMAT).to_string(),
            tags_json,
        ],
    )?;
    Ok(())
}

pub(crate) fn update_event_row(conn: &Connection, event: &Event) -> Result<usize, rusqlite::Error> {
    let tags_json = serde_json::to_string(&event.tags).unwrap();
    conn.execute(
        "UPDATE events SET title = ?2, date = ?3, tags = ?4 WHERE id = ?1",
        params![
            event.id,
            event.title,
            event.date.format(DATE_FORMAT).to_string(),
            tags_json,
        ],
    )
}

pub(crate) fn delete_event_row(conn: &Connection, id: &str) -> Result<usize, rusqlite::Error> {
    conn.execute("DELETE FROM events WHERE id = ?1", params![id])
}

pub(crate) fn get_event_row(conn: &Connection, id: &str) -> Result<Option<Event>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, title, date, tags FROM events WHERE id = ?1",
        params![id],
        row_to_event,
    )
    .optional()
}

pub(crate) fn list_event_rows(conn: &Connection) -> Result<Vec<Event>, rusqlite::Error> {
    let mut stmt = conn.prepare("SELECT id, title, date, tags FROM events ORDER BY date ASC, id ASC")?;
    let rows = stmt.query_map([], row_to_event)?;
    rows.collect()
}

pub(crate) fn insert_rule(conn: &Connection, rule: &SeparationRule) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO rules (id, tag_group_1, tag_group_2, min_days) VALUES (?1, ?2, ?3, ?4)",
        params![
            rule.id,
            serde_json::to_string(&rule.group1).unwrap(),
            serde_json::to_string(&rule.group2).unwrap(),
            rule.min_days,
        ],
    )?;
    Ok(())
}

pub(crate) fn update_rule_row(
    conn: &Connection,
    rule: &SeparationRule,
) -> Result<usize, rusqlite::Error> {
    conn.execute(
        "UPDATE rules SET tag_group_1 = ?2, tag_group_2 = ?3, min_days = ?4 WHERE id = ?1",
        params![
            rule.id,
            serde_json::to_string(&rule.group1).unwrap(),
            serde_json::to_string(&rule.group2).unwrap(),
            rule.min_days,
        ],
    )
}

pub(crate) fn delete_rule_row(conn: &Connection, id: &str) -> Result<usize, rusqlite::Error> {
    conn.execute("DELETE FROM rules WHERE id = ?1", params![id])
}

pub(crate) fn get_rule_row(
    conn: &Connection,
    id: &str,
) -> Result<Option<SeparationRule>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, tag_group_1, tag_group_2, min_days FROM rules WHERE id = ?1",
        params![id],
        row_to_rule,
    )
    .optional()
}

pub(crate) fn list_rule_rows(conn: &Connection) -> Result<Vec<SeparationRule>, rusqlite::Error> {
    let mut stmt =
        conn.prepare("SELECT id, tag_group_1, tag_group_2, min_days FROM rules ORDER BY id ASC")?;
    let rows = stmt.query_map([], row_to_rule)?;
    rows.collect()
}

/// SQLite database for planner storage.
///
/// Stores events and separation rules.
pub struct PlannerDb {
    conn: Connection,
}

impl PlannerDb {
    /// Open the planner database at `~/.config/spacer/spacer.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = super::data_dir()?.join("spacer.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    /// Open an in-memory database. Used by tests and suitable for any
    /// caller that wants a throwaway store.
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS events (
                id    TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                date  TEXT NOT NULL,
                tags  TEXT NOT NULL DEFAULT '[]'
            );

            CREATE TABLE IF NOT EXISTS rules (
                id          TEXT PRIMARY KEY,
                tag_group_1 TEXT NOT NULL DEFAULT '[]',
                tag_group_2 TEXT NOT NULL DEFAULT '[]',
                min_days    INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_events_date ON events(date);",
        )?;
        Ok(())
    }

    /// Begin an immediate (write-locking) transaction. Writers are
    /// serialized from the first statement, which is what keeps the
    /// planner's read-validate-write sequence atomic against the current
    /// event set.
    pub(crate) fn immediate_transaction(&mut self) -> Result<Transaction<'_>, rusqlite::Error> {
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
    }

    // === Event storage ===

    pub fn get_event(&self, id: &str) -> Result<Option<Event>, rusqlite::Error> {
        get_event_row(&self.conn, id)
    }

    /// All events, earliest first.
    pub fn list_events(&self) -> Result<Vec<Event>, rusqlite::Error> {
        list_event_rows(&self.conn)
    }

    /// Delete an event row. Returns the number of rows removed.
    pub fn delete_event(&self, id: &str) -> Result<usize, rusqlite::Error> {
        delete_event_row(&self.conn, id)
    }

    // === Rule storage ===

    pub fn create_rule(&self, rule: &SeparationRule) -> Result<(), rusqlite::Error> {
        insert_rule(&self.conn, rule)
    }

    pub fn get_rule(&self, id: &str) -> Result<Option<SeparationRule>, rusqlite::Error> {
        get_rule_row(&self.conn, id)
    }

    pub fn list_rules(&self) -> Result<Vec<SeparationRule>, rusqlite::Error> {
        list_rule_rows(&self.conn)
    }

    pub fn update_rule(&self, rule: &SeparationRule) -> Result<usize, rusqlite::Error> {
        update_rule_row(&self.conn, rule)
    }

    /// Delete a rule row. Returns the number of rows removed.
    pub fn delete_rule(&self, id: &str) -> Result<usize, rusqlite::Error> {
        delete_rule_row(&self.conn, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(id: &str, date: &str, tags: &str) -> Event {
        Event {
            id: id.to_string(),
            title: format!("Event {id}"),
            date: NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
            tags: TagSet::parse(tags),
        }
    }

    #[test]
    fn event_roundtrip() {
        let db = PlannerDb::open_in_memory().unwrap();
        let event = sample_event("e1", "2023-06-01", "Running, swimming");
        insert_event(&db.conn, &event).unwrap();

        let loaded = db.get_event("e1").unwrap().unwrap();
        assert_eq!(loaded, event);
        assert!(loaded.tags.contains("running"));
        assert!(db.get_event("missing").unwrap().is_none());
    }

    #[test]
    fn events_list_earliest_first() {
        let db = PlannerDb::open_in_memory().unwrap();
        insert_event(&db.conn, &sample_event("late", "2023-06-09", "a")).unwrap();
        insert_event(&db.conn, &sample_event("early", "2023-06-01", "a")).unwrap();

        let ids: Vec<String> = db.list_events().unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn rule_roundtrip_and_delete() {
        let db = PlannerDb::open_in_memory().unwrap();
        let rule = SeparationRule {
            id: "r1".to_string(),
            group1: TagSet::parse("running"),
            group2: TagSet::parse("swimming"),
            min_days: 2,
        };
        db.create_rule(&rule).unwrap();
        assert_eq!(db.list_rules().unwrap(), vec![rule.clone()]);

        assert_eq!(db.delete_rule("r1").unwrap(), 1);
        assert_eq!(db.delete_rule("r1").unwrap(), 0);
        assert!(db.list_rules().unwrap().is_empty());
    }

    #[test]
    fn update_touches_only_the_target_row() {
        let db = PlannerDb::open_in_memory().unwrap();
        let mut event = sample_event("e1", "2023-06-01", "running");
        let other = sample_event("e2", "2023-06-05", "swimming");
        insert_event(&db.conn, &event).unwrap();
        insert_event(&db.conn, &other).unwrap();

        event.title = "Renamed".to_string();
        assert_eq!(update_event_row(&db.conn, &event).unwrap(), 1);
        assert_eq!(db.get_event("e1").unwrap().unwrap().title, "Renamed");
        assert_eq!(db.get_event("e2").unwrap().unwrap(), other);
    }

    #[test]
    fn tags_are_stored_as_json_text() {
        let db = PlannerDb::open_in_memory().unwrap();
        insert_event(&db.conn, &sample_event("e1", "2023-06-01", "b,a")).unwrap();
        let raw: String = db
            .conn
            .query_row("SELECT tags FROM events WHERE id = 'e1'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(raw, r#"["a","b"]"#);
    }

    #[test]
    fn open_at_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spacer.db");
        {
            let db = PlannerDb::open_at(&path).unwrap();
            insert_event(&db.conn, &sample_event("e1", "2023-06-01", "running")).unwrap();
        }
        let db = PlannerDb::open_at(&path).unwrap();
        assert_eq!(db.list_events().unwrap().len(), 1);
    }
}
