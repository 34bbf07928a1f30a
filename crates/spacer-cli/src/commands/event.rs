//! Event management commands for CLI.

use clap::Subcommand;
use spacer_core::{CoreError, EventDraft, EventPatch, Planner, TagSet};

use super::parse_date;

#[derive(Subcommand)]
pub enum EventAction {
    /// Schedule a new event; rejected if any separation rule would be violated
    Add {
        /// Event title
        title: String,
        /// Calendar date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Comma-separated tags
        #[arg(long)]
        tags: String,
    },
    /// List all events, earliest first
    List,
    /// Get event details
    Get {
        /// Event ID
        id: String,
    },
    /// Update an event; the edited state is re-checked against every rule
    Update {
        /// Event ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New calendar date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Delete an event; deletion never needs validation
    Delete {
        /// Event ID
        id: String,
    },
}

pub fn run(action: EventAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut planner = Planner::open()?;

    match action {
        EventAction::Add { title, date, tags } => {
            let draft = EventDraft {
                title,
                date: parse_date(&date)?,
                tags: TagSet::parse(&tags),
            };
            match planner.add_event(draft) {
                Ok(event) => {
                    println!("Event added: {}", event.id);
                    println!("{}", serde_json::to_string_pretty(&event)?);
                }
                Err(CoreError::Rejected(violation)) => {
                    eprintln!("rejected: {violation}");
                    std::process::exit(2);
                }
                Err(e) => return Err(e.into()),
            }
        }
        EventAction::List => {
            let events = planner.list_events()?;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        EventAction::Get { id } => {
            let event = planner.get_event(&id)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        EventAction::Update {
            id,
            title,
            date,
            tags,
        } => {
            let patch = EventPatch {
                title,
                date: date.as_deref().map(parse_date).transpose()?,
                tags: tags.as_deref().map(TagSet::parse),
            };
            match planner.update_event(&id, &patch) {
                Ok(event) => {
                    println!("Event updated:");
                    println!("{}", serde_json::to_string_pretty(&event)?);
                }
                Err(CoreError::Rejected(violation)) => {
                    eprintln!("rejected: {violation}");
                    std::process::exit(2);
                }
                Err(e) => return Err(e.into()),
            }
        }
        EventAction::Delete { id } => {
            planner.delete_event(&id)?;
            println!("Event deleted: {id}");
        }
    }
    Ok(())
}
