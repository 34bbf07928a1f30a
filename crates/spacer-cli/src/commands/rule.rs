//! Separation rule commands for CLI.

use clap::Subcommand;
use spacer_core::{Config, LexiconClassifier, Planner, RuleDraft, RuleIntentParser, RulePatch, TagSet};

#[derive(Subcommand)]
pub enum RuleAction {
    /// Create a separation rule between two tag groups
    Add {
        /// First tag group (comma-separated alternatives)
        #[arg(long)]
        tag1: String,
        /// Second tag group (comma-separated alternatives)
        #[arg(long)]
        tag2: String,
        /// Minimum required day gap
        #[arg(long)]
        min_days: u32,
    },
    /// List all rules
    List,
    /// Update a rule; existing events are never re-validated
    Update {
        /// Rule ID
        id: String,
        /// New first tag group
        #[arg(long)]
        tag1: Option<String>,
        /// New second tag group
        #[arg(long)]
        tag2: Option<String>,
        /// New minimum day gap
        #[arg(long)]
        min_days: Option<u32>,
    },
    /// Delete a rule
    Delete {
        /// Rule ID
        id: String,
    },
    /// Interpret natural-language rule text, e.g. "keep 2 days between running and swimming"
    Parse {
        /// Rule text
        text: String,
        /// Print the interpreted rule without saving it
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn run(action: RuleAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut planner = Planner::open()?;

    match action {
        RuleAction::Add {
            tag1,
            tag2,
            min_days,
        } => {
            let draft = RuleDraft {
                group1: TagSet::parse(&tag1),
                group2: TagSet::parse(&tag2),
                min_days,
            };
            let rule = planner.add_rule(draft)?;
            println!("Rule added: {}", rule.id);
            println!("{}", serde_json::to_string_pretty(&rule)?);
        }
        RuleAction::List => {
            let rules = planner.list_rules()?;
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
        RuleAction::Update {
            id,
            tag1,
            tag2,
            min_days,
        } => {
            let patch = RulePatch {
                group1: tag1.as_deref().map(TagSet::parse),
                group2: tag2.as_deref().map(TagSet::parse),
                min_days,
            };
            let rule = planner.update_rule(&id, &patch)?;
            println!("Rule updated:");
            println!("{}", serde_json::to_string_pretty(&rule)?);
        }
        RuleAction::Delete { id } => {
            planner.delete_rule(&id)?;
            println!("Rule deleted: {id}");
        }
        RuleAction::Parse { text, dry_run } => {
            let parser = RuleIntentParser::new(LexiconClassifier, config.default_min_days);
            let draft = parser.parse(&text)?;
            if dry_run {
                println!("{}", serde_json::to_string_pretty(&draft)?);
            } else {
                let rule = planner.add_rule(draft)?;
                println!("Rule added: {}", rule.id);
                println!("{}", serde_json::to_string_pretty(&rule)?);
            }
        }
    }
    Ok(())
}
