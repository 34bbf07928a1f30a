mod config;
pub mod planner_db;

pub use config::Config;
pub use planner_db::PlannerDb;

use std::path::PathBuf;

/// Returns `~/.config/spacer[-dev]/` based on SPACER_ENV.
///
/// Set SPACER_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SPACER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("spacer-dev")
    } else {
        base_dir.join("spacer")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
