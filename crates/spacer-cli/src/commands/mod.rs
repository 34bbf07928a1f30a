pub mod event;
pub mod rule;

use chrono::NaiveDate;
use spacer_core::ValidationError;

/// Parse a YYYY-MM-DD argument.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        value: value.to_string(),
    })
}
