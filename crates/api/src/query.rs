//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use serde::Deserialize;
use squadline_core::error::CoreError;
use squadline_core::types::DbId;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for list endpoints that support an `include_inactive` flag.
#[derive(Debug, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Inclusive local date range (`?from=2024-09-01&to=2024-09-30`).
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRangeParams {
    /// Reject ranges that end before they start.
    pub fn validate(&self) -> Result<(), CoreError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(CoreError::Validation(format!(
                "from ({from}) must not be after to ({to})"
            ))),
            _ => Ok(()),
        }
    }
}

/// Split a comma-separated list, dropping blanks (`"fatigue, rpe,"`).
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a comma-separated list of ids (`"3,7,12"`).
pub fn parse_id_list(raw: &str) -> Result<Vec<DbId>, CoreError> {
    split_csv(raw)
        .into_iter()
        .map(|s| {
            s.parse::<DbId>()
                .map_err(|_| CoreError::Validation(format!("'{s}' is not a valid id")))
        })
        .collect()
}
