//! Objective lifecycle.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Where an objective stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveStatus {
    Open,
    Achieved,
    Abandoned,
}

impl ObjectiveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Achieved => "achieved",
            Self::Abandoned => "abandoned",
        }
    }
}

impl FromStr for ObjectiveStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "achieved" => Ok(Self::Achieved),
            "abandoned" => Ok(Self::Abandoned),
            other => Err(CoreError::Validation(format!(
                "Unknown objective status '{other}' (expected open, achieved or abandoned)"
            ))),
        }
    }
}

/// Validate an objective title.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("title must not be empty".to_string()));
    }
    if title.chars().count() > 200 {
        return Err(CoreError::Validation(
            "title must be at most 200 characters".to_string(),
        ));
    }
    Ok(())
}
