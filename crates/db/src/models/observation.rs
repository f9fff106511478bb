//! Questionnaire response model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use squadline_core::error::CoreError;
use squadline_core::observation::{Observation, QuestionnaireKind};
use squadline_core::types::{DbId, Timestamp};

/// A row from the `observations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ObservationRow {
    pub id: DbId,
    pub player_id: DbId,
    pub kind: String,
    pub data: serde_json::Value,
    pub created_at: Timestamp,
}

impl ObservationRow {
    /// Convert to the domain type used by aggregation and alerting.
    ///
    /// A stored kind that no longer parses is a corrupt row, not bad input,
    /// so it surfaces as [`CoreError::Internal`].
    pub fn into_domain(self) -> Result<Observation, CoreError> {
        let kind = self.kind.parse::<QuestionnaireKind>().map_err(|_| {
            CoreError::Internal(format!(
                "observation {} has unknown kind '{}'",
                self.id, self.kind
            ))
        })?;
        Ok(Observation {
            id: self.id,
            subject_id: self.player_id,
            kind,
            data: self.data,
            created_at: self.created_at,
        })
    }
}

/// Convert a batch of rows, failing on the first unknown kind.
pub fn into_domain_all(rows: Vec<ObservationRow>) -> Result<Vec<Observation>, CoreError> {
    rows.into_iter().map(ObservationRow::into_domain).collect()
}

/// DTO for submitting a questionnaire response.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateObservation {
    pub kind: QuestionnaireKind,
    pub data: serde_json::Value,
}
