use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::generation::template::ProposalRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProposalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_title: String,
    pub job_description: String,
    pub skills: String,
    pub experience: String,
    pub proposal: String,
    pub cover_letter: String,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
}

/// A proposal ready to be stored. Ids and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewProposal {
    pub user_id: Uuid,
    pub request: ProposalRequest,
    pub proposal: String,
    pub cover_letter: String,
    pub is_favorite: bool,
}

/// Partial edit. `None` leaves the field as is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProposalUpdate {
    #[serde(alias = "jobTitle")]
    pub job_title: Option<String>,
    #[serde(alias = "jobDescription")]
    pub job_description: Option<String>,
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub proposal: Option<String>,
    #[serde(alias = "coverLetter")]
    pub cover_letter: Option<String>,
}

impl ProposalUpdate {
    /// Applies every present field to `row`.
    pub fn apply(self, row: &mut ProposalRow) {
        if let Some(v) = self.job_title {
            row.job_title = v;
        }
        if let Some(v) = self.job_description {
            row.job_description = v;
        }
        if let Some(v) = self.skills {
            row.skills = v;
        }
        if let Some(v) = self.experience {
            row.experience = v;
        }
        if let Some(v) = self.proposal {
            row.proposal = v;
        }
        if let Some(v) = self.cover_letter {
            row.cover_letter = v;
        }
    }
}
