//! Proposal storage: capability trait with in-memory and Postgres backends.
//!
//! Every operation is scoped to an owner. A record owned by someone else is
//! indistinguishable from a missing one.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::proposal::{NewProposal, ProposalRow, ProposalUpdate};

/// Carried in `AppState` as `Arc<dyn ProposalStore>`.
#[async_trait]
pub trait ProposalStore: Send + Sync {
    /// Newest first.
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<ProposalRow>, AppError>;

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<ProposalRow>, AppError>;

    async fn insert(&self, proposal: NewProposal) -> Result<ProposalRow, AppError>;

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        update: ProposalUpdate,
    ) -> Result<Option<ProposalRow>, AppError>;

    async fn toggle_favorite(&self, id: Uuid, user_id: Uuid)
        -> Result<Option<ProposalRow>, AppError>;

    /// Returns `false` when nothing owned by `user_id` had this id.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// InMemoryProposalStore
// ────────────────────────────────────────────────────────────────────────────

/// Process-local store. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryProposalStore {
    rows: Arc<RwLock<Vec<ProposalRow>>>,
}

impl InMemoryProposalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProposalStore for InMemoryProposalStore {
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<ProposalRow>, AppError> {
        let mut owned: Vec<ProposalRow> = self
            .rows
            .read()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<ProposalRow>, AppError> {
        Ok(self
            .rows
            .read()
            .iter()
            .find(|p| p.id == id && p.user_id == user_id)
            .cloned())
    }

    async fn insert(&self, proposal: NewProposal) -> Result<ProposalRow, AppError> {
        let NewProposal {
            user_id,
            request,
            proposal,
            cover_letter,
            is_favorite,
        } = proposal;

        let row = ProposalRow {
            id: Uuid::new_v4(),
            user_id,
            job_title: request.job_title,
            job_description: request.job_description,
            skills: request.skills,
            experience: request.experience,
            proposal,
            cover_letter,
            is_favorite,
            created_at: Utc::now(),
        };
        self.rows.write().push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        update: ProposalUpdate,
    ) -> Result<Option<ProposalRow>, AppError> {
        let mut rows = self.rows.write();
        Ok(rows
            .iter_mut()
            .find(|p| p.id == id && p.user_id == user_id)
            .map(|row| {
                update.apply(row);
                row.clone()
            }))
    }

    async fn toggle_favorite(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ProposalRow>, AppError> {
        let mut rows = self.rows.write();
        Ok(rows
            .iter_mut()
            .find(|p| p.id == id && p.user_id == user_id)
            .map(|row| {
                row.is_favorite = !row.is_favorite;
                row.clone()
            }))
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.write();
        let before = rows.len();
        rows.retain(|p| !(p.id == id && p.user_id == user_id));
        Ok(rows.len() != before)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PgProposalStore
// ────────────────────────────────────────────────────────────────────────────

/// Postgres-backed store over the `proposals` table.
#[derive(Clone)]
pub struct PgProposalStore {
    pool: PgPool,
}

impl PgProposalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProposalStore for PgProposalStore {
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<ProposalRow>, AppError> {
        let rows = sqlx::query_as::<_, ProposalRow>(
            "SELECT * FROM proposals WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<ProposalRow>, AppError> {
        let row = sqlx::query_as::<_, ProposalRow>(
            "SELECT * FROM proposals WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, proposal: NewProposal) -> Result<ProposalRow, AppError> {
        let row = sqlx::query_as::<_, ProposalRow>(
            r#"
            INSERT INTO proposals
                (id, user_id, job_title, job_description, skills, experience,
                 proposal, cover_letter, is_favorite)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(proposal.user_id)
        .bind(&proposal.request.job_title)
        .bind(&proposal.request.job_description)
        .bind(&proposal.request.skills)
        .bind(&proposal.request.experience)
        .bind(&proposal.proposal)
        .bind(&proposal.cover_letter)
        .bind(proposal.is_favorite)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        update: ProposalUpdate,
    ) -> Result<Option<ProposalRow>, AppError> {
        let row = sqlx::query_as::<_, ProposalRow>(
            r#"
            UPDATE proposals SET
                job_title       = COALESCE($3, job_title),
                job_description = COALESCE($4, job_description),
                skills          = COALESCE($5, skills),
                experience      = COALESCE($6, experience),
                proposal        = COALESCE($7, proposal),
                cover_letter    = COALESCE($8, cover_letter)
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(update.job_title)
        .bind(update.job_description)
        .bind(update.skills)
        .bind(update.experience)
        .bind(update.proposal)
        .bind(update.cover_letter)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn toggle_favorite(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ProposalRow>, AppError> {
        let row = sqlx::query_as::<_, ProposalRow>(
            r#"
            UPDATE proposals SET is_favorite = NOT is_favorite
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM proposals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
