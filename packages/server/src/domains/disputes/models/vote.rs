use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::{DisputeId, MemberId, VoteId};

/// Name of the unique constraint that allows one vote per member and dispute.
pub const VOTE_UNIQUE_CONSTRAINT: &str = "fine_dispute_votes_dispute_user_key";

/// A single, final vote. Rows are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DisputeVote {
    pub id: VoteId,
    pub dispute_id: DisputeId,
    pub user_id: MemberId,
    pub vote: bool,
    pub created_at: DateTime<Utc>,
}

impl DisputeVote {
    pub async fn insert<'e>(
        dispute_id: DisputeId,
        user_id: MemberId,
        vote: bool,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO fine_dispute_votes (id, dispute_id, user_id, vote)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(VoteId::new())
        .bind(dispute_id)
        .bind(user_id)
        .bind(vote)
        .fetch_one(executor)
        .await
    }

    pub async fn find_for_user<'e>(
        dispute_id: DisputeId,
        user_id: MemberId,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM fine_dispute_votes WHERE dispute_id = $1 AND user_id = $2",
        )
        .bind(dispute_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }

    /// All votes on a dispute, oldest first.
    pub async fn list_for_dispute<'e>(
        dispute_id: DisputeId,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM fine_dispute_votes
            WHERE dispute_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(dispute_id)
        .fetch_all(executor)
        .await
    }
}
