use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::{money, FineId, MemberId, TeamId};

/// A fine levied against a team member.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Fine {
    pub id: FineId,
    pub team_id: TeamId,
    pub offender_id: MemberId,
    pub issued_by_id: Option<MemberId>,
    #[serde(serialize_with = "money::as_f64")]
    pub amount: Decimal,
    pub reason: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a fine
#[derive(Debug, Clone)]
pub struct NewFine {
    pub team_id: TeamId,
    pub offender_id: MemberId,
    pub issued_by_id: Option<MemberId>,
    pub amount: Decimal,
    pub reason: String,
    pub metadata: serde_json::Value,
}

impl Fine {
    pub async fn create<'e>(input: NewFine, executor: impl PgExecutor<'e>) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO fines (id, team_id, offender_id, issued_by_id, amount, reason, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(FineId::new())
        .bind(input.team_id)
        .bind(input.offender_id)
        .bind(input.issued_by_id)
        .bind(input.amount)
        .bind(input.reason)
        .bind(input.metadata)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e>(
        id: FineId,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM fines WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Delete a fine. Returns `false` when no row matched.
    ///
    /// Disputes keep their `fine_id` after the fine is gone.
    pub async fn delete<'e>(id: FineId, executor: impl PgExecutor<'e>) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM fines WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
