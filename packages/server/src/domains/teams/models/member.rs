use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::MemberId;

/// An app user. Team-scoped roles live on [`super::TeamMembership`].
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Member {
    pub id: MemberId,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub async fn create<'e>(
        display_name: &str,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO members (id, display_name) VALUES ($1, $2) RETURNING *",
        )
        .bind(MemberId::new())
        .bind(display_name)
        .fetch_one(executor)
        .await
    }
}
