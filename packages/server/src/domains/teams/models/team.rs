use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::TeamId;

/// A team sharing one fines pool.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub async fn create<'e>(name: &str, executor: impl PgExecutor<'e>) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>("INSERT INTO teams (id, name) VALUES ($1, $2) RETURNING *")
            .bind(TeamId::new())
            .bind(name)
            .fetch_one(executor)
            .await
    }
}
