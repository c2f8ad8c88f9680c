use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::{ActivityId, MemberId, TeamId};

/// Kinds of audit events written by the dispute workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    DisputeCreated,
    DisputeResolved,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::DisputeCreated => "dispute_created",
            ActivityKind::DisputeResolved => "dispute_resolved",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable audit entry. `user_id` is `None` for system actions such as
/// a dispute approved by community vote.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamActivity {
    pub id: ActivityId,
    pub team_id: TeamId,
    pub user_id: Option<MemberId>,
    pub kind: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl TeamActivity {
    pub async fn append<'e>(
        team_id: TeamId,
        user_id: Option<MemberId>,
        kind: ActivityKind,
        metadata: serde_json::Value,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO team_activities (id, team_id, user_id, kind, metadata)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(ActivityId::new())
        .bind(team_id)
        .bind(user_id)
        .bind(kind.as_str())
        .bind(metadata)
        .fetch_one(executor)
        .await
    }

    /// Entries of one kind for a team, oldest first.
    pub async fn list_for_team<'e>(
        team_id: TeamId,
        kind: ActivityKind,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM team_activities
            WHERE team_id = $1 AND kind = $2
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(team_id)
        .bind(kind.as_str())
        .fetch_all(executor)
        .await
    }
}
