use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor};

use crate::common::{DisputeId, FineId, MemberId, TeamId};

/// Name of the unique constraint that allows one dispute per fine.
pub const FINE_UNIQUE_CONSTRAINT: &str = "fine_disputes_fine_id_key";

/// Dispute status. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    Pending,
    Approved,
    Rejected,
}

impl DisputeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisputeStatus::Pending => "pending",
            DisputeStatus::Approved => "approved",
            DisputeStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, DisputeStatus::Pending)
    }

    /// Terminal state reached by a resolution.
    pub fn resolved(approved: bool) -> Self {
        if approved {
            DisputeStatus::Approved
        } else {
            DisputeStatus::Rejected
        }
    }
}

impl std::fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DisputeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DisputeStatus::Pending),
            "approved" => Ok(DisputeStatus::Approved),
            "rejected" => Ok(DisputeStatus::Rejected),
            other => Err(format!("Invalid dispute status: {}", other)),
        }
    }
}

impl TryFrom<String> for DisputeStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A contest of a single fine.
///
/// `votes_required` is copied from the team settings when the dispute is
/// opened and never changes afterwards. `votes_count` counts positive votes only.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FineDispute {
    pub id: DisputeId,
    pub fine_id: FineId,
    pub team_id: TeamId,
    pub disputed_by_id: MemberId,
    pub reason: String,
    #[sqlx(try_from = "String")]
    pub status: DisputeStatus,
    pub votes_count: i32,
    pub votes_required: i32,
    pub resolved_by_id: Option<MemberId>,
    pub resolution_note: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for opening a dispute
#[derive(Debug, Clone)]
pub struct NewDispute {
    pub fine_id: FineId,
    pub team_id: TeamId,
    pub disputed_by_id: MemberId,
    pub reason: String,
    pub votes_required: i32,
}

/// Dispute row joined with what is left of its fine, for team listings.
///
/// The fine columns are `None` once an approved dispute has deleted the fine.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DisputeSummary {
    #[sqlx(flatten)]
    pub dispute: FineDispute,
    pub disputed_by_name: String,
    pub fine_amount: Option<Decimal>,
    pub fine_reason: Option<String>,
}

impl FineDispute {
    pub fn is_pending(&self) -> bool {
        self.status == DisputeStatus::Pending
    }

    pub async fn insert<'e>(input: NewDispute, executor: impl PgExecutor<'e>) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO fine_disputes (id, fine_id, team_id, disputed_by_id, reason, votes_required)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(DisputeId::new())
        .bind(input.fine_id)
        .bind(input.team_id)
        .bind(input.disputed_by_id)
        .bind(input.reason)
        .bind(input.votes_required)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e>(
        id: DisputeId,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM fine_disputes WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Load and row-lock a dispute for the rest of the transaction.
    ///
    /// Concurrent votes and resolutions on the same dispute queue behind this
    /// lock, so each one sees the status and count left by the previous commit.
    pub async fn find_by_id_for_update(
        id: DisputeId,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM fine_disputes WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn find_by_fine<'e>(
        fine_id: FineId,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM fine_disputes WHERE fine_id = $1")
            .bind(fine_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn exists_for_fine<'e>(
        fine_id: FineId,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM fine_disputes WHERE fine_id = $1)",
        )
        .bind(fine_id)
        .fetch_one(executor)
        .await
    }

    /// Add one positive vote and return the updated row.
    pub async fn increment_votes(id: DisputeId, conn: &mut PgConnection) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE fine_disputes
            SET votes_count = votes_count + 1
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(conn)
        .await
    }

    /// Move a pending dispute to its terminal state.
    ///
    /// Compare-and-set on `status = 'pending'`: returns `None` when the dispute
    /// was already resolved, so a resolution can only ever be applied once.
    pub async fn mark_resolved(
        id: DisputeId,
        status: DisputeStatus,
        resolved_by_id: Option<MemberId>,
        resolution_note: Option<&str>,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE fine_disputes
            SET status = $2, resolved_by_id = $3, resolution_note = $4, resolved_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(resolved_by_id)
        .bind(resolution_note)
        .fetch_optional(conn)
        .await
    }

    /// Disputes of a team, newest first, optionally filtered by status.
    pub async fn list_for_team<'e>(
        team_id: TeamId,
        status: Option<DisputeStatus>,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<Vec<DisputeSummary>> {
        sqlx::query_as::<_, DisputeSummary>(
            r#"
            SELECT d.*,
                   m.display_name AS disputed_by_name,
                   f.amount AS fine_amount,
                   f.reason AS fine_reason
            FROM fine_disputes d
            JOIN members m ON m.id = d.disputed_by_id
            LEFT JOIN fines f ON f.id = d.fine_id
            WHERE d.team_id = $1
              AND ($2::text IS NULL OR d.status = $2)
            ORDER BY d.created_at DESC, d.id DESC
            "#,
        )
        .bind(team_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(executor)
        .await
    }
}
