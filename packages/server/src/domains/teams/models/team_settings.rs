use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::TeamId;

/// Quorum used when a team never configured `dispute_votes_required`.
pub const DEFAULT_VOTES_REQUIRED: i32 = 3;

/// How a team settles disputes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DisputeMode {
    /// Only an administrator decides.
    Admin,
    /// Reaching the vote quorum approves the dispute.
    Community,
}

impl DisputeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisputeMode::Admin => "admin",
            DisputeMode::Community => "community",
        }
    }
}

impl std::str::FromStr for DisputeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(DisputeMode::Admin),
            "community" => Ok(DisputeMode::Community),
            other => Err(format!("Invalid dispute mode: {}", other)),
        }
    }
}

impl TryFrom<String> for DisputeMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamSettings {
    pub team_id: TeamId,
    pub dispute_enabled: bool,
    #[sqlx(try_from = "String")]
    pub dispute_mode: DisputeMode,
    pub dispute_votes_required: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

/// Dispute settings with defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisputeConfig {
    pub enabled: bool,
    pub mode: DisputeMode,
    pub votes_required: i32,
}

impl Default for DisputeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: DisputeMode::Admin,
            votes_required: DEFAULT_VOTES_REQUIRED,
        }
    }
}

impl From<TeamSettings> for DisputeConfig {
    fn from(settings: TeamSettings) -> Self {
        Self {
            enabled: settings.dispute_enabled,
            mode: settings.dispute_mode,
            votes_required: settings
                .dispute_votes_required
                .unwrap_or(DEFAULT_VOTES_REQUIRED),
        }
    }
}

impl TeamSettings {
    pub async fn find_for_team<'e>(
        team_id: TeamId,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM team_settings WHERE team_id = $1")
            .bind(team_id)
            .fetch_optional(executor)
            .await
    }

    /// Current dispute settings for a team; teams without a settings row get
    /// [`DisputeConfig::default`].
    pub async fn dispute_config<'e>(
        team_id: TeamId,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<DisputeConfig> {
        Ok(Self::find_for_team(team_id, executor)
            .await?
            .map(DisputeConfig::from)
            .unwrap_or_default())
    }

    pub async fn upsert<'e>(
        team_id: TeamId,
        dispute_enabled: bool,
        dispute_mode: DisputeMode,
        dispute_votes_required: Option<i32>,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO team_settings (team_id, dispute_enabled, dispute_mode, dispute_votes_required)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (team_id) DO UPDATE
            SET dispute_enabled = EXCLUDED.dispute_enabled,
                dispute_mode = EXCLUDED.dispute_mode,
                dispute_votes_required = EXCLUDED.dispute_votes_required,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(team_id)
        .bind(dispute_enabled)
        .bind(dispute_mode.as_str())
        .bind(dispute_votes_required)
        .fetch_one(executor)
        .await
    }
}
