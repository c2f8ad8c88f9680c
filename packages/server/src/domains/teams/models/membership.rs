use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::{MemberId, TeamId};

/// Role of a member inside one team
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Admin,
    Member,
}

impl TeamRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Admin => "admin",
            TeamRole::Member => "member",
        }
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TeamRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(TeamRole::Admin),
            "member" => Ok(TeamRole::Member),
            other => Err(format!("Invalid team role: {}", other)),
        }
    }
}

impl TryFrom<String> for TeamRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A member's seat in a team. Removed members keep their row with
/// `is_deleted = true` and lose every dispute right.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMembership {
    pub team_id: TeamId,
    pub user_id: MemberId,
    #[sqlx(try_from = "String")]
    pub role: TeamRole,
    pub is_deleted: bool,
    pub joined_at: DateTime<Utc>,
}

impl TeamMembership {
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    pub fn is_admin(&self) -> bool {
        self.is_active() && self.role == TeamRole::Admin
    }

    pub async fn find<'e>(
        team_id: TeamId,
        user_id: MemberId,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM team_members WHERE team_id = $1 AND user_id = $2",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }

    /// Active membership or `None`, for callers that only care about access.
    pub async fn find_active<'e>(
        team_id: TeamId,
        user_id: MemberId,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<Option<Self>> {
        Ok(Self::find(team_id, user_id, executor)
            .await?
            .filter(TeamMembership::is_active))
    }

    pub async fn add<'e>(
        team_id: TeamId,
        user_id: MemberId,
        role: TeamRole,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO team_members (team_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (team_id, user_id)
            DO UPDATE SET role = EXCLUDED.role, is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .bind(role.as_str())
        .fetch_one(executor)
        .await
    }

    /// Soft-remove a member from the team.
    pub async fn remove<'e>(
        team_id: TeamId,
        user_id: MemberId,
        executor: impl PgExecutor<'e>,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            "UPDATE team_members SET is_deleted = TRUE WHERE team_id = $1 AND user_id = $2",
        )
        .bind(team_id)
        .bind(user_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn membership(role: TeamRole, is_deleted: bool) -> TeamMembership {
        TeamMembership {
            team_id: TeamId::new(),
            user_id: MemberId::new(),
            role,
            is_deleted,
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn test_removed_admin_is_not_admin() {
        assert!(membership(TeamRole::Admin, false).is_admin());
        assert!(!membership(TeamRole::Admin, true).is_admin());
        assert!(!membership(TeamRole::Member, false).is_admin());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<TeamRole>(), Ok(TeamRole::Admin));
        assert!("owner".parse::<TeamRole>().is_err());
    }
}
