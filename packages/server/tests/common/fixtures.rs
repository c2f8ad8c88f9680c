//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use fines_core::common::{FineId, MemberId, TeamId};
use fines_core::domains::fines::{Fine, NewFine};
use fines_core::domains::teams::{DisputeMode, Member, Team, TeamMembership, TeamRole, TeamSettings};
use rust_decimal::Decimal;
use sqlx::PgPool;

pub const VALID_REASON: &str = "I was at the match, check the attendance sheet";

/// A team with one admin, one offender and a few plain voters.
pub struct TeamFixture {
    pub team_id: TeamId,
    pub admin_id: MemberId,
    pub offender_id: MemberId,
    pub voters: Vec<MemberId>,
}

impl TeamFixture {
    /// Disputes enabled, admin-decided.
    pub async fn admin_mode(pool: &PgPool, voters: usize) -> Result<Self> {
        Self::create(pool, true, DisputeMode::Admin, None, voters).await
    }

    /// Disputes enabled, approved by `votes_required` positive votes.
    pub async fn community(pool: &PgPool, votes_required: i32, voters: usize) -> Result<Self> {
        Self::create(pool, true, DisputeMode::Community, Some(votes_required), voters).await
    }

    /// Disputes switched off for the team.
    pub async fn disabled(pool: &PgPool) -> Result<Self> {
        Self::create(pool, false, DisputeMode::Admin, None, 0).await
    }

    pub async fn create(
        pool: &PgPool,
        enabled: bool,
        mode: DisputeMode,
        votes_required: Option<i32>,
        voters: usize,
    ) -> Result<Self> {
        let team = Team::create("Sunday League", pool).await?;
        TeamSettings::upsert(team.id, enabled, mode, votes_required, pool).await?;

        let admin_id = add_member(pool, team.id, "Coach", TeamRole::Admin).await?;
        let offender_id = add_member(pool, team.id, "Late Larry", TeamRole::Member).await?;

        let mut voter_ids = Vec::with_capacity(voters);
        for i in 0..voters {
            let name = format!("Voter {}", i + 1);
            voter_ids.push(add_member(pool, team.id, &name, TeamRole::Member).await?);
        }

        Ok(Self {
            team_id: team.id,
            admin_id,
            offender_id,
            voters: voter_ids,
        })
    }

    /// A 5.00 fine issued by the admin against the offender.
    pub async fn fine(&self, pool: &PgPool) -> Result<FineId> {
        create_fine(pool, self.team_id, self.offender_id, Some(self.admin_id)).await
    }

    /// An extra member that is not part of the team.
    pub async fn outsider(pool: &PgPool) -> Result<MemberId> {
        Ok(Member::create("Outsider", pool).await?.id)
    }
}

pub async fn add_member(
    pool: &PgPool,
    team_id: TeamId,
    name: &str,
    role: TeamRole,
) -> Result<MemberId> {
    let member = Member::create(name, pool).await?;
    TeamMembership::add(team_id, member.id, role, pool).await?;
    Ok(member.id)
}

pub async fn create_fine(
    pool: &PgPool,
    team_id: TeamId,
    offender_id: MemberId,
    issued_by_id: Option<MemberId>,
) -> Result<FineId> {
    let fine = Fine::create(
        NewFine {
            team_id,
            offender_id,
            issued_by_id,
            amount: Decimal::new(500, 2),
            reason: "Late to training".to_string(),
            metadata: serde_json::json!({}),
        },
        pool,
    )
    .await?;

    Ok(fine.id)
}
