use sqlx::PgPool;

use crate::common::{DisputeId, FineId, MemberId, TeamId};
use crate::domains::disputes::models::{DisputeStatus, DisputeSummary, DisputeVote, FineDispute};
use crate::domains::disputes::DisputeError;
use crate::domains::teams::TeamMembership;

async fn require_active_member(
    team_id: TeamId,
    user_id: MemberId,
    pool: &PgPool,
) -> Result<(), DisputeError> {
    match TeamMembership::find_active(team_id, user_id, pool).await? {
        Some(_) => Ok(()),
        None => Err(DisputeError::Forbidden(DisputeError::NOT_MEMBER)),
    }
}

async fn visible_dispute(
    caller_id: MemberId,
    dispute_id: DisputeId,
    pool: &PgPool,
) -> Result<FineDispute, DisputeError> {
    let dispute = FineDispute::find_by_id(dispute_id, pool)
        .await?
        .ok_or(DisputeError::DisputeNotFound)?;
    require_active_member(dispute.team_id, caller_id, pool).await?;
    Ok(dispute)
}

/// Disputes of a team, newest first.
pub async fn list_team_disputes(
    caller_id: MemberId,
    team_id: TeamId,
    status: Option<DisputeStatus>,
    pool: &PgPool,
) -> Result<Vec<DisputeSummary>, DisputeError> {
    require_active_member(team_id, caller_id, pool).await?;
    Ok(FineDispute::list_for_team(team_id, status, pool).await?)
}

/// The dispute opened on a fine, with its votes.
pub async fn get_dispute_for_fine(
    caller_id: MemberId,
    fine_id: FineId,
    pool: &PgPool,
) -> Result<(FineDispute, Vec<DisputeVote>), DisputeError> {
    let dispute = FineDispute::find_by_fine(fine_id, pool)
        .await?
        .ok_or(DisputeError::DisputeNotFound)?;
    require_active_member(dispute.team_id, caller_id, pool).await?;
    let votes = DisputeVote::list_for_dispute(dispute.id, pool).await?;
    Ok((dispute, votes))
}

pub async fn list_votes(
    caller_id: MemberId,
    dispute_id: DisputeId,
    pool: &PgPool,
) -> Result<Vec<DisputeVote>, DisputeError> {
    let dispute = visible_dispute(caller_id, dispute_id, pool).await?;
    Ok(DisputeVote::list_for_dispute(dispute.id, pool).await?)
}

/// The caller's own vote, `None` if they have not voted.
pub async fn get_my_vote(
    caller_id: MemberId,
    dispute_id: DisputeId,
    pool: &PgPool,
) -> Result<Option<DisputeVote>, DisputeError> {
    let dispute = visible_dispute(caller_id, dispute_id, pool).await?;
    Ok(DisputeVote::find_for_user(dispute.id, caller_id, pool).await?)
}
