use sqlx::{PgConnection, PgPool};
use tracing::info;

use crate::common::{DisputeId, MemberId};
use crate::domains::disputes::activities::{apply_resolution, AUTO_APPROVAL_NOTE};
use crate::domains::disputes::error::is_unique_violation;
use crate::domains::disputes::models::{DisputeVote, FineDispute, VOTE_UNIQUE_CONSTRAINT};
use crate::domains::disputes::DisputeError;
use crate::domains::teams::{DisputeMode, TeamMembership, TeamSettings};

/// Cast a vote on a dispute.
pub async fn cast_vote(
    voter_id: MemberId,
    dispute_id: DisputeId,
    vote: bool,
    pool: &PgPool,
) -> Result<DisputeVote, DisputeError> {
    let mut tx = pool.begin().await?;
    let cast = cast_vote_in(&mut tx, voter_id, dispute_id, vote).await?;
    tx.commit().await?;
    Ok(cast)
}

/// Cast a vote inside the caller's transaction.
///
/// The dispute row stays locked until the transaction ends, so the vote
/// insert, the counter update and a quorum-triggered approval form one unit.
/// Negative votes are recorded but never move the counter; there is no
/// rejection by vote.
pub async fn cast_vote_in(
    conn: &mut PgConnection,
    voter_id: MemberId,
    dispute_id: DisputeId,
    vote: bool,
) -> Result<DisputeVote, DisputeError> {
    let dispute = FineDispute::find_by_id_for_update(dispute_id, &mut *conn)
        .await?
        .ok_or(DisputeError::DisputeNotFound)?;

    if !dispute.is_pending() {
        return Err(DisputeError::DisputeClosed);
    }

    // Membership is read once here and not re-validated at commit; a removal
    // racing this vote can still let it through.
    if TeamMembership::find_active(dispute.team_id, voter_id, &mut *conn)
        .await?
        .is_none()
    {
        return Err(DisputeError::Forbidden(DisputeError::NOT_MEMBER));
    }

    if DisputeVote::find_for_user(dispute_id, voter_id, &mut *conn)
        .await?
        .is_some()
    {
        return Err(DisputeError::AlreadyVoted);
    }

    if dispute.disputed_by_id == voter_id {
        return Err(DisputeError::Forbidden(DisputeError::OWN_DISPUTE));
    }

    let cast = DisputeVote::insert(dispute_id, voter_id, vote, &mut *conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, VOTE_UNIQUE_CONSTRAINT) {
                DisputeError::AlreadyVoted
            } else {
                DisputeError::Database(e)
            }
        })?;

    info!(dispute_id = %dispute_id, voter_id = %voter_id, vote, "Vote cast");

    if !vote {
        return Ok(cast);
    }

    let dispute = FineDispute::increment_votes(dispute_id, &mut *conn).await?;

    let config = TeamSettings::dispute_config(dispute.team_id, &mut *conn).await?;
    if config.mode == DisputeMode::Community && dispute.votes_count >= dispute.votes_required {
        info!(
            dispute_id = %dispute_id,
            votes_count = dispute.votes_count,
            votes_required = dispute.votes_required,
            "Quorum reached, approving dispute"
        );
        // The row lock taken above keeps the dispute pending until commit, so
        // the compare-and-set cannot lose here.
        apply_resolution(conn, &dispute, true, None, Some(AUTO_APPROVAL_NOTE)).await?;
    }

    Ok(cast)
}
