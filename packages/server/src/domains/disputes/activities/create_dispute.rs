use serde_json::json;
use sqlx::{PgConnection, PgPool};
use tracing::info;

use crate::common::{FineId, MemberId};
use crate::domains::activity::{ActivityKind, TeamActivity};
use crate::domains::disputes::error::is_unique_violation;
use crate::domains::disputes::models::{FineDispute, NewDispute, FINE_UNIQUE_CONSTRAINT};
use crate::domains::disputes::DisputeError;
use crate::domains::fines::Fine;
use crate::domains::teams::{TeamMembership, TeamSettings};

/// Open a dispute on a fine. `reason` must already be validated.
pub async fn create_dispute(
    requester_id: MemberId,
    fine_id: FineId,
    reason: &str,
    pool: &PgPool,
) -> Result<FineDispute, DisputeError> {
    let mut tx = pool.begin().await?;
    let dispute = create_dispute_in(&mut tx, requester_id, fine_id, reason).await?;
    tx.commit().await?;
    Ok(dispute)
}

/// Open a dispute inside the caller's transaction.
///
/// Checks run in order and the first failure wins: the fine exists, the
/// requester is its offender and still an active team member, the fine has
/// no dispute yet, and the team has disputes enabled. The team's current quorum is frozen onto the dispute.
pub async fn create_dispute_in(
    conn: &mut PgConnection,
    requester_id: MemberId,
    fine_id: FineId,
    reason: &str,
) -> Result<FineDispute, DisputeError> {
    let fine = Fine::find_by_id(fine_id, &mut *conn)
        .await?
        .ok_or(DisputeError::FineNotFound)?;

    if fine.offender_id != requester_id {
        return Err(DisputeError::Forbidden(DisputeError::NOT_OFFENDER));
    }

    // A removed member keeps their fines but loses every dispute right
    if TeamMembership::find_active(fine.team_id, requester_id, &mut *conn)
        .await?
        .is_none()
    {
        return Err(DisputeError::Forbidden(DisputeError::NOT_MEMBER));
    }

    if FineDispute::exists_for_fine(fine_id, &mut *conn).await? {
        return Err(DisputeError::AlreadyDisputed);
    }

    let config = TeamSettings::dispute_config(fine.team_id, &mut *conn).await?;
    if !config.enabled {
        return Err(DisputeError::DisputesDisabled);
    }

    // The pre-check above can race a concurrent request; the unique
    // constraint decides.
    let dispute = FineDispute::insert(
        NewDispute {
            fine_id,
            team_id: fine.team_id,
            disputed_by_id: requester_id,
            reason: reason.to_string(),
            votes_required: config.votes_required,
        },
        &mut *conn,
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e, FINE_UNIQUE_CONSTRAINT) {
            DisputeError::AlreadyDisputed
        } else {
            DisputeError::Database(e)
        }
    })?;

    TeamActivity::append(
        dispute.team_id,
        Some(requester_id),
        ActivityKind::DisputeCreated,
        json!({
            "disputeId": dispute.id,
            "fineId": dispute.fine_id,
        }),
        &mut *conn,
    )
    .await?;

    info!(
        dispute_id = %dispute.id,
        fine_id = %fine_id,
        team_id = %dispute.team_id,
        votes_required = dispute.votes_required,
        "Dispute created"
    );

    Ok(dispute)
}
