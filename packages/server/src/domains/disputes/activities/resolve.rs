use serde_json::json;
use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};

use crate::common::{DisputeId, MemberId};
use crate::domains::activity::{ActivityKind, TeamActivity};
use crate::domains::disputes::models::{DisputeStatus, FineDispute};
use crate::domains::disputes::DisputeError;
use crate::domains::fines::Fine;
use crate::domains::teams::TeamMembership;

/// Note recorded on disputes approved by reaching the vote quorum.
pub const AUTO_APPROVAL_NOTE: &str = "Auto-approuvé par vote communautaire";

/// Admin decision on a pending dispute. `note` must already be validated.
pub async fn resolve_dispute(
    acting_user_id: MemberId,
    dispute_id: DisputeId,
    approved: bool,
    note: Option<&str>,
    pool: &PgPool,
) -> Result<FineDispute, DisputeError> {
    let mut tx = pool.begin().await?;
    let dispute = resolve_dispute_in(&mut tx, acting_user_id, dispute_id, approved, note).await?;
    tx.commit().await?;
    Ok(dispute)
}

/// Admin decision inside the caller's transaction.
pub async fn resolve_dispute_in(
    conn: &mut PgConnection,
    acting_user_id: MemberId,
    dispute_id: DisputeId,
    approved: bool,
    note: Option<&str>,
) -> Result<FineDispute, DisputeError> {
    let dispute = FineDispute::find_by_id_for_update(dispute_id, &mut *conn)
        .await?
        .ok_or(DisputeError::DisputeNotFound)?;

    if !dispute.is_pending() {
        return Err(DisputeError::DisputeClosed);
    }

    let is_admin = TeamMembership::find(dispute.team_id, acting_user_id, &mut *conn)
        .await?
        .is_some_and(|m| m.is_admin());
    if !is_admin {
        return Err(DisputeError::Forbidden(DisputeError::NOT_ADMIN));
    }

    apply_resolution(conn, &dispute, approved, Some(acting_user_id), note).await
}

/// The terminal transition shared by admin decisions and quorum approval.
///
/// The pending check is repeated in the `UPDATE` itself, so only one caller
/// can ever move a dispute out of `pending`; any other gets `DisputeClosed`.
/// On approval the fine is deleted in the same transaction. `resolved_by_id`
/// is `None` for automatic resolutions.
pub async fn apply_resolution(
    conn: &mut PgConnection,
    dispute: &FineDispute,
    approved: bool,
    resolved_by_id: Option<MemberId>,
    note: Option<&str>,
) -> Result<FineDispute, DisputeError> {
    let resolved = FineDispute::mark_resolved(
        dispute.id,
        DisputeStatus::resolved(approved),
        resolved_by_id,
        note,
        &mut *conn,
    )
    .await?
    .ok_or(DisputeError::DisputeClosed)?;

    if approved && !Fine::delete(resolved.fine_id, &mut *conn).await? {
        warn!(
            dispute_id = %resolved.id,
            fine_id = %resolved.fine_id,
            "Approved dispute's fine was already gone"
        );
    }

    TeamActivity::append(
        resolved.team_id,
        resolved_by_id,
        ActivityKind::DisputeResolved,
        json!({
            "disputeId": resolved.id,
            "approved": approved,
            "fineId": resolved.fine_id,
            "resolvedById": resolved_by_id,
        }),
        &mut *conn,
    )
    .await?;

    info!(
        dispute_id = %resolved.id,
        status = %resolved.status,
        automatic = resolved_by_id.is_none(),
        "Dispute resolved"
    );

    Ok(resolved)
}
