//! Opening a dispute: precondition order, quorum snapshot, concurrency.

mod common;

use crate::common::{create_fine, TeamFixture, TestHarness, VALID_REASON};
use fines_core::common::FineId;
use fines_core::domains::activity::{ActivityKind, TeamActivity};
use fines_core::domains::disputes::activities::create_dispute;
use fines_core::domains::disputes::error::is_unique_violation;
use fines_core::domains::disputes::models::{
    NewDispute, FINE_UNIQUE_CONSTRAINT, VOTE_UNIQUE_CONSTRAINT,
};
use fines_core::domains::disputes::{DisputeError, DisputeStatus, FineDispute};
use fines_core::domains::teams::{
    DisputeMode, TeamMembership, TeamSettings, DEFAULT_VOTES_REQUIRED,
};

#[tokio::test]
async fn offender_opens_pending_dispute_with_frozen_quorum() {
    let ctx = TestHarness::new().await.unwrap();
    let team = TeamFixture::community(&ctx.db_pool, 4, 0).await.unwrap();
    let fine_id = team.fine(&ctx.db_pool).await.unwrap();

    let dispute = create_dispute(team.offender_id, fine_id, VALID_REASON, &ctx.db_pool)
        .await
        .unwrap();

    assert_eq!(dispute.status, DisputeStatus::Pending);
    assert_eq!(dispute.fine_id, fine_id);
    assert_eq!(dispute.team_id, team.team_id);
    assert_eq!(dispute.disputed_by_id, team.offender_id);
    assert_eq!(dispute.votes_count, 0);
    assert_eq!(dispute.votes_required, 4);
    assert!(dispute.resolved_by_id.is_none());
    assert!(dispute.resolved_at.is_none());

    let created =
        TeamActivity::list_for_team(team.team_id, ActivityKind::DisputeCreated, &ctx.db_pool)
            .await
            .unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].user_id, Some(team.offender_id));
    assert_eq!(
        created[0].metadata["disputeId"],
        serde_json::json!(dispute.id.to_string())
    );
}

#[tokio::test]
async fn missing_votes_required_defaults_to_three() {
    let ctx = TestHarness::new().await.unwrap();
    let team = TeamFixture::create(&ctx.db_pool, true, DisputeMode::Community, None, 0)
        .await
        .unwrap();
    let fine_id = team.fine(&ctx.db_pool).await.unwrap();

    let dispute = create_dispute(team.offender_id, fine_id, VALID_REASON, &ctx.db_pool)
        .await
        .unwrap();

    assert_eq!(dispute.votes_required, DEFAULT_VOTES_REQUIRED);
}

#[tokio::test]
async fn unknown_fine_is_not_found() {
    let ctx = TestHarness::new().await.unwrap();
    let team = TeamFixture::admin_mode(&ctx.db_pool, 0).await.unwrap();

    let err = create_dispute(team.offender_id, FineId::new(), VALID_REASON, &ctx.db_pool)
        .await
        .unwrap_err();

    assert!(matches!(err, DisputeError::FineNotFound));
}

#[tokio::test]
async fn only_the_offender_may_dispute() {
    let ctx = TestHarness::new().await.unwrap();
    let team = TeamFixture::admin_mode(&ctx.db_pool, 1).await.unwrap();
    let fine_id = team.fine(&ctx.db_pool).await.unwrap();

    for requester in [team.admin_id, team.voters[0]] {
        let err = create_dispute(requester, fine_id, VALID_REASON, &ctx.db_pool)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DisputeError::Forbidden(DisputeError::NOT_OFFENDER)
        ));
    }
}

#[tokio::test]
async fn second_dispute_on_same_fine_is_rejected() {
    let ctx = TestHarness::new().await.unwrap();
    let team = TeamFixture::admin_mode(&ctx.db_pool, 0).await.unwrap();
    let fine_id = team.fine(&ctx.db_pool).await.unwrap();

    create_dispute(team.offender_id, fine_id, VALID_REASON, &ctx.db_pool)
        .await
        .unwrap();
    let err = create_dispute(team.offender_id, fine_id, VALID_REASON, &ctx.db_pool)
        .await
        .unwrap_err();

    assert!(matches!(err, DisputeError::AlreadyDisputed));
}

#[tokio::test]
async fn disabled_team_rejects_disputes() {
    let ctx = TestHarness::new().await.unwrap();
    let team = TeamFixture::disabled(&ctx.db_pool).await.unwrap();
    let fine_id = team.fine(&ctx.db_pool).await.unwrap();

    let err = create_dispute(team.offender_id, fine_id, VALID_REASON, &ctx.db_pool)
        .await
        .unwrap_err();

    assert!(matches!(err, DisputeError::DisputesDisabled));
    assert!(FineDispute::find_by_fine(fine_id, &ctx.db_pool)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn team_without_settings_row_has_disputes_disabled() {
    let ctx = TestHarness::new().await.unwrap();
    let team = TeamFixture::admin_mode(&ctx.db_pool, 0).await.unwrap();
    sqlx::query("DELETE FROM team_settings WHERE team_id = $1")
        .bind(team.team_id)
        .execute(&ctx.db_pool)
        .await
        .unwrap();
    let fine_id = team.fine(&ctx.db_pool).await.unwrap();

    let err = create_dispute(team.offender_id, fine_id, VALID_REASON, &ctx.db_pool)
        .await
        .unwrap_err();

    assert!(matches!(err, DisputeError::DisputesDisabled));
}

#[tokio::test]
async fn existing_dispute_is_reported_before_disabled_setting() {
    let ctx = TestHarness::new().await.unwrap();
    let team = TeamFixture::admin_mode(&ctx.db_pool, 0).await.unwrap();
    let fine_id = team.fine(&ctx.db_pool).await.unwrap();
    create_dispute(team.offender_id, fine_id, VALID_REASON, &ctx.db_pool)
        .await
        .unwrap();

    TeamSettings::upsert(team.team_id, false, DisputeMode::Admin, None, &ctx.db_pool)
        .await
        .unwrap();

    let err = create_dispute(team.offender_id, fine_id, VALID_REASON, &ctx.db_pool)
        .await
        .unwrap_err();
    assert!(matches!(err, DisputeError::AlreadyDisputed));
}

#[tokio::test]
async fn offender_check_comes_before_disabled_setting() {
    let ctx = TestHarness::new().await.unwrap();
    let team = TeamFixture::disabled(&ctx.db_pool).await.unwrap();
    let fine_id = create_fine(&ctx.db_pool, team.team_id, team.offender_id, None)
        .await
        .unwrap();

    let err = create_dispute(team.admin_id, fine_id, VALID_REASON, &ctx.db_pool)
        .await
        .unwrap_err();

    assert!(matches!(err, DisputeError::Forbidden(_)));
}

#[tokio::test]
async fn concurrent_creates_leave_exactly_one_dispute() {
    let ctx = TestHarness::new().await.unwrap();
    let team = TeamFixture::admin_mode(&ctx.db_pool, 0).await.unwrap();
    let fine_id = team.fine(&ctx.db_pool).await.unwrap();

    let attempts = (0..5).map(|_| {
        let pool = ctx.db_pool.clone();
        let offender_id = team.offender_id;
        async move { create_dispute(offender_id, fine_id, VALID_REASON, &pool).await }
    });
    let results = futures::future::join_all(attempts).await;

    let created = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(created, 1);
    for result in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(result, Err(DisputeError::AlreadyDisputed)));
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM fine_disputes WHERE fine_id = $1")
        .bind(fine_id)
        .fetch_one(&ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let created =
        TeamActivity::list_for_team(team.team_id, ActivityKind::DisputeCreated, &ctx.db_pool)
            .await
            .unwrap();
    assert_eq!(created.len(), 1);
}

#[tokio::test]
async fn removed_offender_cannot_open_dispute() {
    let ctx = TestHarness::new().await.unwrap();
    let team = TeamFixture::admin_mode(&ctx.db_pool, 0).await.unwrap();
    let fine_id = team.fine(&ctx.db_pool).await.unwrap();
    TeamMembership::remove(team.team_id, team.offender_id, &ctx.db_pool)
        .await
        .unwrap();

    let err = create_dispute(team.offender_id, fine_id, VALID_REASON, &ctx.db_pool)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DisputeError::Forbidden(DisputeError::NOT_MEMBER)
    ));
    assert!(!FineDispute::exists_for_fine(fine_id, &ctx.db_pool)
        .await
        .unwrap());
}

#[tokio::test]
async fn duplicate_insert_reports_the_fine_constraint() {
    let ctx = TestHarness::new().await.unwrap();
    let team = TeamFixture::admin_mode(&ctx.db_pool, 0).await.unwrap();
    let fine_id = team.fine(&ctx.db_pool).await.unwrap();
    let new_dispute = || NewDispute {
        fine_id,
        team_id: team.team_id,
        disputed_by_id: team.offender_id,
        reason: VALID_REASON.to_string(),
        votes_required: 3,
    };

    FineDispute::insert(new_dispute(), &ctx.db_pool).await.unwrap();
    let err = FineDispute::insert(new_dispute(), &ctx.db_pool)
        .await
        .unwrap_err();

    assert!(is_unique_violation(&err, FINE_UNIQUE_CONSTRAINT));
    assert!(!is_unique_violation(&err, VOTE_UNIQUE_CONSTRAINT));
}
