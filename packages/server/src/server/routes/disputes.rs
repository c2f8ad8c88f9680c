//! REST endpoints for fine disputes.
//!
//! Handlers validate input shape first, then call the dispute actions and
//! convert models to response data. No business rule lives here.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;

use crate::common::{Id, ValidationError};
use crate::domains::disputes::activities;
use crate::domains::disputes::{
    CastVoteInput, CreateDisputeInput, DisputeData, DisputeSummaryData, DisputeWithVotesData,
    ListDisputesQuery, MyVoteData, ResolveDisputeInput, VoteData,
};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::{require_auth, AuthUser};

fn parse_id<T>(field: &'static str, raw: &str) -> Result<Id<T>, ValidationError> {
    Id::parse(raw).map_err(|_| ValidationError::InvalidValue {
        field,
        value: raw.to_string(),
    })
}

/// GET /api/teams/:team_id/disputes?status=
pub async fn list_team_disputes_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(team_id): Path<String>,
    query: Result<Query<ListDisputesQuery>, QueryRejection>,
) -> Result<Json<Vec<DisputeSummaryData>>, ApiError> {
    let caller_id = require_auth(auth)?;
    let team_id = parse_id("team_id", &team_id)?;
    let Query(query) = query?;
    let status = query.validate()?;

    let disputes =
        activities::list_team_disputes(caller_id, team_id, status, &state.db_pool).await?;

    Ok(Json(disputes.into_iter().map(Into::into).collect()))
}

/// GET /api/fines/:fine_id/dispute
pub async fn get_fine_dispute_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(fine_id): Path<String>,
) -> Result<Json<DisputeWithVotesData>, ApiError> {
    let caller_id = require_auth(auth)?;
    let fine_id = parse_id("fine_id", &fine_id)?;

    let found = activities::get_dispute_for_fine(caller_id, fine_id, &state.db_pool).await?;

    Ok(Json(found.into()))
}

/// POST /api/fines/:fine_id/dispute
pub async fn create_dispute_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(fine_id): Path<String>,
    body: Result<Json<CreateDisputeInput>, JsonRejection>,
) -> Result<(StatusCode, Json<DisputeData>), ApiError> {
    let caller_id = require_auth(auth)?;
    let fine_id = parse_id("fine_id", &fine_id)?;
    let Json(input) = body?;
    let reason = input.validate()?;

    let dispute =
        activities::create_dispute(caller_id, fine_id, &reason, &state.db_pool).await?;

    Ok((StatusCode::CREATED, Json(dispute.into())))
}

/// POST /api/disputes/:dispute_id/vote
pub async fn cast_vote_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(dispute_id): Path<String>,
    body: Result<Json<CastVoteInput>, JsonRejection>,
) -> Result<(StatusCode, Json<VoteData>), ApiError> {
    let caller_id = require_auth(auth)?;
    let dispute_id = parse_id("dispute_id", &dispute_id)?;
    let Json(input) = body?;

    let vote = activities::cast_vote(caller_id, dispute_id, input.vote, &state.db_pool).await?;

    Ok((StatusCode::CREATED, Json(vote.into())))
}

/// POST /api/disputes/:dispute_id/resolve
pub async fn resolve_dispute_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(dispute_id): Path<String>,
    body: Result<Json<ResolveDisputeInput>, JsonRejection>,
) -> Result<Json<DisputeData>, ApiError> {
    let caller_id = require_auth(auth)?;
    let dispute_id = parse_id("dispute_id", &dispute_id)?;
    let Json(input) = body?;
    let note = input.validate()?;

    let dispute = activities::resolve_dispute(
        caller_id,
        dispute_id,
        input.approved,
        note.as_deref(),
        &state.db_pool,
    )
    .await?;

    Ok(Json(dispute.into()))
}

/// GET /api/disputes/:dispute_id/votes
pub async fn list_votes_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(dispute_id): Path<String>,
) -> Result<Json<Vec<VoteData>>, ApiError> {
    let caller_id = require_auth(auth)?;
    let dispute_id = parse_id("dispute_id", &dispute_id)?;

    let votes = activities::list_votes(caller_id, dispute_id, &state.db_pool).await?;

    Ok(Json(votes.into_iter().map(Into::into).collect()))
}

/// GET /api/disputes/:dispute_id/my-vote
pub async fn my_vote_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(dispute_id): Path<String>,
) -> Result<Json<MyVoteData>, ApiError> {
    let caller_id = require_auth(auth)?;
    let dispute_id = parse_id("dispute_id", &dispute_id)?;

    let vote = activities::get_my_vote(caller_id, dispute_id, &state.db_pool).await?;

    Ok(Json(vote.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::FineId;

    #[test]
    fn test_parse_id_rejects_malformed_uuid() {
        let err = parse_id::<crate::common::Fine>("fine_id", "42").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidValue {
                field: "fine_id",
                value: "42".to_string()
            }
        );

        let id = FineId::new();
        assert_eq!(parse_id("fine_id", &id.to_string()), Ok(id));
    }
}
