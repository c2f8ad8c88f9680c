use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::validation::{bounded_text, optional_text};
use crate::common::{money, ValidationError};
use crate::domains::disputes::models::{DisputeStatus, DisputeSummary, DisputeVote, FineDispute};

pub const REASON_MIN_CHARS: usize = 10;
pub const REASON_MAX_CHARS: usize = 1000;
pub const NOTE_MAX_CHARS: usize = 500;

// ============================================================================
// Inputs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDisputeInput {
    pub reason: String,
}

impl CreateDisputeInput {
    /// Returns the trimmed reason.
    pub fn validate(&self) -> Result<String, ValidationError> {
        bounded_text("reason", &self.reason, REASON_MIN_CHARS, REASON_MAX_CHARS)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastVoteInput {
    pub vote: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveDisputeInput {
    pub approved: bool,
    #[serde(default)]
    pub note: Option<String>,
}

impl ResolveDisputeInput {
    /// Returns the trimmed note, `None` when absent or blank.
    pub fn validate(&self) -> Result<Option<String>, ValidationError> {
        optional_text("note", self.note.as_deref(), NOTE_MAX_CHARS)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDisputesQuery {
    #[serde(default)]
    pub status: Option<String>,
}

impl ListDisputesQuery {
    pub fn validate(&self) -> Result<Option<DisputeStatus>, ValidationError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value
                .parse::<DisputeStatus>()
                .map(Some)
                .map_err(|_| ValidationError::InvalidValue {
                    field: "status",
                    value: value.to_string(),
                }),
        }
    }
}

// ============================================================================
// Outputs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeData {
    pub id: String,
    pub fine_id: String,
    pub team_id: String,
    pub disputed_by_id: String,
    pub reason: String,
    pub status: DisputeStatus,
    pub votes_count: i32,
    pub votes_required: i32,
    pub resolved_by_id: Option<String>,
    pub resolution_note: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<FineDispute> for DisputeData {
    fn from(dispute: FineDispute) -> Self {
        Self {
            id: dispute.id.to_string(),
            fine_id: dispute.fine_id.to_string(),
            team_id: dispute.team_id.to_string(),
            disputed_by_id: dispute.disputed_by_id.to_string(),
            reason: dispute.reason,
            status: dispute.status,
            votes_count: dispute.votes_count,
            votes_required: dispute.votes_required,
            resolved_by_id: dispute.resolved_by_id.map(|id| id.to_string()),
            resolution_note: dispute.resolution_note,
            resolved_at: dispute.resolved_at,
            created_at: dispute.created_at,
        }
    }
}

/// Team listing entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeSummaryData {
    #[serde(flatten)]
    pub dispute: DisputeData,
    pub disputed_by_name: String,
    #[serde(serialize_with = "money::option_as_f64")]
    pub fine_amount: Option<Decimal>,
    pub fine_reason: Option<String>,
}

impl From<DisputeSummary> for DisputeSummaryData {
    fn from(summary: DisputeSummary) -> Self {
        Self {
            dispute: summary.dispute.into(),
            disputed_by_name: summary.disputed_by_name,
            fine_amount: summary.fine_amount,
            fine_reason: summary.fine_reason,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteData {
    pub id: String,
    pub dispute_id: String,
    pub user_id: String,
    pub vote: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DisputeVote> for VoteData {
    fn from(vote: DisputeVote) -> Self {
        Self {
            id: vote.id.to_string(),
            dispute_id: vote.dispute_id.to_string(),
            user_id: vote.user_id.to_string(),
            vote: vote.vote,
            created_at: vote.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeWithVotesData {
    #[serde(flatten)]
    pub dispute: DisputeData,
    pub votes: Vec<VoteData>,
}

impl From<(FineDispute, Vec<DisputeVote>)> for DisputeWithVotesData {
    fn from((dispute, votes): (FineDispute, Vec<DisputeVote>)) -> Self {
        Self {
            dispute: dispute.into(),
            votes: votes.into_iter().map(VoteData::from).collect(),
        }
    }
}

/// Caller's own vote, or `{"voted": false}` when they have not voted.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MyVoteData {
    Voted(VoteData),
    NotVoted { voted: bool },
}

impl From<Option<DisputeVote>> for MyVoteData {
    fn from(vote: Option<DisputeVote>) -> Self {
        match vote {
            Some(vote) => MyVoteData::Voted(vote.into()),
            None => MyVoteData::NotVoted { voted: false },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{DisputeId, MemberId, VoteId};

    #[test]
    fn test_reason_length_bounds() {
        let short = CreateDisputeInput {
            reason: "too short".into(),
        };
        assert!(short.validate().is_err());

        let ok = CreateDisputeInput {
            reason: "  I was not at practice that day  ".into(),
        };
        assert_eq!(ok.validate().unwrap(), "I was not at practice that day");

        let long = CreateDisputeInput {
            reason: "a".repeat(REASON_MAX_CHARS + 1),
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_note_is_optional_and_bounded() {
        let none = ResolveDisputeInput {
            approved: true,
            note: None,
        };
        assert_eq!(none.validate().unwrap(), None);

        let long = ResolveDisputeInput {
            approved: false,
            note: Some("n".repeat(NOTE_MAX_CHARS + 1)),
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_status_filter() {
        let query = ListDisputesQuery {
            status: Some("approved".into()),
        };
        assert_eq!(query.validate().unwrap(), Some(DisputeStatus::Approved));
        assert_eq!(ListDisputesQuery::default().validate().unwrap(), None);

        let bad = ListDisputesQuery {
            status: Some("open".into()),
        };
        assert!(matches!(
            bad.validate(),
            Err(ValidationError::InvalidValue { field: "status", .. })
        ));
    }

    #[test]
    fn test_resolve_input_note_defaults_to_none() {
        let input: ResolveDisputeInput = serde_json::from_str(r#"{"approved": true}"#).unwrap();
        assert!(input.approved);
        assert!(input.note.is_none());
    }

    #[test]
    fn test_my_vote_shapes() {
        let not_voted = serde_json::to_value(MyVoteData::from(None)).unwrap();
        assert_eq!(not_voted, serde_json::json!({ "voted": false }));

        let vote = DisputeVote {
            id: VoteId::new(),
            dispute_id: DisputeId::new(),
            user_id: MemberId::new(),
            vote: true,
            created_at: Utc::now(),
        };
        let voted = serde_json::to_value(MyVoteData::from(Some(vote))).unwrap();
        assert_eq!(voted["vote"], serde_json::json!(true));
        assert!(voted.get("disputeId").is_some());
    }
}
