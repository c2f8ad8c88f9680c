use thiserror::Error;

/// Domain errors for the dispute workflow.
///
/// Every variant except `Database` is a rule violation the caller can act on.
/// `Database` wraps infrastructure failures and is never translated here.
#[derive(Error, Debug)]
pub enum DisputeError {
    #[error("Fine not found")]
    FineNotFound,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("This fine has already been disputed")]
    AlreadyDisputed,

    #[error("Disputes are disabled for this team")]
    DisputesDisabled,

    #[error("Dispute not found")]
    DisputeNotFound,

    #[error("This dispute is already closed")]
    DisputeClosed,

    #[error("You have already voted on this dispute")]
    AlreadyVoted,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DisputeError {
    pub const NOT_OFFENDER: &'static str = "Only the offender may contest their own fine";
    pub const NOT_MEMBER: &'static str = "You are not an active member of this team";
    pub const OWN_DISPUTE: &'static str = "You cannot vote on your own contest";
    pub const NOT_ADMIN: &'static str = "Only a team admin can resolve a dispute";

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::FineNotFound => "FINE_NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::AlreadyDisputed => "ALREADY_DISPUTED",
            Self::DisputesDisabled => "DISPUTES_DISABLED",
            Self::DisputeNotFound => "DISPUTE_NOT_FOUND",
            Self::DisputeClosed => "DISPUTE_CLOSED",
            Self::AlreadyVoted => "ALREADY_VOTED",
            Self::Database(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

/// True when `err` is a unique violation on the named constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err.as_database_error() {
        Some(db_err) => db_err.is_unique_violation() && db_err.constraint() == Some(constraint),
        None => false,
    }
}
