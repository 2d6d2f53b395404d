use thiserror::Error;

/// Fault conditions.
///
/// Rejected picks are NOT represented here: an unresolved name, a reused
/// player or a team-ineligible player are normal game outcomes and are
/// reported as [`crate::models::RejectReason`] values. `CoreError` covers
/// the cases where the caller violated a construction or call precondition;
/// the offending operation aborts without mutating existing valid state.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid roster: {0}")]
    InvalidRoster(String),

    #[error("invalid round config: {0}")]
    InvalidConfig(String),

    #[error("empty team sequence")]
    EmptyTeamSequence,

    #[error("game not over: {0}")]
    GameNotOver(String),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
