//! Pick records and submission outcomes.

use serde::{Deserialize, Serialize};

/// One successful submission. Created exactly once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pick {
    pub canonical_name: String,
    pub display_name: String,
    pub team: String,
    /// Stat value after difficulty/bonus scaling
    pub stat_value: u32,
    pub used_help: bool,
}

/// Why a submission was rejected. Normal game feedback, not a fault.
///
/// Priority when several apply: `NotFound` > `AlreadyUsed` >
/// `NotEligibleForTeam`. `GameNotActive` covers submissions before the
/// game starts or after it ends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RejectReason {
    NotFound,
    AlreadyUsed,
    NotEligibleForTeam,
    GameNotActive,
}

/// Result of `submit_pick`, returned to the presentation layer as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted {
        pick: Pick,
        /// Score delta awarded for this pick (already scaled)
        points: u32,
        game_over: bool,
    },
    Rejected(RejectReason),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}
