//! Pick legality checks.

use std::collections::BTreeSet;

use crate::models::{RejectReason, Roster};

/// A legal pick, before difficulty scaling (the engine applies that).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPick {
    pub canonical_name: String,
    pub display_name: String,
    pub stat_value: u32,
}

/// Decide legality of a resolved pick for the current team and state.
///
/// Rejection priority, first match wins: `NotFound` (the name does not
/// resolve to a roster entry), `AlreadyUsed`, `NotEligibleForTeam`.
/// Pure function of its inputs.
pub fn validate(
    roster: &Roster,
    canonical_name: Option<&str>,
    current_team: &str,
    used_players: &BTreeSet<String>,
) -> Result<ValidPick, RejectReason> {
    let canonical = canonical_name.ok_or(RejectReason::NotFound)?;
    let player = roster.get(canonical).ok_or(RejectReason::NotFound)?;

    if used_players.contains(canonical) {
        return Err(RejectReason::AlreadyUsed);
    }
    if !player.eligible_teams.contains(current_team) {
        return Err(RejectReason::NotEligibleForTeam);
    }

    Ok(ValidPick {
        canonical_name: player.canonical_name.clone(),
        display_name: player.display_name.clone(),
        stat_value: player.stat_value,
    })
}
