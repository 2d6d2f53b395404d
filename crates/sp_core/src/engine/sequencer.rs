//! Team sequencing for daily and practice rounds.
//!
//! Each session owns its own sequencer instance; there is no process-wide
//! "recent teams" state, so sessions stay independent and testable in
//! isolation. Daily rounds replay an externally supplied fixed sequence;
//! practice rounds draw from the full team set with a sliding
//! recent-repeat window.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

use crate::error::CoreError;

/// How many of the most recent selections are excluded from the pool.
const RECENT_WINDOW: usize = 5;

#[derive(Debug)]
enum Mode {
    /// Externally supplied ordered sequence (daily challenge feed)
    Fixed { sequence: Vec<String>, next_index: usize },
    /// Seeded weighted selection with recent-repeat avoidance
    Random { all_teams: Vec<String>, recent: VecDeque<String>, rng: ChaCha8Rng },
}

#[derive(Debug)]
pub struct TeamSequencer {
    mode: Mode,
}

impl TeamSequencer {
    /// Daily mode: the caller guarantees valid team identifiers; an empty
    /// sequence is a precondition fault.
    pub fn fixed(sequence: Vec<String>) -> Result<Self, CoreError> {
        if sequence.is_empty() {
            return Err(CoreError::EmptyTeamSequence);
        }
        Ok(Self { mode: Mode::Fixed { sequence, next_index: 0 } })
    }

    /// Practice mode: seeded pseudo-random selection over `all_teams`.
    pub fn random(all_teams: Vec<String>, seed: u64) -> Result<Self, CoreError> {
        if all_teams.is_empty() {
            return Err(CoreError::EmptyTeamSequence);
        }
        let mut all_teams = all_teams;
        all_teams.sort();
        all_teams.dedup();
        Ok(Self {
            mode: Mode::Random {
                all_teams,
                recent: VecDeque::with_capacity(RECENT_WINDOW + 1),
                rng: ChaCha8Rng::seed_from_u64(seed),
            },
        })
    }

    /// Produce the next team, or `None` when a fixed sequence is exhausted.
    ///
    /// Random mode never exhausts: if the recent-repeat exclusion empties
    /// the candidate pool the window resets and selection proceeds over
    /// the full team set, so selection cannot deadlock even when the team
    /// set is smaller than the window.
    pub fn next_team(&mut self) -> Option<String> {
        match &mut self.mode {
            Mode::Fixed { sequence, next_index } => {
                let team = sequence.get(*next_index).cloned();
                if team.is_some() {
                    *next_index += 1;
                }
                team
            }
            Mode::Random { all_teams, recent, rng } => {
                let available: Vec<&String> =
                    all_teams.iter().filter(|t| !recent.contains(t)).collect();

                let chosen = if available.is_empty() {
                    recent.clear();
                    all_teams.choose(rng)?.clone()
                } else {
                    (*available.choose(rng)?).clone()
                };

                recent.push_back(chosen.clone());
                while recent.len() > RECENT_WINDOW {
                    recent.pop_front();
                }
                Some(chosen)
            }
        }
    }
}
