//! The game session state machine.
//!
//! `NotStarted -> InProgress -> GameOver`, with `reset_game` as the only
//! way out of `GameOver`. The engine owns all round/score/used-player
//! state and mutates it exclusively through `submit_pick`; rejected
//! submissions leave the state untouched. It performs no I/O and never
//! sleeps; hosts drive it synchronously and render what it returns.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::engine::resolver::NameResolver;
use crate::engine::sequencer::TeamSequencer;
use crate::engine::solver::{self, OptimalResult};
use crate::engine::validator;
use crate::error::CoreError;
use crate::models::{
    scaled_stat_value, Difficulty, GameMode, Pick, PlayerRecord, RejectReason, RoundConfig, Roster,
    SubmitOutcome,
};
use crate::save::{current_timestamp, GameSnapshot, SNAPSHOT_VERSION};

/// Host-injected bonus condition (e.g. a franchise-icon doubling).
/// A pure function of the player record.
pub type BonusTrigger = fn(&PlayerRecord) -> bool;

struct Session {
    id: Uuid,
    mode: GameMode,
    sequencer: TeamSequencer,
    current_team: Option<String>,
    picks: Vec<Pick>,
    used_players: BTreeSet<String>,
    round: u32,
    total_score: u64,
    is_game_over: bool,
    pending_help: bool,
    /// Daily mode: echo of the fixed sequence for snapshot/restore
    team_sequence: Option<Vec<String>>,
    started_at_ms: u64,
    ended_at_ms: Option<u64>,
    last_updated_ms: u64,
}

/// One concrete engine, parameterized by configuration rather than a
/// type hierarchy: roster, round config, difficulty and an optional
/// bonus trigger are all injected at construction.
pub struct GameEngine {
    roster: Arc<Roster>,
    config: RoundConfig,
    difficulty: Difficulty,
    bonus_trigger: Option<BonusTrigger>,
    rng: ChaCha8Rng,
    session: Option<Session>,
}

impl GameEngine {
    pub fn new(roster: Arc<Roster>, config: RoundConfig, difficulty: Difficulty, seed: u64) -> Self {
        Self {
            roster,
            config,
            difficulty,
            bonus_trigger: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            session: None,
        }
    }

    pub fn with_bonus_trigger(mut self, trigger: BonusTrigger) -> Self {
        self.bonus_trigger = Some(trigger);
        self
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    // ========================
    // Lifecycle
    // ========================

    /// Start a practice game: teams drawn by the session's own seeded
    /// sequencer with recent-repeat avoidance.
    pub fn start_game(&mut self) -> Result<(), CoreError> {
        let all_teams: Vec<String> = self.roster.all_teams().into_iter().collect();
        let sequencer = TeamSequencer::random(all_teams, self.rng.gen())?;
        self.begin(GameMode::Practice, sequencer, None)
    }

    /// Start a daily game against an externally supplied fixed sequence.
    /// An empty sequence is a fault and existing state is left untouched.
    pub fn start_game_with_sequence(&mut self, sequence: Vec<String>) -> Result<(), CoreError> {
        let sequencer = TeamSequencer::fixed(sequence.clone())?;
        self.begin(GameMode::Daily, sequencer, Some(sequence))
    }

    fn begin(
        &mut self,
        mode: GameMode,
        mut sequencer: TeamSequencer,
        team_sequence: Option<Vec<String>>,
    ) -> Result<(), CoreError> {
        let first_team = sequencer.next_team().ok_or(CoreError::EmptyTeamSequence)?;
        let now = current_timestamp();
        let session = Session {
            id: Uuid::new_v4(),
            mode,
            sequencer,
            current_team: Some(first_team),
            picks: Vec::new(),
            used_players: BTreeSet::new(),
            round: 1,
            total_score: 0,
            is_game_over: false,
            pending_help: false,
            team_sequence,
            started_at_ms: now,
            ended_at_ms: None,
            last_updated_ms: now,
        };
        debug!(session_id = %session.id, ?mode, "game started");
        self.session = Some(session);
        Ok(())
    }

    /// Leave `GameOver` (or any state) and immediately begin a fresh
    /// game. Practice sessions restart with a new sequencer; daily
    /// sessions return to `NotStarted` because the next fixed sequence
    /// must come from the external feed.
    pub fn reset_game(&mut self) -> Result<(), CoreError> {
        let mode = self.session.as_ref().map(|s| s.mode);
        self.session = None;
        match mode {
            Some(GameMode::Practice) => self.start_game(),
            _ => Ok(()),
        }
    }

    // ========================
    // Per-round operations
    // ========================

    /// Resolve, validate and record one pick.
    ///
    /// Rejections are normal feedback, not faults; the state is only
    /// mutated on acceptance.
    pub fn submit_pick(&mut self, raw_input: &str) -> SubmitOutcome {
        let in_progress = matches!(&self.session, Some(s) if !s.is_game_over);
        if !in_progress {
            return SubmitOutcome::Rejected(RejectReason::GameNotActive);
        }

        let resolved = NameResolver::new(&self.roster).resolve(raw_input).map(str::to_string);

        let session = self.session.as_mut().expect("checked above");
        let current_team = session.current_team.clone().expect("in-progress game has a team");

        let valid = match validator::validate(
            &self.roster,
            resolved.as_deref(),
            &current_team,
            &session.used_players,
        ) {
            Ok(valid) => valid,
            Err(reason) => {
                debug!(input = raw_input, ?reason, "pick rejected");
                return SubmitOutcome::Rejected(reason);
            }
        };

        let record = self.roster.get(&valid.canonical_name).expect("validated player exists");
        let bonus = self.bonus_trigger.map(|trigger| trigger(record)).unwrap_or(false);
        let points = scaled_stat_value(valid.stat_value, self.difficulty, bonus);

        let pick = Pick {
            canonical_name: valid.canonical_name.clone(),
            display_name: valid.display_name,
            team: current_team,
            stat_value: points,
            used_help: session.pending_help,
        };

        session.picks.push(pick.clone());
        session.used_players.insert(valid.canonical_name);
        session.total_score += u64::from(points);
        session.pending_help = false;
        session.round += 1;
        session.last_updated_ms = current_timestamp();

        let rounds_done = session.picks.len() as u32 >= self.config.rounds_per_game;
        if rounds_done {
            session.current_team = None;
        } else {
            session.current_team = session.sequencer.next_team();
        }
        if session.current_team.is_none() {
            session.is_game_over = true;
            session.ended_at_ms = Some(session.last_updated_ms);
            debug!(session_id = %session.id, score = session.total_score, "game over");
        }

        SubmitOutcome::Accepted { pick, points, game_over: session.is_game_over }
    }

    /// Mark the upcoming pick as help-assisted and surface one eligible,
    /// unused player name as a hint (uniform-random). Returns `None`
    /// outside an active round or when no eligible player remains.
    pub fn use_help(&mut self) -> Option<String> {
        let in_progress = matches!(&self.session, Some(s) if !s.is_game_over);
        if !in_progress {
            return None;
        }
        let session = self.session.as_mut().expect("checked above");
        session.pending_help = true;

        let team = session.current_team.as_deref()?;
        let eligible: Vec<&PlayerRecord> = self
            .roster
            .eligible_for(team)
            .into_iter()
            .filter(|p| !session.used_players.contains(&p.canonical_name))
            .collect();
        eligible.choose(&mut self.rng).map(|p| p.display_name.clone())
    }

    // ========================
    // Reads
    // ========================

    pub fn is_game_over(&self) -> bool {
        self.session.as_ref().map(|s| s.is_game_over).unwrap_or(false)
    }

    pub fn current_team(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.current_team.as_deref())
    }

    pub fn total_score(&self) -> u64 {
        self.session.as_ref().map(|s| s.total_score).unwrap_or(0)
    }

    pub fn round(&self) -> u32 {
        self.session.as_ref().map(|s| s.round).unwrap_or(0)
    }

    pub fn picks(&self) -> &[Pick] {
        self.session.as_ref().map(|s| s.picks.as_slice()).unwrap_or(&[])
    }

    /// Deep-copied serializable state, or `None` before the first start.
    /// Two calls with no intervening mutation return equal snapshots.
    pub fn snapshot(&self) -> Option<GameSnapshot> {
        self.session.as_ref().map(|s| GameSnapshot {
            version: SNAPSHOT_VERSION,
            timestamp: s.last_updated_ms,
            session_id: s.id,
            mode: s.mode,
            difficulty: self.difficulty,
            current_team: s.current_team.clone(),
            picks: s.picks.clone(),
            used_players: s.used_players.clone(),
            round: s.round,
            total_score: s.total_score,
            is_game_over: s.is_game_over,
            pending_help: s.pending_help,
            team_sequence: s.team_sequence.clone(),
            started_at_ms: Some(s.started_at_ms),
            ended_at_ms: s.ended_at_ms,
        })
    }

    /// Rebuild an engine around a previously exported snapshot.
    ///
    /// Daily sessions resume exactly (the fixed sequence travels in the
    /// snapshot). Practice sessions carry no serializable sequencer state
    /// and can only be restored once finished, for comparison display.
    pub fn restore(
        roster: Arc<Roster>,
        config: RoundConfig,
        seed: u64,
        snapshot: GameSnapshot,
    ) -> Result<Self, CoreError> {
        snapshot.validate().map_err(|e| CoreError::InvalidSnapshot(e.to_string()))?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let sequencer = match snapshot.mode {
            GameMode::Daily => {
                let sequence = snapshot.team_sequence.clone().ok_or_else(|| {
                    CoreError::InvalidSnapshot("daily snapshot without team sequence".to_string())
                })?;
                let mut sequencer = TeamSequencer::fixed(sequence.clone())?;
                // Consume the teams already shown: every pick, plus the
                // current slot when the game is still running.
                let consumed =
                    snapshot.picks.len() + usize::from(!snapshot.is_game_over);
                for i in 0..consumed {
                    if sequencer.next_team().is_none() {
                        return Err(CoreError::InvalidSnapshot(format!(
                            "sequence exhausted at slot {}",
                            i
                        )));
                    }
                }
                if !snapshot.is_game_over {
                    let expected = sequence.get(snapshot.picks.len());
                    if expected != snapshot.current_team.as_ref() {
                        return Err(CoreError::InvalidSnapshot(
                            "current team disagrees with sequence position".to_string(),
                        ));
                    }
                }
                sequencer
            }
            GameMode::Practice => {
                if !snapshot.is_game_over {
                    return Err(CoreError::InvalidSnapshot(
                        "practice sessions can only be restored after game over".to_string(),
                    ));
                }
                let all_teams: Vec<String> = roster.all_teams().into_iter().collect();
                TeamSequencer::random(all_teams, rng.gen())?
            }
        };

        let session = Session {
            id: snapshot.session_id,
            mode: snapshot.mode,
            sequencer,
            current_team: snapshot.current_team,
            picks: snapshot.picks,
            used_players: snapshot.used_players,
            round: snapshot.round,
            total_score: snapshot.total_score,
            is_game_over: snapshot.is_game_over,
            pending_help: snapshot.pending_help,
            team_sequence: snapshot.team_sequence,
            started_at_ms: snapshot.started_at_ms.unwrap_or(snapshot.timestamp),
            ended_at_ms: snapshot.ended_at_ms,
            last_updated_ms: snapshot.timestamp,
        };

        Ok(Self {
            roster,
            config,
            difficulty: snapshot.difficulty,
            bonus_trigger: None,
            rng,
            session: Some(session),
        })
    }

    /// Maximum score a perfectly informed player could have reached over
    /// the realized team sequence. Only meaningful after game over.
    pub fn optimal_comparison(&self, time_budget: Duration) -> Result<OptimalResult, CoreError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| CoreError::GameNotOver("game not started".to_string()))?;
        if !session.is_game_over {
            return Err(CoreError::GameNotOver("round still in progress".to_string()));
        }
        let sequence: Vec<String> = session.picks.iter().map(|p| p.team.clone()).collect();
        solver::solve(&sequence, &self.roster, time_budget)
    }
}
