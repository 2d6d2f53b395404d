//! # sp_core - Pick Validation & Score Optimization Engine
//!
//! Core engine for stat-streak quiz games: a player is shown a sequence
//! of teams and must name an eligible athlete for each, scored by a
//! career statistic. This crate resolves fuzzy input to canonical roster
//! entries, judges pick legality, drives the round state machine and
//! computes the maximum score a perfectly informed player could have
//! reached over a finished sequence.
//!
//! ## Features
//! - Deterministic sessions (same seed + inputs = same game)
//! - Exact optimal-score solving with a wall-clock budget and a greedy,
//!   flagged fallback
//! - Serializable snapshots; the engine itself performs no I/O
//! - JSON API for non-Rust hosts
//!
//! Presentation, network fetch of daily challenges and storage all live
//! outside this crate; it is called synchronously and returns plain data.

pub mod api;
pub mod data;
pub mod engine;
pub mod error;
pub mod models;
pub mod save;

// Re-export main API functions
pub use api::{resolve_player_json, solve_optimal_json, ApiResponse};
pub use error::{CoreError, Result};

// Re-export engine types
pub use engine::{
    BonusTrigger, GameEngine, NameResolver, OptimalPick, OptimalResult, TeamSequencer,
};

// Re-export model types
pub use models::{
    scaled_stat_value, Difficulty, GameMode, Pick, PlayerRecord, RejectReason, RoundConfig, Roster,
    SubmitOutcome,
};

// Re-export snapshot system
pub use save::{decode_snapshot, encode_snapshot, GameSnapshot, SnapshotError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
