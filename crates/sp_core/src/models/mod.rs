//! Core data model: players, roster, configuration and pick records.

pub mod config;
pub mod pick;
pub mod player;

pub use config::{scaled_stat_value, Difficulty, GameMode, RoundConfig};
pub use pick::{Pick, RejectReason, SubmitOutcome};
pub use player::{normalize_name, PlayerRecord, Roster};
