//! Pick validation and score optimization engine.
//!
//! Control flow per submission: [`game::GameEngine::submit_pick`] ->
//! [`resolver::NameResolver::resolve`] -> [`validator::validate`] ->
//! state mutation and [`sequencer::TeamSequencer::next_team`]. After game
//! over, [`solver::solve`] runs once against the realized sequence.

pub mod game;
pub mod resolver;
pub mod sequencer;
pub mod solver;
pub mod validator;

pub use game::{BonusTrigger, GameEngine};
pub use resolver::NameResolver;
pub use sequencer::TeamSequencer;
pub use solver::{solve, OptimalPick, OptimalResult};
pub use validator::{validate, ValidPick};
