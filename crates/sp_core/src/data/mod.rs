//! Embedded game data.

pub mod embedded;

pub use embedded::{sample_roster, SAMPLE_ROSTER_JSON};
