//! Embedded sample data.
//!
//! A small quarterback career-wins roster is compiled into the binary via
//! `include_str!`, so demos and tests run without any file I/O. The
//! engine itself stays data-set agnostic; hosts normally inject their own
//! roster at construction.

use once_cell::sync::Lazy;

use crate::models::Roster;

/// Quarterback career-wins sample roster (~2KB)
pub const SAMPLE_ROSTER_JSON: &str = include_str!("../../data/sample_roster.json");

static SAMPLE_ROSTER: Lazy<Roster> =
    Lazy::new(|| Roster::from_json(SAMPLE_ROSTER_JSON).expect("embedded roster is valid"));

/// Parsed sample roster, built on first access.
///
/// The embedded JSON is validated by tests, so a parse failure here is a
/// packaging bug.
pub fn sample_roster() -> &'static Roster {
    &SAMPLE_ROSTER
}
