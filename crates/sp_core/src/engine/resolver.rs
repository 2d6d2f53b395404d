//! Fuzzy name resolution.
//!
//! Maps free-text user input onto a canonical roster entry. Exact
//! case-insensitive matches (canonical or alternate name) win
//! immediately; otherwise a bounded Damerau-Levenshtein search accepts
//! the closest name only when it is within threshold and the minimum is
//! unique. Absence of a match is a normal outcome, never an error.

use strsim::damerau_levenshtein;

use crate::models::{normalize_name, Roster};

/// Maximum accepted edit distance: one edit per this many input chars.
/// Inputs shorter than the divisor only match exactly.
const FUZZY_CHARS_PER_EDIT: usize = 4;

pub struct NameResolver<'a> {
    roster: &'a Roster,
}

impl<'a> NameResolver<'a> {
    pub fn new(roster: &'a Roster) -> Self {
        Self { roster }
    }

    /// Resolve raw input to a canonical name.
    ///
    /// Deterministic for a fixed roster and input; side-effect free.
    pub fn resolve(&self, input: &str) -> Option<&'a str> {
        let normalized = normalize_name(input);
        if normalized.is_empty() {
            return None;
        }

        if let Some(canonical) = self.roster.lookup_normalized(&normalized) {
            return Some(canonical);
        }

        let max_distance = normalized.chars().count() / FUZZY_CHARS_PER_EDIT;
        if max_distance == 0 {
            return None;
        }

        let mut best_distance = max_distance + 1;
        let mut best_canonical: Option<&str> = None;
        let mut ambiguous = false;

        for (candidate, canonical) in self.roster.indexed_names() {
            let distance = damerau_levenshtein(&normalized, candidate);
            if distance < best_distance {
                best_distance = distance;
                best_canonical = Some(canonical);
                ambiguous = false;
            } else if distance == best_distance {
                // Two names of the same player tying is fine; two
                // different players at the minimum is ambiguous.
                if best_canonical != Some(canonical) {
                    ambiguous = true;
                }
            }
        }

        if ambiguous || best_distance > max_distance {
            return None;
        }
        best_canonical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerRecord;

    fn roster() -> Roster {
        let records = vec![
            PlayerRecord {
                canonical_name: "Tom Brady".to_string(),
                display_name: "Tom Brady".to_string(),
                stat_value: 251,
                eligible_teams: ["Patriots".to_string()].into(),
                alternate_names: vec!["TB12".to_string()],
            },
            PlayerRecord {
                canonical_name: "Peyton Manning".to_string(),
                display_name: "Peyton Manning".to_string(),
                stat_value: 186,
                eligible_teams: ["Colts".to_string()].into(),
                alternate_names: Vec::new(),
            },
            PlayerRecord {
                canonical_name: "Eli Manning".to_string(),
                display_name: "Eli Manning".to_string(),
                stat_value: 117,
                eligible_teams: ["Giants".to_string()].into(),
                alternate_names: Vec::new(),
            },
        ];
        Roster::new(records).unwrap()
    }

    #[test]
    fn test_exact_match_case_insensitive() {
        let roster = roster();
        let resolver = NameResolver::new(&roster);
        assert_eq!(resolver.resolve("Tom Brady"), Some("Tom Brady"));
        assert_eq!(resolver.resolve("tom brady"), Some("Tom Brady"));
        assert_eq!(resolver.resolve("  TOM   BRADY  "), Some("Tom Brady"));
    }

    #[test]
    fn test_alternate_name_match() {
        let roster = roster();
        let resolver = NameResolver::new(&roster);
        assert_eq!(resolver.resolve("tb12"), Some("Tom Brady"));
    }

    #[test]
    fn test_fuzzy_within_threshold() {
        let roster = roster();
        let resolver = NameResolver::new(&roster);
        // "tom bradey": 10 chars, threshold 2, distance 1
        assert_eq!(resolver.resolve("tom bradey"), Some("Tom Brady"));
        // transposition counts as one edit
        assert_eq!(resolver.resolve("tom brayd"), Some("Tom Brady"));
    }

    #[test]
    fn test_no_close_match_returns_none() {
        let roster = roster();
        let resolver = NameResolver::new(&roster);
        assert_eq!(resolver.resolve("Xyzzy Quux"), None);
        assert_eq!(resolver.resolve(""), None);
        assert_eq!(resolver.resolve("   "), None);
    }

    #[test]
    fn test_short_input_requires_exact() {
        let roster = roster();
        let resolver = NameResolver::new(&roster);
        // 3 chars: threshold is 0, so near-misses of "TB12" are rejected
        assert_eq!(resolver.resolve("tb1"), None);
    }

    #[test]
    fn test_unique_minimum_still_resolves() {
        let roster = roster();
        let resolver = NameResolver::new(&roster);
        // "xyi manning" is distance 2 from "eli manning" and much further
        // from "peyton manning": the minimum is unique, so it resolves.
        assert_eq!(resolver.resolve("xyi manning"), Some("Eli Manning"));
    }

    #[test]
    fn test_tie_at_minimum_rejected_as_ambiguous() {
        let records = vec![
            PlayerRecord {
                canonical_name: "Peyton Manning".to_string(),
                display_name: "Peyton Manning".to_string(),
                stat_value: 186,
                eligible_teams: ["Colts".to_string()].into(),
                alternate_names: Vec::new(),
            },
            PlayerRecord {
                canonical_name: "Peyton Hanning".to_string(),
                display_name: "Peyton Hanning".to_string(),
                stat_value: 12,
                eligible_teams: ["Jets".to_string()].into(),
                alternate_names: Vec::new(),
            },
        ];
        let roster = Roster::new(records).unwrap();
        let resolver = NameResolver::new(&roster);

        // One substitution away from both players: the minimum distance
        // is shared by two different canonical names, so the input is
        // ambiguous and must not resolve.
        assert_eq!(resolver.resolve("peyton janning"), None);
        // A one-edit input closer to a single player still resolves.
        assert_eq!(resolver.resolve("peyton mannin"), Some("Peyton Manning"));
    }
}
