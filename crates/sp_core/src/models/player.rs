//! Player records and the read-only roster.
//!
//! The roster is supplied once at engine construction and never mutated
//! afterwards. It is safe to share by reference (or `Arc`) across
//! concurrent solver invocations.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::CoreError;

/// One canonical athlete entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerRecord {
    /// Unique, de-duplicated identifier within the roster
    pub canonical_name: String,

    /// Name shown to the user (may differ in accents/formatting)
    pub display_name: String,

    /// Career statistic the game scores by (wins, sacks, ...)
    pub stat_value: u32,

    /// Teams this player may be picked for
    pub eligible_teams: BTreeSet<String>,

    /// Nicknames and common misspellings accepted by the resolver
    #[serde(default)]
    pub alternate_names: Vec<String>,
}

/// Read-only lookup of canonical players.
///
/// Construction validates every record; a malformed entry aborts the load
/// with [`CoreError::InvalidRoster`] and nothing is partially built.
#[derive(Debug, Clone)]
pub struct Roster {
    players: BTreeMap<String, PlayerRecord>,
    // normalized canonical/alternate name -> canonical name
    name_index: HashMap<String, String>,
}

/// Trim, casefold and collapse inner whitespace.
///
/// All name comparisons in the crate go through this so that roster keys,
/// alternate names and raw user input live in the same space.
pub fn normalize_name(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

impl Roster {
    pub fn new(records: Vec<PlayerRecord>) -> Result<Self, CoreError> {
        if records.is_empty() {
            return Err(CoreError::InvalidRoster("no players".to_string()));
        }

        let mut players = BTreeMap::new();
        let mut name_index = HashMap::new();

        for record in records {
            let canonical = record.canonical_name.clone();
            let normalized = normalize_name(&canonical);
            if normalized.is_empty() {
                return Err(CoreError::InvalidRoster("empty canonical name".to_string()));
            }
            if record.display_name.trim().is_empty() {
                return Err(CoreError::InvalidRoster(format!(
                    "empty display name for '{}'",
                    canonical
                )));
            }
            if record.eligible_teams.is_empty() {
                return Err(CoreError::InvalidRoster(format!(
                    "player '{}' has no eligible teams",
                    canonical
                )));
            }
            if record.eligible_teams.iter().any(|t| t.trim().is_empty()) {
                return Err(CoreError::InvalidRoster(format!(
                    "player '{}' has a blank team entry",
                    canonical
                )));
            }
            if name_index.insert(normalized, canonical.clone()).is_some() {
                return Err(CoreError::InvalidRoster(format!(
                    "duplicate player name '{}'",
                    canonical
                )));
            }
            for alt in &record.alternate_names {
                let alt_normalized = normalize_name(alt);
                if alt_normalized.is_empty() {
                    return Err(CoreError::InvalidRoster(format!(
                        "empty alternate name for '{}'",
                        canonical
                    )));
                }
                // Alternates may repeat within one player but must not
                // collide with a different player's names.
                if let Some(owner) = name_index.get(&alt_normalized) {
                    if *owner != canonical {
                        return Err(CoreError::InvalidRoster(format!(
                            "alternate name '{}' of '{}' collides with '{}'",
                            alt, canonical, owner
                        )));
                    }
                } else {
                    name_index.insert(alt_normalized, canonical.clone());
                }
            }
            players.insert(canonical, record);
        }

        Ok(Self { players, name_index })
    }

    /// Load a roster from the JSON array format used by the embedded data.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let records: Vec<PlayerRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    pub fn get(&self, canonical_name: &str) -> Option<&PlayerRecord> {
        self.players.get(canonical_name)
    }

    /// Exact lookup on a normalized canonical or alternate name.
    pub fn lookup_normalized(&self, normalized: &str) -> Option<&str> {
        self.name_index.get(normalized).map(String::as_str)
    }

    /// Iterate players in canonical-name order (deterministic).
    pub fn players(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.values()
    }

    /// Normalized name index entries: (normalized name, canonical name).
    pub fn indexed_names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.name_index.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Union of every player's eligible teams.
    pub fn all_teams(&self) -> BTreeSet<String> {
        self.players.values().flat_map(|p| p.eligible_teams.iter().cloned()).collect()
    }

    /// Players eligible for `team`, in canonical-name order.
    pub fn eligible_for(&self, team: &str) -> Vec<&PlayerRecord> {
        self.players.values().filter(|p| p.eligible_teams.contains(team)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, stat: u32, teams: &[&str]) -> PlayerRecord {
        PlayerRecord {
            canonical_name: name.to_string(),
            display_name: name.to_string(),
            stat_value: stat,
            eligible_teams: teams.iter().map(|t| t.to_string()).collect(),
            alternate_names: Vec::new(),
        }
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Tom   Brady "), "tom brady");
        assert_eq!(normalize_name("TOM BRADY"), "tom brady");
    }

    #[test]
    fn test_roster_build_and_lookup() {
        let roster = Roster::new(vec![
            record("Tom Brady", 251, &["Patriots", "Buccaneers"]),
            record("Peyton Manning", 186, &["Colts", "Broncos"]),
        ])
        .unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.lookup_normalized("tom brady"), Some("Tom Brady"));
        assert_eq!(roster.get("Tom Brady").unwrap().stat_value, 251);
        assert!(roster.all_teams().contains("Broncos"));
        assert_eq!(roster.eligible_for("Patriots").len(), 1);
    }

    #[test]
    fn test_alternate_names_indexed() {
        let mut brady = record("Tom Brady", 251, &["Patriots"]);
        brady.alternate_names.push("TB12".to_string());
        let roster = Roster::new(vec![brady]).unwrap();

        assert_eq!(roster.lookup_normalized("tb12"), Some("Tom Brady"));
    }

    #[test]
    fn test_duplicate_canonical_rejected() {
        let result = Roster::new(vec![
            record("Tom Brady", 251, &["Patriots"]),
            record("tom  BRADY", 1, &["Jets"]),
        ]);
        assert!(matches!(result, Err(CoreError::InvalidRoster(_))));
    }

    #[test]
    fn test_player_without_teams_rejected() {
        let result = Roster::new(vec![record("Nobody", 0, &[])]);
        assert!(matches!(result, Err(CoreError::InvalidRoster(_))));
    }

    #[test]
    fn test_alternate_collision_rejected() {
        let mut manning = record("Peyton Manning", 186, &["Colts"]);
        manning.alternate_names.push("Tom Brady".to_string());
        let result = Roster::new(vec![record("Tom Brady", 251, &["Patriots"]), manning]);
        assert!(matches!(result, Err(CoreError::InvalidRoster(_))));
    }
}
