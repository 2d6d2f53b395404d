//! Serializable game snapshot and its binary wire format.
//!
//! The engine exposes and accepts snapshots; the external persistence
//! layer owns when to read and write them. Byte-level encoding is
//! MessagePack with field names, LZ4-compressed, with a SHA-256 checksum
//! trailer, so a host can stash the blob anywhere opaque.

use super::error::SnapshotError;
use crate::models::{Difficulty, GameMode, Pick};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Snapshot format version for migration
pub const SNAPSHOT_VERSION: u32 = 1;

/// Full serializable state of one game session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Snapshot timestamp (unix milliseconds)
    pub timestamp: u64,

    pub session_id: Uuid,
    pub mode: GameMode,
    pub difficulty: Difficulty,

    /// None before start and after game over
    pub current_team: Option<String>,

    /// Insertion order is round order
    pub picks: Vec<Pick>,

    /// Canonical names of every picked player
    pub used_players: BTreeSet<String>,

    /// 1-based; `rounds_per_game + 1` once the game is over
    pub round: u32,

    pub total_score: u64,
    pub is_game_over: bool,

    /// The upcoming pick was marked help-assisted
    pub pending_help: bool,

    /// Daily mode only: the externally supplied fixed sequence, so a
    /// restored session can resume mid-round
    #[serde(default)]
    pub team_sequence: Option<Vec<String>>,

    pub started_at_ms: Option<u64>,
    pub ended_at_ms: Option<u64>,
}

impl GameSnapshot {
    /// Cross-field consistency checks (the invariants of the engine's
    /// state). Run before a snapshot is adopted by `GameEngine::restore`.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let expected_used: BTreeSet<String> =
            self.picks.iter().map(|p| p.canonical_name.clone()).collect();
        if expected_used != self.used_players {
            return Err(SnapshotError::Inconsistent(
                "used_players does not match picks".to_string(),
            ));
        }
        if expected_used.len() != self.picks.len() {
            return Err(SnapshotError::Inconsistent("duplicate player in picks".to_string()));
        }

        let expected_score: u64 = self.picks.iter().map(|p| u64::from(p.stat_value)).sum();
        if expected_score != self.total_score {
            return Err(SnapshotError::Inconsistent(
                "total_score does not match picks".to_string(),
            ));
        }

        if self.is_game_over && self.current_team.is_some() {
            return Err(SnapshotError::Inconsistent(
                "finished game still has a current team".to_string(),
            ));
        }

        if let Some(sequence) = &self.team_sequence {
            if sequence.is_empty() {
                return Err(SnapshotError::Inconsistent("empty team sequence".to_string()));
            }
            if self.picks.len() > sequence.len() {
                return Err(SnapshotError::Inconsistent(
                    "more picks than teams in sequence".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Serialize and compress a snapshot for opaque host-side storage.
pub fn encode_snapshot(snapshot: &GameSnapshot) -> Result<Vec<u8>, SnapshotError> {
    snapshot.validate()?;

    let msgpack = to_vec_named(snapshot)?;
    let compressed = compress_prepend_size(&msgpack);

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);
    Ok(result)
}

/// Decompress and deserialize a snapshot, verifying the checksum trailer.
pub fn decode_snapshot(bytes: &[u8]) -> Result<GameSnapshot, SnapshotError> {
    // header + checksum
    if bytes.len() < 4 + 32 {
        return Err(SnapshotError::Corrupted);
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - 32);

    let mut hasher = Sha256::new();
    hasher.update(payload);
    let calculated = hasher.finalize();
    if &calculated[..] != checksum_bytes {
        return Err(SnapshotError::ChecksumMismatch);
    }

    let msgpack =
        decompress_size_prepended(payload).map_err(|_| SnapshotError::Decompression)?;
    let snapshot: GameSnapshot = from_slice(&msgpack)?;

    if snapshot.version > SNAPSHOT_VERSION {
        return Err(SnapshotError::VersionMismatch {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }

    snapshot.validate()?;
    Ok(snapshot)
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}
