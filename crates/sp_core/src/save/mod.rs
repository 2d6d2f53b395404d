//! Persistence boundary.
//!
//! The engine performs no I/O; it hands out [`GameSnapshot`] values and
//! accepts them back. [`encode_snapshot`]/[`decode_snapshot`] give hosts
//! a compact, checksummed byte format to store wherever they like.

pub mod error;
pub mod format;

pub use error::SnapshotError;
pub use format::{
    current_timestamp, decode_snapshot, encode_snapshot, GameSnapshot, SNAPSHOT_VERSION,
};
