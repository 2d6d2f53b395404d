use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("decompression error")]
    Decompression,

    #[error("corrupted data")]
    Corrupted,

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("inconsistent snapshot: {0}")]
    Inconsistent(String),
}
