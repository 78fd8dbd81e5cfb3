//! Snapshot encoding.
//!
//! A snapshot is a complete serialized [`GameState`], sufficient to
//! resume play with no other context. Two encodings:
//!
//! - **JSON**: the wire/storage form. Field names are camelCase, enums
//!   are lowercase strings, timestamps are ISO-8601. This is the format
//!   persisted per room and embedded in historical game records, so round
//!   history survives verbatim for audit and replay.
//! - **bincode**: compact binary, for at-rest storage where the record
//!   is opaque anyway.
//!
//! Engine instances never persist across requests; reconstruction from a
//! snapshot is the normal path, not the exception.

use thiserror::Error;

use crate::core::GameState;

/// Snapshot encode/decode failure.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot binary error: {0}")]
    Binary(#[from] bincode::Error),
}

/// Encode a state as the canonical JSON wire form.
pub fn to_json(state: &GameState) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(state)?)
}

/// Decode a state from the JSON wire form.
pub fn from_json(json: &str) -> Result<GameState, SnapshotError> {
    Ok(serde_json::from_str(json)?)
}

/// Encode a state as compact binary.
pub fn to_bytes(state: &GameState) -> Result<Vec<u8>, SnapshotError> {
    Ok(bincode::serialize(state)?)
}

/// Decode a state from compact binary.
pub fn from_bytes(bytes: &[u8]) -> Result<GameState, SnapshotError> {
    Ok(bincode::deserialize(bytes)?)
}
