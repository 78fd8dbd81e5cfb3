//! Player identity and per-seat player records.
//!
//! Identities are opaque strings handed in by the surrounding application
//! (an auth system in practice), never interpreted by the engine. The
//! engine maps identities onto [`Side`](super::Side)s at game creation and
//! from then on only compares them for equality.

use serde::{Deserialize, Serialize};

/// Opaque external player identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Opaque game identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Create a new game ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque room identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Create a new room ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A player's pre-game identity: who they are, before any troops exist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerIdentity {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub is_bot: bool,
}

impl PlayerIdentity {
    /// A human player.
    #[must_use]
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_bot: false,
        }
    }

    /// A bot-controlled player.
    #[must_use]
    pub fn bot(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_bot: true,
        }
    }
}

/// A seated player: identity plus in-game resources.
///
/// Owned exclusively by the `GameState` that contains it. `troops` only
/// ever decreases (by exactly the committed amount of each accepted move);
/// `round_wins` only ever increases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Remaining deployable troops.
    pub troops: u32,
    /// Rounds won so far.
    pub round_wins: u32,
    /// Bot-controlled seat. Defaults to false so records written before
    /// the flag existed still deserialize.
    #[serde(default)]
    pub is_bot: bool,
}

impl Player {
    /// Seat an identity with a full troop pool.
    #[must_use]
    pub fn seat(identity: PlayerIdentity, starting_troops: u32) -> Self {
        Self {
            id: identity.id,
            name: identity.name,
            troops: starting_troops,
            round_wins: 0,
            is_bot: identity.is_bot,
        }
    }

    /// The identity portion of this player.
    #[must_use]
    pub fn identity(&self) -> PlayerIdentity {
        PlayerIdentity {
            id: self.id.clone(),
            name: self.name.clone(),
            is_bot: self.is_bot,
        }
    }
}
