//! Durable-store seams and the records that cross them.
//!
//! The reconciler never talks to a database directly; it talks to three
//! narrow traits. Deployments implement them over whatever storage they
//! have (the reference [`MemoryStore`](super::MemoryStore) keeps
//! everything in process). Two trait obligations carry the concurrency
//! design:
//!
//! - [`MoveLog::append`] must enforce a unique `(room, player, round)`
//!   key, the way a relational unique constraint would. This is what
//!   makes duplicate submissions lose even when two requests interleave
//!   between check and insert.
//! - [`RoomStore::try_mark_resolved`] must be an atomic compare-and-swap:
//!   exactly one caller per `(room, round)` may ever see `true`. This is
//!   what collapses concurrent "both players have moved" observations
//!   into a single round resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::core::{
    GameConfig, GameState, GameStatus, Outcome, PlayerId, PlayerIdentity, Round, RoomId, Side,
};

/// Storage failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// A unique-key insert lost to an existing row.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// One player's logged submission for one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub round_number: u32,
    pub troops: u32,
    pub submitted_at: DateTime<Utc>,
}

/// Per-round status marker for a room.
///
/// The single-mover states exist for turn indicators only; the move log
/// and snapshot are the authoritative record of who has moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    Waiting,
    Player1Moved,
    Player2Moved,
    Resolved,
}

impl RoundStatus {
    /// The marker for a round where only `side` has moved.
    #[must_use]
    pub const fn single_mover(side: Side) -> Self {
        match side {
            Side::Player1 => RoundStatus::Player1Moved,
            Side::Player2 => RoundStatus::Player2Moved,
        }
    }
}

/// The durable face of a multiplayer room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    pub id: RoomId,
    /// Short join code players type to enter the room.
    pub code: String,
    pub player1: PlayerIdentity,
    /// Empty until a second player joins.
    pub player2: Option<PlayerIdentity>,
    pub config: GameConfig,
    pub status: GameStatus,
    pub current_round: u32,
    pub round_status: RoundStatus,
    /// The last-persisted game snapshot; the sole authority on game
    /// state. `None` until the room starts.
    pub snapshot: Option<GameState>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How a recorded game was played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Single,
    Multiplayer,
}

/// Immutable historical record of a finished game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub player1: PlayerIdentity,
    pub player2: PlayerIdentity,
    pub starting_troops: u32,
    /// `Some(Tie)` for a drawn finish; never `None` for a finished game.
    pub winner: Option<Outcome>,
    /// Full round history, verbatim, for audit and replay.
    pub rounds: Vec<Round>,
    pub game_type: GameType,
    pub created_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl GameRecord {
    /// Build the historical record for a finished game.
    #[must_use]
    pub fn from_state(state: &GameState, game_type: GameType) -> Self {
        Self {
            player1: state.player1.identity(),
            player2: state.player2.identity(),
            starting_troops: state.starting_troops,
            winner: state.winner,
            rounds: state.rounds.iter().cloned().collect(),
            game_type,
            created_at: state.created_at,
            finished_at: state.updated_at,
        }
    }
}

/// Cumulative per-player statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub games_played: u32,
    pub games_won: u32,
    pub total_rounds_won: u32,
    pub total_troops_deployed: u64,
    pub updated_at: DateTime<Utc>,
}

impl PlayerStats {
    /// Zeroed stats for a player's first recorded game.
    #[must_use]
    pub fn empty(at: DateTime<Utc>) -> Self {
        Self {
            games_played: 0,
            games_won: 0,
            total_rounds_won: 0,
            total_troops_deployed: 0,
            updated_at: at,
        }
    }

    /// Fold one finished game into the running totals.
    pub fn accumulate(&mut self, delta: &StatsDelta, at: DateTime<Utc>) {
        self.games_played += 1;
        if delta.won {
            self.games_won += 1;
        }
        self.total_rounds_won += delta.rounds_won;
        self.total_troops_deployed += u64::from(delta.troops_deployed);
        self.updated_at = at;
    }
}

/// One finished game's contribution to a player's statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatsDelta {
    pub won: bool,
    pub rounds_won: u32,
    /// Sum of the player's committed troops across the game's rounds.
    pub troops_deployed: u32,
}

impl StatsDelta {
    /// The delta a finished game contributes for one side.
    #[must_use]
    pub fn for_side(state: &GameState, side: Side) -> Self {
        Self {
            won: state.winner.is_some_and(|o| o.is_winner(side)),
            rounds_won: state.player(side).round_wins,
            troops_deployed: state.total_committed(side),
        }
    }
}

/// Append-only log of individual player submissions.
pub trait MoveLog {
    /// Append a move; `StoreError::DuplicateKey` if a move already exists
    /// for this `(room, player, round)`.
    fn append(&self, record: MoveRecord) -> Result<(), StoreError>;

    /// All logged moves for a round (at most two).
    fn round_moves(
        &self,
        room: &RoomId,
        round: u32,
    ) -> Result<SmallVec<[MoveRecord; 2]>, StoreError>;

    /// Whether a player has a logged move for a round.
    fn has_move(&self, room: &RoomId, player: &PlayerId, round: u32) -> Result<bool, StoreError>;
}

/// Room persistence: records plus the per-round resolution guard.
pub trait RoomStore {
    fn create_room(&self, room: RoomRecord) -> Result<(), StoreError>;

    fn load_room(&self, id: &RoomId) -> Result<RoomRecord, StoreError>;

    fn find_by_code(&self, code: &str) -> Result<RoomRecord, StoreError>;

    fn update_room(&self, room: &RoomRecord) -> Result<(), StoreError>;

    /// Write the advisory turn marker for a round, touching nothing else.
    ///
    /// Must be a no-op once the room has moved past `round`: a marker
    /// write that lost a race with that round's resolution may not
    /// regress the resolved record.
    fn set_round_status(
        &self,
        id: &RoomId,
        round: u32,
        status: RoundStatus,
    ) -> Result<(), StoreError>;

    /// Atomically claim the right to resolve a round. Returns `true` for
    /// exactly one caller per `(room, round)`; every later caller gets
    /// `false`.
    fn try_mark_resolved(&self, id: &RoomId, round: u32) -> Result<bool, StoreError>;
}

/// Historical results and cumulative statistics.
pub trait RecordStore {
    fn insert_record(&self, record: GameRecord) -> Result<(), StoreError>;

    /// Upsert-accumulate one finished game into a player's stats.
    fn apply_stats(&self, player: &PlayerId, delta: &StatsDelta) -> Result<(), StoreError>;

    fn load_stats(&self, player: &PlayerId) -> Result<Option<PlayerStats>, StoreError>;
}
