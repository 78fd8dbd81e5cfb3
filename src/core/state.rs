//! Complete game state.
//!
//! ## GameState
//!
//! The full serializable position of one game:
//! - Both seated players (pools, win counts)
//! - The append-only round history, open round last
//! - Status, winner, and the fixed starting-troops parameter
//! - Creation/update timestamps
//!
//! `GameState` is a value object: the engine mutates it only through
//! [`apply_move`](crate::engine::BlottoEngine::apply_move), and a
//! serialized copy (a *snapshot*) is sufficient to resume play with no
//! other context. Round history uses `im::Vector` so snapshots and cached
//! engine instances clone in O(1).
//!
//! ## Invariants
//!
//! - `current_round == rounds.len()` while that round is open;
//!   `current_round == rounds.len() + 1` after it resolves (until the
//!   game finishes).
//! - Troop pools strictly decrease by the committed amount, never below 0.
//! - Once `status` is `Finished`, winner and history are immutable.

use chrono::{DateTime, Utc};
use im::Vector;
use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::player::{GameId, Player, PlayerId, PlayerIdentity};
use super::round::{Outcome, Round};
use super::side::Side;

/// Lifecycle of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Created, not yet started.
    Waiting,
    /// Accepting moves.
    Playing,
    /// Terminated; no further moves.
    Finished,
}

/// The complete, serializable state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub id: GameId,
    pub player1: Player,
    pub player2: Player,

    /// The round currently awaiting completion (1-based).
    pub current_round: u32,

    /// Round history, append-only. The open round, when one exists, is
    /// the last element.
    pub rounds: Vector<Round>,

    pub status: GameStatus,

    /// `None` until the game finishes; `Some(Tie)` for a drawn finish.
    pub winner: Option<Outcome>,

    /// Immutable game parameter, recorded for replay.
    pub starting_troops: u32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameState {
    /// Create a fresh game in `Waiting` status with full pools.
    #[must_use]
    pub fn new(
        id: GameId,
        player1: PlayerIdentity,
        player2: PlayerIdentity,
        config: &GameConfig,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            player1: Player::seat(player1, config.starting_troops),
            player2: Player::seat(player2, config.starting_troops),
            current_round: 1,
            rounds: Vector::new(),
            status: GameStatus::Waiting,
            winner: None,
            starting_troops: config.starting_troops,
            created_at: now,
            updated_at: now,
        }
    }

    /// The player seated on a side.
    #[must_use]
    pub fn player(&self, side: Side) -> &Player {
        match side {
            Side::Player1 => &self.player1,
            Side::Player2 => &self.player2,
        }
    }

    /// Mutable access to the player seated on a side.
    pub fn player_mut(&mut self, side: Side) -> &mut Player {
        match side {
            Side::Player1 => &mut self.player1,
            Side::Player2 => &mut self.player2,
        }
    }

    /// Which side an external identity is seated on, if any.
    #[must_use]
    pub fn side_of(&self, id: &PlayerId) -> Option<Side> {
        if self.player1.id == *id {
            Some(Side::Player1)
        } else if self.player2.id == *id {
            Some(Side::Player2)
        } else {
            None
        }
    }

    /// The round record for a 1-based round number.
    #[must_use]
    pub fn round(&self, round_number: u32) -> Option<&Round> {
        round_number
            .checked_sub(1)
            .and_then(|i| self.rounds.get(i as usize))
    }

    /// The in-progress round, if one side has already committed.
    #[must_use]
    pub fn open_round(&self) -> Option<&Round> {
        self.rounds.back().filter(|r| r.is_open())
    }

    /// Mutable access to the in-progress round.
    pub fn open_round_mut(&mut self) -> Option<&mut Round> {
        let last = self.rounds.len().checked_sub(1)?;
        self.rounds.get_mut(last).filter(|r| r.is_open())
    }

    /// Whether the game has terminated.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    /// Both sides' round-win counts as `(player1, player2)`.
    #[must_use]
    pub fn round_wins(&self) -> (u32, u32) {
        (self.player1.round_wins, self.player2.round_wins)
    }

    /// The side currently leading on round wins, if either is.
    #[must_use]
    pub fn round_win_leader(&self) -> Option<Side> {
        match self.player1.round_wins.cmp(&self.player2.round_wins) {
            std::cmp::Ordering::Greater => Some(Side::Player1),
            std::cmp::Ordering::Less => Some(Side::Player2),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Total troops a side committed across the recorded history.
    ///
    /// Used for cumulative player statistics when a game finishes.
    #[must_use]
    pub fn total_committed(&self, side: Side) -> u32 {
        self.rounds
            .iter()
            .filter_map(|r| r.commitment(side))
            .sum()
    }
}
