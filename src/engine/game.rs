//! Game rules: move legality, round resolution, termination.
//!
//! ## Move application
//!
//! A move is a single side's troop commitment for the current round. The
//! first commitment of a round opens it; the second resolves it (strictly
//! more troops wins, equal ties). Resolution order between the two sides
//! is irrelevant here: commitments are keyed by side, not by arrival
//! order, so applying the same two moves in either sequence produces the
//! identical round record.
//!
//! ## Termination
//!
//! Evaluated after every round resolution, in order:
//! 1. round-win margin reached `victory_margin`
//! 2. both pools exactly 0
//! 3. the resolved round's number exceeded `max_rounds`
//!
//! All three award the game to the side with more round wins, or declare
//! a tie. The round counter only advances when the game continues.

use chrono::Utc;
use thiserror::Error;

use crate::core::{
    GameConfig, GameId, GameState, GameStatus, Outcome, PlayerId, PlayerIdentity, Round, Side,
};

/// Why a move was rejected. Nothing is mutated on rejection.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The game is not accepting moves (not started, or already finished).
    #[error("game is not in progress")]
    NotPlaying,

    /// The id does not belong to either seat.
    #[error("player {0} is not part of this game")]
    UnknownPlayer(PlayerId),

    /// Commitment exceeds the remaining pool (and the pool is nonzero;
    /// a depleted player's commitment clamps to 0 instead).
    #[error("committed {requested} troops but only {available} remain")]
    InsufficientTroops { requested: u32, available: u32 },

    /// This side already committed for the open round; the original
    /// commitment stands.
    #[error("already committed for round {round}")]
    AlreadyCommitted { round: u32 },
}

/// Receipt for an accepted move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    /// The seat the move was applied to.
    pub side: Side,
    /// Troops actually deducted (0 for a depleted player, whatever they
    /// asked for).
    pub committed: u32,
    /// The completed round record, when this move was the second of the
    /// round and resolved it.
    pub resolved: Option<Round>,
}

/// The Sequential Blotto state machine.
///
/// Holds one game's [`GameState`] plus its immutable [`GameConfig`] and
/// enforces every rule. Instances are cheap to build from a snapshot
/// ([`BlottoEngine::resume`]) and are treated as disposable by the
/// multiplayer layer; the snapshot is the authority.
#[derive(Clone, Debug)]
pub struct BlottoEngine {
    state: GameState,
    config: GameConfig,
}

impl BlottoEngine {
    /// Create a new game in `Waiting` status.
    ///
    /// Both players start with `config.starting_troops` and zero round
    /// wins; the history is empty and `current_round` is 1.
    #[must_use]
    pub fn new(
        id: GameId,
        player1: PlayerIdentity,
        player2: PlayerIdentity,
        config: GameConfig,
    ) -> Self {
        assert!(config.starting_troops > 0, "starting_troops must be positive");
        assert!(config.victory_margin > 0, "victory_margin must be positive");
        assert!(config.max_rounds > 0, "max_rounds must be positive");

        Self {
            state: GameState::new(id, player1, player2, &config),
            config,
        }
    }

    /// Rehydrate an engine from a deserialized snapshot.
    ///
    /// The state is adopted verbatim, timestamps, history and open round
    /// included, so an engine resumed from storage behaves identically to
    /// the instance that produced the snapshot.
    #[must_use]
    pub fn resume(state: GameState, config: GameConfig) -> Self {
        Self { state, config }
    }

    /// Replace the state wholesale from a snapshot.
    ///
    /// Used when an instance is reused across requests: the snapshot
    /// store is the authority, so a kept-alive engine must adopt the
    /// latest snapshot before it is trusted again.
    pub fn restore(&mut self, state: GameState) {
        self.state = state;
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Consume the engine, yielding the state (e.g. to snapshot it).
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// The game's configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Transition `Waiting → Playing`. No-op in any other status.
    pub fn start(&mut self) {
        if self.state.status == GameStatus::Waiting {
            self.state.status = GameStatus::Playing;
            self.state.updated_at = Utc::now();
        }
    }

    /// Whether a move from this id could currently be accepted at all.
    ///
    /// True iff the game is `Playing` and the id is seated. Does not look
    /// at the open round; a side that already committed discovers that via
    /// [`MoveError::AlreadyCommitted`].
    #[must_use]
    pub fn can_move(&self, player: &PlayerId) -> bool {
        self.state.status == GameStatus::Playing && self.state.side_of(player).is_some()
    }

    /// Apply one player's troop commitment for the current round.
    ///
    /// On acceptance the pool is debited by the (possibly clamped)
    /// commitment and the round record updated; when this was the second
    /// commitment the round resolves, round wins update, termination is
    /// evaluated, and the round counter advances unless the game just
    /// finished.
    pub fn apply_move(&mut self, player: &PlayerId, troops: u32) -> Result<Applied, MoveError> {
        if self.state.status != GameStatus::Playing {
            return Err(MoveError::NotPlaying);
        }
        let side = self
            .state
            .side_of(player)
            .ok_or_else(|| MoveError::UnknownPlayer(player.clone()))?;

        let pool = self.state.player(side).troops;
        let committed = if pool == 0 {
            // A depleted player still participates, at zero strength.
            0
        } else if troops > pool {
            return Err(MoveError::InsufficientTroops {
                requested: troops,
                available: pool,
            });
        } else {
            troops
        };

        if let Some(open) = self.state.open_round() {
            if open.commitment(side).is_some() {
                return Err(MoveError::AlreadyCommitted {
                    round: open.round_number,
                });
            }
        }

        // Accepted. Everything below must leave the state consistent.
        let now = Utc::now();
        self.state.player_mut(side).troops -= committed;

        let resolved = match self.state.open_round_mut() {
            Some(open) => {
                open.set_commitment(side, committed);
                open.resolve();
                Some(open.clone())
            }
            None => {
                let number = self.state.current_round;
                self.state
                    .rounds
                    .push_back(Round::opened(number, side, committed, now));
                None
            }
        };

        if let Some(round) = &resolved {
            if let Some(winner) = round.winner.and_then(Outcome::winning_side) {
                self.state.player_mut(winner).round_wins += 1;
            }
            self.check_game_end();
            if self.state.status != GameStatus::Finished {
                self.state.current_round += 1;
            }
        }
        self.state.updated_at = now;

        Ok(Applied {
            side,
            committed,
            resolved,
        })
    }

    /// Termination evaluation; runs after every round resolution.
    ///
    /// `current_round` still names the round that just resolved when this
    /// runs, which is what the round-cap comparison relies on.
    fn check_game_end(&mut self) {
        let (w1, w2) = self.state.round_wins();
        let margin_met = w1.abs_diff(w2) >= self.config.victory_margin;
        let depleted = self.state.player1.troops == 0 && self.state.player2.troops == 0;
        let capped = self.state.current_round > self.config.max_rounds;

        if margin_met || depleted || capped {
            self.state.status = GameStatus::Finished;
            self.state.winner = Some(Outcome::from_side(self.state.round_win_leader()));
        }
    }
}
