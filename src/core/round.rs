//! Round records and outcomes.
//!
//! ## Commitments are explicit, not positional
//!
//! An in-progress round keeps an optional commitment per side. `None`
//! means "this side has not moved yet" and is distinct from a committed
//! zero, so a snapshot taken mid-round reconstructs to exactly the same
//! position regardless of which side moved first or how little it
//! committed.
//!
//! A round is open while `winner` is `None`. Once both commitments are
//! present the round resolves and becomes immutable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::side::Side;

/// Winner designation for a round, or (inside `Option`) a whole game.
///
/// `Tie` is a genuine result: equal commitments consume troops on both
/// sides and increment neither win counter, and a game that ends with
/// level win counts stays a tie with no further tiebreak.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Player1,
    Player2,
    Tie,
}

impl Outcome {
    /// The winning side, if there is one.
    #[must_use]
    pub const fn winning_side(self) -> Option<Side> {
        match self {
            Outcome::Player1 => Some(Side::Player1),
            Outcome::Player2 => Some(Side::Player2),
            Outcome::Tie => None,
        }
    }

    /// Check whether a side won.
    #[must_use]
    pub fn is_winner(self, side: Side) -> bool {
        self.winning_side() == Some(side)
    }

    /// Outcome for a side, `Tie` for `None`.
    #[must_use]
    pub const fn from_side(side: Option<Side>) -> Self {
        match side {
            Some(Side::Player1) => Outcome::Player1,
            Some(Side::Player2) => Outcome::Player2,
            None => Outcome::Tie,
        }
    }
}

/// One exchange of troop commitments.
///
/// Appended to the game's round history when the first commitment of the
/// round arrives; frozen when the second one resolves it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// 1-based, strictly increasing, contiguous.
    pub round_number: u32,

    /// Player 1's committed troops; `None` until player 1 moves.
    pub player1_troops: Option<u32>,

    /// Player 2's committed troops; `None` until player 2 moves.
    pub player2_troops: Option<u32>,

    /// `None` while the round is open.
    pub winner: Option<Outcome>,

    /// When the round opened (first commitment).
    pub timestamp: DateTime<Utc>,
}

impl Round {
    /// Open a new round with one side's commitment.
    #[must_use]
    pub fn opened(round_number: u32, side: Side, troops: u32, at: DateTime<Utc>) -> Self {
        let mut round = Self {
            round_number,
            player1_troops: None,
            player2_troops: None,
            winner: None,
            timestamp: at,
        };
        round.set_commitment(side, troops);
        round
    }

    /// A side's commitment, if it has moved.
    #[must_use]
    pub fn commitment(&self, side: Side) -> Option<u32> {
        match side {
            Side::Player1 => self.player1_troops,
            Side::Player2 => self.player2_troops,
        }
    }

    /// Record a side's commitment. Overwriting is the caller's bug; the
    /// engine rejects duplicate commitments before calling this.
    pub fn set_commitment(&mut self, side: Side, troops: u32) {
        match side {
            Side::Player1 => self.player1_troops = Some(troops),
            Side::Player2 => self.player2_troops = Some(troops),
        }
    }

    /// Whether this round is still awaiting a commitment or resolution.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.winner.is_none()
    }

    /// Whether both sides have committed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.player1_troops.is_some() && self.player2_troops.is_some()
    }

    /// Resolve the round once both commitments are present.
    ///
    /// Strictly more troops wins; equal commitments tie. Returns `None`
    /// (and changes nothing) if a commitment is still missing or the round
    /// already resolved.
    pub fn resolve(&mut self) -> Option<Outcome> {
        if self.winner.is_some() {
            return None;
        }
        let (p1, p2) = (self.player1_troops?, self.player2_troops?);

        let outcome = match p1.cmp(&p2) {
            std::cmp::Ordering::Greater => Outcome::Player1,
            std::cmp::Ordering::Less => Outcome::Player2,
            std::cmp::Ordering::Equal => Outcome::Tie,
        };
        self.winner = Some(outcome);
        Some(outcome)
    }
}
