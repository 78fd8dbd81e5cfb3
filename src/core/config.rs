//! Game configuration.
//!
//! A `GameConfig` is an immutable parameter block fixed at game creation.
//! The defaults match the standard ruleset: 100 starting troops, a
//! 3-round-win victory margin, and a 50-round safety cap.

use serde::{Deserialize, Serialize};

/// Parameters of a single game.
///
/// All three values must be positive; the engine asserts this when a game
/// is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    /// Troops each player starts with.
    pub starting_troops: u32,

    /// Round-win lead that ends the game early.
    pub victory_margin: u32,

    /// Round-count safety cap. The cap is evaluated when a round resolves,
    /// before the round counter advances, so play can reach round
    /// `max_rounds + 1` before it trips.
    pub max_rounds: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_troops: 100,
            victory_margin: 3,
            max_rounds: 50,
        }
    }
}

impl GameConfig {
    /// A config with the given starting pool and default margins.
    #[must_use]
    pub fn with_starting_troops(starting_troops: u32) -> Self {
        Self {
            starting_troops,
            ..Self::default()
        }
    }
}
