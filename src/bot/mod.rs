//! Bot move selection.
//!
//! Policies are trait-based so a smarter bot can slot in without touching
//! the solo session; the shipped policy is a bounded uniform random
//! sub-allocation.

use crate::core::{GameRng, Player};

/// Policy for choosing a troop commitment for a bot-controlled seat.
pub trait BotPolicy {
    /// Choose a commitment for the given player.
    ///
    /// Must stay within the player's remaining pool.
    fn choose(&mut self, player: &Player) -> u32;
}

/// Uniform random commitment over `[0, floor(troops * 0.8)]`.
///
/// Keeping the upper bound below the full pool means the bot never
/// all-ins, so it cannot deplete itself in one round. No opponent
/// modeling; stateless apart from the RNG.
#[derive(Clone, Debug)]
pub struct RandomBot {
    rng: GameRng,
}

impl RandomBot {
    /// A bot seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: GameRng::from_entropy(),
        }
    }

    /// A deterministically seeded bot, for reproducible games and tests.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl Default for RandomBot {
    fn default() -> Self {
        Self::new()
    }
}

impl BotPolicy for RandomBot {
    fn choose(&mut self, player: &Player) -> u32 {
        if player.troops == 0 {
            return 0;
        }
        let max = player.troops * 4 / 5;
        self.rng.gen_up_to(max)
    }
}
