//! Single-player sessions.
//!
//! No reconciler, no store, no concurrency: the human's commitment and
//! the bot's reply are applied synchronously within one call, so a round
//! always resolves before `play_round` returns. The human sits on
//! player 1, the bot on player 2.

use crate::bot::BotPolicy;
use crate::core::{GameConfig, GameId, GameState, Outcome, PlayerIdentity, Side};
use crate::engine::{Applied, BlottoEngine, MoveError};
use crate::reconcile::{GameRecord, GameType, StatsDelta};

/// A game between one human and a bot policy.
pub struct SoloSession<B> {
    engine: BlottoEngine,
    bot: B,
}

impl<B: BotPolicy> SoloSession<B> {
    /// Start a solo game. The session is immediately `Playing`.
    #[must_use]
    pub fn new(
        id: GameId,
        human: PlayerIdentity,
        bot_identity: PlayerIdentity,
        config: GameConfig,
        bot: B,
    ) -> Self {
        assert!(bot_identity.is_bot, "player 2 of a solo session must be a bot");

        let mut engine = BlottoEngine::new(id, human, bot_identity, config);
        engine.start();
        Self { engine, bot }
    }

    /// The current game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        self.engine.state()
    }

    /// Play one full round: the human's commitment, then the bot's.
    ///
    /// The returned receipt is the bot's; its `resolved` round is always
    /// present because the bot's move completes the round.
    pub fn play_round(&mut self, troops: u32) -> Result<Applied, MoveError> {
        let human = self.engine.state().player1.id.clone();
        self.engine.apply_move(&human, troops)?;

        let bot_troops = self.bot.choose(&self.engine.state().player2);
        let bot_id = self.engine.state().player2.id.clone();
        self.engine.apply_move(&bot_id, bot_troops)
    }

    /// Whether the game has terminated.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.engine.state().is_finished()
    }

    /// The final outcome, once finished.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.engine.state().winner
    }

    /// The historical record of a finished session.
    ///
    /// `None` while the game is still in progress.
    #[must_use]
    pub fn record(&self) -> Option<GameRecord> {
        if !self.is_finished() {
            return None;
        }
        Some(GameRecord::from_state(self.engine.state(), GameType::Single))
    }

    /// One side's stats contribution from a finished session.
    ///
    /// `None` while the game is still in progress. Mirrors the
    /// multiplayer accumulation so callers persist both modes the same
    /// way.
    #[must_use]
    pub fn stats_delta(&self, side: Side) -> Option<StatsDelta> {
        if !self.is_finished() {
            return None;
        }
        Some(StatsDelta::for_side(self.engine.state(), side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::RandomBot;

    fn session(starting_troops: u32) -> SoloSession<RandomBot> {
        SoloSession::new(
            GameId::new("solo-1"),
            PlayerIdentity::new("u-1", "Alice"),
            PlayerIdentity::bot("bot-1", "General Bot"),
            GameConfig::with_starting_troops(starting_troops),
            RandomBot::seeded(42),
        )
    }

    #[test]
    fn test_round_resolves_in_one_call() {
        let mut session = session(100);

        let applied = session.play_round(10).unwrap();
        let round = applied.resolved.expect("bot move resolves the round");

        assert_eq!(round.round_number, 1);
        assert_eq!(round.player1_troops, Some(10));
        assert!(round.player2_troops.is_some());
        assert!(round.winner.is_some());
        assert!(session.state().open_round().is_none());
    }

    #[test]
    fn test_overcommit_leaves_round_unopened() {
        let mut session = session(10);

        let err = session.play_round(11).unwrap_err();
        assert!(matches!(err, MoveError::InsufficientTroops { .. }));
        assert!(session.state().rounds.is_empty());
    }

    #[test]
    fn test_plays_to_completion() {
        let mut session = session(20);

        // Committing everything early forces depletion within a few
        // rounds; the bot can never outlast that by construction.
        let mut guard = 0;
        while !session.is_finished() {
            let pool = session.state().player1.troops;
            session.play_round(pool.min(7)).unwrap();
            guard += 1;
            assert!(guard < 60, "game failed to terminate");
        }

        assert!(session.outcome().is_some());
        assert!(session.play_round(0).is_err());
    }

    #[test]
    fn test_record_only_when_finished() {
        let mut session = session(10);
        assert!(session.record().is_none());
        assert!(session.stats_delta(Side::Player1).is_none());

        while !session.is_finished() {
            let pool = session.state().player1.troops;
            session.play_round(pool).unwrap();
        }

        let record = session.record().unwrap();
        assert_eq!(record.game_type, GameType::Single);
        assert_eq!(record.rounds.len(), session.state().rounds.len());

        let delta = session.stats_delta(Side::Player1).unwrap();
        assert_eq!(delta.troops_deployed, 10);
    }
}
