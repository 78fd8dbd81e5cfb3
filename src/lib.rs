//! # blotto
//!
//! A Sequential Blotto game engine with durable round reconciliation.
//!
//! Two players hold depleting troop pools and commit some number of
//! troops each round; the larger commitment wins the round, and the game
//! ends on a round-win margin, mutual depletion, or a round cap.
//!
//! ## Design Principles
//!
//! 1. **The engine is the only rulebook**: every move, from a human, a
//!    bot, or a replayed log, goes through [`engine::BlottoEngine`].
//!
//! 2. **Snapshots are the authority**: engine instances are disposable
//!    and reconstructible from a serialized [`core::GameState`]; nothing
//!    observable depends on an instance surviving between requests.
//!
//! 3. **The store is the synchronization point**: multiplayer rounds are
//!    merged from independently-submitted moves using a unique-keyed move
//!    log and a compare-and-swap resolution guard, not in-process locks.
//!
//! ## Modules
//!
//! - `core`: sides, players, rounds, state, configuration, RNG
//! - `engine`: move legality, round resolution, termination
//! - `bot`: bot commitment policies
//! - `snapshot`: JSON and binary state encodings
//! - `reconcile`: store seams, in-memory store, the move reconciler
//! - `solo`: single-player sessions against a bot

pub mod core;
pub mod engine;
pub mod bot;
pub mod snapshot;
pub mod reconcile;
pub mod solo;

// Re-export commonly used types
pub use crate::core::{
    GameConfig, GameId, GameRng, GameState, GameStatus, Outcome, Player, PlayerId, PlayerIdentity,
    RoomId, Round, Side, SideMap,
};

pub use crate::engine::{Applied, BlottoEngine, MoveError};

pub use crate::bot::{BotPolicy, RandomBot};

pub use crate::snapshot::SnapshotError;

pub use crate::reconcile::{
    GameRecord, GameType, MemoryStore, MoveLog, MoveReconciler, MoveRecord, PlayerStats,
    ReconcileError, RecordStore, RoomRecord, RoomStore, RoundStatus, StatsDelta, StoreError,
    SubmitOutcome,
};

pub use crate::solo::SoloSession;
