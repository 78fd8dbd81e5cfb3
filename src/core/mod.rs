//! Core value types: sides, players, rounds, state, configuration, RNG.
//!
//! Everything here is a plain serializable value with no rule logic; the
//! rules live in [`crate::engine`].

pub mod side;
pub mod player;
pub mod rng;
pub mod config;
pub mod round;
pub mod state;

pub use side::{Side, SideMap};
pub use player::{GameId, Player, PlayerId, PlayerIdentity, RoomId};
pub use rng::GameRng;
pub use config::GameConfig;
pub use round::{Outcome, Round};
pub use state::{GameState, GameStatus};
