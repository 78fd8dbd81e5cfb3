//! The authoritative rules engine.
//!
//! [`BlottoEngine`] is the single source of truth for whether a move is
//! legal and what a round's outcome is. Everything above it (the solo
//! session, the multiplayer reconciler) funnels moves through
//! [`BlottoEngine::apply_move`] and never reimplements a rule.

pub mod game;

pub use game::{Applied, BlottoEngine, MoveError};
