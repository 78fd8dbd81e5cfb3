//! Multiplayer move reconciliation over a durable store.
//!
//! Two players submit moves for the same round from independent requests
//! with no shared lock; this module merges those submissions into exactly
//! one engine invocation per round. The store seams ([`MoveLog`],
//! [`RoomStore`], [`RecordStore`]) are the synchronization points; see
//! [`resolver`] for the protocol and [`MemoryStore`] for the reference
//! implementation.

pub mod store;
pub mod memory;
pub mod resolver;

pub use store::{
    GameRecord, GameType, MoveLog, MoveRecord, PlayerStats, RecordStore, RoomRecord, RoomStore,
    RoundStatus, StatsDelta, StoreError,
};
pub use memory::MemoryStore;
pub use resolver::{MoveReconciler, ReconcileError, SubmitOutcome};
