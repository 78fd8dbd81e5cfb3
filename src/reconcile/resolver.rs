//! Move reconciliation: two independent submissions, one resolution.
//!
//! ## The race this module exists for
//!
//! Two players submit moves for the same round from different requests
//! with no shared lock. Both requests may observe "only I have moved", or
//! both may observe "both have moved". The durable store is the only
//! synchronization point:
//!
//! - the move log's unique `(room, player, round)` key makes the *second*
//!   submission of a duplicate lose, whatever the interleaving;
//! - [`RoomStore::try_mark_resolved`] admits exactly one resolver per
//!   round, so double observations collapse to a single resolution. The
//!   loser simply reports the round as pending; the winner's resolution
//!   is authoritative.
//!
//! Moves are applied to the engine in canonical order (player 1 first)
//! regardless of submission order, so either arrival order produces the
//! identical round record.
//!
//! ## Engine instances are disposable
//!
//! A cached engine is a shell: before every use its state is replaced
//! from the room's persisted snapshot. Evicting the cache at any point
//! must not (and does not) change observable behavior.

use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::core::{
    GameConfig, GameId, GameRng, GameState, GameStatus, Outcome, PlayerId, PlayerIdentity, Round,
    RoomId, Side, SideMap,
};
use crate::engine::{BlottoEngine, MoveError};

use super::store::{
    GameRecord, GameType, MoveLog, MoveRecord, RecordStore, RoomRecord, RoomStore, RoundStatus,
    StatsDelta, StoreError,
};

/// Why a submission or room operation was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// Move submitted to a room that is not `Playing`.
    #[error("room {0} is not accepting moves")]
    RoomNotPlaying(RoomId),

    /// Join or start attempted on a room past `Waiting`.
    #[error("room {0} is no longer open")]
    RoomClosed(RoomId),

    #[error("room {0} already has two players")]
    RoomFull(RoomId),

    /// Start attempted before a second player joined.
    #[error("room {0} does not have two players yet")]
    NotReady(RoomId),

    #[error("player {0} is not seated in this room")]
    NotInRoom(PlayerId),

    /// The client's round number does not match the room's current round;
    /// the client must refetch room state.
    #[error("submitted for round {submitted} but the room is on round {current}")]
    RoundMismatch { submitted: u32, current: u32 },

    /// A move already exists for this player and round; the original
    /// stands.
    #[error("player {player} already moved in round {round}")]
    DuplicateMove { player: PlayerId, round: u32 },

    /// The room claims to be playing but has no persisted snapshot.
    #[error("room {0} has no snapshot to resume from")]
    MissingSnapshot(RoomId),

    /// Both logged moves applied cleanly but the round did not resolve;
    /// indicates a corrupted snapshot or move log.
    #[error("round {0} failed to resolve from the logged moves")]
    UnresolvedRound(u32),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a successful submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The move is logged; the round is still waiting (on the other
    /// player, or on a resolution already in flight elsewhere).
    Pending { status: RoundStatus },

    /// This submission completed the round. `finished` carries the game
    /// outcome when the resolution ended the game.
    Resolved {
        round: Round,
        finished: Option<Outcome>,
    },
}

/// Coordinates independently-arriving move submissions into exactly one
/// engine invocation per round, over a durable store.
pub struct MoveReconciler<S> {
    store: S,
    /// Performance cache only; refreshed from the snapshot before use.
    engines: Mutex<FxHashMap<RoomId, BlottoEngine>>,
    rng: Mutex<GameRng>,
}

impl<S> MoveReconciler<S>
where
    S: MoveLog + RoomStore + RecordStore,
{
    /// A reconciler over the given store, with entropy-seeded room codes.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_rng(store, GameRng::from_entropy())
    }

    /// A reconciler with a seeded RNG, for reproducible room ids in tests.
    #[must_use]
    pub fn with_rng(store: S, rng: GameRng) -> Self {
        Self {
            store,
            engines: Mutex::new(FxHashMap::default()),
            rng: Mutex::new(rng),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // === Room lifecycle ===

    /// Create a room with the host seated and a fresh join code.
    pub fn create_room(
        &self,
        host: PlayerIdentity,
        config: GameConfig,
    ) -> Result<RoomRecord, ReconcileError> {
        let (id, code) = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            (RoomId::new(rng.join_code(12)), rng.join_code(6))
        };
        let now = Utc::now();
        let room = RoomRecord {
            id,
            code,
            player1: host,
            player2: None,
            config,
            status: GameStatus::Waiting,
            current_round: 1,
            round_status: RoundStatus::Waiting,
            snapshot: None,
            created_at: now,
            updated_at: now,
        };
        self.store.create_room(room.clone())?;
        log::info!("[room {}] created, join code {}", room.id, room.code);
        Ok(room)
    }

    /// Seat a second player by join code.
    ///
    /// Idempotent for a player already seated in the room.
    pub fn join_room(
        &self,
        code: &str,
        player: PlayerIdentity,
    ) -> Result<RoomRecord, ReconcileError> {
        let mut room = self.store.find_by_code(code)?;

        let already_seated = room.player1.id == player.id
            || room.player2.as_ref().is_some_and(|p| p.id == player.id);
        if already_seated {
            return Ok(room);
        }
        if room.status != GameStatus::Waiting {
            return Err(ReconcileError::RoomClosed(room.id));
        }
        if room.player2.is_some() {
            return Err(ReconcileError::RoomFull(room.id));
        }

        room.player2 = Some(player);
        room.updated_at = Utc::now();
        self.store.update_room(&room)?;
        log::info!("[room {}] second player joined", room.id);
        Ok(room)
    }

    /// Start a full room: build the engine, persist the opening snapshot,
    /// and begin round 1.
    pub fn start_room(&self, room_id: &RoomId) -> Result<RoomRecord, ReconcileError> {
        let mut room = self.store.load_room(room_id)?;
        if room.status != GameStatus::Waiting {
            return Err(ReconcileError::RoomClosed(room.id));
        }
        let Some(player2) = room.player2.clone() else {
            return Err(ReconcileError::NotReady(room.id));
        };

        let mut engine = BlottoEngine::new(
            GameId::new(room.id.as_str()),
            room.player1.clone(),
            player2,
            room.config,
        );
        engine.start();

        room.snapshot = Some(engine.state().clone());
        room.status = GameStatus::Playing;
        room.current_round = 1;
        room.round_status = RoundStatus::Waiting;
        room.updated_at = Utc::now();
        self.store.update_room(&room)?;

        self.engines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(room.id.clone(), engine);
        log::info!("[room {}] game started", room.id);
        Ok(room)
    }

    // === Moves ===

    /// Submit one player's commitment for a round.
    ///
    /// Validates against the authoritative snapshot before logging, so an
    /// illegal move mutates nothing. When this submission completes the
    /// round and wins the resolution guard, the round resolves here; when
    /// the other player's request wins it instead, this returns pending
    /// and the resolution lands through that request.
    pub fn submit_move(
        &self,
        room_id: &RoomId,
        player: &PlayerId,
        round_number: u32,
        troops: u32,
    ) -> Result<SubmitOutcome, ReconcileError> {
        let room = self.store.load_room(room_id)?;
        if room.status != GameStatus::Playing {
            return Err(ReconcileError::RoomNotPlaying(room.id));
        }
        if round_number != room.current_round {
            return Err(ReconcileError::RoundMismatch {
                submitted: round_number,
                current: room.current_round,
            });
        }
        if self.store.has_move(room_id, player, round_number)? {
            return Err(ReconcileError::DuplicateMove {
                player: player.clone(),
                round: round_number,
            });
        }

        // Dry-run against the snapshot: rejects unknown players and
        // overcommitments without touching the log.
        let mut probe = self.engine_for(&room)?;
        let side = probe
            .state()
            .side_of(player)
            .ok_or_else(|| ReconcileError::NotInRoom(player.clone()))?;
        probe.apply_move(player, troops)?;

        // The unique key is the real duplicate guard; the check above is
        // only a fast path.
        self.store
            .append(MoveRecord {
                room_id: room_id.clone(),
                player_id: player.clone(),
                round_number,
                troops,
                submitted_at: Utc::now(),
            })
            .map_err(|err| match err {
                StoreError::DuplicateKey(_) => ReconcileError::DuplicateMove {
                    player: player.clone(),
                    round: round_number,
                },
                other => ReconcileError::Store(other),
            })?;
        log::debug!(
            "[room {}] {} committed for round {}",
            room_id,
            player,
            round_number
        );

        // Re-query after the insert; this is the only ordering the store
        // guarantees across concurrent submissions.
        let moves = self.store.round_moves(room_id, round_number)?;
        let per_side = side_moves(&room, &moves);
        let both_present = per_side.iter().all(|(_, m)| m.is_some());

        if !both_present {
            // Narrow, advisory write: a stale marker must never clobber a
            // concurrent resolution's snapshot.
            let status = RoundStatus::single_mover(side);
            self.store.set_round_status(room_id, round_number, status)?;
            return Ok(SubmitOutcome::Pending { status });
        }

        if !self.store.try_mark_resolved(room_id, round_number)? {
            log::debug!(
                "[room {}] round {} resolution already claimed",
                room_id,
                round_number
            );
            return Ok(SubmitOutcome::Pending {
                status: RoundStatus::Resolved,
            });
        }

        self.resolve_round(room, round_number, &moves)
    }

    /// Whether a player may move right now: the room is playing and they
    /// have no logged move for the current round.
    pub fn turn_eligibility(
        &self,
        room_id: &RoomId,
        player: &PlayerId,
    ) -> Result<bool, ReconcileError> {
        let room = self.store.load_room(room_id)?;
        if room.status != GameStatus::Playing {
            return Ok(false);
        }
        Ok(!self.store.has_move(room_id, player, room.current_round)?)
    }

    /// Drop a cached engine. Behavior-neutral: the next use rebuilds from
    /// the snapshot.
    pub fn evict_engine(&self, room_id: &RoomId) {
        self.engines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(room_id);
    }

    // === Internals ===

    /// The engine for a room, state refreshed from the persisted snapshot.
    fn engine_for(&self, room: &RoomRecord) -> Result<BlottoEngine, ReconcileError> {
        let snapshot = room
            .snapshot
            .clone()
            .ok_or_else(|| ReconcileError::MissingSnapshot(room.id.clone()))?;

        let mut engines = self.engines.lock().unwrap_or_else(PoisonError::into_inner);
        let engine = engines
            .entry(room.id.clone())
            .or_insert_with(|| BlottoEngine::resume(snapshot.clone(), room.config));
        engine.restore(snapshot);
        Ok(engine.clone())
    }

    /// Apply both logged moves in canonical order and persist the result.
    ///
    /// Only ever entered by the winner of `try_mark_resolved`.
    fn resolve_round(
        &self,
        mut room: RoomRecord,
        round_number: u32,
        moves: &[MoveRecord],
    ) -> Result<SubmitOutcome, ReconcileError> {
        let mut engine = self.engine_for(&room)?;

        let per_side = side_moves(&room, moves);
        for side in Side::both() {
            let Some(record) = per_side[side] else {
                return Err(ReconcileError::UnresolvedRound(round_number));
            };
            engine.apply_move(&record.player_id, record.troops)?;
        }

        let state = engine.state().clone();
        let round = state
            .round(round_number)
            .filter(|r| !r.is_open())
            .cloned()
            .ok_or(ReconcileError::UnresolvedRound(round_number))?;

        room.snapshot = Some(state.clone());
        room.round_status = RoundStatus::Resolved;
        room.updated_at = Utc::now();

        if state.is_finished() {
            room.status = GameStatus::Finished;
            self.store.update_room(&room)?;
            self.finish_game(&room, &state)?;
            log::info!(
                "[room {}] game finished after round {}: {:?}",
                room.id,
                round_number,
                state.winner
            );
            return Ok(SubmitOutcome::Resolved {
                round,
                finished: state.winner,
            });
        }

        room.current_round = state.current_round;
        room.round_status = RoundStatus::Waiting;
        self.store.update_room(&room)?;
        self.engines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(room.id.clone(), engine);
        log::debug!("[room {}] round {} resolved", room.id, round_number);

        Ok(SubmitOutcome::Resolved {
            round,
            finished: None,
        })
    }

    /// Persist the historical record and both players' stats; drop the
    /// cached engine.
    fn finish_game(&self, room: &RoomRecord, state: &GameState) -> Result<(), ReconcileError> {
        self.store
            .insert_record(GameRecord::from_state(state, GameType::Multiplayer))?;
        for side in Side::both() {
            let player = state.player(side);
            self.store
                .apply_stats(&player.id, &StatsDelta::for_side(state, side))?;
        }
        self.evict_engine(&room.id);
        Ok(())
    }
}

/// The id seated on a side of a room, if the seat is filled.
fn seat_id(room: &RoomRecord, side: Side) -> Option<&PlayerId> {
    match side {
        Side::Player1 => Some(&room.player1.id),
        Side::Player2 => room.player2.as_ref().map(|p| &p.id),
    }
}

/// Each side's logged move for a round, matched through the room's seats.
fn side_moves<'a>(room: &RoomRecord, moves: &'a [MoveRecord]) -> SideMap<Option<&'a MoveRecord>> {
    SideMap::new(|side| {
        seat_id(room, side).and_then(|seat| moves.iter().find(|m| m.player_id == *seat))
    })
}
