//! In-memory reference store.
//!
//! Backs all three store seams with mutex-guarded tables. The unique-key
//! and compare-and-swap semantics hold under concurrent callers because
//! every check-and-write happens under one lock, which is the same
//! guarantee a relational unique constraint gives the real deployment.

use std::sync::Mutex;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::core::{PlayerId, RoomId};

use super::store::{
    GameRecord, MoveLog, MoveRecord, PlayerStats, RecordStore, RoomRecord, RoomStore, RoundStatus,
    StatsDelta, StoreError,
};

#[derive(Debug, Default)]
struct Tables {
    rooms: FxHashMap<RoomId, RoomRecord>,
    moves: FxHashMap<RoomId, Vec<MoveRecord>>,
    resolved: FxHashSet<(RoomId, u32)>,
    records: Vec<GameRecord>,
    stats: FxHashMap<PlayerId, PlayerStats>,
}

/// Mutex-guarded in-memory implementation of all three store seams.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All historical game records, oldest first.
    pub fn records(&self) -> Result<Vec<GameRecord>, StoreError> {
        Ok(self.lock()?.records.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("store lock poisoned".into()))
    }
}

impl MoveLog for MemoryStore {
    fn append(&self, record: MoveRecord) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        let moves = tables.moves.entry(record.room_id.clone()).or_default();

        if moves
            .iter()
            .any(|m| m.player_id == record.player_id && m.round_number == record.round_number)
        {
            return Err(StoreError::DuplicateKey(format!(
                "{}/{}/{}",
                record.room_id, record.player_id, record.round_number
            )));
        }
        moves.push(record);
        Ok(())
    }

    fn round_moves(
        &self,
        room: &RoomId,
        round: u32,
    ) -> Result<SmallVec<[MoveRecord; 2]>, StoreError> {
        let tables = self.lock()?;
        Ok(tables
            .moves
            .get(room)
            .map(|moves| {
                moves
                    .iter()
                    .filter(|m| m.round_number == round)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn has_move(&self, room: &RoomId, player: &PlayerId, round: u32) -> Result<bool, StoreError> {
        let tables = self.lock()?;
        Ok(tables.moves.get(room).is_some_and(|moves| {
            moves
                .iter()
                .any(|m| m.player_id == *player && m.round_number == round)
        }))
    }
}

impl RoomStore for MemoryStore {
    fn create_room(&self, room: RoomRecord) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        if tables.rooms.contains_key(&room.id) {
            return Err(StoreError::DuplicateKey(room.id.to_string()));
        }
        tables.rooms.insert(room.id.clone(), room);
        Ok(())
    }

    fn load_room(&self, id: &RoomId) -> Result<RoomRecord, StoreError> {
        self.lock()?
            .rooms
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::RoomNotFound(id.clone()))
    }

    fn find_by_code(&self, code: &str) -> Result<RoomRecord, StoreError> {
        self.lock()?
            .rooms
            .values()
            .find(|r| r.code == code)
            .cloned()
            .ok_or_else(|| StoreError::RoomNotFound(RoomId::new(code)))
    }

    fn update_room(&self, room: &RoomRecord) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        if !tables.rooms.contains_key(&room.id) {
            return Err(StoreError::RoomNotFound(room.id.clone()));
        }
        tables.rooms.insert(room.id.clone(), room.clone());
        Ok(())
    }

    fn set_round_status(
        &self,
        id: &RoomId,
        round: u32,
        status: RoundStatus,
    ) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        let room = tables
            .rooms
            .get_mut(id)
            .ok_or_else(|| StoreError::RoomNotFound(id.clone()))?;

        // Stale markers lose silently: the round already moved on.
        if room.current_round == round && room.round_status != RoundStatus::Resolved {
            room.round_status = status;
            room.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    fn try_mark_resolved(&self, id: &RoomId, round: u32) -> Result<bool, StoreError> {
        let mut tables = self.lock()?;
        Ok(tables.resolved.insert((id.clone(), round)))
    }
}

impl RecordStore for MemoryStore {
    fn insert_record(&self, record: GameRecord) -> Result<(), StoreError> {
        self.lock()?.records.push(record);
        Ok(())
    }

    fn apply_stats(&self, player: &PlayerId, delta: &StatsDelta) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        let now = chrono::Utc::now();
        tables
            .stats
            .entry(player.clone())
            .or_insert_with(|| PlayerStats::empty(now))
            .accumulate(delta, now);
        Ok(())
    }

    fn load_stats(&self, player: &PlayerId) -> Result<Option<PlayerStats>, StoreError> {
        Ok(self.lock()?.stats.get(player).cloned())
    }
}
