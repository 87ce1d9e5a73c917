//! Каталог слотов сохранения.
//!
//! Слотов фиксированное количество. Новый матч занимает самый старый
//! (или пустой) слот, так что свежие сохранения вытесняют давние.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::Timestamp;
use crate::infra::persistence::{PersistenceError, SaveStore};
use crate::state::first_snapshot_timestamp;

/// Сколько всего слотов.
pub const NUM_SAVE_SLOTS: usize = 3;

/// Ключ слота в хранилище.
pub fn slot_key(slot: usize) -> String {
    format!("snooker-save-{}", slot)
}

/// Запись каталога: слот + время создания сохранённого матча (0 — пусто).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveGameId {
    pub slot: usize,
    pub timestamp: Timestamp,
}

impl SaveGameId {
    pub fn is_empty(&self) -> bool {
        self.timestamp == 0
    }
}

/// Прочитать каталог: от самого нового к самому старому, пустые слоты в конце.
///
/// Повреждённый слот считается пустым (и будет перезаписан первым).
pub fn read_saved_games<S: SaveStore>(store: &S) -> Result<Vec<SaveGameId>, PersistenceError> {
    let mut saved = Vec::with_capacity(NUM_SAVE_SLOTS);

    for slot in 0..NUM_SAVE_SLOTS {
        let timestamp = match store.get(&slot_key(slot))? {
            None => 0,
            Some(json) => match first_snapshot_timestamp(&json) {
                Ok(ts) => ts,
                Err(PersistenceError::Deserialization(reason)) => {
                    warn!(slot, %reason, "corrupt save slot treated as empty");
                    0
                }
                Err(e) => return Err(e),
            },
        };

        saved.push(SaveGameId { slot, timestamp });
    }

    // Стабильная сортировка: при равных таймстемпах порядок слотов сохраняется.
    saved.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    Ok(saved)
}

/// Слот для нового матча — последний в каталоге (самый старый или пустой).
pub fn slot_for_new_match(saved: &[SaveGameId]) -> usize {
    saved.last().map(|s| s.slot).unwrap_or(0)
}
