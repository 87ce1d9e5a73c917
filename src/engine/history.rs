// src/engine/history.rs

use tracing::{debug, info, instrument, warn};

use crate::domain::MatchOptions;
use crate::engine::actions::MatchAction;
use crate::engine::errors::HistoryError;
use crate::engine::match_state::MatchState;
use crate::engine::{Clock, RandomSource};
use crate::infra::persistence::{PersistenceError, SaveStore};
use crate::infra::slots::{
    read_saved_games, slot_for_new_match, slot_key, SaveGameId, NUM_SAVE_SLOTS,
};
use crate::state::{decode_snapshots, encode_snapshots};

/// Контроллер истории матча:
/// - хранит последовательность независимых снапшотов `MatchState` и курсор;
/// - любое действие: клон настоящего → мутация клона → обрезка redo-ветки → push → автосохранение;
/// - undo/redo только двигают курсор;
/// - сохраняет/загружает всю последовательность в один из слотов.
///
/// Инвариант: если история непуста, `cursor < snapshots.len()`.
pub struct HistoryController<S: SaveStore, C: Clock> {
    snapshots: Vec<MatchState>,
    cursor: usize,
    store: S,
    clock: C,
    save_slot: usize,
    saved_games: Vec<SaveGameId>,
}

impl<S: SaveStore, C: Clock> HistoryController<S, C> {
    /// Создать контроллер поверх хранилища. История пуста, слот для нового
    /// матча выбирается по каталогу сохранений.
    pub fn new(store: S, clock: C) -> Result<Self, HistoryError> {
        let saved_games = read_saved_games(&store)?;
        let save_slot = slot_for_new_match(&saved_games);

        Ok(Self {
            snapshots: Vec::new(),
            cursor: 0,
            store,
            clock,
            save_slot,
            saved_games,
        })
    }

    /// Настоящее: снапшот под курсором.
    pub fn current(&self) -> Option<&MatchState> {
        self.snapshots.get(self.cursor)
    }

    fn present(&self) -> Result<&MatchState, HistoryError> {
        self.current().ok_or(HistoryError::NoActiveMatch)
    }

    pub fn snapshots(&self) -> &[MatchState] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn save_slot(&self) -> usize {
        self.save_slot
    }

    pub fn saved_games(&self) -> &[SaveGameId] {
        &self.saved_games
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ─────────────────────────────────────────────────────────────
    //  Undo / redo
    // ─────────────────────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    #[instrument(skip(self), fields(cursor = self.cursor))]
    pub fn undo(&mut self) -> Result<(), HistoryError> {
        if !self.can_undo() {
            return Err(HistoryError::NothingToUndo);
        }
        self.cursor -= 1;
        debug!(cursor = self.cursor, "undo");
        Ok(())
    }

    #[instrument(skip(self), fields(cursor = self.cursor))]
    pub fn redo(&mut self) -> Result<(), HistoryError> {
        if !self.can_redo() {
            return Err(HistoryError::NothingToRedo);
        }
        self.cursor += 1;
        debug!(cursor = self.cursor, "redo");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Действия
    // ─────────────────────────────────────────────────────────────

    /// Применить действие к настоящему и записать результат новым снапшотом.
    ///
    /// Если действие недопустимо, история не меняется.
    #[instrument(skip(self), fields(cursor = self.cursor, len = self.snapshots.len()))]
    pub fn apply(&mut self, action: MatchAction) -> Result<(), HistoryError> {
        let now = self.clock.now_ms();

        let mut next = self.present()?.clone();
        next.apply(&action, now)?;

        // Новое действие после undo отбрасывает redo-ветку.
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(next);
        self.cursor = self.snapshots.len() - 1;

        self.save()
    }

    /// Новый матч: история заменяется одним свежим снапшотом.
    ///
    /// До первого действия ничего не сохраняется: брошенный матч не занимает слот.
    #[instrument(skip(self, rng))]
    pub fn start_new_match<R: RandomSource>(
        &mut self,
        options: &MatchOptions,
        rng: &mut R,
    ) -> Result<(), HistoryError> {
        let state = MatchState::new(options, rng, self.clock.now_ms())?;

        self.saved_games = read_saved_games(&self.store)?;
        self.save_slot = slot_for_new_match(&self.saved_games);

        info!(
            slot = self.save_slot,
            break_off = state.break_off_player_id(),
            "new match"
        );

        self.snapshots = vec![state];
        self.cursor = 0;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Сохранения
    // ─────────────────────────────────────────────────────────────

    /// Сохранить всю историю в текущий слот.
    pub fn save(&mut self) -> Result<(), HistoryError> {
        let first = self.snapshots.first().ok_or(HistoryError::NoActiveMatch)?;
        let timestamp = first.timestamp();

        let json = encode_snapshots(&self.snapshots)?;
        self.store.set(&slot_key(self.save_slot), &json)?;

        debug!(slot = self.save_slot, snapshots = self.snapshots.len(), "saved");
        self.note_saved(self.save_slot, timestamp);
        Ok(())
    }

    /// Сохранить в конкретный слот; дальнейшие автосохранения идут туда же.
    pub fn save_to(&mut self, slot: usize) -> Result<(), HistoryError> {
        check_slot(slot)?;
        self.save_slot = slot;
        self.save()
    }

    /// Загрузить историю из слота; курсор встаёт на последний снапшот.
    ///
    /// Возвращает `Ok(false)`, если слот пуст или повреждён. Повреждённый слот
    /// удаляется, история остаётся пустой. Дальнейшие сохранения идут в этот слот.
    #[instrument(skip(self))]
    pub fn load(&mut self, slot: usize) -> Result<bool, HistoryError> {
        check_slot(slot)?;
        self.save_slot = slot;

        let key = slot_key(slot);
        let json = match self.store.get(&key)? {
            Some(json) => json,
            None => {
                self.reset_history();
                return Ok(false);
            }
        };

        match decode_snapshots(&json) {
            Ok(snapshots) => {
                self.cursor = snapshots.len() - 1;
                self.snapshots = snapshots;
                info!(slot, snapshots = self.snapshots.len(), "match loaded");
                Ok(true)
            }
            Err(PersistenceError::Deserialization(reason)) => {
                warn!(slot, %reason, "discarding corrupt save slot");
                self.store.remove(&key)?;
                self.reset_history();
                self.saved_games = read_saved_games(&self.store)?;
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn reset_history(&mut self) {
        self.snapshots.clear();
        self.cursor = 0;
    }

    fn note_saved(&mut self, slot: usize, timestamp: i64) {
        match self.saved_games.iter_mut().find(|s| s.slot == slot) {
            Some(entry) => entry.timestamp = timestamp,
            None => self.saved_games.push(SaveGameId { slot, timestamp }),
        }
        self.saved_games.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }
}

fn check_slot(slot: usize) -> Result<(), HistoryError> {
    if slot >= NUM_SAVE_SLOTS {
        return Err(HistoryError::InvalidSlot(slot));
    }
    Ok(())
}
