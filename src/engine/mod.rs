//! Движок снукерного табло: правила фрейма и история матча.
//!
//! Высокоуровневый объект: `HistoryController`
//! Основные операции:
//!   - `start_new_match` – новый матч по настройкам
//!   - `apply` – применить действие (снапшот + мутация + автосохранение)
//!   - `undo` / `redo` – перемещение по истории
//!   - `save` / `load` – слоты сохранений

pub mod actions;
pub mod errors;
pub mod history;
pub mod match_state;
pub mod validation;

pub use actions::MatchAction;
pub use errors::{EngineError, HistoryError};
pub use history::HistoryController;
pub use match_state::{MatchPhase, MatchState, SNAPSHOT_FORMAT_VERSION};
pub use validation::{can_apply, legal_actions, validate_action};

use crate::domain::Timestamp;

/// RNG интерфейс для engine (жребий на разбой).
/// Реализации — в infra (обёртки над `rand`).
pub trait RandomSource {
    fn coin_flip(&mut self) -> bool;
}

/// Источник времени. Реализации — в infra.
pub trait Clock {
    fn now_ms(&self) -> Timestamp;
}
