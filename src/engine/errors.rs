use thiserror::Error;

use crate::domain::{OptionsError, PlayerId};
use crate::engine::actions::MatchAction;
use crate::infra::persistence::PersistenceError;

/// Ошибки движка правил.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Парный предикат `can_*` вернул false. UI не должен был предлагать это действие.
    #[error("Недопустимое действие в текущем состоянии матча: {0:?}")]
    IllegalAction(MatchAction),

    #[error("Игрок {0} не найден")]
    PlayerNotFound(PlayerId),

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}

/// Ошибки контроллера истории (undo/redo + сохранения).
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Матч не начат")]
    NoActiveMatch,

    #[error("Отменять нечего")]
    NothingToUndo,

    #[error("Повторять нечего")]
    NothingToRedo,

    #[error("Слот сохранения {0} не существует")]
    InvalidSlot(usize),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
