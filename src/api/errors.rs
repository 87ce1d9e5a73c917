use serde::{Deserialize, Serialize};

use crate::engine::{EngineError, HistoryError};

/// Ошибки внешнего API (то, что отдаём UI / клиенту).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Неправильные входные данные (например, пустые имена).
    BadRequest(String),

    /// Действие недопустимо в текущем состоянии (UI не проверил `can_*`).
    InvalidCommand(String),

    /// Нет активного матча.
    NoActiveMatch,

    /// Ошибка хранилища.
    Storage(String),

    /// Внутренняя ошибка движка.
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::IllegalAction(_) => ApiError::InvalidCommand(err.to_string()),
            EngineError::PlayerNotFound(_) | EngineError::Internal(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<HistoryError> for ApiError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::NoActiveMatch => ApiError::NoActiveMatch,
            HistoryError::NothingToUndo | HistoryError::NothingToRedo => {
                ApiError::InvalidCommand(err.to_string())
            }
            HistoryError::InvalidSlot(_) | HistoryError::Options(_) => {
                ApiError::BadRequest(err.to_string())
            }
            HistoryError::Engine(e) => e.into(),
            HistoryError::Persistence(e) => ApiError::Storage(e.to_string()),
        }
    }
}
