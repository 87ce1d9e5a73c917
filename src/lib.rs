//! Табло снукерного матча.
//!
//! Ядро — машина состояний правил (`engine::MatchState`) и контроллер
//! истории с undo/redo и слотами сохранений (`engine::HistoryController`).
//! UI читает состояние через `current()` и меняет его только через `apply()`.

pub mod api;
pub mod domain;
pub mod engine;
pub mod infra;
pub mod state;
pub mod time_ctrl;

pub use engine::{HistoryController, MatchAction, MatchState};
