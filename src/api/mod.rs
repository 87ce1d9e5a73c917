//! Внешний API табло.
//!
//! Здесь описываются:
//! - команды (commands.rs) — всё, что меняет состояние (новый матч, действие, undo/redo, слоты);
//! - запросы (queries.rs) — только чтение;
//! - DTO (dto.rs) — удобные структуры для UI и сервера лиги;
//! - ошибки (errors.rs) — то, что видит клиент.

pub mod commands;
pub mod dto;
pub mod errors;
pub mod queries;

pub use commands::*;
pub use dto::*;
pub use errors::*;
pub use queries::*;
