//! Доменная модель снукера: шары, игроки, настройки матча.

pub mod ball;
pub mod options;
pub mod player;

/// Идентификатор игрока внутри матча: 0 или 1.
pub type PlayerId = u8;

/// Unix-время в миллисекундах.
pub type Timestamp = i64;

pub use ball::*;
pub use options::*;
pub use player::*;
