// src/time_ctrl/mod.rs
//! Учёт времени фрейма и ударов.
//!
//! Здесь собираем:
//! - часы фрейма (`FrameClock`): старт, конец, последний удар;
//! - форматирование длительностей для табло (`format_ms`).

pub mod clock;
pub mod format;

pub use clock::FrameClock;
pub use format::format_ms;
