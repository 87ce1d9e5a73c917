// src/time_ctrl/clock.rs
//! Часы фрейма: когда начался, когда закончился, когда был последний удар.

use serde::{Deserialize, Serialize};

use crate::domain::Timestamp;

/// Таймстемпы одного фрейма. 0 означает "ещё не было".
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameClock {
    pub start: Timestamp,
    pub end: Timestamp,
    pub last_shot: Timestamp,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_started(&self) -> bool {
        self.start != 0
    }

    /// Отметить удар в момент `now` и вернуть его длительность.
    ///
    /// Первый удар фрейма запускает часы и имеет нулевую длительность.
    pub fn log_shot(&mut self, now: Timestamp) -> i64 {
        let duration = if self.has_started() {
            (now - self.last_shot).max(0)
        } else {
            self.start = now;
            0
        };

        self.last_shot = now;
        duration
    }

    pub fn stop(&mut self, now: Timestamp) {
        self.end = now;
    }

    /// Длительность фрейма на момент `now`.
    ///
    /// Для завершённого фрейма — от первого удара до конца,
    /// для идущего — до `now`, для неначатого — 0.
    pub fn elapsed_ms(&self, frame_over: bool, now: Timestamp) -> i64 {
        if frame_over {
            (self.end - self.start).max(0)
        } else if self.has_started() {
            (now - self.start).max(0)
        } else {
            0
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
