use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::ball::BallValue;
use crate::domain::{PlayerId, Timestamp};

/// Один из двух игроков матча.
///
/// Поля делятся на три уровня жизни:
/// - матч: победы во фреймах, лучший брейк матча, число забитых шаров;
/// - фрейм: очки, лучший брейк фрейма, время и количество ударов;
/// - ход: текущий и предыдущий брейк.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pid: PlayerId,
    name: String,

    // матч
    pub frame_wins: u32,
    pub match_high_break: u32,
    pub match_balls_potted: u32,
    /// Момент последнего забитого шара (0 — ещё ничего не забито).
    last_pot_timestamp: Timestamp,

    // фрейм
    pub points: u32,
    pub frame_high_break: u32,
    pub frame_balls_potted: u32,
    frame_shot_time_ms: i64,
    frame_shots: u32,

    // ход
    /// Положительные значения — забитые шары, отрицательные — фол против себя.
    current_break: Vec<i32>,
    last_break: Vec<i32>,
}

impl Player {
    pub fn new(pid: PlayerId, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: name.into(),
            frame_wins: 0,
            match_high_break: 0,
            match_balls_potted: 0,
            last_pot_timestamp: 0,
            points: 0,
            frame_high_break: 0,
            frame_balls_potted: 0,
            frame_shot_time_ms: 0,
            frame_shots: 0,
            current_break: Vec::new(),
            last_break: Vec::new(),
        }
    }

    pub fn pid(&self) -> PlayerId {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Игрок забил шар стоимостью `value`.
    ///
    /// Легальность удара проверяет `MatchState`, здесь только статистика.
    pub fn pot(&mut self, value: BallValue, now: Timestamp) {
        self.last_pot_timestamp = now;

        self.points = self.points.saturating_add(value);
        self.current_break.push(value as i32);

        let cur_break = self.current_break_total();

        self.match_balls_potted += 1;
        self.match_high_break = self.match_high_break.max(cur_break);

        self.frame_balls_potted += 1;
        self.frame_high_break = self.frame_high_break.max(cur_break);
    }

    /// Фол обрывает серию, но шаром не считается.
    pub fn log_foul(&mut self, value: BallValue) {
        self.current_break.push(-(value as i32));
    }

    /// Закрыть ход: текущий брейк становится "прошлым".
    pub fn end_turn(&mut self) {
        self.last_break = std::mem::take(&mut self.current_break);
    }

    pub fn log_shot(&mut self, duration_ms: i64) {
        self.frame_shot_time_ms += duration_ms;
        self.frame_shots += 1;
    }

    /// Очки после ручной правки на `delta`; `None`, если результат вне `0..=u32::MAX`.
    pub fn points_after(&self, delta: i64) -> Option<u32> {
        let points = i64::from(self.points).checked_add(delta)?;
        u32::try_from(points).ok()
    }

    /// Сброс всего, что относится к фрейму и ходу. Матчевая статистика остаётся.
    pub fn new_frame(&mut self) {
        self.points = 0;
        self.frame_high_break = 0;
        self.frame_balls_potted = 0;
        self.frame_shot_time_ms = 0;
        self.frame_shots = 0;
        self.current_break.clear();
        self.last_break.clear();
    }

    pub fn current_break(&self) -> &[i32] {
        &self.current_break
    }

    pub fn last_break(&self) -> &[i32] {
        &self.last_break
    }

    pub fn current_break_total(&self) -> u32 {
        break_size(&self.current_break)
    }

    pub fn last_break_total(&self) -> u32 {
        break_size(&self.last_break)
    }

    pub fn frame_shots(&self) -> u32 {
        self.frame_shots
    }

    /// Среднее время удара во фрейме, `None` если ударов ещё не было.
    pub fn average_shot_time_ms(&self) -> Option<i64> {
        if self.frame_shots == 0 {
            return None;
        }
        Some(self.frame_shot_time_ms / self.frame_shots as i64)
    }

    pub fn time_since_last_pot_ms(&self, now: Timestamp) -> Option<i64> {
        if self.last_pot_timestamp == 0 {
            return None;
        }
        Some(now - self.last_pot_timestamp)
    }

    /// Сравнение по очкам во фрейме.
    pub fn compare(&self, other: &Player) -> Ordering {
        self.points.cmp(&other.points)
    }

    /// Сравнение по выигранным фреймам.
    pub fn compare_frames(&self, other: &Player) -> Ordering {
        self.frame_wins.cmp(&other.frame_wins)
    }
}

fn break_size(entries: &[i32]) -> u32 {
    entries.iter().filter(|&&v| v > 0).map(|&v| v as u32).sum()
}
