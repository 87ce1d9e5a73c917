//! Настройки матча: сколько красных, до скольки фреймов, кто разбивает, имена.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ball::NUM_COLORS;
use crate::domain::PlayerId;

/// Сколько красных на столе. Только три варианта, не произвольное число.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RedsMode {
    Six,
    Ten,
    #[default]
    Fifteen,
}

impl RedsMode {
    pub const ALL: [RedsMode; 3] = [RedsMode::Six, RedsMode::Ten, RedsMode::Fifteen];

    pub fn num_reds(self) -> u32 {
        match self {
            RedsMode::Six => 6,
            RedsMode::Ten => 10,
            RedsMode::Fifteen => 15,
        }
    }

    /// Полный набор шаров на столе в начале фрейма.
    pub fn max_balls(self) -> u32 {
        self.num_reds() + NUM_COLORS
    }

    pub fn from_num_reds(num_reds: u32) -> Option<RedsMode> {
        RedsMode::ALL.iter().copied().find(|m| m.num_reds() == num_reds)
    }
}

/// Кто разбивает первый фрейм.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BreakOff {
    Player(PlayerId),
    /// Жребий (через `RandomSource`).
    Random,
}

impl Default for BreakOff {
    fn default() -> Self {
        BreakOff::Player(0)
    }
}

/// Ошибки валидации настроек.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("Имя игрока {0} пустое")]
    EmptyName(PlayerId),

    #[error("Имя '{0}' использовано дважды")]
    DuplicateName(String),

    #[error("Игрок {0} не может разбивать: допустимы только 0 и 1")]
    InvalidBreakOffPlayer(PlayerId),
}

/// Конфиг матча, который приходит от экрана настроек.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchOptions {
    pub reds: RedsMode,
    /// Best-of-N. 0 — без ограничения.
    pub max_frames: u32,
    pub break_off: BreakOff,
    /// Имена игроков, индекс = pid.
    pub names: [String; 2],
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            reds: RedsMode::default(),
            max_frames: 0,
            break_off: BreakOff::default(),
            names: default_names(),
        }
    }
}

impl MatchOptions {
    pub fn new(names: [String; 2]) -> Self {
        Self {
            names,
            ..Self::default()
        }
    }

    pub fn with_reds(mut self, reds: RedsMode) -> Self {
        self.reds = reds;
        self
    }

    pub fn with_max_frames(mut self, max_frames: u32) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn with_break_off(mut self, break_off: BreakOff) -> Self {
        self.break_off = break_off;
        self
    }

    /// Имена непустые и не совпадают без учёта регистра, pid разбивающего валиден.
    pub fn validate(&self) -> Result<(), OptionsError> {
        for (pid, name) in self.names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(OptionsError::EmptyName(pid as PlayerId));
            }
        }

        if self.names[0].to_uppercase() == self.names[1].to_uppercase() {
            return Err(OptionsError::DuplicateName(self.names[1].clone()));
        }

        if let BreakOff::Player(pid) = self.break_off {
            if pid > 1 {
                return Err(OptionsError::InvalidBreakOffPlayer(pid));
            }
        }

        Ok(())
    }
}

/// "Player 1" / "Player 2".
pub fn default_names() -> [String; 2] {
    [String::from("Player 1"), String::from("Player 2")]
}
