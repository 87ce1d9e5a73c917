use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;
use crate::engine::{MatchAction, MatchPhase};
use crate::infra::slots::SaveGameId;

/// DTO игрока для табло.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerViewDto {
    pub pid: PlayerId,
    pub name: String,
    pub points: u32,
    pub frame_wins: u32,
    pub current_break: u32,
    pub last_break: u32,
    pub frame_high_break: u32,
    pub match_high_break: u32,
    pub frame_balls_potted: u32,
    pub match_balls_potted: u32,
    /// Среднее время удара, "m:ss". `None`, пока ударов не было.
    pub average_shot_time: Option<String>,
    pub time_since_last_pot: Option<String>,
    pub is_current: bool,
    pub is_frame_winner: bool,
    pub is_match_winner: bool,
}

/// DTO всего табло: то, что UI рисует после каждого действия.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchViewDto {
    pub phase: MatchPhase,
    pub players: Vec<PlayerViewDto>,
    pub current_player_id: PlayerId,
    pub break_off_player_id: PlayerId,
    pub num_balls_on_table: u32,
    pub num_reds: u32,
    pub num_colors_remaining: u32,
    pub points_remaining: u32,
    pub red_just_potted: bool,
    pub foul: bool,
    pub respot_black: bool,
    pub frames_played: u32,
    /// 0 — без ограничения.
    pub max_frames: u32,
    pub frame_time: String,
    pub can_undo: bool,
    pub can_redo: bool,
    /// Какие кнопки сейчас активны.
    pub legal_actions: Vec<MatchAction>,
}

/// Итог одного игрока для отправки на сервер лиги.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FinalPlayerScoreDto {
    pub pid: PlayerId,
    pub name: String,
    pub frame_wins: u32,
    pub high_break: u32,
}

/// Итог матча (только после окончания матча).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FinalScoreDto {
    pub winner: PlayerId,
    pub frames_played: u32,
    pub players: Vec<FinalPlayerScoreDto>,
}

/// Ответ API на команду.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandResponse {
    /// Состояние табло после команды.
    MatchState(MatchViewDto),

    /// Слот пуст или повреждён — матча нет.
    NoMatch,
}

/// Ответ на запрос "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum QueryResponse {
    Match(Option<MatchViewDto>),
    FinalScore(Option<FinalScoreDto>),
    SavedGames(Vec<SaveGameId>),
}
