use serde::{Deserialize, Serialize};

use crate::domain::Timestamp;
use crate::engine::{legal_actions, Clock, HistoryController, MatchState};
use crate::infra::persistence::SaveStore;
use crate::time_ctrl::format_ms;

use super::dto::{
    FinalPlayerScoreDto, FinalScoreDto, MatchViewDto, PlayerViewDto, QueryResponse,
};

/// Запросы "только чтение". Снапшотов не создают.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Query {
    /// Текущее табло.
    GetMatch,

    /// Итог для сервера лиги.
    GetFinalScore,

    /// Каталог слотов сохранения.
    ListSaves,
}

pub fn run_query<S: SaveStore, C: Clock>(
    controller: &HistoryController<S, C>,
    query: &Query,
) -> QueryResponse {
    match query {
        Query::GetMatch => QueryResponse::Match(build_controller_view(controller)),
        Query::GetFinalScore => {
            QueryResponse::FinalScore(controller.current().and_then(build_final_score))
        }
        Query::ListSaves => QueryResponse::SavedGames(controller.saved_games().to_vec()),
    }
}

/// Табло для настоящего момента истории.
pub fn build_controller_view<S: SaveStore, C: Clock>(
    controller: &HistoryController<S, C>,
) -> Option<MatchViewDto> {
    let now = controller.clock().now_ms();
    controller
        .current()
        .map(|state| build_match_view(state, now, controller.can_undo(), controller.can_redo()))
}

/// Сформировать DTO табло из снапшота.
pub fn build_match_view(
    state: &MatchState,
    now: Timestamp,
    can_undo: bool,
    can_redo: bool,
) -> MatchViewDto {
    let players = state
        .players()
        .iter()
        .map(|p| PlayerViewDto {
            pid: p.pid(),
            name: p.name().to_string(),
            points: p.points,
            frame_wins: p.frame_wins,
            current_break: p.current_break_total(),
            last_break: p.last_break_total(),
            frame_high_break: p.frame_high_break,
            match_high_break: p.match_high_break,
            frame_balls_potted: p.frame_balls_potted,
            match_balls_potted: p.match_balls_potted,
            average_shot_time: p.average_shot_time_ms().map(format_ms),
            time_since_last_pot: p.time_since_last_pot_ms(now).map(format_ms),
            is_current: state.is_current_player(p.pid()),
            is_frame_winner: state.is_frame_winner(p.pid()),
            is_match_winner: state.is_match_winner(p.pid()),
        })
        .collect();

    MatchViewDto {
        phase: state.phase(),
        players,
        current_player_id: state.current_player_id(),
        break_off_player_id: state.break_off_player_id(),
        num_balls_on_table: state.num_balls_on_table(),
        num_reds: state.num_reds(),
        num_colors_remaining: state.num_colors_remaining(),
        points_remaining: state.points_remaining_on_table(),
        red_just_potted: state.red_just_potted(),
        foul: state.foul(),
        respot_black: state.respot_black(),
        frames_played: state.frames_played(),
        max_frames: state.max_frames(),
        frame_time: format_ms(state.frame_time_ms(now)),
        can_undo,
        can_redo,
        legal_actions: legal_actions(state),
    }
}

/// Итог матча для сервера лиги: победы во фреймах и лучший брейк матча.
/// `None`, пока матч не закончен.
pub fn build_final_score(state: &MatchState) -> Option<FinalScoreDto> {
    let winner = state.match_winner()?;

    let players = state
        .players()
        .iter()
        .map(|p| FinalPlayerScoreDto {
            pid: p.pid(),
            name: p.name().to_string(),
            frame_wins: p.frame_wins,
            high_break: p.match_high_break,
        })
        .collect();

    Some(FinalScoreDto {
        winner,
        frames_played: state.frames_played(),
        players,
    })
}
