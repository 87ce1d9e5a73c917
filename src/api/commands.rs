use serde::{Deserialize, Serialize};

use crate::domain::MatchOptions;
use crate::engine::{Clock, HistoryController, MatchAction, RandomSource};
use crate::infra::persistence::SaveStore;

use super::dto::CommandResponse;
use super::errors::ApiError;
use super::queries::build_controller_view;

/// Команда верхнего уровня от UI.
///
/// Всё, что меняет состояние, идёт через `execute` и дальше через
/// `HistoryController`; напрямую `MatchState` UI не трогает.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Command {
    /// Начать новый матч (история сбрасывается).
    NewMatch(MatchOptions),

    /// Действие по правилам (забил, фол, промах, ...).
    Action(MatchAction),

    Undo,
    Redo,

    /// Сохранить историю в слот.
    Save { slot: usize },

    /// Продолжить матч из слота.
    Load { slot: usize },
}

/// Выполнить команду и вернуть обновлённое табло.
pub fn execute<S, C, R>(
    controller: &mut HistoryController<S, C>,
    rng: &mut R,
    command: Command,
) -> Result<CommandResponse, ApiError>
where
    S: SaveStore,
    C: Clock,
    R: RandomSource,
{
    match command {
        Command::NewMatch(options) => controller.start_new_match(&options, rng)?,
        Command::Action(action) => controller.apply(action)?,
        Command::Undo => controller.undo()?,
        Command::Redo => controller.redo()?,
        Command::Save { slot } => controller.save_to(slot)?,
        Command::Load { slot } => {
            if !controller.load(slot)? {
                return Ok(CommandResponse::NoMatch);
            }
        }
    }

    match build_controller_view(controller) {
        Some(view) => Ok(CommandResponse::MatchState(view)),
        None => Err(ApiError::NoActiveMatch),
    }
}
