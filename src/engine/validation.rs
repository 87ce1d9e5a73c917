use crate::domain::{Ball, PlayerId};
use crate::engine::actions::MatchAction;
use crate::engine::errors::EngineError;
use crate::engine::match_state::MatchState;

/// Проверка, можно ли применить действие к текущему состоянию.
///
/// Каждый вариант `MatchAction` сводится к своему предикату `can_*`.
pub fn validate_action(state: &MatchState, action: &MatchAction) -> Result<(), EngineError> {
    let allowed = match *action {
        MatchAction::PotBall(value) => state.can_pot_ball(value),
        MatchAction::CommitFoul(value) => state.can_commit_foul(value),
        MatchAction::EndTurn => state.can_end_turn(),
        MatchAction::EndFrame => state.can_end_frame(),
        MatchAction::NewFrame => state.can_new_frame(),
        MatchAction::AdjustBalls(delta) => state.can_adjust_balls(delta),
        MatchAction::EditPoints { pid, delta } => {
            // Неизвестный pid — нарушение инварианта, а не просто "нельзя".
            state.player(pid)?;
            state.can_edit_points(pid, delta)
        }
    };

    if allowed {
        Ok(())
    } else {
        Err(EngineError::IllegalAction(action.clone()))
    }
}

pub fn can_apply(state: &MatchState, action: &MatchAction) -> bool {
    validate_action(state, action).is_ok()
}

/// Все действия, которые UI может предложить прямо сейчас.
///
/// Правка очков перечисляется как ±1 для каждого игрока.
pub fn legal_actions(state: &MatchState) -> Vec<MatchAction> {
    let mut candidates = Vec::new();

    for ball in Ball::ALL {
        candidates.push(MatchAction::PotBall(ball.value()));
    }
    for ball in Ball::ALL {
        candidates.push(MatchAction::CommitFoul(ball.value()));
    }

    candidates.push(MatchAction::EndTurn);
    candidates.push(MatchAction::EndFrame);
    candidates.push(MatchAction::NewFrame);
    candidates.push(MatchAction::AdjustBalls(1));
    candidates.push(MatchAction::AdjustBalls(-1));

    for pid in [0 as PlayerId, 1] {
        candidates.push(MatchAction::EditPoints { pid, delta: 1 });
        candidates.push(MatchAction::EditPoints { pid, delta: -1 });
    }

    candidates
        .into_iter()
        .filter(|a| can_apply(state, a))
        .collect()
}
