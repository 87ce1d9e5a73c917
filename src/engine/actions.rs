use serde::{Deserialize, Serialize};

use crate::domain::{BallValue, PlayerId};

/// Действие, меняющее состояние матча.
///
/// Каждое действие проходит через `HistoryController::apply`,
/// который снимает снапшот до и после.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchAction {
    /// Забит шар: 1 — красный, 2..=7 — цвет.
    PotBall(BallValue),
    /// Фол на `value` очков в пользу соперника.
    CommitFoul(BallValue),
    /// Промах, ход переходит сопернику.
    EndTurn,
    /// Признать фрейм (только при разнице в очках).
    EndFrame,
    NewFrame,
    /// Ручная поправка количества шаров на +1 / -1.
    AdjustBalls(i32),
    /// Ручная поправка очков игрока.
    EditPoints { pid: PlayerId, delta: i64 },
}

impl MatchAction {
    /// Действия, которые считаются ударом и идут в статистику времени.
    pub fn is_shot(&self) -> bool {
        matches!(
            self,
            MatchAction::PotBall(_) | MatchAction::CommitFoul(_) | MatchAction::EndTurn
        )
    }
}
