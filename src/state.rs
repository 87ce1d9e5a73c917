//! Формат хранения истории матча.
//!
//! Слот хранит JSON-массив снапшотов `MatchState`: индекс 0 — самый старый
//! (свежесозданный матч), последний — текущий. Декодирование явное:
//! serde проверяет наличие полей, затем каждый снапшот проверяет свои
//! инварианты, и вся последовательность — согласованность между собой.

use crate::domain::Timestamp;
use crate::engine::match_state::MatchState;
use crate::infra::persistence::PersistenceError;

/// Упаковать историю в JSON.
pub fn encode_snapshots(snapshots: &[MatchState]) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(snapshots)?)
}

/// Развернуть историю из JSON с полной валидацией.
pub fn decode_snapshots(json: &str) -> Result<Vec<MatchState>, PersistenceError> {
    let snapshots: Vec<MatchState> = serde_json::from_str(json)
        .map_err(|e| PersistenceError::Deserialization(e.to_string()))?;

    let first = snapshots
        .first()
        .ok_or_else(|| PersistenceError::Deserialization("empty snapshot array".to_string()))?;

    for (idx, s) in snapshots.iter().enumerate() {
        s.check_invariants()
            .map_err(|e| PersistenceError::Deserialization(format!("snapshot {}: {}", idx, e)))?;

        // Весь массив — один матч: тот же набор шаров и те же игроки.
        if s.max_balls() != first.max_balls() || s.max_frames() != first.max_frames() {
            return Err(PersistenceError::Deserialization(format!(
                "snapshot {}: match configuration differs from snapshot 0",
                idx
            )));
        }
        let same_names = s
            .players()
            .iter()
            .zip(first.players())
            .all(|(a, b)| a.name() == b.name());
        if !same_names {
            return Err(PersistenceError::Deserialization(format!(
                "snapshot {}: player names differ from snapshot 0",
                idx
            )));
        }
    }

    Ok(snapshots)
}

/// Время создания матча, сохранённого в слоте (по первому снапшоту).
pub fn first_snapshot_timestamp(json: &str) -> Result<Timestamp, PersistenceError> {
    let snapshots = decode_snapshots(json)?;
    Ok(snapshots[0].timestamp())
}
