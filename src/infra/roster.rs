//! Сохранённые имена игроков (последний состав).

use tracing::warn;

use crate::domain::default_names;
use crate::infra::persistence::{PersistenceError, SaveStore};

pub const NAMES_KEY: &str = "snooker-names";

/// Загрузить имена. Нет записи или запись битая — имена по умолчанию.
pub fn load_names<S: SaveStore>(store: &S) -> Result<[String; 2], PersistenceError> {
    let json = match store.get(NAMES_KEY)? {
        Some(json) => json,
        None => return Ok(default_names()),
    };

    match serde_json::from_str::<Vec<String>>(&json) {
        Ok(names) if names.len() == 2 => {
            let mut it = names.into_iter();
            match (it.next(), it.next()) {
                (Some(a), Some(b)) => Ok([a, b]),
                _ => Ok(default_names()),
            }
        }
        Ok(names) => {
            warn!(len = names.len(), "stored roster must hold exactly two names");
            Ok(default_names())
        }
        Err(e) => {
            warn!(error = %e, "stored roster is not valid JSON");
            Ok(default_names())
        }
    }
}

pub fn save_names<S: SaveStore>(store: &mut S, names: &[String; 2]) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(names)?;
    store.set(NAMES_KEY, &json)
}
