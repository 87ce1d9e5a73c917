use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Ошибки слоя хранения.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Данные есть, но не проходят схему (битый JSON, не та длина массива, нет полей).
    #[error("Повреждённые данные сохранения: {0}")]
    Deserialization(String),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] io::Error),

    #[error("Ошибка сериализации: {0}")]
    Json(#[from] serde_json::Error),
}

/// Абстракция key-value хранилища для сохранений.
///
/// Контроллер истории получает его явно, вместо глобального состояния:
/// - in-memory для тестов и CLI;
/// - файловое для реального табло.
pub trait SaveStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Удалить ключ. Отсутствующий ключ — не ошибка.
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// Простая in-memory реализация для тестов и локального запуска.
#[derive(Debug, Default, Clone)]
pub struct InMemorySaveStore {
    entries: HashMap<String, String>,
}

impl InMemorySaveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SaveStore for InMemorySaveStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Хранилище "один ключ — один JSON-файл" в заданной директории.
#[derive(Debug, Clone)]
pub struct FileSaveStore {
    root: PathBuf,
}

impl FileSaveStore {
    /// Директория создаётся лениво, при первой записи.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PersistenceError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid store key '{}'", key),
            )));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl SaveStore for FileSaveStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)?;

        // Пишем во временный файл и переименовываем, чтобы не оставить полузаписанный слот.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
