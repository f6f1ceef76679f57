use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use teloxide::types::ChatId;

use crate::models::Product;

const SCHEMA_VERSION: u32 = 1;

/// Хранилище всех списков продуктов: один JSON-файл, перезаписываемый целиком
/// после каждого изменения.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
}

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Serde(serde_json::Error),
    InvalidKey(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "Storage I/O error: {}", e),
            StorageError::Serde(e) => write!(f, "Storage serialization error: {}", e),
            StorageError::InvalidKey(key) => write!(f, "Invalid chat id key in store: {}", key),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serde(err)
    }
}

// Ключи — chat_id строкой, чтобы формат файла не зависел от типов teloxide
#[derive(Serialize, Deserialize)]
struct StoreFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    users: HashMap<String, Vec<Product>>,
}

fn default_version() -> u32 {
    SCHEMA_VERSION
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Читает весь файл; отсутствующий файл означает пустое хранилище.
    pub fn load(&self) -> Result<HashMap<ChatId, Vec<Product>>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Store file {} not found, starting empty", self.path.display());
                return Ok(HashMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        let file: StoreFile = serde_json::from_str(&raw)?;
        if file.version != SCHEMA_VERSION {
            log::warn!(
                "Store schema version {} (expected {})",
                file.version,
                SCHEMA_VERSION
            );
        }

        let mut data = HashMap::with_capacity(file.users.len());
        for (key, products) in file.users {
            let id: i64 = key
                .parse()
                .map_err(|_| StorageError::InvalidKey(key.clone()))?;
            data.insert(ChatId(id), products);
        }
        Ok(data)
    }

    /// Перезаписывает файл целиком. Последняя запись побеждает.
    pub fn save(&self, data: &HashMap<ChatId, Vec<Product>>) -> Result<(), StorageError> {
        let file = StoreFile {
            version: SCHEMA_VERSION,
            users: data
                .iter()
                .map(|(chat_id, products)| (chat_id.0.to_string(), products.clone()))
                .collect(),
        };

        let raw = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, raw)?;

        log::debug!("💾 Store saved: {} users", data.len());
        Ok(())
    }
}
