use std::collections::HashMap;
use std::sync::Arc;

use teloxide::types::ChatId;
use tokio::sync::RwLock;

use crate::models::{Dialog, Product};
use crate::storage::JsonStore;

type Registry = Arc<RwLock<HashMap<ChatId, Vec<Product>>>>;
type Dialogs = Arc<RwLock<HashMap<ChatId, Dialog>>>;

/// Общее состояние бота: списки продуктов всех пользователей плюс
/// их текущие диалоги. Передаётся в обработчики через dptree.
#[derive(Clone)]
pub struct BotState {
    store: Arc<JsonStore>,
    registry: Registry,
    dialogs: Dialogs,
}

#[derive(Debug)]
pub enum BotStateError {
    /// Выбранная позиция вне показанного списка
    OutOfRange,
    /// Ответ пользователя не удалось прочитать как номер позиции
    InvalidSelection,
}

impl std::fmt::Display for BotStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotStateError::OutOfRange => write!(f, "Selection out of range"),
            BotStateError::InvalidSelection => write!(f, "Selection is not a valid number"),
        }
    }
}

impl std::error::Error for BotStateError {}

impl BotState {
    pub fn new(store: JsonStore, registry: HashMap<ChatId, Vec<Product>>) -> Self {
        Self {
            store: Arc::new(store),
            registry: Arc::new(RwLock::new(registry)),
            dialogs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Добавляет продукт в конец списка пользователя (список создаётся при
    /// первом добавлении). Дубликаты не проверяются.
    pub async fn add_product(&self, chat_id: ChatId, product: Product) {
        {
            let mut registry = self.registry.write().await;
            registry.entry(chat_id).or_default().push(product);
        }
        self.persist().await;
    }

    /// Список пользователя по возрастанию срока годности. Сортировка
    /// устойчивая: при равных датах сохраняется порядок добавления.
    pub async fn list_sorted(&self, chat_id: ChatId) -> Vec<Product> {
        let registry = self.registry.read().await;
        let mut products = registry.get(&chat_id).cloned().unwrap_or_default();
        products.sort_by_key(|p| p.expiry);
        products
    }

    /// Удаляет позицию `index` из отсортированного представления списка.
    /// Представление и удаление вычисляются под одной блокировкой записи,
    /// поэтому номер всегда указывает на тот же продукт, что был показан.
    pub async fn remove_at(
        &self,
        chat_id: ChatId,
        index: usize,
    ) -> Result<Product, BotStateError> {
        let removed = {
            let mut registry = self.registry.write().await;
            let products = registry.get_mut(&chat_id).ok_or(BotStateError::OutOfRange)?;

            let mut order: Vec<usize> = (0..products.len()).collect();
            order.sort_by_key(|&i| products[i].expiry);

            let slot = *order.get(index).ok_or(BotStateError::OutOfRange)?;
            products.remove(slot)
        };
        self.persist().await;
        Ok(removed)
    }

    /// Снимок всех списков для обхода напоминаний.
    pub async fn products_snapshot(&self) -> HashMap<ChatId, Vec<Product>> {
        self.registry.read().await.clone()
    }

    pub async fn get_dialog(&self, chat_id: ChatId) -> Dialog {
        let dialogs = self.dialogs.read().await;
        dialogs.get(&chat_id).cloned().unwrap_or_default()
    }

    pub async fn set_dialog(&self, chat_id: ChatId, dialog: Dialog) {
        let mut dialogs = self.dialogs.write().await;
        dialogs.insert(chat_id, dialog);
    }

    pub async fn reset_dialog(&self, chat_id: ChatId) {
        let mut dialogs = self.dialogs.write().await;
        dialogs.remove(&chat_id);
    }

    // Ошибка записи не прерывает операцию пользователя: данные остаются в
    // памяти, следующая мутация запишет файл снова.
    async fn persist(&self) {
        let snapshot = self.registry.read().await.clone();
        if let Err(e) = self.store.save(&snapshot) {
            log::warn!("⚠️ Failed to persist store, will retry on next change: {}", e);
        }
    }
}
