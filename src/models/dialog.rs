/// Состояние диалога пользователя. Не сохраняется между перезапусками.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dialog {
    #[default]
    Idle,
    /// Ждём название продукта после /add
    AwaitingName,
    /// Название получено, ждём дату срока годности
    AwaitingExpiry { name: String },
    /// Ждём выбор позиции из показанного списка после /remove
    AwaitingRemovalChoice,
}
