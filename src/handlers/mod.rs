pub mod commands;
pub mod messages;
pub mod utils;

pub use commands::command_handler;
pub use messages::message_handler;

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tokio::time;

use crate::bot_state::BotState;
use crate::models::Product;

/// За сколько дней до истечения срока отправляются напоминания.
const REMINDER_DAYS: [i64; 3] = [3, 1, 0];

const SWEEP_INTERVAL_SECS: u64 = 86_400;

/// Фоновая задача: раз в сутки обходит все списки и рассылает напоминания.
/// Ошибка доставки одному пользователю не прерывает рассылку остальным.
pub async fn reminder_task(bot: Bot, state: BotState) {
    let mut interval = time::interval(time::Duration::from_secs(SWEEP_INTERVAL_SECS));

    loop {
        interval.tick().await;

        let today = Local::now().date_naive();
        let snapshot = state.products_snapshot().await;
        let reminders = due_reminders(&snapshot, today);

        log::info!("⏰ Reminder sweep: {} notifications due", reminders.len());

        for (chat_id, text) in reminders {
            if let Err(e) = bot.send_message(chat_id, text).await {
                log::warn!("Failed to deliver reminder to user {}: {}", chat_id, e);
            }
        }
    }
}

/// Один проход по всем продуктам: какие напоминания отправить сегодня.
/// Уже просроченные продукты и прочие сроки не дают уведомлений.
pub fn due_reminders(
    products: &HashMap<ChatId, Vec<Product>>,
    today: NaiveDate,
) -> Vec<(ChatId, String)> {
    let mut reminders = Vec::new();

    for (&chat_id, list) in products {
        for product in list {
            let days_left = product.days_left(today);
            if !REMINDER_DAYS.contains(&days_left) {
                continue;
            }

            let text = if days_left > 0 {
                format!(
                    "⏰ Напоминание! Срок годности '{}' истекает через {} дн.",
                    product.name, days_left
                )
            } else {
                format!("⚠️ Сегодня последний день для '{}'!", product.name)
            };
            reminders.push((chat_id, text));
        }
    }

    reminders
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(30, 8, 2026)
    }

    fn single_user(products: Vec<Product>) -> HashMap<ChatId, Vec<Product>> {
        HashMap::from([(ChatId(1), products)])
    }

    #[test]
    fn reminders_fire_only_at_three_one_and_zero_days() {
        let products = single_user(vec![
            Product::new("За три дня", date(2, 9, 2026)),
            Product::new("Завтра", date(31, 8, 2026)),
            Product::new("Сегодня", date(30, 8, 2026)),
            Product::new("За два дня", date(1, 9, 2026)),
            Product::new("Просрочен", date(29, 8, 2026)),
            Product::new("Далеко", date(1, 1, 2027)),
        ]);

        let reminders = due_reminders(&products, today());
        let texts: Vec<&str> = reminders.iter().map(|(_, t)| t.as_str()).collect();

        assert_eq!(reminders.len(), 3);
        assert!(texts
            .iter()
            .any(|t| t.contains("За три дня") && t.contains("через 3 дн.")));
        assert!(texts
            .iter()
            .any(|t| t.contains("Завтра") && t.contains("через 1 дн.")));
        assert!(texts
            .iter()
            .any(|t| t.contains("Сегодня") && t.contains("последний день")));
    }

    #[test]
    fn one_notification_per_product_per_sweep() {
        let products = single_user(vec![Product::new("Молоко", date(2, 9, 2026))]);

        let reminders = due_reminders(&products, today());
        assert_eq!(reminders.len(), 1);
    }

    #[test]
    fn each_user_is_notified_about_their_own_products() {
        let mut products = HashMap::new();
        products.insert(ChatId(1), vec![Product::new("Молоко", date(31, 8, 2026))]);
        products.insert(ChatId(2), vec![Product::new("Хлеб", date(30, 8, 2026))]);
        products.insert(ChatId(3), vec![Product::new("Далеко", date(1, 1, 2027))]);

        let reminders = due_reminders(&products, today());
        assert_eq!(reminders.len(), 2);

        let for_first: Vec<_> = reminders.iter().filter(|(id, _)| *id == ChatId(1)).collect();
        assert_eq!(for_first.len(), 1);
        assert!(for_first[0].1.contains("Молоко"));
    }

    #[test]
    fn empty_registry_produces_no_reminders() {
        assert!(due_reminders(&HashMap::new(), today()).is_empty());
    }
}
