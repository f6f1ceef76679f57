use std::error::Error;

use teloxide::prelude::*;
use teloxide::types::{KeyboardRemove, ReplyMarkup};

use crate::bot_state::BotState;
use crate::handlers::utils::{parse_expiry_date, parse_removal_choice};
use crate::models::{Dialog, Product};

/// Свободный текст: либо очередной шаг текущего диалога, либо подсказка.
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    // Команды уже обработаны в command_handler
    if text.starts_with('/') {
        return Ok(());
    }

    match state.get_dialog(msg.chat.id).await {
        Dialog::AwaitingName => {
            state
                .set_dialog(
                    msg.chat.id,
                    Dialog::AwaitingExpiry {
                        name: text.to_string(),
                    },
                )
                .await;
            bot.send_message(
                msg.chat.id,
                "Введите дату окончания срока годности (в формате ДД.ММ.ГГГГ):",
            )
            .await?;
        }

        Dialog::AwaitingExpiry { name } => match parse_expiry_date(text) {
            Ok(expiry) => {
                state
                    .add_product(msg.chat.id, Product::new(name.clone(), expiry))
                    .await;
                state.reset_dialog(msg.chat.id).await;

                log::info!("Product added for user {}", msg.chat.id);
                bot.send_message(
                    msg.chat.id,
                    format!("✅ Продукт '{}' добавлен с датой {}", name, text.trim()),
                )
                .await?;
            }
            // Диалог остаётся на этом шаге, попыток не ограничиваем
            Err(_) => {
                bot.send_message(
                    msg.chat.id,
                    "❗ Неверный формат. Введите дату в формате ДД.ММ.ГГГГ.",
                )
                .await?;
            }
        },

        Dialog::AwaitingRemovalChoice => {
            let removed = match parse_removal_choice(text) {
                Ok(index) => state.remove_at(msg.chat.id, index).await,
                Err(e) => Err(e),
            };

            match removed {
                Ok(product) => {
                    state.reset_dialog(msg.chat.id).await;

                    log::info!("Product removed for user {}", msg.chat.id);
                    bot.send_message(msg.chat.id, format!("🗑️ Продукт '{}' удалён.", product.name))
                        .reply_markup(ReplyMarkup::KeyboardRemove(KeyboardRemove::new()))
                        .await?;
                }
                // Пользователю обе ошибки выглядят одинаково; диалог ждёт
                // следующей попытки выбора
                Err(e) => {
                    log::debug!("Removal choice rejected for user {}: {}", msg.chat.id, e);
                    bot.send_message(msg.chat.id, "❗ Неверный выбор.").await?;
                }
            }
        }

        Dialog::Idle => {
            bot.send_message(
                msg.chat.id,
                "Я понимаю только команды: /add, /list, /remove, /edit, /settings.",
            )
            .await?;
        }
    }

    Ok(())
}
