use std::error::Error;

use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;
use teloxide::prelude::*;

use crate::bot_state::BotState;
use crate::handlers::utils::{format_product_list, make_removal_keyboard};
use crate::models::Dialog;
use crate::Command;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    // Любая команда сбрасывает незавершённый диалог, чтобы пользователь
    // не застревал посреди добавления или удаления
    state.reset_dialog(msg.chat.id).await;

    match cmd {
        Command::Start => handle_start(bot, msg).await?,
        Command::Add => handle_add(bot, msg, state).await?,
        Command::List => handle_list(bot, msg, state).await?,
        Command::Remove => handle_remove(bot, msg, state).await?,
        Command::Edit => handle_edit(bot, msg).await?,
        Command::Settings => handle_settings(bot, msg).await?,
    }
    Ok(())
}

async fn handle_start(bot: Bot, msg: Message) -> Result<(), Box<dyn Error + Send + Sync>> {
    // Меню команд
    bot.set_my_commands(Command::bot_commands()).await?;

    bot.send_message(
        msg.chat.id,
        "👋 Привет! Я помогу отслеживать сроки годности продуктов.\n\n\
        Команды:\n\
        /add — Добавить продукт\n\
        /list — Посмотреть список\n\
        /remove — Удалить продукт\n\
        /edit — Редактировать продукт\n\
        /settings — Настройки",
    )
    .await?;

    Ok(())
}

async fn handle_add(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    state.set_dialog(msg.chat.id, Dialog::AwaitingName).await;
    bot.send_message(msg.chat.id, "Введите название продукта:")
        .await?;
    Ok(())
}

async fn handle_list(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let products = state.list_sorted(msg.chat.id).await;
    if products.is_empty() {
        bot.send_message(msg.chat.id, "📭 У вас нет добавленных продуктов.")
            .await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, format_product_list(&products))
        .parse_mode(ParseMode::MarkdownV2)
        .await?;
    Ok(())
}

async fn handle_remove(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let products = state.list_sorted(msg.chat.id).await;
    if products.is_empty() {
        bot.send_message(msg.chat.id, "❗ Список пуст.").await?;
        return Ok(());
    }

    state
        .set_dialog(msg.chat.id, Dialog::AwaitingRemovalChoice)
        .await;

    bot.send_message(msg.chat.id, "Выберите продукт для удаления:")
        .reply_markup(make_removal_keyboard(&products))
        .await?;
    Ok(())
}

async fn handle_edit(bot: Bot, msg: Message) -> Result<(), Box<dyn Error + Send + Sync>> {
    bot.send_message(
        msg.chat.id,
        "Редактирование пока в разработке. В следующей версии ✏️",
    )
    .await?;
    Ok(())
}

async fn handle_settings(bot: Bot, msg: Message) -> Result<(), Box<dyn Error + Send + Sync>> {
    bot.send_message(
        msg.chat.id,
        "⚙️ Настройки:\n- Уведомления включены по умолчанию\n(будет реализовано в следующей версии)",
    )
    .await?;
    Ok(())
}
