use std::env;

use teloxide::{prelude::*, utils::command::BotCommands};

mod bot_state;
mod handlers;
mod models;
mod storage;

use crate::bot_state::BotState;
use crate::handlers::{command_handler, message_handler};
use crate::storage::JsonStore;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
enum Command {
    #[command(description = "начать работу с ботом")]
    Start,
    #[command(description = "добавить продукт")]
    Add,
    #[command(description = "посмотреть список")]
    List,
    #[command(description = "удалить продукт")]
    Remove,
    #[command(description = "редактировать продукт")]
    Edit,
    #[command(description = "настройки")]
    Settings,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Загружаем .env и инициализируем логирование
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Starting expiry tracker bot...");

    let token = env::var("BOT_TOKEN").expect("BOT_TOKEN must be set");

    let store_path = env::var("STORE_PATH").unwrap_or_else(|_| "products.json".to_string());
    let store = JsonStore::new(&store_path);
    let registry = store.load()?;
    log::info!("✅ Store loaded from {}: {} users", store_path, registry.len());

    let state = BotState::new(store, registry);

    let bot = Bot::new(token);

    // Фоновая задача с ежедневными напоминаниями
    let bot_clone = bot.clone();
    let state_clone = state.clone();
    tokio::spawn(async move {
        handlers::reminder_task(bot_clone, state_clone).await;
    });

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(Update::filter_message().endpoint(message_handler));

    log::info!("🚀 Starting dispatcher...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
