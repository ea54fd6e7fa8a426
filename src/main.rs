use anyhow::Result;
use std::env;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::info;

use chatsito::bot;
use chatsito::guide_store::GuideStore;
use chatsito::localization::init_localization;
use chatsito::matcher::MatcherConfig;
use chatsito::router::Router;
use chatsito::session::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting Chatsito support bot");

    // Get bot token and guide manifest path from environment
    let bot_token = env::var("TELEGRAM_BOT_TOKEN").expect("TELEGRAM_BOT_TOKEN must be set");
    let manifest_path =
        env::var("GUIDES_MANIFEST").unwrap_or_else(|_| "guias/guias.json".to_string());

    // Malformed configuration is fatal; the bot must not start on a
    // partial menu
    info!(manifest = %manifest_path, "Loading guide configuration");
    let store = Arc::new(GuideStore::load(&manifest_path)?);

    init_localization()?;

    let router = Arc::new(Router::new(
        store,
        SessionStore::new(),
        MatcherConfig::default(),
    ));

    // Initialize the bot
    let bot = Bot::new(bot_token);

    info!("Bot initialized, starting dispatcher");

    // Set up the dispatcher with the shared router
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint({
            let router = Arc::clone(&router);
            move |bot: Bot, msg: Message| {
                let router = Arc::clone(&router);
                async move { bot::message_handler(bot, msg, router).await }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let router = Arc::clone(&router);
            move |bot: Bot, q: CallbackQuery| {
                let router = Arc::clone(&router);
                async move { bot::callback_handler(bot, q, router).await }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
