//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::debug;

// Import router types
use crate::router::Router;

// Import message handler helpers
use super::message_handler::send_replies;

/// Handle callback queries from inline keyboards ("Comenzar" button)
pub async fn callback_handler(bot: Bot, q: CallbackQuery, router: Arc<Router>) -> Result<()> {
    let language_code = q.from.language_code.as_deref();
    debug!(user_id = %q.from.id, "Received callback query");

    if let (Some(data), Some(msg)) = (q.data.as_deref(), q.message.as_ref()) {
        let chat_id = msg.chat().id;
        let replies = router.handle_callback(chat_id.0, data).await;
        send_replies(&bot, chat_id, &replies, language_code).await?;
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;

    Ok(())
}
