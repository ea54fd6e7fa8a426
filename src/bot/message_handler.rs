//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

// Import localization
use crate::localization::t_lang;

// Import router types
use crate::router::{Reply, Router};

// Import UI builder functions
use super::ui_builder::render_reply;

/// Language code the user's Telegram client reports, if any
pub(crate) fn language_code_of(msg: &Message) -> Option<&str> {
    msg.from
        .as_ref()
        .and_then(|user| user.language_code.as_ref())
        .map(|s| s.as_str())
}

/// Render and send router replies, in order
pub(crate) async fn send_replies(
    bot: &Bot,
    chat_id: ChatId,
    replies: &[Reply],
    language_code: Option<&str>,
) -> Result<()> {
    for reply in replies {
        let rendered = render_reply(reply, language_code);
        let mut request = bot.send_message(chat_id, rendered.text);
        if let Some(keyboard) = rendered.keyboard {
            request = request.reply_markup(keyboard);
        }
        request.await?;
    }
    Ok(())
}

pub async fn message_handler(bot: Bot, msg: Message, router: Arc<Router>) -> Result<()> {
    let language_code = language_code_of(&msg);

    if let Some(text) = msg.text() {
        debug!(user_id = %msg.chat.id, message_length = text.len(), "Received text message");
        let replies = router.handle_text(msg.chat.id.0, text).await;
        send_replies(&bot, msg.chat.id, &replies, language_code).await?;
    } else {
        // Photos, stickers, voice notes: the menu is text-only
        debug!(user_id = %msg.chat.id, "Received non-text message");
        bot.send_message(msg.chat.id, t_lang("text-only-hint", language_code))
            .await?;
    }

    Ok(())
}
