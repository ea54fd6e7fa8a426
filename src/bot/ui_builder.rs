//! UI Builder module for rendering replies and creating keyboards

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

// Import localization
use crate::localization::{t_args_lang, t_lang};

// Import router types
use crate::router::{Reply, BEGIN_CALLBACK};

/// A reply rendered to outbound message text, with an optional keyboard
#[derive(Debug, Clone)]
pub struct RenderedReply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

/// Presentation casing for a stored category name or guide key. Storage
/// keys stay lower-case; only the displayed first character is raised.
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Format items as a numbered menu, one per line, 1-based
pub fn format_numbered_list(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, display_name(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Inline keyboard with the single "begin" button of the welcome prompt
pub fn welcome_keyboard(language_code: Option<&str>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        t_lang("begin-button", language_code),
        BEGIN_CALLBACK.to_string(),
    )]])
}

/// Render a semantic reply into final localized message text
pub fn render_reply(reply: &Reply, language_code: Option<&str>) -> RenderedReply {
    match reply {
        Reply::Welcome => RenderedReply {
            text: t_lang("welcome-message", language_code),
            keyboard: Some(welcome_keyboard(language_code)),
        },
        Reply::CategoryMenu { names } => RenderedReply {
            text: format!(
                "{}\n\n{}\n\n{}",
                t_lang("categories-title", language_code),
                format_numbered_list(names),
                t_lang("categories-footer", language_code)
            ),
            keyboard: None,
        },
        Reply::GuideMenu {
            category,
            description,
            keys,
        } => RenderedReply {
            text: format!(
                "{}\n\n{}\n\n{}\n\n{}\n\n{}",
                t_args_lang(
                    "category-selected",
                    &[("category", display_name(category).as_str())],
                    language_code
                ),
                description,
                t_lang("category-options", language_code),
                format_numbered_list(keys),
                t_lang("category-footer", language_code)
            ),
            keyboard: None,
        },
        Reply::GuideAnswer { description, pdf } => {
            let text = match pdf {
                Some(pdf) => format!(
                    "{}\n\n{}",
                    description,
                    t_args_lang("guide-pdf", &[("pdf", pdf.as_str())], language_code)
                ),
                None => description.clone(),
            };
            RenderedReply {
                text,
                keyboard: None,
            }
        }
        Reply::InvalidSelection => RenderedReply {
            text: t_lang("invalid-selection", language_code),
            keyboard: None,
        },
        Reply::NotFound => RenderedReply {
            text: t_lang("not-found", language_code),
            keyboard: None,
        },
    }
}
