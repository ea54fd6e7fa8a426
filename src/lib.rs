//! # Chatsito Support Bot
//!
//! A menu-driven customer-support Telegram bot: it presents categories of
//! help guides, lets a user navigate via numbered menus or free-text
//! keyword search, and answers with a canned description plus an optional
//! PDF reference.

pub mod bot;
pub mod config_errors;
pub mod guide_store;
pub mod localization;
pub mod matcher;
pub mod router;
pub mod session;
