//! # Dialogue Router Module
//!
//! The per-conversation state machine. Each inbound message is interpreted
//! against the conversation's current [`SessionState`]: a menu selection, a
//! greeting, or a free-text query dispatched to the similarity matcher.
//!
//! The router is transport-free. It consumes parsed events and produces
//! semantic [`Reply`] values; the `bot` module renders those into localized
//! Telegram messages. Per-message failures (bad index, no fuzzy match)
//! always resolve to a reply; they never panic and never change state.

use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info};

use crate::guide_store::{GuideEntry, GuideStore};
use crate::matcher::{find_best_match, MatcherConfig};
use crate::session::{SessionState, SessionStore};

/// Callback data carried by the welcome button
pub const BEGIN_CALLBACK: &str = "comenzar";

/// The one command the router handles itself; all other `/`-prefixed
/// input is reserved for the transport's command dispatch
const START_COMMAND: &str = "/start";

lazy_static! {
    static ref SELECTION_REGEX: Regex =
        Regex::new(r"^\d+$").expect("selection pattern should be valid");
}

/// A transport-agnostic outbound reply
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Welcome prompt with the "begin" button
    Welcome,
    /// Top-level menu of category names, in display order
    CategoryMenu { names: Vec<String> },
    /// One category's guide menu
    GuideMenu {
        category: String,
        description: String,
        keys: Vec<String>,
    },
    /// A guide's canned answer
    GuideAnswer {
        description: String,
        pdf: Option<String>,
    },
    /// The input did not resolve to a valid menu selection; retry prompt
    InvalidSelection,
    /// Free-text search found nothing close enough
    NotFound,
}

/// Dialogue router over {Absent, AtTopMenu, InCategory} per conversation
pub struct Router {
    store: Arc<GuideStore>,
    sessions: SessionStore,
    matcher: MatcherConfig,
}

impl Router {
    pub fn new(store: Arc<GuideStore>, sessions: SessionStore, matcher: MatcherConfig) -> Self {
        Self {
            store,
            sessions,
            matcher,
        }
    }

    /// Session store handle, mainly for tests inspecting state
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Route one text message. Returns the replies to send, in order;
    /// an empty vector means the message is ignored.
    pub async fn handle_text(&self, chat_id: i64, text: &str) -> Vec<Reply> {
        let input = text.trim();

        if input.starts_with('/') {
            // /start resets unconditionally, from any state
            if is_start_command(input) {
                debug!(user_id = chat_id, "Start command, resetting session");
                self.sessions.clear(chat_id).await;
                return vec![Reply::Welcome];
            }
            return Vec::new();
        }

        match self.sessions.get(chat_id).await {
            Some(SessionState::AtTopMenu { categories }) => {
                self.handle_category_selection(chat_id, input, &categories)
                    .await
            }
            Some(SessionState::InCategory { category }) => {
                self.handle_guide_selection(chat_id, input, &category).await
            }
            None => self.handle_free_text(chat_id, input).await,
        }
    }

    /// Route an inline-button activation
    pub async fn handle_callback(&self, chat_id: i64, data: &str) -> Vec<Reply> {
        if data != BEGIN_CALLBACK {
            debug!(user_id = chat_id, data = %data, "Ignoring unknown callback data");
            return Vec::new();
        }

        let names = self.store.category_names();
        self.sessions
            .set(chat_id, SessionState::AtTopMenu { categories: names.clone() })
            .await;
        debug!(user_id = chat_id, "Showing top-level category menu");
        vec![Reply::CategoryMenu { names }]
    }

    async fn handle_category_selection(
        &self,
        chat_id: i64,
        input: &str,
        categories: &[String],
    ) -> Vec<Reply> {
        let Some(name) = resolve_selection(input, categories) else {
            debug!(user_id = chat_id, "Invalid category selection");
            return vec![Reply::InvalidSelection];
        };

        match self.store.get_category(&name) {
            Some(category) => {
                self.sessions
                    .set(
                        chat_id,
                        SessionState::InCategory { category: category.name.clone() },
                    )
                    .await;
                vec![Reply::GuideMenu {
                    category: category.name.clone(),
                    description: category.description.clone(),
                    keys: category.guide_keys(),
                }]
            }
            // The snapshot names a category the store no longer knows;
            // recover by starting over
            None => {
                self.sessions.clear(chat_id).await;
                vec![Reply::Welcome]
            }
        }
    }

    async fn handle_guide_selection(
        &self,
        chat_id: i64,
        input: &str,
        category_name: &str,
    ) -> Vec<Reply> {
        let Some(category) = self.store.get_category(category_name) else {
            self.sessions.clear(chat_id).await;
            return vec![Reply::Welcome];
        };

        match resolve_guide(input, &category.guides, self.matcher.category_threshold) {
            Some(guide) => {
                info!(user_id = chat_id, guide = %guide.key, "Guide delivered, session reset");
                let answer = Reply::GuideAnswer {
                    description: guide.description.clone(),
                    pdf: guide.pdf.clone(),
                };
                self.sessions.clear(chat_id).await;
                // Terminal answer, then proactive re-engagement
                vec![answer, Reply::Welcome]
            }
            None => {
                debug!(user_id = chat_id, category = %category_name, "Invalid guide selection");
                vec![Reply::InvalidSelection]
            }
        }
    }

    async fn handle_free_text(&self, chat_id: i64, input: &str) -> Vec<Reply> {
        if input.is_empty() {
            return vec![Reply::NotFound];
        }

        if self.store.is_greeting(input) {
            debug!(user_id = chat_id, "Greeting recognized");
            return vec![Reply::Welcome];
        }

        match find_best_match(input, self.store.all_guides(), self.matcher.global_threshold) {
            Some(guide) => {
                info!(user_id = chat_id, guide = %guide.key, "Free-text search hit");
                vec![Reply::GuideAnswer {
                    description: guide.description.clone(),
                    pdf: guide.pdf.clone(),
                }]
            }
            None => {
                debug!(user_id = chat_id, "Free-text search found nothing");
                vec![Reply::NotFound]
            }
        }
    }
}

fn is_start_command(input: &str) -> bool {
    // Accept "/start", "/start@BotName" and trailing arguments
    let command = input.split_whitespace().next().unwrap_or(input);
    let command = command.split('@').next().unwrap_or(command);
    command == START_COMMAND
}

/// Resolve a 1-based index or an exact case-insensitive name against the
/// displayed list. Numeric input out of [1, len] is invalid rather than
/// falling through to name matching.
fn resolve_selection(input: &str, items: &[String]) -> Option<String> {
    if SELECTION_REGEX.is_match(input) {
        let index: usize = input.parse().ok()?;
        if (1..=items.len()).contains(&index) {
            return Some(items[index - 1].clone());
        }
        return None;
    }

    let wanted = input.to_lowercase();
    items.iter().find(|item| item.to_lowercase() == wanted).cloned()
}

/// Resolve a guide within one category: 1-based index, exact key, or
/// fuzzy match against the category's guides.
fn resolve_guide<'a>(
    input: &str,
    guides: &'a [GuideEntry],
    threshold: f64,
) -> Option<&'a GuideEntry> {
    if SELECTION_REGEX.is_match(input) {
        let index: usize = input.parse().ok()?;
        if (1..=guides.len()).contains(&index) {
            return Some(&guides[index - 1]);
        }
        return None;
    }

    let wanted = input.to_lowercase();
    if let Some(guide) = guides.iter().find(|g| g.key.to_lowercase() == wanted) {
        return Some(guide);
    }

    find_best_match(input, guides.iter(), threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_start_command() {
        assert!(is_start_command("/start"));
        assert!(is_start_command("/start@ChatsitoBot"));
        assert!(is_start_command("/start deep-link-payload"));
        assert!(!is_start_command("/help"));
        assert!(!is_start_command("/started"));
    }

    #[test]
    fn test_resolve_selection_by_index_and_name() {
        let items = vec!["ventas".to_string(), "soporte".to_string()];
        assert_eq!(resolve_selection("1", &items).as_deref(), Some("ventas"));
        assert_eq!(resolve_selection("2", &items).as_deref(), Some("soporte"));
        assert_eq!(resolve_selection("Soporte", &items).as_deref(), Some("soporte"));
    }

    #[test]
    fn test_resolve_selection_rejects_out_of_range() {
        let items = vec!["ventas".to_string()];
        assert_eq!(resolve_selection("0", &items), None);
        assert_eq!(resolve_selection("2", &items), None);
        assert_eq!(resolve_selection("99999999999999999999", &items), None);
        assert_eq!(resolve_selection("finanzas", &items), None);
    }
}
