//! # Integration Tests
//!
//! End-to-end conversation flows through the router and the reply
//! renderer, using the same guide data as the shipped sample
//! configuration's ventas category.

use std::sync::Arc;

use chatsito::bot::render_reply;
use chatsito::guide_store::{Category, GuideEntry, GuideStore};
use chatsito::localization::init_localization;
use chatsito::matcher::MatcherConfig;
use chatsito::router::{Reply, Router, BEGIN_CALLBACK};
use chatsito::session::SessionStore;

const CHAT: i64 = 7;

fn fixture_router() -> Router {
    let ventas = Category {
        name: "ventas".to_string(),
        description: "Opciones relacionadas con ventas.".to_string(),
        guides: vec![GuideEntry {
            key: "abrir caja".to_string(),
            description: "Pasos para abrir caja.".to_string(),
            pdf: Some("manual.pdf".to_string()),
        }],
    };
    let store = Arc::new(
        GuideStore::from_parts(vec![ventas], vec!["hola".to_string()])
            .expect("fixture store should validate"),
    );
    Router::new(store, SessionStore::new(), MatcherConfig::default())
}

/// The full menu walk: comenzar → category → guide → answer → reset
#[tokio::test]
async fn test_menu_walk_to_guide_answer() {
    init_localization().expect("Failed to initialize localization");
    let router = fixture_router();

    // Welcome button pressed: the top menu lists "1. Ventas"
    let replies = router.handle_callback(CHAT, BEGIN_CALLBACK).await;
    assert_eq!(replies.len(), 1);
    let menu = render_reply(&replies[0], None);
    assert!(menu.text.contains("1. Ventas"), "menu was: {}", menu.text);

    // Selecting "1" opens the category and lists "1. Abrir caja"
    let replies = router.handle_text(CHAT, "1").await;
    assert_eq!(replies.len(), 1);
    let submenu = render_reply(&replies[0], None);
    assert!(
        submenu.text.contains("Has seleccionado la categoría: Ventas."),
        "submenu was: {}",
        submenu.text
    );
    assert!(submenu.text.contains("1. Abrir caja"), "submenu was: {}", submenu.text);

    // Selecting "1" again answers the guide and re-engages
    let replies = router.handle_text(CHAT, "1").await;
    assert_eq!(replies.len(), 2);
    let answer = render_reply(&replies[0], None);
    assert_eq!(
        answer.text,
        "Pasos para abrir caja.\n\nConsulta el PDF: manual.pdf"
    );
    assert_eq!(replies[1], Reply::Welcome);

    // The conversation is back in free-text mode
    assert_eq!(router.sessions().get(CHAT).await, None);
    assert!(router.sessions().is_empty().await);
}

/// Free-text search with no active session answers directly
#[tokio::test]
async fn test_free_text_search_without_session() {
    init_localization().expect("Failed to initialize localization");
    let router = fixture_router();

    let replies = router.handle_text(CHAT, "abrir caja").await;
    assert_eq!(replies.len(), 1);
    let answer = render_reply(&replies[0], None);
    assert_eq!(
        answer.text,
        "Pasos para abrir caja.\n\nConsulta el PDF: manual.pdf"
    );
    assert_eq!(router.sessions().get(CHAT).await, None);
}

/// Out-of-range selection renders the retry prompt and keeps state
#[tokio::test]
async fn test_invalid_selection_renders_retry_prompt() {
    init_localization().expect("Failed to initialize localization");
    let router = fixture_router();

    router.handle_callback(CHAT, BEGIN_CALLBACK).await;
    router.handle_text(CHAT, "ventas").await;

    let replies = router.handle_text(CHAT, "99").await;
    assert_eq!(replies, vec![Reply::InvalidSelection]);
    let prompt = render_reply(&replies[0], None);
    assert_eq!(prompt.text, "Opción no válida. Por favor, intenta nuevamente.");

    // Still inside the category: a valid retry works
    let replies = router.handle_text(CHAT, "1").await;
    assert_eq!(replies.len(), 2);
}

/// A guide without a PDF reference renders the description alone
#[tokio::test]
async fn test_guide_without_pdf_renders_description_only() {
    init_localization().expect("Failed to initialize localization");

    let reply = Reply::GuideAnswer {
        description: "Pasos para reportar una falla.".to_string(),
        pdf: None,
    };
    let rendered = render_reply(&reply, None);
    assert_eq!(rendered.text, "Pasos para reportar una falla.");
}

/// The welcome prompt carries the begin button; English clients get the
/// English catalog
#[tokio::test]
async fn test_welcome_rendering_and_language_selection() {
    init_localization().expect("Failed to initialize localization");

    let spanish = render_reply(&Reply::Welcome, None);
    assert!(spanish.text.contains("Chatsito"));
    assert!(spanish.keyboard.is_some());

    let english = render_reply(&Reply::Welcome, Some("en-US"));
    assert!(english.text.contains("I'm here to help"));
    assert_ne!(spanish.text, english.text);
}
