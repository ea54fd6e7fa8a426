//! # Localization Module
//!
//! Fluent-based message catalogs for the bot's outbound text. Spanish is
//! the default language (the bot's home audience); English is supported
//! for users whose Telegram client reports it. Catalogs live under
//! `locales/<lang>/main.ftl`.

use anyhow::Result;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::fs;
use std::sync::OnceLock;
use unic_langid::LanguageIdentifier;

/// Fallback language for unsupported or missing language codes
pub const DEFAULT_LANGUAGE: &str = "es";
/// Languages with a catalog under `locales/`
pub const SUPPORTED_LANGUAGES: &[&str] = &["es", "en"];

/// Localization manager holding one Fluent bundle per supported language
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a new localization manager with all supported catalogs
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for lang in SUPPORTED_LANGUAGES {
            let locale: LanguageIdentifier = lang.parse()?;
            let bundle = Self::create_bundle(&locale)?;
            bundles.insert((*lang).to_string(), bundle);
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(locale: &LanguageIdentifier) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Rendered text must match the catalog byte-for-byte; Unicode
        // isolation marks around arguments would break exact-prompt tests
        // and look like garbage in some Telegram clients
        bundle.set_use_isolating(false);

        let resource_path = format!("./locales/{}/main.ftl", locale);
        if let Ok(content) = fs::read_to_string(&resource_path) {
            if let Ok(resource) = FluentResource::try_new(content) {
                let _ = bundle.add_resource(resource);
            }
        }

        Ok(bundle)
    }

    /// Whether a catalog was loaded for this language
    pub fn is_language_supported(&self, lang: &str) -> bool {
        self.bundles.contains_key(lang)
    }

    /// Get a localized message in a specific language, falling back to
    /// the default language for unknown languages
    pub fn get_message_in_language(
        &self,
        key: &str,
        lang: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self.bundles.get(lang) {
            Some(bundle) => bundle,
            None => match self.bundles.get(DEFAULT_LANGUAGE) {
                Some(bundle) => bundle,
                None => return format!("Missing translation: {}", key),
            },
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let mut value = String::new();

        if let Some(args) = args {
            let fluent_args = FluentArgs::from_iter(
                args.iter().map(|(k, v)| (*k, FluentValue::from(*v))),
            );
            let _ = bundle.write_pattern(&mut value, pattern, Some(&fluent_args), &mut vec![]);
        } else {
            let _ = bundle.write_pattern(&mut value, pattern, None, &mut vec![]);
        }

        value
    }

    /// Get a localized message in the default language
    pub fn get_message(&self, key: &str, args: Option<&HashMap<&str, &str>>) -> String {
        self.get_message_in_language(key, DEFAULT_LANGUAGE, args)
    }
}

/// Map a Telegram language code (e.g. "es", "en-US") to a supported
/// language, falling back to the default
pub fn detect_language(language_code: Option<&str>) -> &'static str {
    let code = language_code.unwrap_or(DEFAULT_LANGUAGE);
    let primary = code.split('-').next().unwrap_or(code);
    SUPPORTED_LANGUAGES
        .iter()
        .find(|lang| **lang == primary)
        .copied()
        .unwrap_or(DEFAULT_LANGUAGE)
}

/// Global localization instance
static LOCALIZATION_MANAGER: OnceLock<LocalizationManager> = OnceLock::new();

/// Initialize the global localization manager. Safe to call more than
/// once; later calls are no-ops.
pub fn init_localization() -> Result<()> {
    if LOCALIZATION_MANAGER.get().is_some() {
        return Ok(());
    }
    let manager = LocalizationManager::new()?;
    let _ = LOCALIZATION_MANAGER.set(manager);
    Ok(())
}

/// Get the global localization manager
pub fn get_localization_manager() -> &'static LocalizationManager {
    LOCALIZATION_MANAGER
        .get()
        .expect("Localization manager not initialized")
}

/// Convenience function: localized message for a user's language code
pub fn t_lang(key: &str, language_code: Option<&str>) -> String {
    let lang = detect_language(language_code);
    get_localization_manager().get_message_in_language(key, lang, None)
}

/// Convenience function: localized message with arguments
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
    let lang = detect_language(language_code);
    let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
    get_localization_manager().get_message_in_language(key, lang, Some(&args_map))
}
