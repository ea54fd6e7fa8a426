//! # Guide Store Module
//!
//! This module loads the help-guide catalog from JSON configuration
//! documents into a strongly-typed, read-only model.
//!
//! ## Layout
//!
//! A manifest document names the categories and points each one at a guide
//! document:
//!
//! ```json
//! {
//!   "categorias": {
//!     "ventas": { "descripcion": "Opciones relacionadas con ventas.", "guias": "guia_ventas.json" }
//!   },
//!   "saludos": ["hola", "buenas"]
//! }
//! ```
//!
//! Each guide document maps a guide key to its canned answer:
//!
//! ```json
//! { "abrir caja": { "descripcion": "Pasos para abrir caja.", "pdf": "manual.pdf" } }
//! ```
//!
//! Category and guide order is the document insertion order, which is what
//! the numbered menus enumerate. All validation happens here, at load time;
//! nothing downstream ever sees a half-formed category.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config_errors::ConfigError;

/// Greeting phrases recognized when the manifest does not configure its own
pub const DEFAULT_GREETINGS: &[&str] = &[
    "hola",
    "buenas",
    "buenos días",
    "buenas tardes",
    "buenas noches",
    "hey",
    "hello",
    "hi",
];

/// A single help topic with a canned answer and an optional PDF reference
#[derive(Debug, Clone, PartialEq)]
pub struct GuideEntry {
    /// Lookup key, unique within its category (case-insensitive)
    pub key: String,
    /// The canned answer shown to the user
    pub description: String,
    /// Optional document reference appended to the answer
    pub pdf: Option<String>,
}

/// A named group of guides shown as one top-level menu entry
#[derive(Debug, Clone)]
pub struct Category {
    /// Category name, unique across the store (case-insensitive)
    pub name: String,
    /// Short description shown when the category is selected
    pub description: String,
    /// Guides in document insertion order
    pub guides: Vec<GuideEntry>,
}

impl Category {
    /// Case-insensitive guide lookup by key
    pub fn get_guide(&self, key: &str) -> Option<&GuideEntry> {
        let wanted = key.to_lowercase();
        self.guides.iter().find(|g| g.key.to_lowercase() == wanted)
    }

    /// Guide keys in menu order
    pub fn guide_keys(&self) -> Vec<String> {
        self.guides.iter().map(|g| g.key.clone()).collect()
    }
}

// Raw schemas as they appear in the JSON documents. Field names are the
// guide documents' Spanish schema. Required fields are modeled as Option
// so their absence surfaces as a ConfigError instead of a serde message.

#[derive(Debug, Deserialize)]
struct RawGuide {
    #[serde(default)]
    descripcion: Option<String>,
    #[serde(default)]
    pdf: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    #[serde(default)]
    descripcion: Option<String>,
    #[serde(default)]
    guias: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    categorias: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    saludos: Option<Vec<String>>,
}

/// Read-only catalog of categories and greeting phrases
///
/// Loaded once at startup and shared behind an `Arc`; there is no hot
/// reload. Menus displayed to users enumerate categories and guides in the
/// order they appear here.
#[derive(Debug)]
pub struct GuideStore {
    categories: Vec<Category>,
    greetings: Vec<String>,
}

impl GuideStore {
    /// Load the store from a manifest document and the guide documents it
    /// references. Guide paths are resolved relative to the manifest.
    pub fn load(manifest_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let manifest_path = manifest_path.as_ref();
        let raw = fs::read_to_string(manifest_path)
            .map_err(|e| ConfigError::Read(format!("{}: {e}", manifest_path.display())))?;
        let manifest: RawManifest = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", manifest_path.display())))?;

        let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));

        let mut categories = Vec::new();
        for (name, value) in manifest.categorias {
            let raw_category: RawCategory = serde_json::from_value(value)
                .map_err(|e| ConfigError::Parse(format!("category '{name}': {e}")))?;

            let description = require(raw_category.descripcion, &name, "descripcion")?;
            let guides_file = require(raw_category.guias, &name, "guias")?;

            let guides = load_guide_document(&base.join(&guides_file))?;
            categories.push(Category {
                name,
                description,
                guides,
            });
        }

        let greetings = manifest.saludos.unwrap_or_else(default_greetings);
        let store = Self::from_parts(categories, greetings)?;
        info!(
            categories = store.categories.len(),
            guides = store.all_guides().count(),
            "Guide configuration loaded"
        );
        Ok(store)
    }

    /// Build a store from already-parsed parts, applying the same
    /// validation as [`GuideStore::load`].
    pub fn from_parts(
        categories: Vec<Category>,
        greetings: Vec<String>,
    ) -> Result<Self, ConfigError> {
        if categories.is_empty() {
            return Err(ConfigError::MissingField(
                "manifest declares no categories".to_string(),
            ));
        }

        let mut seen_names = HashSet::new();
        for category in &categories {
            if !seen_names.insert(category.name.to_lowercase()) {
                return Err(ConfigError::Duplicate(format!(
                    "category '{}'",
                    category.name
                )));
            }
            if category.description.trim().is_empty() {
                return Err(ConfigError::MissingField(format!(
                    "category '{}': empty 'descripcion'",
                    category.name
                )));
            }
            if category.guides.is_empty() {
                return Err(ConfigError::EmptyCategory(category.name.clone()));
            }

            let mut seen_keys = HashSet::new();
            for guide in &category.guides {
                if !seen_keys.insert(guide.key.to_lowercase()) {
                    return Err(ConfigError::Duplicate(format!(
                        "guide '{}' in category '{}'",
                        guide.key, category.name
                    )));
                }
                if guide.description.trim().is_empty() {
                    return Err(ConfigError::MissingField(format!(
                        "guide '{}': empty 'descripcion'",
                        guide.key
                    )));
                }
            }
        }

        let greetings = greetings.into_iter().map(|g| g.to_lowercase()).collect();
        Ok(Self {
            categories,
            greetings,
        })
    }

    /// Case-insensitive category lookup by name
    pub fn get_category(&self, name: &str) -> Option<&Category> {
        let wanted = name.to_lowercase();
        self.categories
            .iter()
            .find(|c| c.name.to_lowercase() == wanted)
    }

    /// Categories in menu order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category names in menu order
    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    /// Every guide across all categories, in menu order. This is the
    /// candidate set for the cross-category free-text search.
    pub fn all_guides(&self) -> impl Iterator<Item = &GuideEntry> {
        self.categories.iter().flat_map(|c| c.guides.iter())
    }

    /// Whether the text is a recognized greeting (exact, case-insensitive)
    pub fn is_greeting(&self, text: &str) -> bool {
        let normalized = text.trim().to_lowercase();
        self.greetings.iter().any(|g| *g == normalized)
    }
}

fn default_greetings() -> Vec<String> {
    DEFAULT_GREETINGS.iter().map(|g| g.to_string()).collect()
}

fn require(field: Option<String>, owner: &str, name: &str) -> Result<String, ConfigError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingField(format!(
            "category '{owner}': missing '{name}'"
        ))),
    }
}

fn load_guide_document(path: &Path) -> Result<Vec<GuideEntry>, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ConfigError::Read(format!("{}: {e}", path.display())))?;
    let document: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw)
        .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;

    let mut guides = Vec::new();
    for (key, value) in document {
        let raw_guide: RawGuide = serde_json::from_value(value)
            .map_err(|e| ConfigError::Parse(format!("guide '{key}': {e}")))?;
        let description = raw_guide.descripcion.filter(|d| !d.trim().is_empty()).ok_or_else(|| {
            ConfigError::MissingField(format!("guide '{key}': missing 'descripcion'"))
        })?;
        guides.push(GuideEntry {
            key,
            description,
            pdf: raw_guide.pdf,
        });
    }
    Ok(guides)
}
