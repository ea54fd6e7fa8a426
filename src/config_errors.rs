//! # Configuration Error Types Module
//!
//! This module defines the error types raised while loading the guide
//! configuration documents. All of them are fatal at startup: the bot
//! refuses to start on malformed configuration rather than serving a
//! partial menu.

/// Errors raised while loading and validating guide configuration
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// A configuration document could not be read
    Read(String),
    /// A configuration document is not valid JSON
    Parse(String),
    /// A required field is missing or empty
    MissingField(String),
    /// A category declares no guides
    EmptyCategory(String),
    /// A category name or guide key collides case-insensitively
    Duplicate(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(msg) => write!(f, "Read error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::MissingField(msg) => write!(f, "Missing field: {msg}"),
            ConfigError::EmptyCategory(msg) => write!(f, "Empty category: {msg}"),
            ConfigError::Duplicate(msg) => write!(f, "Duplicate name: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Read(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
