//! Error types for configuration loading, registration and style parsing.
//!
//! Lexing itself never fails: unknown input is emitted as `Error` tokens.

use std::path::PathBuf;
use thiserror::Error;

use crate::token::TokenKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to evaluate {path}: {message}")]
    ConfPy { path: PathBuf, message: String },

    #[error("unsupported configuration format: {0}")]
    UnsupportedConfigFormat(PathBuf),

    #[error("no lexer registered under '{0}'")]
    LexerNotFound(String),

    #[error("no style registered under '{0}'")]
    StyleNotFound(String),

    #[error("unknown extension '{0}'")]
    ExtensionNotFound(String),

    #[error("invalid style directive for {kind}: '{directive}' ({reason})")]
    InvalidStyleDirective {
        kind: TokenKind,
        directive: String,
        reason: String,
    },

    #[error("name '{name}' appears in both the {first} and {second} sets")]
    OverlappingNames {
        name: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
