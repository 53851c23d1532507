//! Error types shared across the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading or parsing the JSON configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Failures while loading a similarity index snapshot.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to read embedding file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed embedding entry on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("Dimension mismatch for '{word}': expected {expected}, got {got}")]
    DimensionMismatch {
        word: String,
        expected: usize,
        got: usize,
    },
    #[error("Vector for '{0}' has zero length and cannot be normalized")]
    ZeroVector(String),
    #[error("Embedding index contains no words")]
    Empty,
}

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or semantically invalid explicit board specification.
    #[error("Invalid setup: {0}")]
    InvalidSetup(String),

    /// Malformed vocabulary entry. Fatal at startup.
    #[error("Vocabulary error on line {line}: {reason}")]
    Vocabulary { line: usize, reason: String },

    #[error("Invalid clue: {0}")]
    InvalidClue(String),

    #[error("Invalid guess: {0}")]
    InvalidGuess(String),

    /// The computer spymaster exhausted every candidate without an admissible clue.
    #[error("Unable to produce a clue for the current board")]
    NoClueFound,

    /// Play-style combination that has no implementation.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
