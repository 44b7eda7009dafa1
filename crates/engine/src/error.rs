use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to open source '{path}': {source}")]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read source '{path}': {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write diff artifact '{path}': {source}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to close '{path}': {source}")]
    ResourceClose {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load language profiles from '{path}': {source}")]
    ProfileLoad {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid language profile '{name}' in '{path}': {reason}")]
    InvalidProfile {
        path: PathBuf,
        name: String,
        reason: &'static str,
    },

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
