use std::path::PathBuf;

use mimic_core::{QuestGraphError, UnknownLabel};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        source: toml::de::Error,
    },
    #[error("scene {scene}: {source}")]
    UnknownLabel { scene: u32, source: UnknownLabel },
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("invalid quest graph: {0}")]
    Quest(#[from] QuestGraphError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
