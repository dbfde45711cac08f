use thiserror::Error;

use crate::core::types::CellType;

#[derive(Error, Debug)]
pub enum SchellingError {
    #[error("Unknown relocation policy: '{0}'")]
    InvalidPolicy(String),

    /// `moved` counts the relocations already applied in the failing step
    #[error(
        "No empty cell can satisfy a {mover} mover or any opposite-type unsatisfied cell ({moved} moves applied this step)"
    )]
    NoQualifyingDestination { mover: CellType, moved: usize },

    #[error("Degenerate configuration: {0}")]
    DegenerateConfiguration(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SchellingError>;
