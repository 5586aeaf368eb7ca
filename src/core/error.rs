use thiserror::Error;

use crate::core::types::Category;

#[derive(Error, Debug)]
pub enum VrmError {
    #[error("Unknown parameter: {category}/{name}")]
    UnknownParameter { category: Category, name: String },

    #[error("Value {value} out of range [{min}, {max}] for {category}/{name}")]
    OutOfRange {
        category: Category,
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Empty command")]
    EmptyCommand,

    #[error("Natural language commands are disabled (no oracle credential)")]
    NaturalLanguageDisabled,

    #[error("A command is already being processed")]
    Busy,

    #[error("Command task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, VrmError>;
