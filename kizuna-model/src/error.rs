use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    EmptyId(&'static str),
    InvalidPosition {
        field: &'static str,
        value: u32,
    },
    InvalidEpisode(u32),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::EmptyId(kind) => write!(f, "{kind} id cannot be empty"),
            ModelError::InvalidPosition { field, value } => {
                write!(f, "{field} must be at least 1, got {value}")
            }
            ModelError::InvalidEpisode(value) => {
                write!(f, "episode number must be at least 1, got {value}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
