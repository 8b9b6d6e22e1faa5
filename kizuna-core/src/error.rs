use std::time::Duration;

use kizuna_model::ModelError;
use thiserror::Error;

use crate::providers::ProviderError;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Fetching {id} timed out after {after:?}")]
    Timeout { id: String, after: Duration },

    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
