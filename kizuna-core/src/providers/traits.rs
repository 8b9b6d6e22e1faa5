use async_trait::async_trait;
use kizuna_model::{
    MetaType, PrimaryId, PrimaryMetadata, ReferenceId, ReferenceMetadata,
};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::ParseError(err.to_string())
    }
}

/// Source of title records in the reference (season/episode) catalog.
#[async_trait]
pub trait ReferenceMetadataSource: Send + Sync {
    /// Fetch the record for a reference title. `meta_type` is the type the
    /// caller expects, when known.
    async fn reference_metadata(
        &self,
        id: &ReferenceId,
        meta_type: Option<MetaType>,
    ) -> Result<ReferenceMetadata, ProviderError>;

    /// Get the provider name
    fn name(&self) -> &'static str;
}

/// Source of title records in the primary (sequential) catalog.
#[async_trait]
pub trait PrimaryMetadataSource: Send + Sync {
    async fn primary_metadata(
        &self,
        id: &PrimaryId,
    ) -> Result<PrimaryMetadata, ProviderError>;

    /// Get the provider name
    fn name(&self) -> &'static str;
}

/// Builds the catalog URL a genre link points at.
pub trait GenreUrlResolver: Send + Sync {
    fn genre_url(&self, genre: &str) -> String;
}
