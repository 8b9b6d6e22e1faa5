pub mod genre_urls;
pub mod traits;

pub use genre_urls::{CatalogGenreUrls, DEFAULT_GENRE_CATALOG_URL};
pub use traits::{
    GenreUrlResolver, PrimaryMetadataSource, ProviderError,
    ReferenceMetadataSource,
};
