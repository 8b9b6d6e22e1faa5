use url::Url;

use super::traits::GenreUrlResolver;

/// Default catalog the genre links point at.
pub const DEFAULT_GENRE_CATALOG_URL: &str =
    "stremio:///discover/kitsu/anime/kitsu-anime-list";

/// Resolves genre links to a catalog URL filtered by `genre`.
#[derive(Debug, Clone)]
pub struct CatalogGenreUrls {
    base: Url,
}

impl CatalogGenreUrls {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    pub fn parse(base: &str) -> Result<Self, url::ParseError> {
        Url::parse(base).map(Self::new)
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

impl Default for CatalogGenreUrls {
    fn default() -> Self {
        Self::parse(DEFAULT_GENRE_CATALOG_URL)
            .expect("default genre catalog url is valid")
    }
}

impl GenreUrlResolver for CatalogGenreUrls {
    fn genre_url(&self, genre: &str) -> String {
        let mut url = self.base.clone();
        url.query_pairs_mut().append_pair("genre", genre);
        url.to_string()
    }
}
