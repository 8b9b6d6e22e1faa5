//! Prune step applied to records before they are handed back to callers.
//!
//! Upstream records arrive with blank strings where a field is really
//! missing. Records are pruned so that "absent" has exactly one spelling
//! (`None`), which is also what the fill-if-empty merge rules test against.

use kizuna_model::{
    MetaDetails, PrimaryMetadata, PrimaryVideo, ReferenceMetadata,
    ReferenceVideo,
};

/// Returns `true` for `None` and for strings holding only whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|value| value.trim().is_empty())
}

/// Drops blank strings.
pub fn prune_text(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Stores `fallback` into `slot` when `slot` is blank. A populated `slot` is
/// never touched.
pub fn fill_if_empty(slot: &mut Option<String>, fallback: Option<&String>) {
    if is_blank(slot.as_deref()) {
        *slot = fallback.filter(|value| !value.trim().is_empty()).cloned();
    }
}

/// Removes empty optional values from a record.
pub trait Prune: Sized {
    fn prune(self) -> Self;
}

impl Prune for MetaDetails {
    fn prune(mut self) -> Self {
        self.description = prune_text(self.description);
        self.poster = prune_text(self.poster);
        self.runtime = prune_text(self.runtime);
        self.rating = prune_text(self.rating);
        self.genres.retain(|genre| !genre.trim().is_empty());
        self.links
            .retain(|link| !link.url.trim().is_empty() && !link.name.is_empty());
        self
    }
}

impl Prune for PrimaryVideo {
    fn prune(mut self) -> Self {
        self.thumbnail = prune_text(self.thumbnail);
        self.overview = prune_text(self.overview);
        self
    }
}

impl Prune for ReferenceVideo {
    fn prune(mut self) -> Self {
        self.title = prune_text(self.title);
        self.thumbnail = prune_text(self.thumbnail);
        self.overview = prune_text(self.overview);
        self
    }
}

impl Prune for PrimaryMetadata {
    fn prune(mut self) -> Self {
        self.details = self.details.prune();
        self.videos = self.videos.into_iter().map(Prune::prune).collect();
        self
    }
}

impl Prune for ReferenceMetadata {
    fn prune(mut self) -> Self {
        self.details = self.details.prune();
        self.videos = self.videos.into_iter().map(Prune::prune).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kizuna_model::MetaLink;

    #[test]
    fn fill_if_empty_keeps_populated_values() {
        let mut slot = Some("24 min".to_string());
        fill_if_empty(&mut slot, Some(&"30 min".to_string()));
        assert_eq!(slot.as_deref(), Some("24 min"));

        let mut blank = Some("  ".to_string());
        fill_if_empty(&mut blank, Some(&"30 min".to_string()));
        assert_eq!(blank.as_deref(), Some("30 min"));

        let mut missing = None;
        fill_if_empty(&mut missing, Some(&String::new()));
        assert_eq!(missing, None);
    }

    #[test]
    fn details_prune_drops_blank_fields() {
        let details = MetaDetails {
            name: "Naruto".into(),
            description: Some(String::new()),
            rating: Some("8.3".into()),
            genres: vec!["Action".into(), " ".into()],
            links: vec![
                MetaLink::new("Action", "Genres", "stremio:///x"),
                MetaLink::new("Broken", "Genres", ""),
            ],
            ..MetaDetails::default()
        }
        .prune();

        assert_eq!(details.description, None);
        assert_eq!(details.rating.as_deref(), Some("8.3"));
        assert_eq!(details.genres, ["Action"]);
        assert_eq!(details.links.len(), 1);
    }
}
