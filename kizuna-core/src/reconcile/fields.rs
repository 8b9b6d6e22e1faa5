//! Field-level merge of descriptive metadata.

use kizuna_model::{GENRE_LINK_CATEGORY, MetaDetails, MetaLink};

use crate::prune::{fill_if_empty, is_blank};
use crate::providers::GenreUrlResolver;

/// Generic genre that reference catalogs attach to every anime title.
pub const GENERIC_ANIMATION_GENRE: &str = "Animation";

/// Whether the generic animation genre is kept when genres are pulled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationGenre {
    Keep,
    Drop,
}

impl AnimationGenre {
    fn admits(self, genre: &str) -> bool {
        self == AnimationGenre::Keep || genre != GENERIC_ANIMATION_GENRE
    }
}

/// Merges `counterpart` into `destination` without overwriting anything the
/// destination already knows.
///
/// Runtime and rating are filled only when missing. Genres are replaced as a
/// whole only when the destination has none, and counterpart genre links are
/// then appended with their URL rebuilt by `genre_urls`. Counterpart rating
/// links are appended only when the destination had no rating of its own, so
/// a kept rating is never paired with the counterpart's link.
pub fn merge_details(
    destination: &mut MetaDetails,
    counterpart: &MetaDetails,
    genre_urls: &dyn GenreUrlResolver,
    animation: AnimationGenre,
) {
    let rating_was_empty = is_blank(destination.rating.as_deref());

    fill_if_empty(&mut destination.runtime, counterpart.runtime.as_ref());
    fill_if_empty(&mut destination.rating, counterpart.rating.as_ref());

    let genres_were_empty =
        destination.genres.iter().all(|genre| genre.trim().is_empty());

    if genres_were_empty {
        destination.genres = counterpart
            .genres
            .iter()
            .filter(|genre| !genre.trim().is_empty())
            .filter(|genre| animation.admits(genre))
            .cloned()
            .collect();
    }

    if rating_was_empty && !destination.has_rating_link() {
        destination.links.extend(
            counterpart
                .links
                .iter()
                .filter(|link| link.is_rating())
                .cloned(),
        );
    }

    if genres_were_empty && !destination.has_genre_links() {
        destination.links.extend(
            counterpart
                .links
                .iter()
                .filter(|link| link.is_genre())
                .filter(|link| animation.admits(&link.name))
                .map(|link| {
                    MetaLink::new(
                        link.name.clone(),
                        GENRE_LINK_CATEGORY,
                        genre_urls.genre_url(&link.name),
                    )
                }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kizuna_model::RATING_LINK_CATEGORY;

    struct Plain;

    impl GenreUrlResolver for Plain {
        fn genre_url(&self, genre: &str) -> String {
            format!("genre://{genre}")
        }
    }

    fn counterpart() -> MetaDetails {
        MetaDetails {
            name: "Counterpart".into(),
            runtime: Some("24 min".into()),
            rating: Some("8.1".into()),
            genres: vec!["Animation".into(), "Action".into()],
            links: vec![
                MetaLink::new("8.1", RATING_LINK_CATEGORY, "https://imdb/tt1"),
                MetaLink::new("Animation", GENRE_LINK_CATEGORY, "cinemeta://a"),
                MetaLink::new("Action", GENRE_LINK_CATEGORY, "cinemeta://b"),
            ],
            ..MetaDetails::default()
        }
    }

    #[test]
    fn empty_destination_takes_everything_but_animation() {
        let mut destination = MetaDetails::default();
        merge_details(&mut destination, &counterpart(), &Plain, AnimationGenre::Drop);

        assert_eq!(destination.runtime.as_deref(), Some("24 min"));
        assert_eq!(destination.rating.as_deref(), Some("8.1"));
        assert_eq!(destination.genres, ["Action"]);
        assert_eq!(
            destination.links,
            [
                MetaLink::new("8.1", RATING_LINK_CATEGORY, "https://imdb/tt1"),
                MetaLink::new("Action", GENRE_LINK_CATEGORY, "genre://Action"),
            ]
        );
    }

    #[test]
    fn populated_genres_block_genres_and_genre_links() {
        let mut destination = MetaDetails {
            genres: vec!["Comedy".into()],
            rating: Some("7.0".into()),
            ..MetaDetails::default()
        };
        merge_details(&mut destination, &counterpart(), &Plain, AnimationGenre::Drop);

        assert_eq!(destination.genres, ["Comedy"]);
        assert_eq!(destination.rating.as_deref(), Some("7.0"));
        assert!(!destination.has_genre_links());
    }

    #[test]
    fn kept_rating_gets_no_counterpart_rating_link() {
        let mut destination = MetaDetails {
            rating: Some("7.0".into()),
            ..MetaDetails::default()
        };
        merge_details(&mut destination, &counterpart(), &Plain, AnimationGenre::Drop);

        assert_eq!(destination.rating.as_deref(), Some("7.0"));
        assert!(!destination.has_rating_link());
        assert_eq!(
            destination.links,
            [MetaLink::new("Action", GENRE_LINK_CATEGORY, "genre://Action")]
        );
    }

    #[test]
    fn keep_mode_retains_animation() {
        let mut destination = MetaDetails::default();
        merge_details(&mut destination, &counterpart(), &Plain, AnimationGenre::Keep);
        assert_eq!(destination.genres, ["Animation", "Action"]);
    }

    #[test]
    fn merging_twice_changes_nothing() {
        let mut once = MetaDetails::default();
        merge_details(&mut once, &counterpart(), &Plain, AnimationGenre::Drop);
        let mut twice = once.clone();
        merge_details(&mut twice, &counterpart(), &Plain, AnimationGenre::Drop);
        assert_eq!(once, twice);
    }
}
