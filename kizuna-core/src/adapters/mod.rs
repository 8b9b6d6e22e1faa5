//! Normalization of upstream record shapes into the canonical model.
//!
//! Upstream catalogs disagree on field names (`episode` vs `number`, `title`
//! vs `name`) and on date formats. The raw types here accept every known
//! spelling and convert into [`kizuna_model`] types before any alignment runs.

pub mod primary;
pub mod reference;

use chrono::{DateTime, NaiveDate, Utc};

pub use primary::{
    EpisodeRecord, RawPrimaryVideo, placeholder_catalog,
    primary_catalog_from_episodes, primary_videos_from_raw,
    rating_from_average,
};
pub use reference::{RawReferenceVideo, reference_videos_from_raw};

/// Parses an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_release_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accepts_timestamps_and_plain_dates() {
        let midnight = Utc.with_ymd_and_hms(2013, 4, 7, 0, 0, 0).unwrap();
        assert_eq!(parse_release_date("2013-04-07"), Some(midnight));
        assert_eq!(
            parse_release_date("2013-04-07T02:00:00+02:00"),
            Some(midnight)
        );
        assert_eq!(parse_release_date("07/04/2013"), None);
        assert_eq!(parse_release_date(""), None);
    }
}
