//! Episode alignment between the primary and reference numbering schemes.
//!
//! Forward alignment walks a primary catalog and places each episode in the
//! reference run described by its mapping entry. Inverse alignment walks a
//! reference catalog and assigns each video to the primary catalog owning its
//! slot. Both directions are pure except for the empty-catalog inverse branch,
//! which fetches the primary catalogs it synthesizes from.

pub mod forward;
pub mod inverse;
pub mod release;
pub mod window;

pub use forward::{
    align_primary_to_reference, align_primary_to_reference_with,
    is_placeholder_title,
};
pub use inverse::{
    align_reference_to_primary, align_reference_videos, fetch_primary_catalogs,
    needs_primary_catalogs, reference_videos_from_catalogs,
};
pub use release::ReleaseClamp;
pub use window::SeasonWindow;

/// What to do with a primary episode numbered past the last reference
/// episode known inside its window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Keep counting episodes in the last season of the window.
    #[default]
    ExtendLastSeason,
    /// Map linearly from the entry's start slot.
    Linear,
}

impl OverflowPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverflowPolicy::ExtendLastSeason => "extend_last_season",
            OverflowPolicy::Linear => "linear",
        }
    }
}

impl std::fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "extend_last_season" | "extend" => Ok(Self::ExtendLastSeason),
            "linear" => Ok(Self::Linear),
            other => Err(format!("unknown overflow policy `{other}`")),
        }
    }
}
