//! Media types shared across the workspace

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Default TMDB image host
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Label used when a release year is missing
pub const UNKNOWN_YEAR: &str = "Unknown";

/// Identifier of a chat conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of media record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Feature film
    Movie,
    /// Television series
    Tv,
}

impl MediaKind {
    /// Search order used when listing results
    pub const ALL: [MediaKind; 2] = [MediaKind::Movie, MediaKind::Tv];

    /// Human readable name
    pub fn display_name(self) -> &'static str {
        match self {
            MediaKind::Movie => "Movie",
            MediaKind::Tv => "TV Show",
        }
    }

    /// Path segment used by the TMDB API
    pub fn path_segment(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lightweight search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSummary {
    pub id: u64,
    pub title: String,
    pub kind: MediaKind,
    pub year: Option<i32>,
    /// Average vote, 0-10, rounded to one decimal
    pub rating: f64,
    pub poster_path: Option<String>,
}

impl MediaSummary {
    pub fn poster_available(&self) -> bool {
        self.poster_path.is_some()
    }

    /// Year for display, `Unknown` when absent
    pub fn year_label(&self) -> String {
        self.year
            .map_or_else(|| UNKNOWN_YEAR.to_string(), |year| year.to_string())
    }

    /// Title with year, e.g. `Dune (2021)`
    pub fn formatted_title(&self) -> String {
        format!("{} ({})", self.title, self.year_label())
    }
}

/// Full record fetched for one selected item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDetail {
    pub summary: MediaSummary,
    pub overview: String,
    pub genre_ids: BTreeSet<u32>,
    pub release_date: String,
}

impl MediaDetail {
    pub fn title(&self) -> &str {
        &self.summary.title
    }

    pub fn kind(&self) -> MediaKind {
        self.summary.kind
    }

    pub fn poster_available(&self) -> bool {
        self.summary.poster_available()
    }
}

/// Named genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Ordered genre list for one media kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreTable {
    genres: Vec<Genre>,
}

impl GenreTable {
    pub fn new(genres: Vec<Genre>) -> Self {
        Self { genres }
    }

    /// Names of the genres whose id is in `ids`, in table order.
    /// Ids missing from the table are dropped.
    pub fn resolve(&self, ids: &BTreeSet<u32>) -> Vec<&str> {
        self.genres
            .iter()
            .filter(|genre| ids.contains(&genre.id))
            .map(|genre| genre.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }
}

impl From<Vec<Genre>> for GenreTable {
    fn from(genres: Vec<Genre>) -> Self {
        Self::new(genres)
    }
}

/// Base URL for poster images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBase(String);

impl ImageBase {
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into().trim_end_matches('/').to_string())
    }

    /// Full-size poster URL
    pub fn poster_url(&self, summary: &MediaSummary) -> Option<String> {
        summary
            .poster_path
            .as_deref()
            .map(|path| format!("{}/original{path}", self.0))
    }

    /// Thumbnail URL (500px wide)
    pub fn thumbnail_url(&self, summary: &MediaSummary) -> Option<String> {
        summary
            .poster_path
            .as_deref()
            .map(|path| format!("{}/w500{path}", self.0))
    }
}

impl Default for ImageBase {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE)
    }
}

/// Extract the year from a `YYYY-MM-DD` date
pub fn parse_year(release_date: &str) -> Option<i32> {
    release_date
        .split('-')
        .next()
        .and_then(|year| year.trim().parse().ok())
}

/// Round a vote average to one decimal
pub fn round_rating(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
