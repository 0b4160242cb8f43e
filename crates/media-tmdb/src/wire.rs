//! TMDB response payloads and their conversion into media types

use media_core::media::{parse_year, round_rating};
use media_core::{Genre, GenreTable, MediaDetail, MediaKind, MediaSummary};
use serde::Deserialize;
use std::collections::BTreeSet;

const UNKNOWN_TITLE: &str = "Unknown Title";
const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const TRAILER_SIZE: u32 = 1080;

// ============================================================================
// Search and detail payloads
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct SearchPage {
    #[serde(default)]
    pub results: Vec<RawMedia>,
}

/// One movie or TV record. Movies carry `title`/`release_date`, TV shows
/// carry `name`/`first_air_date`. Search results list `genre_ids`, detail
/// responses list full `genres`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawMedia {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub vote_average: Option<f64>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl RawMedia {
    fn title_for(&self, kind: MediaKind) -> String {
        let (primary, secondary) = match kind {
            MediaKind::Movie => (&self.title, &self.name),
            MediaKind::Tv => (&self.name, &self.title),
        };
        primary
            .as_deref()
            .or(secondary.as_deref())
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(UNKNOWN_TITLE)
            .to_string()
    }

    fn release_date_for(&self, kind: MediaKind) -> &str {
        let date = match kind {
            MediaKind::Movie => &self.release_date,
            MediaKind::Tv => &self.first_air_date,
        };
        date.as_deref().unwrap_or_default()
    }

    pub fn into_summary(self, kind: MediaKind) -> MediaSummary {
        MediaSummary {
            id: self.id,
            title: self.title_for(kind),
            kind,
            year: parse_year(self.release_date_for(kind)),
            rating: round_rating(self.vote_average.unwrap_or_default()),
            poster_path: self.poster_path.filter(|path| !path.is_empty()),
        }
    }

    pub fn into_detail(mut self, kind: MediaKind) -> MediaDetail {
        let release_date = self.release_date_for(kind).to_string();
        let overview = self.overview.take().unwrap_or_default();
        let genre_ids: BTreeSet<u32> = self
            .genre_ids
            .iter()
            .copied()
            .chain(self.genres.iter().map(|genre| genre.id))
            .collect();

        MediaDetail {
            summary: self.into_summary(kind),
            overview,
            genre_ids,
            release_date,
        }
    }
}

// ============================================================================
// Videos and genres
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct VideoList {
    #[serde(default)]
    pub results: Vec<RawVideo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawVideo {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
    #[serde(default)]
    pub size: u32,
}

/// First full-HD YouTube trailer, as a watch URL
pub(crate) fn pick_trailer(videos: &[RawVideo]) -> Option<String> {
    videos
        .iter()
        .find(|video| {
            video.site == "YouTube" && video.video_type == "Trailer" && video.size == TRAILER_SIZE
        })
        .map(|video| format!("{YOUTUBE_WATCH_URL}{}", video.key))
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl From<GenreList> for GenreTable {
    fn from(list: GenreList) -> Self {
        GenreTable::new(list.genres)
    }
}

/// Error body returned with non-success statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub status_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_movie_search_result() {
        let page: SearchPage = serde_json::from_value(json!({
            "page": 1,
            "results": [{
                "id": 438631,
                "title": "Dune",
                "release_date": "2021-09-15",
                "vote_average": 7.784,
                "poster_path": "/d5NXSklXo0qyIYkgV94XAgMIckC.jpg",
                "overview": "Paul Atreides...",
                "genre_ids": [878, 12]
            }],
            "total_pages": 1,
            "total_results": 1
        }))
        .unwrap();

        let summary = page.results.into_iter().next().unwrap().into_summary(MediaKind::Movie);
        assert_eq!(summary.title, "Dune");
        assert_eq!(summary.year, Some(2021));
        assert!((summary.rating - 7.8).abs() < f64::EPSILON);
        assert!(summary.poster_available());
    }

    #[test]
    fn test_tv_search_result_uses_name_and_first_air_date() {
        let raw: RawMedia = serde_json::from_value(json!({
            "id": 1396,
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "vote_average": 8.9,
            "poster_path": null
        }))
        .unwrap();

        let summary = raw.into_summary(MediaKind::Tv);
        assert_eq!(summary.title, "Breaking Bad");
        assert_eq!(summary.kind, MediaKind::Tv);
        assert_eq!(summary.year, Some(2008));
        assert!(!summary.poster_available());
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let raw: RawMedia = serde_json::from_value(json!({ "id": 7 })).unwrap();
        let detail = raw.into_detail(MediaKind::Movie);
        assert_eq!(detail.summary.title, "Unknown Title");
        assert_eq!(detail.summary.year, None);
        assert_eq!(detail.release_date, "");
        assert_eq!(detail.overview, "");
        assert!(detail.genre_ids.is_empty());
    }

    #[test]
    fn test_detail_reads_full_genres() {
        let raw: RawMedia = serde_json::from_value(json!({
            "id": 438631,
            "title": "Dune",
            "release_date": "2021-09-15",
            "overview": "Paul Atreides, a brilliant and gifted young man...",
            "genres": [{"id": 878, "name": "Science Fiction"}, {"id": 12, "name": "Adventure"}]
        }))
        .unwrap();

        let detail = raw.into_detail(MediaKind::Movie);
        assert_eq!(detail.genre_ids, BTreeSet::from([12, 878]));
        assert_eq!(detail.release_date, "2021-09-15");
        assert!(detail.overview.starts_with("Paul Atreides"));
    }

    #[test]
    fn test_pick_trailer() {
        let videos: VideoList = serde_json::from_value(json!({
            "id": 438631,
            "results": [
                {"key": "teaser", "site": "YouTube", "type": "Teaser", "size": 1080},
                {"key": "small", "site": "YouTube", "type": "Trailer", "size": 720},
                {"key": "vimeo", "site": "Vimeo", "type": "Trailer", "size": 1080},
                {"key": "n9xhJrPXop4", "site": "YouTube", "type": "Trailer", "size": 1080}
            ]
        }))
        .unwrap();

        assert_eq!(
            pick_trailer(&videos.results).as_deref(),
            Some("https://www.youtube.com/watch?v=n9xhJrPXop4")
        );
        assert_eq!(pick_trailer(&videos.results[..2]), None);
    }

    #[test]
    fn test_genre_list() {
        let list: GenreList = serde_json::from_value(json!({
            "genres": [{"id": 28, "name": "Action"}, {"id": 35, "name": "Comedy"}]
        }))
        .unwrap();
        let table = GenreTable::from(list);
        assert_eq!(table.len(), 2);
    }
}
