//! Test fixtures shared by the unit tests

use crate::draft::{Broadcaster, Recipient};
use crate::render::Post;
use async_trait::async_trait;
use media_core::{
    Genre, GenreTable, MediaDetail, MediaKind, MediaSummary, SearchService, ServiceError,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

mockall::mock! {
    pub Channel {}

    #[async_trait]
    impl Broadcaster for Channel {
        async fn deliver(&self, destination: &Recipient, post: &Post) -> crate::Result<()>;
    }
}

pub(crate) const DUNE_TRAILER: &str = "https://www.youtube.com/watch?v=n9xhJrPXop4";

pub(crate) fn dune_movie() -> MediaSummary {
    MediaSummary {
        id: 438_631,
        title: "Dune".to_string(),
        kind: MediaKind::Movie,
        year: Some(2021),
        rating: 7.8,
        poster_path: Some("/d5NXSklXo0qyIYkgV94XAgMIckC.jpg".to_string()),
    }
}

pub(crate) fn dune_show() -> MediaSummary {
    MediaSummary {
        id: 90_228,
        title: "Dune: Prophecy".to_string(),
        kind: MediaKind::Tv,
        year: Some(2024),
        rating: 7.4,
        poster_path: None,
    }
}

pub(crate) fn detail_for(summary: MediaSummary, overview: &str) -> MediaDetail {
    let release_date = summary
        .year
        .map(|year| format!("{year}-09-15"))
        .unwrap_or_default();
    MediaDetail {
        summary,
        overview: overview.to_string(),
        genre_ids: BTreeSet::from([12, 878]),
        release_date,
    }
}

pub(crate) fn dune_detail() -> MediaDetail {
    detail_for(
        dune_movie(),
        "Paul Atreides leads nomadic tribes in a battle to control the desert planet Arrakis.",
    )
}

pub(crate) fn genre_table() -> GenreTable {
    GenreTable::new(vec![
        Genre {
            id: 28,
            name: "Action".to_string(),
        },
        Genre {
            id: 12,
            name: "Adventure".to_string(),
        },
        Genre {
            id: 878,
            name: "Science Fiction".to_string(),
        },
    ])
}

/// In-memory search service
#[derive(Default)]
pub(crate) struct StubService {
    pub movies: Vec<MediaSummary>,
    pub shows: Vec<MediaSummary>,
    pub details: HashMap<u64, MediaDetail>,
    pub genres: GenreTable,
    pub trailer: Option<String>,
    pub fail_search: bool,
    pub fail_lookups: bool,
    pub search_calls: AtomicUsize,
}

impl StubService {
    /// One movie and one show titled "Dune", with details and lookups
    pub fn dune() -> Self {
        let show = detail_for(dune_show(), "Ten thousand years before Paul Atreides...");
        Self {
            movies: vec![dune_movie()],
            shows: vec![dune_show()],
            details: HashMap::from([(438_631, dune_detail()), (90_228, show)]),
            genres: genre_table(),
            trailer: Some(DUNE_TRAILER.to_string()),
            ..Self::default()
        }
    }

    pub fn offline() -> Self {
        Self {
            fail_search: true,
            fail_lookups: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchService for StubService {
    async fn search(&self, _query: &str, kind: MediaKind) -> Result<Vec<MediaSummary>, ServiceError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_search {
            return Err(ServiceError::Unavailable("stub offline".to_string()));
        }
        Ok(match kind {
            MediaKind::Movie => self.movies.clone(),
            MediaKind::Tv => self.shows.clone(),
        })
    }

    async fn fetch_detail(&self, id: u64, kind: MediaKind) -> Result<MediaDetail, ServiceError> {
        if self.fail_lookups {
            return Err(ServiceError::Unavailable("stub offline".to_string()));
        }
        self.details
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("{kind} {id}")))
    }

    async fn fetch_trailer_url(&self, _id: u64, _kind: MediaKind) -> Result<Option<String>, ServiceError> {
        if self.fail_lookups {
            return Err(ServiceError::Unavailable("stub offline".to_string()));
        }
        Ok(self.trailer.clone())
    }

    async fn genre_table(&self, _kind: MediaKind) -> Result<GenreTable, ServiceError> {
        if self.fail_lookups {
            return Err(ServiceError::Unavailable("stub offline".to_string()));
        }
        Ok(self.genres.clone())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
