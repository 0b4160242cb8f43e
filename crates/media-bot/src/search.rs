//! Movies-then-TV search dispatch

use media_core::{MediaDetail, MediaKind, MediaSummary, Result, SearchService};
use tracing::{debug, instrument};

/// Search movies and TV shows and concatenate them, movies first.
///
/// A blank query returns no results without calling the service. If either
/// call fails the whole search fails with `ServiceUnavailable`, so callers
/// can tell an outage apart from a title with no matches.
#[instrument(skip(service), fields(service = service.name()))]
pub async fn search(service: &dyn SearchService, text: &str) -> Result<Vec<MediaSummary>> {
    let query = text.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let (movies, shows) = tokio::join!(
        service.search(query, MediaKind::Movie),
        service.search(query, MediaKind::Tv)
    );

    let mut results = tagged(movies?, MediaKind::Movie);
    results.extend(tagged(shows?, MediaKind::Tv));

    debug!(count = results.len(), "Search complete");
    Ok(results)
}

fn tagged(items: Vec<MediaSummary>, kind: MediaKind) -> Vec<MediaSummary> {
    items
        .into_iter()
        .map(|item| MediaSummary { kind, ..item })
        .collect()
}

/// Fetch the full record for a selected result
pub async fn fetch_detail(service: &dyn SearchService, item: &MediaSummary) -> Result<MediaDetail> {
    let mut detail = service.fetch_detail(item.id, item.kind).await?;
    detail.summary.kind = item.kind;
    Ok(detail)
}
