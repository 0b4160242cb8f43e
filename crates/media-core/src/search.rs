//! Search service boundary

use crate::error::ServiceError;
use crate::media::{GenreTable, MediaDetail, MediaKind, MediaSummary};
use async_trait::async_trait;

/// Trait for media metadata services
///
/// Implementations talk to a remote catalogue (TMDB in production). Every
/// method may fail; callers decide how a failure degrades.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Search one kind of media by free text, in the service's ranking order
    async fn search(&self, query: &str, kind: MediaKind) -> Result<Vec<MediaSummary>, ServiceError>;

    /// Fetch the full record for one item
    async fn fetch_detail(&self, id: u64, kind: MediaKind) -> Result<MediaDetail, ServiceError>;

    /// Find a trailer URL for one item, if any
    async fn fetch_trailer_url(&self, id: u64, kind: MediaKind) -> Result<Option<String>, ServiceError>;

    /// Genre names for one kind of media
    async fn genre_table(&self, kind: MediaKind) -> Result<GenreTable, ServiceError>;

    /// Get the service name (e.g., "tmdb")
    fn name(&self) -> &str;
}
