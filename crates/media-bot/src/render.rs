//! Caption rendering
//!
//! [`render_caption`] is pure: given the same detail, note, genre table and
//! trailer it always produces the same Telegram Markdown caption.
//! [`Renderer`] performs the genre and trailer lookups first and degrades to
//! "Unknown Genres" / no trailer line when they fail.

use media_core::{GenreTable, ImageBase, MediaDetail, SearchService};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Default caption budget in characters
pub const DEFAULT_CAPTION_BUDGET: usize = 1000;

/// Header of the notes block appended after the main content
pub const NOTES_DELIMITER: &str = "📌 Extra Notes:";

const OVERVIEW_PREFIX: &str = "📝 ";
const ELLIPSIS: &str = "...";
const UNKNOWN_GENRES: &str = "Unknown Genres";
const UNKNOWN_RELEASE_DATE: &str = "Unknown";

/// A rendered post, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub caption: String,
    /// Full-size poster, when the title has one
    pub image_url: Option<String>,
}

/// Render the caption for one title.
///
/// The overview is cut so that everything up to and including the overview
/// is at most `budget` characters, plus `"..."` when a cut happened.
/// Characters are Unicode scalar values. A non-blank `note` is appended
/// after the budgeted content.
pub fn render_caption(
    detail: &MediaDetail,
    note: Option<&str>,
    genres: &GenreTable,
    trailer: Option<&str>,
    budget: usize,
) -> String {
    let mut caption = format!(
        "🎬 *{}*\n⭐ Rating: {:.1}/10\n",
        detail.title(),
        detail.summary.rating
    );

    if let Some(url) = trailer {
        caption.push_str(&format!("📺 Trailer: [Watch here]({url})\n"));
    }

    let names = genres.resolve(&detail.genre_ids);
    if names.is_empty() {
        caption.push_str(&format!("🎭 Genres: {UNKNOWN_GENRES}\n"));
    } else {
        caption.push_str(&format!("🎭 Genres: {}\n", names.join(", ")));
    }

    let release_date = match detail.release_date.trim() {
        "" => UNKNOWN_RELEASE_DATE,
        date => date,
    };
    caption.push_str(&format!("📅 Release Date: {release_date}\n\n"));
    caption.push_str(OVERVIEW_PREFIX);

    let used = caption.chars().count();
    let overview_len = detail.overview.chars().count();
    if used + overview_len > budget {
        let keep = budget.saturating_sub(used);
        caption.extend(detail.overview.chars().take(keep));
        caption.push_str(ELLIPSIS);
    } else {
        caption.push_str(&detail.overview);
    }

    if let Some(note) = note.map(str::trim).filter(|note| !note.is_empty()) {
        caption.push_str("\n\n");
        caption.push_str(NOTES_DELIMITER);
        caption.push('\n');
        caption.push_str(note);
    }

    caption
}

/// Renders posts, looking up genres and trailers through the search service
pub struct Renderer {
    service: Arc<dyn SearchService>,
    image_base: ImageBase,
    budget: usize,
}

impl Renderer {
    pub fn new(service: Arc<dyn SearchService>, image_base: ImageBase) -> Self {
        Self {
            service,
            image_base,
            budget: DEFAULT_CAPTION_BUDGET,
        }
    }

    /// Set the caption budget
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn image_base(&self) -> &ImageBase {
        &self.image_base
    }

    /// Render one title. Lookup failures are logged and never fail the render.
    #[instrument(skip_all, fields(id = detail.summary.id, kind = %detail.kind()))]
    pub async fn render(&self, detail: &MediaDetail, note: Option<&str>) -> Post {
        let kind = detail.kind();
        let id = detail.summary.id;

        let (genres, trailer) = tokio::join!(
            self.service.genre_table(kind),
            self.service.fetch_trailer_url(id, kind)
        );

        let genres = genres.unwrap_or_else(|err| {
            warn!(error = %err, service = self.service.name(), "Genre lookup failed");
            GenreTable::default()
        });
        let trailer = trailer.unwrap_or_else(|err| {
            warn!(error = %err, service = self.service.name(), "Trailer lookup failed");
            None
        });

        Post {
            caption: render_caption(detail, note, &genres, trailer.as_deref(), self.budget),
            image_url: self.image_base.poster_url(&detail.summary),
        }
    }
}
