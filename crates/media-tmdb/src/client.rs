//! TMDB client implementation
//!
//! This module implements the [`SearchService`] trait for The Movie Database
//! v3 API. See: https://developer.themoviedb.org/reference/intro/getting-started
//!
//! # Examples
//!
//! ```no_run
//! use media_core::{MediaKind, SearchService};
//! use media_tmdb::TmdbClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create client from TMDB_API_KEY environment variable
//!     let client = TmdbClient::from_env()?;
//!
//!     for movie in client.search("Dune", MediaKind::Movie).await? {
//!         println!("{}", movie.formatted_title());
//!     }
//!
//!     Ok(())
//! }
//! ```

use crate::error::{Result, TmdbError};
use crate::wire::{ApiErrorBody, GenreList, RawMedia, SearchPage, VideoList, pick_trailer};
use async_trait::async_trait;
use media_core::media::DEFAULT_IMAGE_BASE;
use media_core::{
    GenreTable, ImageBase, MediaDetail, MediaKind, MediaSummary, SearchService, ServiceError,
};
use media_utils::EnvVars;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_TMDB_API_BASE: &str = "https://api.themoviedb.org/3";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the TMDB client
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// v3 API key, sent as the `api_key` query parameter
    pub api_key: String,

    /// Base URL for the API (default: "https://api.themoviedb.org/3")
    pub api_base: String,

    /// Base URL for poster images (default: "https://image.tmdb.org/t/p")
    pub image_base: String,

    /// Optional response language, e.g. "en-US"
    pub language: Option<String>,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl TmdbConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_TMDB_API_BASE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            language: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the API key from `TMDB_API_KEY`. Optionally reads
    /// `TMDB_API_BASE`, `TMDB_IMAGE_BASE`, `TMDB_LANGUAGE` and
    /// `TMDB_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&EnvVars::process())
    }

    /// Create config from an explicit variable source
    pub fn from_vars<F>(vars: &EnvVars<F>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(vars.required("TMDB_API_KEY")?);
        if let Some(api_base) = vars.get("TMDB_API_BASE") {
            config = config.with_api_base(api_base);
        }
        if let Some(image_base) = vars.get("TMDB_IMAGE_BASE") {
            config = config.with_image_base(image_base);
        }
        config.language = vars.get("TMDB_LANGUAGE");
        config.timeout_secs = vars.parse_or("TMDB_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        Ok(config)
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set custom image base URL
    pub fn with_image_base(mut self, image_base: impl Into<String>) -> Self {
        self.image_base = image_base.into();
        self
    }

    /// Set response language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// TMDB client
///
/// Every call is a single request; there is no caching or retrying.
pub struct TmdbClient {
    client: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    /// Create a new TMDB client with custom configuration
    pub fn with_config(config: TmdbConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(TmdbError::ConfigurationError(
                "TMDB API key must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a new TMDB client with API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(TmdbConfig::new(api_key))
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(TmdbConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &TmdbConfig {
        &self.config
    }

    /// Image base for building poster URLs
    pub fn image_base(&self) -> ImageBase {
        ImageBase::new(self.config.image_base.clone())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let mut params: Vec<(&str, &str)> = vec![("api_key", self.config.api_key.as_str())];
        if let Some(language) = &self.config.language {
            params.push(("language", language.as_str()));
        }
        params.extend_from_slice(query);

        // The query string carries the API key, keep it out of error messages
        let response = self
            .client
            .get(self.endpoint(path))
            .query(&params)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), path, &body));
        }

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Search titles of one kind
    #[instrument(skip(self, kind), fields(kind = %kind))]
    pub async fn search_titles(&self, query: &str, kind: MediaKind) -> Result<Vec<MediaSummary>> {
        let path = format!("search/{}", kind.path_segment());
        let page: SearchPage = self
            .get_json(&path, &[("query", query), ("include_adult", "false")])
            .await?;

        debug!("TMDB returned {} {} results", page.results.len(), kind.path_segment());
        Ok(page
            .results
            .into_iter()
            .map(|raw| raw.into_summary(kind))
            .collect())
    }

    /// Fetch full details for one title
    #[instrument(skip(self, kind), fields(kind = %kind))]
    pub async fn details(&self, id: u64, kind: MediaKind) -> Result<MediaDetail> {
        let path = format!("{}/{id}", kind.path_segment());
        let raw: RawMedia = self.get_json(&path, &[]).await?;
        Ok(raw.into_detail(kind))
    }

    /// Find a full-HD YouTube trailer for one title
    #[instrument(skip(self, kind), fields(kind = %kind))]
    pub async fn trailer(&self, id: u64, kind: MediaKind) -> Result<Option<String>> {
        let path = format!("{}/{id}/videos", kind.path_segment());
        let videos: VideoList = self.get_json(&path, &[]).await?;
        Ok(pick_trailer(&videos.results))
    }

    /// Genre table for one kind
    #[instrument(skip(self, kind), fields(kind = %kind))]
    pub async fn genres(&self, kind: MediaKind) -> Result<GenreTable> {
        let path = format!("genre/{}/list", kind.path_segment());
        let list: GenreList = self.get_json(&path, &[]).await?;
        Ok(list.into())
    }
}

/// Map a non-success response to an error, preferring TMDB's `status_message`
fn status_error(status: u16, path: &str, body: &str) -> TmdbError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map_or_else(|_| body.to_string(), |error| error.status_message);

    match status {
        401 => TmdbError::Unauthorized(message),
        404 => TmdbError::NotFound(path.to_string()),
        code => TmdbError::Api {
            status: code,
            message,
        },
    }
}

#[async_trait]
impl SearchService for TmdbClient {
    async fn search(
        &self,
        query: &str,
        kind: MediaKind,
    ) -> std::result::Result<Vec<MediaSummary>, ServiceError> {
        Ok(self.search_titles(query, kind).await?)
    }

    async fn fetch_detail(
        &self,
        id: u64,
        kind: MediaKind,
    ) -> std::result::Result<MediaDetail, ServiceError> {
        Ok(self.details(id, kind).await?)
    }

    async fn fetch_trailer_url(
        &self,
        id: u64,
        kind: MediaKind,
    ) -> std::result::Result<Option<String>, ServiceError> {
        Ok(self.trailer(id, kind).await?)
    }

    async fn genre_table(&self, kind: MediaKind) -> std::result::Result<GenreTable, ServiceError> {
        Ok(self.genres(kind).await?)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
