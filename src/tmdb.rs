use crate::error::{ApiError, ErrorKind, TransportError};
use crate::http::{build_client, get_json};
use crate::models::{TmdbGenre, TmdbMovie, TmdbPage};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

pub const TMDB_BASE: &str = "https://api.themoviedb.org/3";
const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";
const BACKDROP_BASE: &str = "https://image.tmdb.org/t/p/w780";
pub const PLACEHOLDER_POSTER: &str = "/placeholder-poster.jpg";
pub const PLACEHOLDER_BACKDROP: &str = "/placeholder-backdrop.jpg";
const LANGUAGE: &str = "en-US";

const MSG_INVALID_KEY: &str = "Invalid TMDB API key";
const MSG_RATE_LIMITED: &str = "Too many requests, please try again later";
const MSG_LOAD_FAILED: &str = "Failed to load movies";
const MSG_SEARCH_FAILED: &str = "Search failed, please try again";
const MSG_NOT_FOUND: &str = "Movie not found";
const MSG_DETAILS_FAILED: &str = "Failed to load movie details";
const MSG_GENRES_FAILED: &str = "Failed to load genres";

#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn discover_movies(&self, page: u32, genre_id: Option<i64>) -> Result<TmdbPage, ApiError>;
    async fn search_movies(
        &self,
        query: &str,
        page: u32,
        genre_id: Option<i64>,
    ) -> Result<TmdbPage, ApiError>;
    async fn get_movie_details(&self, id: i64) -> Result<TmdbMovie, ApiError>;
    async fn get_genres(&self) -> Result<Vec<TmdbGenre>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let base_url: String = base_url.into();
        Ok(Self {
            client: build_client("TMDB")?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> std::result::Result<T, TransportError> {
        let url = format!("{}{}?{}", self.base_url, path, query_string(params));
        get_json(self.client.get(&url).bearer_auth(&self.api_key)).await
    }

    // Discover takes no free text: keyword hint, then a title/overview filter on the page.
    async fn discover_with_search(
        &self,
        query: &str,
        page: u32,
        genre_id: i64,
    ) -> Result<TmdbPage, ApiError> {
        let needle = query.trim();
        let mut params = discover_params(page, Some(genre_id));
        if !needle.is_empty() {
            params.push(("with_keywords", needle.to_string()));
        }
        debug!(query = needle, page, genre_id, "Searching TMDB through discover");

        let mut envelope: TmdbPage = self.get("/discover/movie", &params).await.map_err(|e| {
            warn!("TMDB discover with search failed: {}", e);
            search_error(&e)
        })?;
        if !needle.is_empty() {
            let needle = needle.to_lowercase();
            envelope.results.retain(|m| {
                m.title.to_lowercase().contains(&needle)
                    || m.overview.to_lowercase().contains(&needle)
            });
        }
        Ok(envelope)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn discover_movies(&self, page: u32, genre_id: Option<i64>) -> Result<TmdbPage, ApiError> {
        debug!(page, genre_id = ?genre_id, "Discovering TMDB movies");
        self.get("/discover/movie", &discover_params(page, genre_id))
            .await
            .map_err(|e| {
                warn!("TMDB discover failed: {}", e);
                let message = match e.kind() {
                    ErrorKind::Unauthorized => MSG_INVALID_KEY,
                    ErrorKind::RateLimited => MSG_RATE_LIMITED,
                    _ => MSG_LOAD_FAILED,
                };
                ApiError::new(e.kind(), message)
            })
    }

    async fn search_movies(
        &self,
        query: &str,
        page: u32,
        genre_id: Option<i64>,
    ) -> Result<TmdbPage, ApiError> {
        if let Some(genre_id) = genre_id.filter(|g| *g > 0) {
            return self.discover_with_search(query, page, genre_id).await;
        }
        debug!(query, page, "Searching TMDB");
        let params = [
            ("query", query.to_string()),
            ("page", page.to_string()),
            ("include_adult", "false".to_string()),
            ("language", LANGUAGE.to_string()),
        ];
        self.get("/search/movie", &params).await.map_err(|e| {
            warn!("TMDB search failed: {}", e);
            search_error(&e)
        })
    }

    async fn get_movie_details(&self, id: i64) -> Result<TmdbMovie, ApiError> {
        debug!(id, "Fetching TMDB movie details");
        self.get(&format!("/movie/{id}"), &[("language", LANGUAGE.to_string())])
            .await
            .map_err(|e| {
                warn!(id, "TMDB movie details failed: {}", e);
                let message = match e.kind() {
                    ErrorKind::NotFound => MSG_NOT_FOUND,
                    ErrorKind::Unauthorized => MSG_INVALID_KEY,
                    _ => MSG_DETAILS_FAILED,
                };
                ApiError::new(e.kind(), message)
            })
    }

    async fn get_genres(&self) -> Result<Vec<TmdbGenre>, ApiError> {
        #[derive(Deserialize)]
        struct GenreList {
            #[serde(default)]
            genres: Vec<TmdbGenre>,
        }

        let list: GenreList = self
            .get("/genre/movie/list", &[("language", LANGUAGE.to_string())])
            .await
            .map_err(|e| {
                warn!("TMDB genres failed: {}", e);
                let message = match e.kind() {
                    ErrorKind::Unauthorized => MSG_INVALID_KEY,
                    _ => MSG_GENRES_FAILED,
                };
                ApiError::new(e.kind(), message)
            })?;
        Ok(list.genres)
    }
}

pub fn poster_url(path: Option<&str>) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(p) => format!("{POSTER_BASE}{p}"),
        None => PLACEHOLDER_POSTER.to_string(),
    }
}

pub fn backdrop_url(path: Option<&str>) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(p) => format!("{BACKDROP_BASE}{p}"),
        None => PLACEHOLDER_BACKDROP.to_string(),
    }
}

pub fn parse_tmdb_id(input: &str) -> Option<i64> {
    let digits = input.trim();
    let digits = digits.strip_prefix("tmdb-").unwrap_or(digits);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        return digits.parse().ok();
    }
    None
}

fn discover_params(page: u32, genre_id: Option<i64>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", page.to_string()),
        ("sort_by", "popularity.desc".to_string()),
        ("include_adult", "false".to_string()),
        ("include_video", "false".to_string()),
        ("language", LANGUAGE.to_string()),
    ];
    if let Some(genre_id) = genre_id.filter(|g| *g > 0) {
        params.push(("with_genres", genre_id.to_string()));
    }
    params
}

fn search_error(e: &TransportError) -> ApiError {
    let message = match e.kind() {
        ErrorKind::Unauthorized => MSG_INVALID_KEY,
        _ => MSG_SEARCH_FAILED,
    };
    ApiError::new(e.kind(), message)
}

fn query_string(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
