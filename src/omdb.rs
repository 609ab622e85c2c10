use crate::error::{ApiError, ErrorKind, TransportError};
use crate::http::{build_client, get_json};
use crate::models::Movie;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const OMDB_BASE: &str = "https://www.omdbapi.com/";
pub const PLACEHOLDER_POSTER: &str = "assets/placeholder.jpg";

const MISSING: &str = "N/A";
const MSG_INVALID_KEY: &str = "Invalid OMDb API key, please check your configuration";
const MSG_OFFLINE: &str = "Unable to connect to the network, please check your internet connection";
const MSG_SERVER: &str = "The server is having problems, please try again later";
const MSG_RETRY: &str = "Network problem, please try again";
const MSG_NO_RESULTS: &str = "No results found";
const MSG_NOT_FOUND: &str = "Movie not found";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResult {
    pub movies: Vec<Movie>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResult {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            movies: Vec::new(),
            error: Some(message.into()),
        }
    }
}

#[async_trait]
pub trait OmdbApi: Send + Sync {
    async fn search_online(&self, query: &str) -> SearchResult;
    async fn get_by_id_online(&self, id: &str) -> Result<Movie, ApiError>;
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client("OMDb")?,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, params: &str) -> String {
        format!(
            "{}?{}&apikey={}",
            self.base_url,
            params,
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl OmdbApi for OmdbClient {
    async fn search_online(&self, query: &str) -> SearchResult {
        if query.trim().is_empty() {
            return SearchResult::default();
        }
        let url = self.url(&format!("s={}&type=movie", urlencoding::encode(query)));
        debug!(query, "Searching OMDb");
        match get_json::<SearchResponse>(self.client.get(&url)).await {
            Ok(res) => map_search(res),
            Err(e) => {
                warn!("OMDb search failed: {}", e);
                SearchResult::failed(transport_message(&e))
            }
        }
    }

    async fn get_by_id_online(&self, id: &str) -> Result<Movie, ApiError> {
        let url = self.url(&format!("i={}&plot=full", urlencoding::encode(id)));
        debug!(id, "Looking up OMDb title");
        match get_json::<DetailResponse>(self.client.get(&url)).await {
            Ok(res) => map_detail(res),
            Err(e) => {
                warn!(id, "OMDb lookup failed: {}", e);
                Err(ApiError::new(e.kind(), transport_message(&e)))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SearchResponse {
    #[serde(default)]
    response: String,
    search: Option<Vec<SearchEntry>>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SearchEntry {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    title: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    poster: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DetailResponse {
    #[serde(default)]
    response: String,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    title: Option<String>,
    year: Option<String>,
    runtime: Option<String>,
    genre: Option<String>,
    plot: Option<String>,
    poster: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[allow(dead_code)]
    error: Option<String>,
}

fn is_true(flag: &str) -> bool {
    flag.eq_ignore_ascii_case("true")
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty() && *v != MISSING)
}

fn map_search(res: SearchResponse) -> SearchResult {
    match (is_true(&res.response), res.search) {
        (true, Some(entries)) => SearchResult {
            movies: entries.into_iter().map(map_search_entry).collect(),
            error: None,
        },
        _ => SearchResult::failed(res.error.unwrap_or_else(|| MSG_NO_RESULTS.to_string())),
    }
}

fn map_search_entry(entry: SearchEntry) -> Movie {
    Movie {
        year: parse_year(&entry.year),
        poster: poster_or_placeholder(Some(&entry.poster)),
        ..Movie::new(entry.imdb_id, entry.title)
    }
}

fn map_detail(res: DetailResponse) -> Result<Movie, ApiError> {
    if !is_true(&res.response) {
        return Err(ApiError::new(ErrorKind::NotFound, MSG_NOT_FOUND));
    }
    let id = res
        .imdb_id
        .ok_or_else(|| ApiError::new(ErrorKind::NotFound, MSG_NOT_FOUND))?;
    let title = res.title.unwrap_or_default();
    Ok(Movie {
        year: parse_year(res.year.as_deref().unwrap_or_default()),
        genres: split_genres(res.genre.as_deref()),
        poster: poster_or_placeholder(res.poster.as_deref()),
        rating: parse_rating(res.imdb_rating.as_deref()),
        runtime_min: parse_runtime(res.runtime.as_deref()),
        overview: present(res.plot.as_deref()).unwrap_or_default().to_string(),
        ..Movie::new(id, title)
    })
}

fn transport_message(err: &TransportError) -> &'static str {
    match err.kind() {
        ErrorKind::Unauthorized => MSG_INVALID_KEY,
        ErrorKind::Connectivity => MSG_OFFLINE,
        ErrorKind::Server => MSG_SERVER,
        _ => MSG_RETRY,
    }
}

pub(crate) fn parse_year(raw: &str) -> i32 {
    raw.trim().parse().unwrap_or(0)
}

fn parse_rating(raw: Option<&str>) -> f32 {
    raw.and_then(|r| r.trim().parse::<f32>().ok())
        .filter(|r| r.is_finite())
        .unwrap_or(0.0)
}

fn parse_runtime(raw: Option<&str>) -> u32 {
    raw.and_then(|r| r.split_whitespace().next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

fn split_genres(raw: Option<&str>) -> Vec<String> {
    present(raw)
        .map(|g| {
            g.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn poster_or_placeholder(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(p) if !p.is_empty() && p != MISSING => p.to_string(),
        _ => PLACEHOLDER_POSTER.to_string(),
    }
}
