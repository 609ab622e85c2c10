use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::error::{ApiError, ErrorKind};
use crate::favorites::FavoritesStore;
use crate::listing::{ListParams, MovieListView};
use crate::models::TmdbGenre;
use crate::omdb::{OmdbApi, OmdbClient};
use crate::storage::{JsonFileStore, KeyValueStore};
use crate::tmdb::{self, TmdbApi, TmdbClient};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub favorites: Arc<FavoritesStore>,
    pub omdb: Arc<dyn OmdbApi>,
    pub tmdb: Arc<dyn TmdbApi>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = Arc::new(CatalogStore::seeded());
        let storage: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(&config.store_path));
        let favorites = Arc::new(FavoritesStore::load(catalog.clone(), storage));
        let omdb: Arc<dyn OmdbApi> = Arc::new(OmdbClient::new(
            config.omdb_base_url.clone(),
            config.omdb_api_key.clone(),
        )?);
        let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(
            config.tmdb_base_url.clone(),
            config.tmdb_api_key.clone(),
        )?);
        Ok(Self {
            catalog,
            favorites,
            omdb,
            tmdb,
        })
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;
    info!(
        movies = state.catalog.len(),
        favorites = state.favorites.favorite_ids().len(),
        "Catalog ready"
    );

    let app = build_router(state);

    info!("Listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/movies", get(list_movies))
        .route("/movies/genres", get(local_genres))
        .route("/movies/:id", get(local_movie))
        .route("/favorites", get(favorite_movies))
        .route("/favorites/:id/toggle", post(toggle_favorite))
        .route("/online/search", get(online_search))
        .route("/online/movies/:id", get(online_movie))
        .route("/tmdb/discover", get(tmdb_discover))
        .route("/tmdb/search", get(tmdb_search))
        .route("/tmdb/movies/:id", get(tmdb_movie))
        .route("/tmdb/genres", get(tmdb_genres))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

fn error_response(err: &ApiError) -> Response {
    let status = match err.kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::BAD_GATEWAY,
    };
    (status, Json(json!({ "error": err.message, "kind": err.kind }))).into_response()
}

async fn list_movies(State(state): State<AppState>, Query(params): Query<ListParams>) -> Response {
    let mut view = MovieListView::new(state.catalog.clone());
    view.apply_params(&params);
    let items = view.paged();
    let total = view.sorted().len();
    Json(json!({
        "items": items,
        "total": total,
        "page": view.page(),
        "pageSize": view.page_size(),
        "hasMore": view.has_more(),
        "params": view.params(),
    }))
    .into_response()
}

async fn local_genres(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(MovieListView::new(state.catalog.clone()).genres())
}

// Catalog first; ids it does not own are resolved through OMDb.
async fn local_movie(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let (movie, source) = match state.catalog.get_by_id(&id) {
        Some(movie) => (movie, "local"),
        None => match state.omdb.get_by_id_online(&id).await {
            Ok(movie) => (movie, "online"),
            Err(e) => return error_response(&e),
        },
    };
    Json(json!({
        "movie": movie,
        "source": source,
        "favorite": state.favorites.is_favorite(&id),
    }))
    .into_response()
}

async fn favorite_movies(State(state): State<AppState>) -> Response {
    Json(json!({
        "ids": state.favorites.favorite_ids(),
        "items": state.favorites.get_favorite_movies(),
    }))
    .into_response()
}

async fn toggle_favorite(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let favorite = state.favorites.toggle_favorite(&id);
    info!(id = %id, favorite, "Favorite toggled");
    Json(json!({ "id": id, "favorite": favorite })).into_response()
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn online_search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Response {
    Json(state.omdb.search_online(&query.q).await).into_response()
}

async fn online_movie(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.omdb.get_by_id_online(&id).await {
        Ok(movie) => Json(json!({
            "favorite": state.favorites.is_favorite(&movie.id),
            "movie": movie,
        }))
        .into_response(),
        Err(e) => error_response(&e),
    }
}

#[derive(Debug, Deserialize)]
struct TmdbListQuery {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    genre: Option<i64>,
}

impl TmdbListQuery {
    fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

async fn tmdb_discover(
    State(state): State<AppState>,
    Query(query): Query<TmdbListQuery>,
) -> Response {
    match state.tmdb.discover_movies(query.page(), query.genre).await {
        Ok(envelope) => Json(envelope).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn tmdb_search(State(state): State<AppState>, Query(query): Query<TmdbListQuery>) -> Response {
    let q = query.q.clone().unwrap_or_default();
    let result = if q.trim().is_empty() {
        state.tmdb.discover_movies(query.page(), query.genre).await
    } else {
        state.tmdb.search_movies(&q, query.page(), query.genre).await
    };
    match result {
        Ok(envelope) => Json(envelope).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn tmdb_movie(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(id) = tmdb::parse_tmdb_id(&id) else {
        warn!(id = %id, "Rejecting malformed TMDB id");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid movie ID" })),
        )
            .into_response();
    };
    match state.tmdb.get_movie_details(id).await {
        Ok(movie) => Json(json!({
            "favorite": state.favorites.is_favorite(&movie.canonical_id()),
            "posterUrl": tmdb::poster_url(movie.poster_path.as_deref()),
            "backdropUrl": tmdb::backdrop_url(movie.backdrop_path.as_deref()),
            "canonical": movie.to_movie(),
            "movie": movie,
        }))
        .into_response(),
        Err(e) => error_response(&e),
    }
}

async fn tmdb_genres(State(state): State<AppState>) -> Response {
    match state.tmdb.get_genres().await {
        Ok(genres) => {
            let all = std::iter::once(TmdbGenre {
                id: 0,
                name: "All Genres".to_string(),
            })
            .chain(genres)
            .collect::<Vec<_>>();
            Json(all).into_response()
        }
        Err(e) => error_response(&e),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
