//! Paginated TMDB browsing session driven by an infinite-scroll trigger.
use crate::error::ApiError;
use crate::models::{TmdbMovie, TmdbPage};
use crate::tmdb::TmdbApi;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct ExplorerState {
    pub movies: Vec<TmdbMovie>,
    pub loading: bool,
    pub error: Option<String>,
    pub genre_id: i64,
    pub query: String,
    pub current_page: u32,
    pub total_pages: u32,
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self {
            movies: Vec::new(),
            loading: false,
            error: None,
            genre_id: 0,
            query: String::new(),
            current_page: 1,
            total_pages: 1,
        }
    }
}

impl ExplorerState {
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded { page: u32, received: usize },
    Busy,
    Exhausted,
    Superseded,
    Failed(ApiError),
}

pub struct TmdbExplorer {
    tmdb: Arc<dyn TmdbApi>,
    state: Mutex<ExplorerState>,
    generation: AtomicU64,
}

struct Request {
    generation: u64,
    query: String,
    genre_id: i64,
    page: u32,
}

impl TmdbExplorer {
    pub fn new(tmdb: Arc<dyn TmdbApi>) -> Self {
        Self {
            tmdb,
            state: Mutex::new(ExplorerState::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> ExplorerState {
        self.lock().clone()
    }

    pub async fn set_genre(&self, genre_id: i64) -> LoadOutcome {
        self.lock().genre_id = genre_id.max(0);
        self.reset_and_load().await
    }

    pub async fn set_query(&self, query: impl Into<String>) -> LoadOutcome {
        self.lock().query = query.into();
        self.reset_and_load().await
    }

    pub async fn clear_query(&self) -> LoadOutcome {
        self.set_query(String::new()).await
    }

    // Supersedes any load still in flight.
    pub async fn reset_and_load(&self) -> LoadOutcome {
        let request = self.begin_reset();
        let result = self.fetch(&request).await;
        self.apply(&request, result, true)
    }

    pub async fn load_next_page(&self) -> LoadOutcome {
        let request = {
            let mut state = self.lock();
            if state.loading {
                return LoadOutcome::Busy;
            }
            if !state.has_next_page() {
                return LoadOutcome::Exhausted;
            }
            state.current_page += 1;
            state.loading = true;
            state.error = None;
            self.request_for(&state, self.generation.load(Ordering::SeqCst))
        };
        info!(page = request.page, "Loading next TMDB page");
        let result = self.fetch(&request).await;
        self.apply(&request, result, true)
    }

    pub async fn retry(&self) -> LoadOutcome {
        let request = {
            let mut state = self.lock();
            if state.loading {
                return LoadOutcome::Busy;
            }
            state.loading = true;
            state.error = None;
            self.request_for(&state, self.generation.load(Ordering::SeqCst))
        };
        let result = self.fetch(&request).await;
        self.apply(&request, result, true)
    }

    // Stops early at the last available page.
    pub async fn load_pages_up_to(&self, target: u32) -> LoadOutcome {
        let target = target.max(1);
        let mut request = self.begin_reset();
        loop {
            let result = self.fetch(&request).await;
            let last = match &result {
                Ok(envelope) => request.page >= target || request.page >= envelope.total_pages,
                Err(_) => true,
            };
            let outcome = self.apply(&request, result, last);
            if last || !matches!(outcome, LoadOutcome::Loaded { .. }) {
                return outcome;
            }
            request.page += 1;
        }
    }

    fn begin_reset(&self) -> Request {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.lock();
        state.movies.clear();
        state.current_page = 1;
        state.total_pages = 1;
        state.loading = true;
        state.error = None;
        debug!(
            genre_id = state.genre_id,
            query = %state.query,
            generation,
            "Resetting TMDB explorer"
        );
        self.request_for(&state, generation)
    }

    fn request_for(&self, state: &ExplorerState, generation: u64) -> Request {
        Request {
            generation,
            query: state.query.clone(),
            genre_id: state.genre_id,
            page: state.current_page,
        }
    }

    async fn fetch(&self, request: &Request) -> Result<TmdbPage, ApiError> {
        let genre = (request.genre_id > 0).then_some(request.genre_id);
        if request.query.trim().is_empty() {
            self.tmdb.discover_movies(request.page, genre).await
        } else {
            self.tmdb
                .search_movies(&request.query, request.page, genre)
                .await
        }
    }

    fn apply(
        &self,
        request: &Request,
        result: Result<TmdbPage, ApiError>,
        finished: bool,
    ) -> LoadOutcome {
        let mut state = self.lock();
        if self.generation.load(Ordering::SeqCst) != request.generation {
            debug!(page = request.page, "Dropping superseded TMDB page");
            return LoadOutcome::Superseded;
        }
        match result {
            Ok(envelope) => {
                let received = envelope.results.len();
                state.total_pages = envelope.total_pages;
                if request.page == 1 {
                    state.movies = envelope.results;
                } else {
                    state.movies.extend(envelope.results);
                }
                state.current_page = request.page;
                state.loading = !finished;
                LoadOutcome::Loaded {
                    page: request.page,
                    received,
                }
            }
            Err(e) => {
                warn!(page = request.page, "TMDB page load failed: {}", e);
                state.loading = false;
                state.error = Some(e.message.clone());
                LoadOutcome::Failed(e)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ExplorerState> {
        match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
