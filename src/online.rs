//! Debounced OMDb search where the most recent dispatch wins.
use crate::models::Movie;
use crate::omdb::OmdbApi;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OnlineSearchState {
    pub searching: bool,
    pub query: Option<String>,
    pub movies: Vec<Movie>,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct OnlineSearch {
    inner: Arc<Inner>,
}

struct Inner {
    omdb: Arc<dyn OmdbApi>,
    quiet: Duration,
    // bumped by every submit; only the latest one survives the quiet window
    submitted: AtomicU64,
    // bumped by every request actually sent; results from older ones are dropped
    dispatched: AtomicU64,
    last_dispatched: Mutex<Option<String>>,
    state: watch::Sender<OnlineSearchState>,
}

impl OnlineSearch {
    pub fn new(omdb: Arc<dyn OmdbApi>) -> Self {
        Self::with_quiet_window(omdb, DEFAULT_QUIET_WINDOW)
    }

    pub fn with_quiet_window(omdb: Arc<dyn OmdbApi>, quiet: Duration) -> Self {
        let (state, _rx) = watch::channel(OnlineSearchState::default());
        Self {
            inner: Arc::new(Inner {
                omdb,
                quiet,
                submitted: AtomicU64::new(0),
                dispatched: AtomicU64::new(0),
                last_dispatched: Mutex::new(None),
                state,
            }),
        }
    }

    // Sent after the quiet window, and only if it differs from the last dispatched query.
    pub fn submit(&self, query: impl Into<String>) -> JoinHandle<()> {
        let query = query.into();
        let ticket = self.inner.submitted.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = self.inner.clone();
        tokio::spawn(async move {
            tokio::time::sleep(inner.quiet).await;
            if inner.submitted.load(Ordering::SeqCst) != ticket {
                debug!(query = %query, "Search input superseded during quiet window");
                return;
            }
            {
                let mut last = match inner.last_dispatched.lock() {
                    Ok(g) => g,
                    Err(poisoned) => poisoned.into_inner(),
                };
                if last.as_deref() == Some(query.as_str()) {
                    debug!(query = %query, "Search input unchanged, not resending");
                    return;
                }
                *last = Some(query.clone());
            }
            dispatch(&inner, query).await;
        })
    }

    pub fn retry(&self) -> Option<JoinHandle<()>> {
        let query = match self.inner.last_dispatched.lock() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }?;
        let inner = self.inner.clone();
        Some(tokio::spawn(async move { dispatch(&inner, query).await }))
    }

    pub fn state(&self) -> OnlineSearchState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OnlineSearchState> {
        self.inner.state.subscribe()
    }
}

async fn dispatch(inner: &Inner, query: String) {
    let generation = inner.dispatched.fetch_add(1, Ordering::SeqCst) + 1;
    inner.state.send_modify(|s| {
        s.searching = true;
        s.error = None;
        s.query = Some(query.clone());
    });

    let result = inner.omdb.search_online(&query).await;

    let published = inner.state.send_if_modified(|s| {
        if inner.dispatched.load(Ordering::SeqCst) != generation {
            return false;
        }
        *s = OnlineSearchState {
            searching: false,
            query: Some(query.clone()),
            movies: result.movies.clone(),
            error: result.error.clone(),
        };
        true
    });
    if !published {
        debug!(query = %query, "Discarding stale search result");
    }
}
