use crate::catalog::CatalogStore;
use crate::models::Movie;
use crate::storage::KeyValueStore;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, error, warn};

pub const FAVORITES_KEY: &str = "movie_explorer_favs";

pub struct FavoritesStore {
    catalog: Arc<CatalogStore>,
    storage: Arc<dyn KeyValueStore>,
    ids: watch::Sender<Vec<String>>,
    toggle_lock: Mutex<()>,
}

impl FavoritesStore {
    pub fn load(catalog: Arc<CatalogStore>, storage: Arc<dyn KeyValueStore>) -> Self {
        let ids = load_ids(storage.as_ref());
        debug!(count = ids.len(), "Loaded favorites");
        let (tx, _rx) = watch::channel(ids);
        Self {
            catalog,
            storage,
            ids: tx,
            toggle_lock: Mutex::new(()),
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.ids.borrow().iter().any(|x| x == id)
    }

    // Persisted before it becomes visible; a failed write leaves membership unchanged.
    pub fn toggle_favorite(&self, id: &str) -> bool {
        let _guard = match self.toggle_lock.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut next = self.ids.borrow().clone();
        let now_favorite = match next.iter().position(|x| x == id) {
            Some(pos) => {
                next.remove(pos);
                false
            }
            None => {
                next.push(id.to_string());
                true
            }
        };

        let encoded = match serde_json::to_string(&next) {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to encode favorites: {}", e);
                return !now_favorite;
            }
        };
        if let Err(e) = self.storage.set(FAVORITES_KEY, &encoded) {
            error!(id, "Failed to persist favorites: {:#}", e);
            return !now_favorite;
        }

        self.ids.send_replace(next);
        debug!(id, favorite = now_favorite, "Toggled favorite");
        now_favorite
    }

    pub fn favorite_ids(&self) -> Vec<String> {
        self.ids.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<String>> {
        self.ids.subscribe()
    }

    pub fn get_favorite_movies(&self) -> Vec<Movie> {
        let ids = self.ids.borrow();
        self.catalog
            .get_all()
            .into_iter()
            .filter(|m| ids.iter().any(|x| *x == m.id))
            .collect()
    }
}

fn load_ids(storage: &dyn KeyValueStore) -> Vec<String> {
    let raw = match storage.get(FAVORITES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Failed to read favorites, starting empty: {:#}", e);
            return Vec::new();
        }
    };
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(mut ids) => {
            let mut seen = std::collections::HashSet::new();
            ids.retain(|id| seen.insert(id.clone()));
            ids
        }
        Err(e) => {
            warn!("Stored favorites are malformed, starting empty: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("disk full"))
        }
    }

    fn store_with(storage: Arc<dyn KeyValueStore>) -> FavoritesStore {
        FavoritesStore::load(Arc::new(CatalogStore::seeded()), storage)
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let favs = store_with(Arc::new(MemoryStore::new()));
        assert!(!favs.is_favorite("tt0111161"));
        assert!(favs.toggle_favorite("tt0111161"));
        assert!(favs.is_favorite("tt0111161"));
        assert!(!favs.toggle_favorite("tt0111161"));
        assert!(!favs.is_favorite("tt0111161"));
    }

    #[test]
    fn fresh_instance_reads_persisted_membership() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let favs = store_with(storage.clone());
        favs.toggle_favorite("tt0133093");
        favs.toggle_favorite("tmdb-603");

        let reloaded = store_with(storage);
        assert!(reloaded.is_favorite("tt0133093"));
        assert!(reloaded.is_favorite("tmdb-603"));
        assert!(!reloaded.is_favorite("tt0111161"));
    }

    #[test]
    fn malformed_or_missing_state_loads_empty() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(FAVORITES_KEY, "{oops").unwrap();
        assert!(store_with(storage).favorite_ids().is_empty());
        assert!(store_with(Arc::new(MemoryStore::new()))
            .favorite_ids()
            .is_empty());
    }

    #[test]
    fn failed_write_leaves_membership_unchanged() {
        let favs = store_with(Arc::new(FailingStore));
        assert!(!favs.toggle_favorite("tt0111161"));
        assert!(!favs.is_favorite("tt0111161"));
    }

    #[test]
    fn favorite_movies_follow_catalog_order() {
        let favs = store_with(Arc::new(MemoryStore::new()));
        favs.toggle_favorite("tt0133093");
        favs.toggle_favorite("tt0111161");
        favs.toggle_favorite("tmdb-603");
        let ids: Vec<_> = favs
            .get_favorite_movies()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["tt0111161", "tt0133093"]);
    }

    #[test]
    fn subscribers_observe_toggles() {
        let favs = store_with(Arc::new(MemoryStore::new()));
        let mut rx = favs.subscribe();
        favs.toggle_favorite("tt1375666");
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), vec!["tt1375666".to_string()]);
    }
}
