use crate::models::Movie;
use crate::seed::SEED_MOVIES;
use serde::Deserialize;
use std::collections::BTreeSet;

pub const ALL_GENRES: &str = "All";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieFilter {
    pub genre: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CatalogStore {
    movies: Vec<Movie>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl CatalogStore {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    pub fn seeded() -> Self {
        Self::new(SEED_MOVIES.clone())
    }

    pub fn get_all(&self) -> Vec<Movie> {
        self.movies.clone()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Movie> {
        self.movies.iter().find(|m| m.id == id).cloned()
    }

    pub fn get_all_genres(&self) -> Vec<String> {
        self.movies
            .iter()
            .flat_map(|m| m.genres.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn filter_movies(&self, filter: &MovieFilter) -> Vec<Movie> {
        let genre = filter
            .genre
            .as_deref()
            .filter(|g| !g.is_empty() && *g != ALL_GENRES);
        let needle = filter
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        self.movies
            .iter()
            .filter(|m| genre.map_or(true, |g| m.genres.iter().any(|x| x == g)))
            .filter(|m| {
                needle.as_deref().map_or(true, |k| {
                    m.title.to_lowercase().contains(k) || m.overview.to_lowercase().contains(k)
                })
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(genre: Option<&str>, q: Option<&str>) -> MovieFilter {
        MovieFilter {
            genre: genre.map(str::to_string),
            q: q.map(str::to_string),
        }
    }

    #[test]
    fn get_all_returns_a_copy_in_insertion_order() {
        let store = CatalogStore::seeded();
        let mut all = store.get_all();
        assert_eq!(all[0].id, "tt0111161");
        all.clear();
        assert_eq!(store.get_all().len(), 6);
    }

    #[test]
    fn get_by_id_finds_or_returns_none() {
        let store = CatalogStore::seeded();
        assert_eq!(
            store.get_by_id("tt1375666").map(|m| m.title),
            Some("Inception".to_string())
        );
        assert!(store.get_by_id("tt0000000").is_none());
    }

    #[test]
    fn genres_are_unique_and_sorted() {
        let genres = CatalogStore::seeded().get_all_genres();
        let mut expected = genres.clone();
        expected.sort();
        expected.dedup();
        assert_eq!(genres, expected);
        assert!(genres.contains(&"Drama".to_string()));
    }

    #[test]
    fn genre_filter_is_exact_and_case_sensitive() {
        let store = CatalogStore::seeded();
        let drama = store.filter_movies(&filter(Some("Drama"), None));
        let titles: Vec<_> = drama.iter().map(|m| m.title.as_str()).collect();
        assert!(titles.contains(&"The Shawshank Redemption"));
        assert!(titles.contains(&"The Dark Knight"));
        assert!(drama.iter().all(|m| m.genres.contains(&"Drama".to_string())));
        assert!(store.filter_movies(&filter(Some("drama"), None)).is_empty());
    }

    #[test]
    fn all_sentinel_and_blank_query_mean_no_constraint() {
        let store = CatalogStore::seeded();
        assert_eq!(store.filter_movies(&filter(Some("All"), Some("   "))).len(), 6);
        assert_eq!(store.filter_movies(&MovieFilter::default()).len(), 6);
    }

    #[test]
    fn query_matches_title_or_overview_case_insensitively() {
        let store = CatalogStore::seeded();
        let dark = store.filter_movies(&filter(None, Some("  DARK ")));
        assert_eq!(dark.len(), 1);
        assert_eq!(dark[0].id, "tt0468569");

        let by_overview = store.filter_movies(&filter(None, Some("simulation")));
        assert_eq!(by_overview[0].title, "The Matrix");
    }

    #[test]
    fn predicates_are_anded() {
        let store = CatalogStore::seeded();
        let result = store.filter_movies(&filter(Some("Sci-Fi"), Some("dream")));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "tt1375666");
        assert!(store
            .filter_movies(&filter(Some("Romance"), Some("joker")))
            .is_empty());
    }
}
