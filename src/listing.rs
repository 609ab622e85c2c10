//! Filter, sort and page-window composition over the local catalog.
use crate::catalog::{CatalogStore, MovieFilter, ALL_GENRES};
use crate::models::Movie;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const PAGE_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    RatingDesc,
    RatingAsc,
    YearDesc,
    YearAsc,
    TitleAsc,
    TitleDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::RatingDesc => "rating_desc",
            SortKey::RatingAsc => "rating_asc",
            SortKey::YearDesc => "year_desc",
            SortKey::YearAsc => "year_asc",
            SortKey::TitleAsc => "title_asc",
            SortKey::TitleDesc => "title_desc",
        }
    }

    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    fn compare(&self, a: &Movie, b: &Movie) -> Ordering {
        let primary = match self {
            SortKey::RatingDesc => b.rating.total_cmp(&a.rating),
            SortKey::RatingAsc => a.rating.total_cmp(&b.rating),
            SortKey::YearDesc => b.year.cmp(&a.year),
            SortKey::YearAsc => a.year.cmp(&b.year),
            SortKey::TitleAsc => return a.title.cmp(&b.title),
            SortKey::TitleDesc => return b.title.cmp(&a.title),
        };
        primary.then_with(|| a.title.cmp(&b.title))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim() {
            "rating_desc" => Ok(SortKey::RatingDesc),
            "rating_asc" => Ok(SortKey::RatingAsc),
            "year_desc" => Ok(SortKey::YearDesc),
            "year_asc" => Ok(SortKey::YearAsc),
            "title_asc" => Ok(SortKey::TitleAsc),
            "title_desc" => Ok(SortKey::TitleDesc),
            other => Err(anyhow::anyhow!("unknown sort key '{}'", other)),
        }
    }
}

pub fn sort_movies(mut movies: Vec<Movie>, key: SortKey) -> Vec<Movie> {
    movies.sort_by(|a, b| key.compare(a, b));
    movies
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct MovieListView {
    catalog: Arc<CatalogStore>,
    genre: String,
    query: String,
    sort: SortKey,
    page: usize,
    page_size: usize,
}

impl MovieListView {
    pub fn new(catalog: Arc<CatalogStore>) -> Self {
        Self::with_page_size(catalog, PAGE_SIZE)
    }

    pub fn with_page_size(catalog: Arc<CatalogStore>, page_size: usize) -> Self {
        Self {
            catalog,
            genre: ALL_GENRES.to_string(),
            query: String::new(),
            sort: SortKey::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_genre(&mut self, genre: impl Into<String>) {
        let genre = genre.into();
        let genre = if genre.is_empty() {
            ALL_GENRES.to_string()
        } else {
            genre
        };
        if genre != self.genre {
            self.genre = genre;
            self.page = 1;
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.page = 1;
        }
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if sort != self.sort {
            self.sort = sort;
            self.page = 1;
        }
    }

    pub fn genres(&self) -> Vec<String> {
        std::iter::once(ALL_GENRES.to_string())
            .chain(self.catalog.get_all_genres())
            .collect()
    }

    pub fn base(&self) -> Vec<Movie> {
        self.catalog.filter_movies(&MovieFilter {
            genre: Some(self.genre.clone()),
            q: Some(self.query.clone()),
        })
    }

    pub fn sorted(&self) -> Vec<Movie> {
        sort_movies(self.base(), self.sort)
    }

    pub fn paged(&self) -> Vec<Movie> {
        let mut sorted = self.sorted();
        sorted.truncate(self.window());
        sorted
    }

    pub fn has_more(&self) -> bool {
        self.window() < self.sorted().len()
    }

    pub fn load_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn apply_params(&mut self, params: &ListParams) {
        self.set_genre(params.genre.clone().unwrap_or_default());
        self.set_query(params.q.clone().unwrap_or_default());
        self.set_sort(
            params
                .sort
                .as_deref()
                .map(SortKey::parse_or_default)
                .unwrap_or_default(),
        );
        let target = params.page.unwrap_or(1).max(1);
        while self.page < target && self.load_more() {}
    }

    pub fn params(&self) -> ListParams {
        let q = self.query.trim();
        ListParams {
            genre: (self.genre != ALL_GENRES).then(|| self.genre.clone()),
            q: (!q.is_empty()).then(|| q.to_string()),
            sort: (self.sort != SortKey::default()).then(|| self.sort.to_string()),
            page: (self.page > 1).then_some(self.page),
        }
    }

    fn window(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str, title: &str, year: i32, rating: f32, genres: &[&str]) -> Movie {
        Movie {
            year,
            rating,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            ..Movie::new(id, title)
        }
    }

    fn many(n: usize) -> Arc<CatalogStore> {
        Arc::new(CatalogStore::new(
            (0..n)
                .map(|i| movie(&format!("m{i}"), &format!("Movie {i:02}"), 2000, 5.0, &["Drama"]))
                .collect(),
        ))
    }

    #[test]
    fn drama_sorted_by_rating_puts_shawshank_first() {
        let mut view = MovieListView::new(Arc::new(CatalogStore::seeded()));
        view.set_genre("Drama");
        let titles: Vec<_> = view.sorted().into_iter().map(|m| m.title).collect();
        assert_eq!(titles[0], "The Shawshank Redemption");
        assert_eq!(titles[1], "The Dark Knight");
    }

    #[test]
    fn ties_break_by_ascending_title() {
        let movies = vec![
            movie("a", "Zeta", 2000, 8.8, &[]),
            movie("b", "Alpha", 2001, 8.8, &[]),
            movie("c", "Mid", 1999, 9.0, &[]),
        ];
        let sorted = sort_movies(movies.clone(), SortKey::RatingDesc);
        let ids: Vec<_> = sorted.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);

        let by_year = sort_movies(
            vec![movie("x", "B", 1994, 1.0, &[]), movie("y", "A", 1994, 2.0, &[])],
            SortKey::YearAsc,
        );
        assert_eq!(by_year[0].title, "A");
    }

    #[test]
    fn sorting_is_idempotent() {
        let catalog = CatalogStore::seeded();
        for key in [
            SortKey::RatingDesc,
            SortKey::RatingAsc,
            SortKey::YearDesc,
            SortKey::YearAsc,
            SortKey::TitleAsc,
            SortKey::TitleDesc,
        ] {
            let once = sort_movies(catalog.get_all(), key);
            let twice = sort_movies(once.clone(), key);
            assert_eq!(once, twice, "{key}");
        }
    }

    #[test]
    fn title_sorts_compare_titles_only() {
        let sorted = sort_movies(CatalogStore::seeded().get_all(), SortKey::TitleDesc);
        assert_eq!(sorted[0].title, "The Shawshank Redemption");
        assert_eq!(sorted.last().unwrap().title, "Forrest Gump");
    }

    #[test]
    fn paged_is_a_growing_prefix() {
        let mut view = MovieListView::new(many(30));
        assert_eq!(view.paged().len(), 12);
        assert!(view.load_more());
        assert_eq!(view.paged().len(), 24);
        assert!(view.load_more());
        assert_eq!(view.paged().len(), 30);
        assert!(!view.has_more());
        assert!(!view.load_more());
        assert_eq!(view.page(), 3);
    }

    #[test]
    fn paged_len_is_min_of_window_and_total() {
        let view = MovieListView::new(Arc::new(CatalogStore::seeded()));
        assert_eq!(view.paged().len(), 6.min(view.page() * view.page_size()));
        assert!(!view.has_more());
    }

    #[test]
    fn filter_and_sort_changes_reset_page() {
        let mut view = MovieListView::new(many(30));
        view.load_more();
        view.set_query("movie");
        assert_eq!(view.page(), 1);

        view.load_more();
        view.set_sort(SortKey::TitleAsc);
        assert_eq!(view.page(), 1);

        view.load_more();
        view.set_genre("Drama");
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn unchanged_values_keep_the_page() {
        let mut view = MovieListView::new(many(30));
        view.load_more();
        view.set_sort(SortKey::RatingDesc);
        view.set_genre("All");
        assert_eq!(view.page(), 2);
    }

    #[test]
    fn unknown_sort_falls_back_to_rating_desc() {
        assert_eq!(SortKey::parse_or_default("popularity"), SortKey::RatingDesc);
        assert_eq!(SortKey::parse_or_default("year_asc"), SortKey::YearAsc);
    }

    #[test]
    fn params_round_trip_and_omit_defaults() {
        let mut view = MovieListView::new(many(30));
        assert_eq!(view.params(), ListParams::default());

        view.apply_params(&ListParams {
            genre: Some("Drama".into()),
            q: Some(" movie ".into()),
            sort: Some("title_desc".into()),
            page: Some(9),
        });
        assert_eq!(view.page(), 3);
        let params = view.params();
        assert_eq!(params.genre.as_deref(), Some("Drama"));
        assert_eq!(params.q.as_deref(), Some("movie"));
        assert_eq!(params.sort.as_deref(), Some("title_desc"));
        assert_eq!(params.page, Some(3));
    }

    #[test]
    fn genre_selector_starts_with_all() {
        let view = MovieListView::new(Arc::new(CatalogStore::seeded()));
        let genres = view.genres();
        assert_eq!(genres[0], "All");
        assert!(genres.contains(&"Sci-Fi".to_string()));
    }
}
