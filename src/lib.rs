pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod explore;
pub mod favorites;
mod http;
pub mod listing;
pub mod models;
pub mod omdb;
pub mod online;
mod seed;
pub mod storage;
pub mod tmdb;

pub use catalog::{CatalogStore, MovieFilter};
pub use error::{ApiError, ErrorKind};
pub use favorites::FavoritesStore;
pub use listing::{MovieListView, SortKey};
pub use models::{Movie, TmdbGenre, TmdbMovie, TmdbPage};
