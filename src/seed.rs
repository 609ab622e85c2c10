//! Built-in catalog used when no other movie list is supplied.
use crate::models::Movie;
use once_cell::sync::Lazy;

pub static SEED_MOVIES: Lazy<Vec<Movie>> = Lazy::new(|| {
    vec![
        movie(
            "tt0111161",
            "The Shawshank Redemption",
            1994,
            &["Drama"],
            "https://m.media-amazon.com/images/M/MV5BNDE3ODcxYzMtY2YzZC00NmNlLWJiNDMtZDViZWM2MzIxZDYwXkEyXkFqcGdeQXVyNjAwNDUxODI@._V1_SX300.jpg",
            9.3,
            142,
            "Two imprisoned men bond over years, finding solace and eventual redemption.",
        ),
        movie(
            "tt0468569",
            "The Dark Knight",
            2008,
            &["Action", "Crime", "Drama"],
            "https://m.media-amazon.com/images/M/MV5BMTMxNTMwODM0NF5BMl5BanBnXkFtZTcwODAyMTk2Mw@@._V1_SX300.jpg",
            9.0,
            152,
            "Batman faces the Joker, a mastermind who plunges Gotham into chaos.",
        ),
        movie(
            "tt1375666",
            "Inception",
            2010,
            &["Action", "Sci-Fi", "Thriller"],
            "https://m.media-amazon.com/images/M/MV5BMjAxMzY3NjcxNF5BMl5BanBnXkFtZTcwNTI5OTM0Mw@@._V1_SX300.jpg",
            8.8,
            148,
            "A thief enters dreams to steal secrets and plant ideas (inception).",
        ),
        movie(
            "tt0109830",
            "Forrest Gump",
            1994,
            &["Drama", "Romance"],
            "https://m.media-amazon.com/images/M/MV5BNWIwODRlZTUtY2U3ZS00Yzg1LWJhNzYtMmZiYmEyNmU1NjMzXkEyXkFqcGdeQXVyMTQxNzMzNDI@._V1_SX300.jpg",
            8.8,
            142,
            "The extraordinary life of Forrest Gump intersects with key moments in history.",
        ),
        movie(
            "tt0133093",
            "The Matrix",
            1999,
            &["Action", "Sci-Fi"],
            "https://m.media-amazon.com/images/M/MV5BNzQzOTk3OTAtNDQ0Zi00ZTVkLWI0MTEtMDllZjNkYzNjNTc4L2ltYWdlXkEyXkFqcGdeQXVyNjU0OTQ0OTY@._V1_SX300.jpg",
            8.7,
            136,
            "A hacker discovers reality is a simulation and joins a rebellion.",
        ),
        movie(
            "tt0120737",
            "The Lord of the Rings: The Fellowship of the Ring",
            2001,
            &["Adventure", "Fantasy"],
            "https://m.media-amazon.com/images/M/MV5BN2EyZjM3NzUtNWUzMi00MTgxLWI0NTctMzY4M2VlOTdjZWRiXkEyXkFqcGdeQXVyNDUzOTQ5MjY@._V1_SX300.jpg",
            8.8,
            178,
            "A fellowship embarks on a quest to destroy the One Ring.",
        ),
    ]
});

#[allow(clippy::too_many_arguments)]
fn movie(
    id: &str,
    title: &str,
    year: i32,
    genres: &[&str],
    poster: &str,
    rating: f32,
    runtime_min: u32,
    overview: &str,
) -> Movie {
    Movie {
        id: id.to_string(),
        title: title.to_string(),
        year,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        poster: poster.to_string(),
        rating,
        runtime_min,
        overview: overview.to_string(),
    }
}
