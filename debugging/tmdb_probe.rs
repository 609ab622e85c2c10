//! Call the TMDB adapter once and print the result as pretty JSON.
//! Usage:
//!   cargo run --bin tmdb_probe -- discover [genre_id] [page]
//!   cargo run --bin tmdb_probe -- search <query> [genre_id]
//!   cargo run --bin tmdb_probe -- movie <tmdb_id>
//!   cargo run --bin tmdb_probe -- genres
//!   cargo run --bin tmdb_probe -- omdb <query|imdb_id>
//! Requires TMDB_API_KEY and OMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use dotenvy::dotenv;
use movie_explorer::config::Config;
use movie_explorer::omdb::{OmdbApi, OmdbClient};
use movie_explorer::tmdb::{parse_tmdb_id, TmdbApi, TmdbClient};
use serde::Serialize;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Probe {
    Discover,
    Search,
    Movie,
    Genres,
    Omdb,
}

impl FromStr for Probe {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "discover" => Ok(Probe::Discover),
            "search" => Ok(Probe::Search),
            "movie" => Ok(Probe::Movie),
            "genres" => Ok(Probe::Genres),
            "omdb" => Ok(Probe::Omdb),
            _ => Err(anyhow::anyhow!(
                "probe must be one of: discover, search, movie, genres, omdb"
            )),
        }
    }
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to encode output")?
    );
    Ok(())
}

fn print_outcome<T: Serialize>(outcome: Result<T, movie_explorer::ApiError>) -> Result<()> {
    match outcome {
        Ok(value) => print(&value),
        Err(e) => {
            eprintln!("error ({:?}): {}", e.kind, e.message);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();
    let probe: Probe = args
        .first()
        .context("Missing probe name (discover, search, movie, genres, omdb)")?
        .parse()?;
    let arg = |i: usize| args.get(i).map(String::as_str);

    let config = Config::from_env()?;
    let tmdb = TmdbClient::new(config.tmdb_base_url.clone(), config.tmdb_api_key.clone())?;

    match probe {
        Probe::Discover => {
            let genre = arg(1).map(str::parse::<i64>).transpose()?;
            let page = arg(2).map(str::parse::<u32>).transpose()?.unwrap_or(1);
            print_outcome(tmdb.discover_movies(page, genre).await)
        }
        Probe::Search => {
            let query = arg(1).context("search needs a query")?;
            let genre = arg(2).map(str::parse::<i64>).transpose()?;
            print_outcome(tmdb.search_movies(query, 1, genre).await)
        }
        Probe::Movie => {
            let id = arg(1)
                .and_then(parse_tmdb_id)
                .context("movie needs a numeric TMDB id")?;
            print_outcome(tmdb.get_movie_details(id).await.map(|m| m.to_movie()))
        }
        Probe::Genres => print_outcome(tmdb.get_genres().await),
        Probe::Omdb => {
            let input = arg(1).context("omdb needs a query or an IMDb id")?;
            let omdb = OmdbClient::new(config.omdb_base_url.clone(), config.omdb_api_key.clone())?;
            if input.starts_with("tt") {
                print_outcome(omdb.get_by_id_online(input).await)
            } else {
                print(&omdb.search_online(input).await)
            }
        }
    }
}
