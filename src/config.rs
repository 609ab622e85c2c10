use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

use crate::omdb::OMDB_BASE;
use crate::tmdb::TMDB_BASE;

const DEFAULT_STORE_PATH: &str = "movie_explorer_store.json";
const DEFAULT_ADDR: &str = "0.0.0.0:3146";

#[derive(Debug, Clone)]
pub struct Config {
    pub omdb_api_key: String,
    pub omdb_base_url: String,
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub store_path: PathBuf,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("Missing required environment variable: {}", key))
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let omdb_api_key = required("OMDB_API_KEY")?;
        let tmdb_api_key = required("TMDB_API_KEY")?;
        let addr_raw = optional("MOVIE_EXPLORER_ADDR", DEFAULT_ADDR);
        let addr = addr_raw
            .parse()
            .with_context(|| format!("MOVIE_EXPLORER_ADDR is not a socket address: {}", addr_raw))?;

        let config = Self {
            omdb_api_key,
            omdb_base_url: optional("OMDB_BASE_URL", OMDB_BASE),
            tmdb_api_key,
            tmdb_base_url: optional("TMDB_BASE_URL", TMDB_BASE),
            store_path: PathBuf::from(optional("MOVIE_EXPLORER_STORE", DEFAULT_STORE_PATH)),
            addr,
        };
        info!(
            omdb = %config.omdb_base_url,
            tmdb = %config.tmdb_base_url,
            store = %config.store_path.display(),
            "Configuration loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_fill_optional_values() {
        let config =
            Config::from_lookup(lookup(&[("OMDB_API_KEY", "o"), ("TMDB_API_KEY", "t")])).unwrap();
        assert_eq!(config.omdb_base_url, OMDB_BASE);
        assert_eq!(config.tmdb_base_url, TMDB_BASE);
        assert_eq!(config.store_path, PathBuf::from(DEFAULT_STORE_PATH));
        assert_eq!(config.addr.port(), 3146);
    }

    #[test]
    fn missing_key_names_the_variable() {
        let err = Config::from_lookup(lookup(&[("OMDB_API_KEY", "o")])).unwrap_err();
        assert!(err.to_string().contains("TMDB_API_KEY"));
    }

    #[test]
    fn rejects_bad_address() {
        let err = Config::from_lookup(lookup(&[
            ("OMDB_API_KEY", "o"),
            ("TMDB_API_KEY", "t"),
            ("MOVIE_EXPLORER_ADDR", "nowhere"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("MOVIE_EXPLORER_ADDR"));
    }
}
