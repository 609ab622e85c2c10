use crate::error::TransportError;
use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub(crate) fn build_client(purpose: &str) -> Result<Client> {
    let user_agent = format!("movie_explorer/{}", env!("CARGO_PKG_VERSION"));
    Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .user_agent(user_agent)
        .build()
        .with_context(|| format!("Failed to build {} HTTP client", purpose))
}

pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> std::result::Result<T, TransportError> {
    let res = request.send().await.map_err(TransportError::Request)?;
    let status = res.status();
    let url = res.url().path().to_string();
    let text = res.text().await.map_err(TransportError::Request)?;
    if !status.is_success() {
        return Err(TransportError::Status {
            url,
            status,
            body: text,
        });
    }
    serde_json::from_str(&text).map_err(TransportError::Decode)
}
