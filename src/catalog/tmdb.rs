use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::{CatalogConfig, SecureString};

use super::error::CatalogError;
use super::types::{MovieDetails, MovieId, MovieSummary};
use super::MovieCatalog;

/// Envelope of every list endpoint.
#[derive(Deserialize)]
struct Page {
    results: Vec<MovieSummary>,
}

/// HTTP client for a TMDB-compatible catalog.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: Option<SecureString>,
}

impl TmdbClient {
    /// Build a client from config.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(CatalogError::network)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<(StatusCode, Option<T>), CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key.expose())]);
        }

        tracing::debug!(url = %url, "Catalog request");

        let response = request.send().await.map_err(CatalogError::network)?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            tracing::warn!(status = %status, url = %url, "Catalog request failed");
            if status == StatusCode::NOT_FOUND {
                return Ok((status, None));
            }
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await.map_err(CatalogError::network)?;
        let value = serde_json::from_slice(&body).map_err(CatalogError::parse)?;
        Ok((status, Some(value)))
    }

    async fn get_page(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<MovieSummary>, CatalogError> {
        match self.get_json::<Page>(path, query).await? {
            (_, Some(page)) => Ok(page.results),
            (status, None) => Err(CatalogError::Upstream {
                status: status.as_u16(),
                message: format!("{} not found", path),
            }),
        }
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn fetch_popular(&self) -> Result<Vec<MovieSummary>, CatalogError> {
        self.get_page("/movie/popular", &[]).await
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        self.get_page("/search/movie", &[("query", query)]).await
    }

    async fn fetch_by_id(&self, id: MovieId) -> Result<MovieDetails, CatalogError> {
        let path = format!("/movie/{}", id);
        match self.get_json::<MovieDetails>(&path, &[]).await? {
            (_, Some(details)) => Ok(details),
            (_, None) => Err(CatalogError::NotFound { id }),
        }
    }
}
