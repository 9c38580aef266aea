use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// HTTP GET contra un recurso de la API (`channels`, `search`, `videos`).
///
/// Devuelve el cuerpo crudo; el parseo a tipos lo hace el cliente. Separado en
/// un trait para poder contar llamadas en los tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn get(&self, resource: &str, query: Vec<(String, String)>) -> Result<String, FetchError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl ApiTransport for ReqwestTransport {
    async fn get(&self, resource: &str, query: Vec<(String, String)>) -> Result<String, FetchError> {
        let url = self.base_url.join(resource).map_err(|source| FetchError::Url {
            resource: resource.to_string(),
            source,
        })?;

        debug!("🌐 GET {}", url);

        // without_url(): la URL lleva la API key en la query
        let transport_error = |e: reqwest::Error| FetchError::Transport {
            resource: resource.to_string(),
            source: e.without_url(),
        };

        let response = self
            .client
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response.text().await.map_err(transport_error)
    }
}
