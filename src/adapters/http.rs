use crate::domain::model::ProbeResponse;
use crate::domain::ports::HttpProbe;
use crate::utils::error::{CheckError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// `HttpProbe` backed by a shared reqwest connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestProbe {
    client: Client,
}

impl ReqwestProbe {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Without a timeout a hung request blocks its check indefinitely.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| CheckError::ConfigError {
            message: format!("Failed to build HTTP client: {}", e),
        })?;

        Ok(Self { client })
    }
}

impl Default for ReqwestProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpProbe for ReqwestProbe {
    async fn get(&self, url: &str) -> Result<ProbeResponse> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| CheckError::ConnectionError {
                url: url.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|source| CheckError::ConnectionError {
                url: url.to_string(),
                source,
            })?;

        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(ProbeResponse { status, body })
    }
}
