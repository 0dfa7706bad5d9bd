use crate::core::ReferenceSource;
use crate::utils::error::{Result, SwimBenchError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Reference tables served over HTTP, relative to `base_url`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: Url,
    client: Client,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // a base without a trailing slash would drop its last segment on join
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| SwimBenchError::InvalidConfigValueError {
            field: "reference.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    fn url_for(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| SwimBenchError::InvalidConfigValueError {
                field: "reference".to_string(),
                value: path.to_string(),
                reason: format!("cannot be joined onto {}: {}", self.base_url, e),
            })
    }
}

#[async_trait]
impl ReferenceSource for HttpSource {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.url_for(path)?;
        tracing::debug!("Fetching reference table from {}", url);

        let response = self.client.get(url).send().await?.error_for_status()?;
        tracing::debug!("Reference response status: {}", response.status());

        Ok(response.bytes().await?.to_vec())
    }

    fn describe(&self, path: &str) -> String {
        self.url_for(path)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| format!("{}{}", self.base_url, path))
    }
}
