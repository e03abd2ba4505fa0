use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::types::{DetailsPayload, Endpoints};
use super::GraphBackend;
use crate::config::{BackendConfig, RequestConfig};
use crate::error::{FetchError, FetchResult};
use crate::view::{DetailsReply, Mode, NodeRef, TreeFragment};

/// HTTP client for the navigator backend
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    endpoints: Endpoints,
    request_config: RequestConfig,
}

impl HttpBackend {
    /// Create a new backend client
    pub fn new(config: &BackendConfig, request_config: RequestConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(|e| FetchError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoints: Endpoints::new(&config.base_url),
            request_config,
        })
    }

    /// Routes this client requests
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// GET `url` and return the body as text
    pub async fn get_text(&self, url: &str) -> FetchResult<String> {
        let response = self.send(url).await?;
        response.text().await.map_err(|e| FetchError::Parse {
            message: format!("Failed to read response body: {}", e),
        })
    }

    /// GET `url` and decode the body as JSON
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> FetchResult<T> {
        let response = self.send(url).await?;
        response.json().await.map_err(|e| FetchError::Parse {
            message: format!("Failed to parse response: {}", e),
        })
    }

    /// Execute a single request (internal)
    async fn send(&self, url: &str) -> FetchResult<reqwest::Response> {
        debug!(url = %url, "Backend request");
        let start = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Network {
                    message: format!(
                        "Request timeout after {}ms",
                        self.request_config.timeout_ms
                    ),
                }
            } else {
                FetchError::Network {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        debug!(
            url = %url,
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis(),
            "Backend response"
        );

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: error_body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl GraphBackend for HttpBackend {
    async fn fetch_navigation(&self, mode: Mode) -> FetchResult<TreeFragment> {
        let url = self.endpoints.navigation(mode);
        let document = self.get_text(&url).await?;
        let fragment = TreeFragment::extract(&document).ok_or_else(|| FetchError::Parse {
            message: "Navigation response has no tree-root element".to_string(),
        })?;
        info!(mode = %mode, nodes = fragment.nodes().len(), "Navigation tree fetched");
        Ok(fragment)
    }

    async fn fetch_details(&self, id: &NodeRef, mode: Mode) -> FetchResult<DetailsReply> {
        let url = self.endpoints.details(id, mode);
        let payload: DetailsPayload = self.get_json(&url).await?;
        Ok(payload.into_reply(id))
    }
}
