//! # HTTP Clinic API Client
//!
//! reqwest implementation of [`ClinicApi`]. Reads are retried with
//! exponential backoff on recoverable failures; status commands are sent
//! exactly once because the backend is authoritative and a retry could race
//! another client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use super::error::{ClientError, ClientResult};
use super::ClinicApi;
use crate::config::ApiEndpointConfig;
use crate::constants::endpoints;
use crate::models::{CheckIn, ClinicConfig, DashboardMetrics, ListPayload, SetStatusRequest};
use crate::state_machine::CheckInStatus;

/// HTTP client for the clinic backend
#[derive(Clone)]
pub struct HttpClinicApi {
    client: Client,
    config: ApiEndpointConfig,
    base_url: Url,
}

impl std::fmt::Debug for HttpClinicApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClinicApi")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_ms", &self.config.timeout_ms)
            .field("max_retries", &self.config.max_retries)
            .field("auth_enabled", &self.config.auth_token.is_some())
            .finish()
    }
}

impl HttpClinicApi {
    /// Create a client; fails on a malformed base URL or auth token.
    pub fn new(config: ApiEndpointConfig) -> ClientResult<Self> {
        // Relative joins need a trailing slash on the base path
        let mut raw_base = config.base_url.clone();
        if !raw_base.ends_with('/') {
            raw_base.push('/');
        }
        let base_url = Url::parse(&raw_base)
            .map_err(|e| ClientError::config_error(format!("Invalid base URL: {e}")))?;

        let mut client_builder = Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("clinic-flow/{}", env!("CARGO_PKG_VERSION")));

        if let Some(token) = config.auth_token.as_deref().filter(|t| !t.is_empty()) {
            let mut default_headers = reqwest::header::HeaderMap::new();
            default_headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {token}")
                    .parse()
                    .map_err(|e| ClientError::config_error(format!("Invalid auth token: {e}")))?,
            );
            client_builder = client_builder.default_headers(default_headers);
            debug!("Configured Bearer token authentication");
        }

        let client = client_builder
            .build()
            .map_err(|e| ClientError::config_error(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::config_error(format!("Failed to construct URL: {e}")))
    }

    /// GET with retries on recoverable failures
    async fn get_json<T>(&self, url: Url, operation: &str) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            debug!(url = %url, attempt, operation, "Sending request");

            let result = match self.client.get(url.clone()).send().await {
                Ok(response) => Self::handle_response(response, operation).await,
                Err(e) => Err(ClientError::from(e)),
            };

            match result {
                Err(e) if e.is_recoverable() && attempt < self.config.max_retries => {
                    warn!(
                        error = %e,
                        retry = attempt,
                        max_retries = self.config.max_retries,
                        "Recoverable error during {}, will retry",
                        operation
                    );
                    // Exponential backoff: 250ms, 500ms, 1s, ...
                    let delay = Duration::from_millis(250 << (attempt - 1).min(6));
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }

    /// POST sent once; the response body is not needed
    async fn post_command(
        &self,
        url: Url,
        body: Option<&SetStatusRequest>,
        operation: &str,
    ) -> ClientResult<()> {
        debug!(url = %url, operation, "Sending command");

        let request = self.client.post(url);
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };
        let response = request.send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from(response, operation).await)
        }
    }

    async fn handle_response<T>(response: reqwest::Response, operation: &str) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        if response.status().is_success() {
            let body = response.bytes().await?;
            let result = serde_json::from_slice::<T>(&body).map_err(|e| {
                error!(error = %e, "Failed to parse {} response", operation);
                ClientError::from(e)
            })?;

            debug!("Successfully completed operation: {}", operation);
            Ok(result)
        } else {
            Err(Self::error_from(response, operation).await)
        }
    }

    async fn error_from(response: reqwest::Response, operation: &str) -> ClientError {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error!(status = %status, error = %error_text, "Failed operation: {}", operation);
        ClientError::api_error(status.as_u16(), error_text)
    }
}

#[async_trait]
impl ClinicApi for HttpClinicApi {
    async fn live_checkins(&self) -> ClientResult<Vec<CheckIn>> {
        let url = self.url(endpoints::LIVE_CHECKINS)?;
        let payload: ListPayload<CheckIn> = self.get_json(url, "live check-ins").await?;
        Ok(payload.into_vec())
    }

    async fn set_status(&self, checkin_id: i64, status: CheckInStatus) -> ClientResult<()> {
        let url = self.url(&endpoints::set_status(checkin_id))?;
        let body = SetStatusRequest {
            status: status.to_string(),
        };
        self.post_command(url, Some(&body), "set status").await?;

        info!(checkin_id, status = %status, "Check-in status change accepted");
        Ok(())
    }

    async fn complete(&self, checkin_id: i64) -> ClientResult<()> {
        let url = self.url(&endpoints::complete(checkin_id))?;
        self.post_command(url, None, "complete check-in").await?;

        info!(checkin_id, "Check-in completion accepted");
        Ok(())
    }

    async fn clinic_config(&self) -> ClientResult<ClinicConfig> {
        let url = self.url(endpoints::CLINIC_CONFIG)?;
        self.get_json(url, "clinic config").await
    }

    async fn dashboard_metrics(&self, date: NaiveDate) -> ClientResult<DashboardMetrics> {
        let mut url = self.url(endpoints::DASHBOARD_METRICS)?;
        url.query_pairs_mut()
            .append_pair("date", &date.format("%Y-%m-%d").to_string());
        self.get_json(url, "dashboard metrics").await
    }
}
