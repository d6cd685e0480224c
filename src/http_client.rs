use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AccessToken, TokenManager};
use crate::config::Config;
use crate::error::{transport_kind, CaseError, Result};

/// Authenticated HTTP client for the CASE API
/// Retries once with a fresh token when the API rejects the current one
pub struct CaseHttpClient {
    /// Shared blocking HTTP client
    client: Client,

    /// Token manager
    auth_manager: Arc<TokenManager>,

    /// API base URL, without trailing slash
    base_url: String,
}

impl CaseHttpClient {
    pub fn new(client: Client, auth_manager: Arc<TokenManager>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            auth_manager,
            base_url: base_url.into(),
        }
    }

    /// Build the blocking transport with explicit timeouts.
    /// Certificate validation stays on.
    pub fn build_transport(config: &Config) -> Result<Client> {
        Client::builder()
            .connect_timeout(Duration::from_secs(config.http_connect_timeout))
            .timeout(Duration::from_secs(config.http_request_timeout))
            .build()
            .map_err(|e| CaseError::transport("building HTTP client", e))
    }

    /// GET `base_url + path` and return the JSON body
    pub fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let body = self.get_text(path, query)?;
        serde_json::from_str(&body)
            .map_err(|e| CaseError::serialization(format!("response from {}", path), e))
    }

    /// GET `base_url + path` and decode the body into `T`
    pub fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let body = self.get_text(path, query)?;
        serde_json::from_str(&body)
            .map_err(|e| CaseError::serialization(format!("response from {}", path), e))
    }

    pub fn auth_manager(&self) -> &TokenManager {
        &self.auth_manager
    }

    fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = self.build_url(path, query)?;
        tracing::info!("GET {}", url);

        let token = self.auth_manager.access_token()?;
        let mut response = self.send(&url, &token)?;

        // 401/403: refresh only if the authorization server says the token is dead,
        // then retry exactly once
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            tracing::warn!(status = %response.status(), url = %url, "Request rejected, checking token");

            if self.auth_manager.is_token_live(&token) {
                tracing::warn!("Token is still live, not retrying");
            } else {
                tracing::warn!("Token is no longer live, refreshing and retrying...");
                let fresh = self.auth_manager.refresh()?;
                response = self.send(&url, &fresh)?;
            }
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                url = %url,
                response_body = %body,
                "Error {} on GET {}",
                status.as_u16(),
                url
            );
            return Err(CaseError::Api {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(status = %status, "Request successful");
        response
            .text()
            .map_err(|e| CaseError::transport(format!("reading response from {}", url), e))
    }

    fn send(&self, url: &Url, token: &AccessToken) -> Result<Response> {
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(token.as_str())
            .send()
            .map_err(|e| {
                tracing::error!(
                    error_kind = transport_kind(&e),
                    error = %e,
                    url = %url,
                    "HTTP request error"
                );
                CaseError::transport(format!("sending GET {}", url), e)
            })?;

        tracing::debug!(status = %response.status(), "Received HTTP response");
        Ok(response)
    }

    fn build_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&raw)
            .map_err(|e| CaseError::Configuration(format!("invalid request URL {}: {}", raw, e)))?;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }
}
