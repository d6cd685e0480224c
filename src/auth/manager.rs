use reqwest::blocking::Client;
use std::sync::{PoisonError, RwLock};

use super::grant;
use super::types::{AccessToken, Credentials};
use crate::config::Config;
use crate::error::Result;

/// Token manager
/// Owns the credentials and the single access token held by a client
pub struct TokenManager {
    /// Client credentials, immutable after construction
    credentials: Credentials,

    /// Current access token (at most one)
    access_token: RwLock<Option<AccessToken>>,

    /// HTTP client for token requests
    client: Client,

    /// Client credentials grant endpoint
    token_url: String,

    /// Bearer liveness endpoint
    bearer_check_url: String,

    /// Space-delimited scope list
    scope: String,
}

impl TokenManager {
    /// Create a token manager; no token is held until `refresh` is called
    pub fn new(client: Client, credentials: Credentials, config: &Config) -> Self {
        Self {
            credentials,
            access_token: RwLock::new(None),
            client,
            token_url: config.token_url(),
            bearer_check_url: config.bearer_check_url(),
            scope: config.scope_param(),
        }
    }

    /// Create a token manager already holding `access_token`
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_for_testing(
        client: Client,
        credentials: Credentials,
        config: &Config,
        access_token: &str,
    ) -> Self {
        let manager = Self::new(client, credentials, config);
        manager.store(AccessToken::new(access_token));
        manager
    }

    /// Exchange the credentials for a new token without storing it
    pub fn obtain_token(&self) -> Result<AccessToken> {
        grant::client_credentials(&self.client, &self.token_url, &self.credentials, &self.scope)
    }

    /// Check token liveness against the authorization server
    pub fn is_token_live(&self, token: &AccessToken) -> bool {
        grant::bearer_check(&self.client, &self.bearer_check_url, token)
    }

    /// Obtain a new token and replace the held one
    pub fn refresh(&self) -> Result<AccessToken> {
        tracing::debug!("Refreshing access token...");
        let token = self.obtain_token()?;
        self.store(token.clone());
        Ok(token)
    }

    /// Obtain the initial token and verify it once
    pub fn authenticate(&self) -> Result<AccessToken> {
        let token = self.refresh()?;
        if self.is_token_live(&token) {
            tracing::info!("Client successfully authenticated.");
        } else {
            tracing::warn!("Access token obtained but bearer check did not confirm it");
        }
        Ok(token)
    }

    /// Currently held token, if any
    pub fn current_token(&self) -> Option<AccessToken> {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Held token, obtaining one first if none is held yet
    pub fn access_token(&self) -> Result<AccessToken> {
        match self.current_token() {
            Some(token) => Ok(token),
            None => self.refresh(),
        }
    }

    fn store(&self, token: AccessToken) {
        let mut slot = self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = Some(token);
    }
}
