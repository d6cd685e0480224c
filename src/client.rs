use serde_json::Value;
use std::sync::Arc;

use crate::auth::{self, Credentials, TokenManager};
use crate::config::Config;
use crate::error::{CaseError, Result};
use crate::http_client::CaseHttpClient;
use crate::models::CfDocumentsPage;
use crate::pagination::{Paginator, SortOrder};

pub const CF_DOCUMENTS_ENDPOINT: &str = "/CFDocuments";

/// CASE registry client
/// Authenticated on construction; fetches the CFDocuments collection
pub struct CaseClient {
    http: CaseHttpClient,
    config: Config,
}

impl CaseClient {
    /// Resolve credentials, build the transport and obtain the first token.
    /// `credentials` overrides the credential file when given.
    pub fn connect(config: Config, credentials: Option<Credentials>) -> Result<Self> {
        config
            .validate()
            .map_err(|e| CaseError::Configuration(format!("{:#}", e)))?;

        tracing::info!("Calling CASE API at {}", config.api_base_url);

        let credentials = auth::resolve_credentials(
            credentials.as_ref().map(|c| c.client_id.as_str()),
            credentials.as_ref().map(|c| c.client_secret.as_str()),
            &config.credentials_path,
        )?;

        let transport = CaseHttpClient::build_transport(&config)?;
        let auth_manager = Arc::new(TokenManager::new(transport.clone(), credentials, &config));
        auth_manager.authenticate().map_err(|e| {
            tracing::error!(
                error_kind = e.kind(),
                status = ?e.status(),
                "Authentication failed: {}",
                e
            );
            e
        })?;

        let http = CaseHttpClient::new(transport, auth_manager, config.api_base_url.clone());
        Ok(Self { http, config })
    }

    /// Complete CFDocuments list, sorted by identifier ascending
    pub fn documents(&self) -> Result<Vec<Value>> {
        Paginator::new(&self.http).fetch_all::<CfDocumentsPage>(
            CF_DOCUMENTS_ENDPOINT,
            self.config.page_size,
            self.config.max_pages,
            "identifier",
            SortOrder::Asc,
        )
    }

    pub fn http(&self) -> &CaseHttpClient {
        &self.http
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
