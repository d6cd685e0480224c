use anyhow::{Context, Result};
use reqwest::Url;
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "https://caseregistry.imsglobal.org/ims/case/v1p0";
pub const DEFAULT_OAUTH_BASE_URL: &str = "https://oauth2-case.imsglobal.org/oauth2server";
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials/casenetwork.json";

/// Scopes requested by the client credentials grant
pub const DEFAULT_SCOPES: [&str; 2] = [
    "http://purl.imsglobal.org/casenetwork/case/v1p0/scope/core.readonly",
    "http://purl.imsglobal.org/casenetwork/case/v1p0/scope/all.readonly",
];

#[derive(Clone, Debug)]
pub struct Config {
    // Endpoints
    pub api_base_url: String,
    pub oauth_base_url: String,

    // Authentication
    pub credentials_path: PathBuf,
    pub scopes: Vec<String>,

    // HTTP client
    pub http_connect_timeout: u64,
    pub http_request_timeout: u64,

    // Paging
    pub page_size: u32,
    pub max_pages: u32,

    // Logging
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            oauth_base_url: DEFAULT_OAUTH_BASE_URL.to_string(),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            http_connect_timeout: 30,
            http_request_timeout: 60,
            page_size: 50,
            max_pages: 10,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with priority: ENV (including .env) > defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Config {
            api_base_url: lookup("CASE_API_BASE_URL")
                .map(|s| trim_trailing_slash(&s))
                .unwrap_or(defaults.api_base_url),

            oauth_base_url: lookup("CASE_OAUTH_BASE_URL")
                .map(|s| trim_trailing_slash(&s))
                .unwrap_or(defaults.oauth_base_url),

            credentials_path: lookup("CASE_CREDENTIALS_PATH")
                .map(|s| expand_tilde(&s))
                .unwrap_or(defaults.credentials_path),

            scopes: lookup("CASE_SCOPES")
                .map(|s| parse_scopes(&s))
                .unwrap_or(defaults.scopes),

            http_connect_timeout: lookup("HTTP_CONNECT_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.http_connect_timeout),

            http_request_timeout: lookup("HTTP_REQUEST_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.http_request_timeout),

            page_size: lookup("CASE_PAGE_SIZE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.page_size),

            max_pages: lookup("CASE_MAX_PAGES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_pages),

            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api_base_url)
            .with_context(|| format!("CASE_API_BASE_URL is not a valid URL: {}", self.api_base_url))?;
        Url::parse(&self.oauth_base_url).with_context(|| {
            format!("CASE_OAUTH_BASE_URL is not a valid URL: {}", self.oauth_base_url)
        })?;

        if self.scopes.is_empty() {
            anyhow::bail!("CASE_SCOPES must name at least one scope");
        }
        if self.page_size == 0 {
            anyhow::bail!("CASE_PAGE_SIZE must be greater than zero");
        }
        if self.max_pages == 0 {
            anyhow::bail!("CASE_MAX_PAGES must be greater than zero");
        }

        Ok(())
    }

    /// Client credentials token endpoint
    pub fn token_url(&self) -> String {
        format!("{}/clienttoken", self.oauth_base_url)
    }

    /// Bearer liveness check endpoint
    pub fn bearer_check_url(&self) -> String {
        format!("{}/bearercheck", self.oauth_base_url)
    }

    /// Space-delimited scope parameter for the token request
    pub fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }
}

/// Expand tilde (~) in file paths to user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn trim_trailing_slash(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn parse_scopes(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}
