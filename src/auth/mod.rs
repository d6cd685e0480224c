// Authentication module
// Credential loading and access token lifecycle

mod credentials;
mod grant;
mod manager;
mod types;

pub use credentials::resolve_credentials;
pub use manager::TokenManager;
pub use types::{AccessToken, Credentials, TokenResponse};
