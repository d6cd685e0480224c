// Credential loading from explicit values or the JSON credential file

use std::path::Path;

use super::types::Credentials;
use crate::error::{CaseError, Result};

/// Resolve credentials: explicit id and secret win, otherwise the JSON file
/// at `path` is read. Neither available is a configuration error.
pub fn resolve_credentials(
    client_id: Option<&str>,
    client_secret: Option<&str>,
    path: &Path,
) -> Result<Credentials> {
    if let (Some(id), Some(secret)) = (client_id, client_secret) {
        if !id.is_empty() && !secret.is_empty() {
            tracing::debug!("Using explicitly provided client credentials");
            return Ok(Credentials::new(id, secret));
        }
    }

    if path.exists() {
        tracing::info!("Loading credentials from {}", path.display());
        return load_from_file(path);
    }

    tracing::error!("Failed to load client_id and client_secret credentials");
    Err(CaseError::Configuration(format!(
        "no client credentials given and credential file {} does not exist",
        path.display()
    )))
}

/// Load `{ "client_id": .., "client_secret": .. }` from disk
pub fn load_from_file(path: &Path) -> Result<Credentials> {
    let raw = std::fs::read_to_string(path).map_err(|source| CaseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let creds: Credentials = serde_json::from_str(&raw)
        .map_err(|e| CaseError::serialization(format!("credential file {}", path.display()), e))?;

    if creds.client_id.is_empty() || creds.client_secret.is_empty() {
        return Err(CaseError::Configuration(format!(
            "credential file {} has an empty client_id or client_secret",
            path.display()
        )));
    }

    Ok(creds)
}
