// Token endpoint calls: client credentials grant and bearer liveness check

use reqwest::blocking::Client;

use super::types::{AccessToken, Credentials, TokenResponse};
use crate::error::{transport_kind, CaseError, Result};

/// Exchange client credentials for a bearer token
pub fn client_credentials(
    client: &Client,
    token_url: &str,
    creds: &Credentials,
    scope: &str,
) -> Result<AccessToken> {
    tracing::info!("POST {}", token_url);

    let form = [("grant_type", "client_credentials"), ("scope", scope)];

    let response = client
        .post(token_url)
        .basic_auth(&creds.client_id, Some(&creds.client_secret))
        .form(&form)
        .send()
        .map_err(|e| {
            tracing::error!(
                error_kind = transport_kind(&e),
                error = %e,
                url = token_url,
                "Token request failed"
            );
            CaseError::transport("requesting access token", e)
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        tracing::error!(
            status = status.as_u16(),
            body = %body,
            "Failed to get access_token"
        );
        return Err(CaseError::Authentication {
            status: status.as_u16(),
            body,
        });
    }

    let body = response
        .text()
        .map_err(|e| CaseError::transport("reading token response", e))?;
    let data: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| CaseError::serialization("token response", e))?;

    if data.access_token.is_empty() {
        return Err(CaseError::Authentication {
            status: status.as_u16(),
            body: "token response does not contain access_token".to_string(),
        });
    }

    let token = AccessToken::new(data.access_token);
    tracing::debug!(
        token = ?token,
        token_type = ?data.token_type,
        expires_in = ?data.expires_in,
        "Access token obtained"
    );
    Ok(token)
}

/// Ask the authorization server whether `token` is still accepted.
/// Transport failures count as "not live".
pub fn bearer_check(client: &Client, bearer_check_url: &str, token: &AccessToken) -> bool {
    let result = client
        .get(bearer_check_url)
        .query(&[("token", token.as_str())])
        .send();

    match result {
        Ok(response) => {
            let live = response.status().is_success();
            tracing::debug!(status = %response.status(), live, "Bearer check");
            live
        }
        Err(e) => {
            tracing::warn!(
                error_kind = transport_kind(&e),
                error = %e,
                "Bearer check failed, treating token as not live"
            );
            false
        }
    }
}
