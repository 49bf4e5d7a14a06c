//! OAuth2 token endpoint (client-credentials grant only).
//!
//! Clients authenticate with `client_id`/`client_secret` form fields or with
//! HTTP Basic credentials; the latter wins when both are present.

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::{Form, Json};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use citadel_core::error::CoreError;
use citadel_db::repositories::OAuthClientRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_secret;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";

/// Form body of `POST /o/token`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub grant_type: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Space-separated subset of the client's scopes; defaults to all of them.
    pub scope: Option<String>,
}

/// Successful token response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub scope: String,
}

fn invalid_client() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid client credentials".into()))
}

/// Decode `Authorization: Basic base64(id:secret)`.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let encoded = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Basic ")?;
    let decoded = String::from_utf8(BASE64.decode(encoded.trim()).ok()?).ok()?;
    let (id, secret) = decoded.split_once(':')?;
    Some((id.to_string(), secret.to_string()))
}

/// POST /o/token
pub async fn token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(input): Form<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    if input.grant_type != GRANT_CLIENT_CREDENTIALS {
        return Err(AppError::BadRequest(format!(
            "Unsupported grant_type '{}'",
            input.grant_type
        )));
    }

    let (client_id, secret) = match basic_credentials(&headers) {
        Some(creds) => creds,
        None => match (input.client_id, input.client_secret) {
            (Some(id), Some(secret)) => (id, secret),
            _ => return Err(invalid_client()),
        },
    };

    let client = OAuthClientRepo::find_active_by_client_id(&state.pool, &client_id)
        .await?
        .ok_or_else(invalid_client)?;

    let verified = verify_secret(&secret, &client.secret_hash).map_err(|e| {
        AppError::InternalError(format!("Stored secret hash is unreadable: {e}"))
    })?;
    if !verified {
        tracing::warn!(client_id = %client_id, "Rejected token request with wrong secret");
        return Err(invalid_client());
    }

    let scope = match input.scope.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => client.scope.clone(),
        Some(requested) => {
            if let Some(extra) = requested.split_whitespace().find(|s| !client.has_scope(s)) {
                return Err(AppError::BadRequest(format!(
                    "Scope '{extra}' was not granted to this client"
                )));
            }
            requested.split_whitespace().collect::<Vec<_>>().join(" ")
        }
    };

    let jwt = &state.config.jwt;
    let access_token = generate_access_token(&client.client_id, &scope, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(client_id = %client.client_id, scope = %scope, "Issued access token");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: jwt.expires_in_secs(),
        scope,
    }))
}
