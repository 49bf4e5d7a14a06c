#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use citadel_api::auth::jwt::{generate_access_token, JwtConfig};
use citadel_api::auth::password::{generate_client_credentials, hash_secret};
use citadel_api::config::ServerConfig;
use citadel_api::router::build_app_router;
use citadel_api::state::AppState;
use citadel_core::cover::{CoverCompositor, CoverFont};
use citadel_db::models::oauth_client::CreateOAuthClient;
use citadel_db::repositories::OAuthClientRepo;
use citadel_source::{
    BookRecord, CatalogSource, CharacterRecord, HouseRecord, RefList, SourceConfig, SourceError,
};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        cover_font_path: None,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        source: SourceConfig::default(),
    }
}

/// Build the full application router over `pool`, with the upstream catalog
/// replaced by [`SnapshotSource`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config(), Arc::new(SnapshotSource))
}

/// Build the application router with a custom config and upstream source.
pub fn build_test_app_with(
    pool: PgPool,
    config: ServerConfig,
    source: Arc<dyn CatalogSource>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        compositor: Arc::new(CoverCompositor::new(CoverFont::load(None))),
        source,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Mint a bearer token with the given scopes, signed with the test secret.
pub fn token(scope: &str) -> String {
    generate_access_token("test-client", scope, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Register an OAuth client and return its `(client_id, plaintext_secret)`.
pub async fn register_client(pool: &PgPool, scope: &str) -> (String, String) {
    let (client_id, secret) = generate_client_credentials();
    let input = CreateOAuthClient {
        client_id: client_id.clone(),
        name: "Test client".to_string(),
        secret_hash: hash_secret(&secret).expect("hashing should succeed"),
        scope: scope.to_string(),
    };
    OAuthClientRepo::create(pool, &input)
        .await
        .expect("client creation should succeed");
    (client_id, secret)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, None, Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// POST an `application/x-www-form-urlencoded` body, optionally with an
/// `Authorization` header value.
pub async fn post_form(app: Router, uri: &str, form: &str, authorization: Option<&str>) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    app.oneshot(builder.body(Body::from(form.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Upstream snapshot
// ---------------------------------------------------------------------------

const API: &str = "https://anapioficeandfire.com/api";

fn refs(resource: &str, id: i32) -> RefList {
    RefList::new([format!("{API}/{resource}/{id}")])
}

/// One book, one character and one house, all linked to each other.
pub struct SnapshotSource;

#[async_trait]
impl CatalogSource for SnapshotSource {
    async fn fetch_books(&self) -> Result<Vec<BookRecord>, SourceError> {
        Ok(vec![BookRecord {
            url: format!("{API}/books/1"),
            name: Some("A Game of Thrones".to_string()),
            isbn: Some("978-0553103540".to_string()),
            released: Some("1996-08-01T00:00:00".to_string()),
            characters: refs("characters", 583),
            pov_characters: refs("characters", 583),
            ..Default::default()
        }])
    }

    async fn fetch_characters(&self) -> Result<Vec<CharacterRecord>, SourceError> {
        Ok(vec![CharacterRecord {
            url: format!("{API}/characters/583"),
            name: Some("Jon Snow".to_string()),
            allegiances: refs("houses", 362),
            ..Default::default()
        }])
    }

    async fn fetch_houses(&self) -> Result<Vec<HouseRecord>, SourceError> {
        Ok(vec![HouseRecord {
            url: format!("{API}/houses/362"),
            name: Some("House Stark of Winterfell".to_string()),
            sworn_members: refs("characters", 583),
            ..Default::default()
        }])
    }

    async fn fetch_cover(&self, _isbn: &str) -> Option<Vec<u8>> {
        None
    }
}
