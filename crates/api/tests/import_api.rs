//! HTTP-level tests for the admin import trigger.
//!
//! The app is wired to a fixed one-book/one-character/one-house snapshot.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use citadel_db::ImportLock;
use citadel_source::{BookRecord, CatalogSource, CharacterRecord, HouseRecord, SourceError};
use common::{body_json, get, get_auth, post_json, post_json_auth, token, SnapshotSource};
use serde_json::json;
use sqlx::PgPool;

/// The snapshot, with a book listing that outlasts a one-second request timeout.
struct SlowBooks;

#[async_trait]
impl CatalogSource for SlowBooks {
    async fn fetch_books(&self) -> Result<Vec<BookRecord>, SourceError> {
        tokio::time::sleep(Duration::from_secs(3)).await;
        SnapshotSource.fetch_books().await
    }

    async fn fetch_characters(&self) -> Result<Vec<CharacterRecord>, SourceError> {
        SnapshotSource.fetch_characters().await
    }

    async fn fetch_houses(&self) -> Result<Vec<HouseRecord>, SourceError> {
        SnapshotSource.fetch_houses().await
    }

    async fn fetch_cover(&self, isbn: &str) -> Option<Vec<u8>> {
        SnapshotSource.fetch_cover(isbn).await
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_import_requires_admin_scope(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app.clone(), "/api/v1/admin/import", json!({ "kind": "all" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json_auth(
        app,
        "/api/v1/admin/import",
        json!({ "kind": "all" }),
        &token("read write"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_full_import_links_the_snapshot(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/import",
        json!({ "kind": "all" }),
        &token("admin"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    assert_eq!(report["data"]["books"]["upserted"], 1);
    assert_eq!(report["data"]["characters"]["upserted"], 1);
    assert_eq!(report["data"]["houses"]["upserted"], 1);

    let characters = body_json(get(app.clone(), "/api/v1/characters").await).await;
    let jon = &characters["data"][0];
    let houses = body_json(get(app.clone(), "/api/v1/houses").await).await;
    let stark = &houses["data"][0];
    assert_eq!(jon["allegiances"], json!([stark["id"]]));
    assert_eq!(stark["sworn_members"], json!([jon["id"]]));

    let books = body_json(get_auth(app, "/api/v1/books", &token("read")).await).await;
    let book = &books["data"][0];
    assert_eq!(book["pov_characters"], json!([jon["id"]]));
    assert_eq!(
        book["marketplace_url"],
        "https://www.amazon.com/s?k=9780553103540&i=stripbooks"
    );
    assert_eq!(book["cover_base64"], serde_json::Value::Null);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_kind_defaults_to_all(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response =
        post_json_auth(app, "/api/v1/admin/import", json!({}), &token("admin")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["books"]["upserted"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_single_kind_import(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/import",
        json!({ "kind": "houses" }),
        &token("admin"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    assert_eq!(report["data"]["houses"]["upserted"], 1);
    assert_eq!(report["data"]["books"]["upserted"], 0);

    let characters = body_json(get(app, "/api/v1/characters").await).await;
    assert_eq!(characters["count"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_kind_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/admin/import",
        json!({ "kind": "dragons" }),
        &token("admin"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_concurrent_import_conflicts(pool: PgPool) {
    let lock = ImportLock::try_acquire(&pool).await.unwrap().unwrap();
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/admin/import",
        json!({ "kind": "all" }),
        &token("admin"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    lock.release().await.unwrap();
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_import_outlives_request_timeout(pool: PgPool) {
    let mut config = common::test_config();
    config.request_timeout_secs = 1;
    let app = common::build_test_app_with(pool, config, Arc::new(SlowBooks));

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/import",
        json!({ "kind": "all" }),
        &token("admin"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    assert_eq!(report["data"]["books"]["upserted"], 1);

    let books = body_json(get_auth(app, "/api/v1/books", &token("read")).await).await;
    assert_eq!(books["count"], 1);
}
