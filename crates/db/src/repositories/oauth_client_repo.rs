//! Repository for the `oauth_clients` table.

use sqlx::PgPool;

use crate::models::oauth_client::{CreateOAuthClient, OAuthClient};

const COLUMNS: &str = "id, client_id, name, secret_hash, scope, is_active, created_at, updated_at";

/// Registered OAuth2 applications.
pub struct OAuthClientRepo;

impl OAuthClientRepo {
    /// Register a new client.
    pub async fn create(
        pool: &PgPool,
        input: &CreateOAuthClient,
    ) -> Result<OAuthClient, sqlx::Error> {
        let query = format!(
            "INSERT INTO oauth_clients (client_id, name, secret_hash, scope)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OAuthClient>(&query)
            .bind(&input.client_id)
            .bind(&input.name)
            .bind(&input.secret_hash)
            .bind(&input.scope)
            .fetch_one(pool)
            .await
    }

    /// Look up an active client by its public identifier.
    pub async fn find_active_by_client_id(
        pool: &PgPool,
        client_id: &str,
    ) -> Result<Option<OAuthClient>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM oauth_clients WHERE client_id = $1 AND is_active");
        sqlx::query_as::<_, OAuthClient>(&query)
            .bind(client_id)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a client. Tokens already issued stay valid until they expire.
    pub async fn deactivate(pool: &PgPool, client_id: &str) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE oauth_clients SET is_active = false WHERE client_id = $1")
                .bind(client_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
