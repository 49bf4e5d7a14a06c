//! `citadel-manage`: operator commands for the Citadel catalog.
//!
//! ```bash
//! citadel-manage import --kind all [--dry-run]
//! citadel-manage create-client --name "Maester app" --scope "read write"
//! ```

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use citadel_api::auth::password::{generate_client_credentials, hash_secret};
use citadel_db::models::oauth_client::CreateOAuthClient;
use citadel_db::repositories::OAuthClientRepo;
use citadel_db::DbPool;
use citadel_importer::{import_catalog, ImportSelection, MemoryCatalogStore, Reconciler};
use citadel_source::{IceAndFireClient, SourceConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Citadel catalog management
#[derive(Parser, Debug)]
#[command(name = "citadel-manage", version)]
struct Args {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pull the upstream catalog and reconcile it into the database
    Import {
        /// Which collections to import: all, books, characters or houses
        #[arg(long, default_value = "all")]
        kind: ImportSelection,

        /// Reconcile into an in-memory store and leave the database untouched
        #[arg(long)]
        dry_run: bool,
    },

    /// Register an OAuth client and print its credentials once
    CreateClient {
        /// Human-readable client name
        #[arg(long)]
        name: String,

        /// Space-separated scopes granted to the client
        #[arg(long, default_value = "read write")]
        scope: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "citadel_manage=info,citadel_importer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    match args.command {
        Command::Import { kind, dry_run } => {
            let source = IceAndFireClient::new(SourceConfig::from_env())
                .context("Failed to build upstream HTTP client")?;

            let report = if dry_run {
                tracing::info!(%kind, "Starting dry-run import");
                let store = MemoryCatalogStore::new();
                Reconciler::new(&source, &store).run(kind).await?
            } else {
                let pool = connect(args.database_url.as_deref()).await?;
                tracing::info!(%kind, "Starting import");
                import_catalog(&pool, &source, kind).await?
            };

            println!("Import of {kind} completed{}.", if dry_run { " (dry run)" } else { "" });
            print!("{report}");
        }

        Command::CreateClient { name, scope } => {
            let scope = scope.split_whitespace().collect::<Vec<_>>().join(" ");
            if scope.is_empty() {
                return Err(anyhow!("--scope must name at least one scope"));
            }

            let pool = connect(args.database_url.as_deref()).await?;
            let (client_id, secret) = generate_client_credentials();
            let secret_hash =
                hash_secret(&secret).map_err(|e| anyhow!("Failed to hash client secret: {e}"))?;

            let client = OAuthClientRepo::create(
                &pool,
                &CreateOAuthClient {
                    client_id,
                    name,
                    secret_hash,
                    scope,
                },
            )
            .await
            .context("Failed to store client")?;
            tracing::info!(client_id = %client.client_id, scope = %client.scope, "Client registered");

            println!("client_id:     {}", client.client_id);
            println!("client_secret: {secret}");
            println!("scope:         {}", client.scope);
            println!("The secret is not stored in plain text and will not be shown again.");
        }
    }

    Ok(())
}

async fn connect(database_url: Option<&str>) -> anyhow::Result<DbPool> {
    let url = database_url.context("DATABASE_URL must be set (or pass --database-url)")?;
    let pool = citadel_db::create_pool(url)
        .await
        .context("Failed to connect to database")?;
    citadel_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    Ok(pool)
}
