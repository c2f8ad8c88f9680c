//! CLI for applying and inspecting schema migrations
//!
//! Outputs one JSON object per invocation so scripts can parse the result.

use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sqlx::migrate::Migrator;
use sqlx::PgPool;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Parser)]
#[command(name = "migrate_cli")]
#[command(about = "Schema migration CLI for the fines pool database")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply all pending migrations
    Run,

    /// Show which migrations have been applied
    Status,
}

// ============================================================================
// JSON Response Types
// ============================================================================

#[derive(Serialize)]
struct Response {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    migrations: Option<Vec<MigrationInfo>>,
}

#[derive(Serialize)]
struct MigrationInfo {
    version: i64,
    description: String,
    applied: bool,
}

fn output(resp: &Response) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string(resp).context("Failed to encode response")?
    );
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => cmd_run().await,
        Commands::Status => cmd_status().await,
    };

    if let Err(e) = &result {
        output(&Response {
            success: false,
            message: Some(format!("{:#}", e)),
            migrations: None,
        })?;
    }

    result
}

async fn get_pool() -> Result<PgPool> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

// ============================================================================
// Commands
// ============================================================================

async fn cmd_run() -> Result<()> {
    let pool = get_pool().await?;

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    output(&Response {
        success: true,
        message: Some(format!("{} migrations up to date", MIGRATOR.iter().count())),
        migrations: None,
    })
}

async fn cmd_status() -> Result<()> {
    let pool = get_pool().await?;

    let table_exists: bool =
        sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
            .fetch_one(&pool)
            .await
            .context("Failed to check migrations table")?;

    let applied: HashMap<i64, bool> = if table_exists {
        sqlx::query_as::<_, (i64, bool)>("SELECT version, success FROM _sqlx_migrations")
            .fetch_all(&pool)
            .await
            .context("Failed to read applied migrations")?
            .into_iter()
            .collect()
    } else {
        HashMap::new()
    };

    let migrations: Vec<MigrationInfo> = MIGRATOR
        .iter()
        .map(|m| MigrationInfo {
            version: m.version,
            description: m.description.to_string(),
            applied: applied.get(&m.version).copied().unwrap_or(false),
        })
        .collect();

    let pending = migrations.iter().filter(|m| !m.applied).count();

    output(&Response {
        success: true,
        message: Some(format!("{} pending", pending)),
        migrations: Some(migrations),
    })
}
