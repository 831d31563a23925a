use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};

use gestion_escolar::models::school::{DEFAULT_AI_PROVIDER, DEFAULT_TIMEZONE};
use gestion_escolar::tenant::TenantId;
use gestion_escolar::utils::{generate_secret, utc_now};

#[derive(Parser, Debug)]
#[command(author, version, about = "school administration tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply pending migrations
    MigrateRun,
    /// Show migration status against the current database
    MigrateStatus,
    /// Register a school and print its admin secret
    CreateSchool {
        nombre: String,
        codigo: String,
        /// Use this admin secret instead of generating one
        #[arg(long)]
        admin_password: Option<String>,
    },
    /// Mark a school inactive; its admins are rejected from then on
    DeactivateSchool { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenv().is_err() {
        let crate_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(crate_env);
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::MigrateRun => {
            let pool = get_pool().await?;
            let migrator = get_migrator().await?;
            migrator.run(&pool).await?;
            println!("Migrations applied");
        }
        Commands::MigrateStatus => {
            let pool = get_pool().await?;
            let migrator = get_migrator().await?;
            print_status(&pool, &migrator).await?;
        }
        Commands::CreateSchool {
            nombre,
            codigo,
            admin_password,
        } => {
            let pool = get_pool().await?;
            let (id, secret) = create_school(&pool, &nombre, &codigo, admin_password).await?;
            println!("Created school {} ({})", nombre.trim(), id);
            println!("Admin secret: {}", secret);
        }
        Commands::DeactivateSchool { id } => {
            let pool = get_pool().await?;
            let id = TenantId::parse(&id)?;
            deactivate_school(&pool, &id).await?;
            println!("Deactivated school {}", id);
        }
    }

    Ok(())
}

async fn get_pool() -> anyhow::Result<SqlitePool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL not set")?;
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to database")
}

async fn create_school(
    pool: &SqlitePool,
    name: &str,
    code: &str,
    admin_password: Option<String>,
) -> anyhow::Result<(TenantId, String)> {
    let (name, code) = (name.trim(), code.trim());
    if name.is_empty() || code.is_empty() {
        anyhow::bail!("nombre and codigo must not be empty");
    }

    let taken: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM schools WHERE code = ?")
        .bind(code)
        .fetch_one(pool)
        .await?;
    if taken > 0 {
        anyhow::bail!("school code already exists: {}", code);
    }

    let id = TenantId::generate();
    let secret = admin_password
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(generate_secret);
    let now = utc_now();

    sqlx::query(
        "INSERT INTO schools (id, name, code, address, phone, email, active, admin_secret, ai_provider, timezone, created_at, updated_at) VALUES (?, ?, ?, '', '', '', 1, ?, ?, ?, ?, ?)",
    )
    .bind(id.as_str())
    .bind(name)
    .bind(code)
    .bind(&secret)
    .bind(DEFAULT_AI_PROVIDER)
    .bind(DEFAULT_TIMEZONE)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("failed to insert school")?;

    Ok((id, secret))
}

async fn deactivate_school(pool: &SqlitePool, id: &TenantId) -> anyhow::Result<()> {
    let result = sqlx::query("UPDATE schools SET active = 0, updated_at = ? WHERE id = ?")
        .bind(utc_now())
        .bind(id.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        anyhow::bail!("school not found: {}", id);
    }

    Ok(())
}

async fn print_status(pool: &SqlitePool, migrator: &sqlx::migrate::Migrator) -> anyhow::Result<()> {
    // If the migrations table doesn't exist, nothing is applied yet
    let has_table: Option<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' AND name='_sqlx_migrations'")
            .fetch_optional(pool)
            .await?;
    let applied_versions: HashSet<i64> = if has_table.is_some() {
        let rows = sqlx::query("SELECT version FROM _sqlx_migrations WHERE success = 1")
            .fetch_all(pool)
            .await?;
        rows.iter().filter_map(|row| row.try_get::<i64, _>("version").ok()).collect()
    } else {
        HashSet::new()
    };

    println!("{:<8} {:<20} {}", "Status", "Version", "Name");
    for migration in migrator.iter() {
        let version = migration.version;
        let status = if applied_versions.contains(&version) { "applied" } else { "pending" };
        let desc = migration.description.as_ref().trim();
        let name = if desc.is_empty() { "unknown" } else { desc };
        println!("{:<8} {:<20} {}", status, version, name);
    }

    Ok(())
}

async fn get_migrator() -> anyhow::Result<sqlx::migrate::Migrator> {
    // ./migrations when run from the repo root, otherwise the crate's own folder
    let local = Path::new("./migrations");
    let migrator_path = if local.exists() {
        local.to_path_buf()
    } else {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations")
    };

    let migrator_path_display = migrator_path.display().to_string();
    sqlx::migrate::Migrator::new(migrator_path)
        .await
        .with_context(|| format!("failed to load migrations from {}", migrator_path_display))
}
