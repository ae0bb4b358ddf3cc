//! CLI administration tool for shortlink.
//!
//! Inspects and manages stored URLs directly in PostgreSQL without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List all URLs, newest first
//! cargo run --bin admin -- list
//!
//! # Show aggregate statistics
//! cargo run --bin admin -- stats
//!
//! # Shorten a URL
//! cargo run --bin admin -- shorten https://example.com/some/page
//!
//! # Delete a URL by id
//! cargo run --bin admin -- delete 42
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! The same variables as the server (see `config.rs`), validated the same
//! way. `STORAGE_BACKEND` and `LISTEN` are ignored: the CLI always talks to
//! PostgreSQL.

use shortlink::application::services::{LinkService, StatsService};
use shortlink::config::{self, Config, mask_connection_string};
use shortlink::domain::repositories::UrlRepository;
use shortlink::infrastructure::persistence::PgUrlRepository;
use shortlink::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// List all URLs, newest first
    List,

    /// Show aggregate statistics
    Stats,

    /// Shorten a URL (returns the existing code if already shortened)
    Shorten {
        /// Absolute http(s) URL
        url: String,
    },

    /// Delete a URL by id
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_admin_from_env()?;
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required")?;

    let pool = PgPool::connect(database_url).await.with_context(|| {
        format!(
            "Failed to connect to database at {}",
            mask_connection_string(database_url)
        )
    })?;

    let repo = Arc::new(PgUrlRepository::new(Arc::new(pool.clone())));

    match cli.command {
        Commands::List => list_urls(repo).await?,
        Commands::Stats => show_stats(repo).await?,
        Commands::Shorten { url } => shorten_url(link_service(&config, repo), &url).await?,
        Commands::Delete { id, yes } => delete_url(repo, id, yes).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Builds the shortening service with the server's code settings.
fn link_service(
    config: &Config,
    repo: Arc<PgUrlRepository>,
) -> LinkService<PgUrlRepository, RandomCodeGenerator> {
    LinkService::new(
        repo,
        Arc::new(RandomCodeGenerator::new(config.code_length)),
        config.base_url.clone(),
        config.code_max_attempts,
    )
}

/// Lists all URLs.
///
/// # Output Format
///
/// ```text
/// URLs
///
///   ID    Code       Clicks   Created            Original URL
///   ──────────────────────────────────────────────────────────────────────
///   3     aZ3kP9q    2        2025-03-01 12:00   https://example.com/
/// ```
async fn list_urls(repo: Arc<PgUrlRepository>) -> Result<()> {
    println!("{}", "URLs".bright_blue().bold());
    println!();

    let records = StatsService::new(repo)
        .list_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list URLs: {}", e))?;

    if records.is_empty() {
        println!("{}", "  No URLs found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<10} {:<8} {:<18} {}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "Original URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for record in &records {
        println!(
            "  {:<5} {:<10} {:<8} {:<18} {}",
            record.id.to_string().bright_black(),
            record.short_code.cyan(),
            record.clicks.to_string().bright_green(),
            record
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            record.original_url
        );
    }

    println!();
    println!(
        "  Total: {}",
        records.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Displays aggregate statistics.
async fn show_stats(repo: Arc<PgUrlRepository>) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let summary = StatsService::new(repo)
        .summary()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to compute statistics: {}", e))?;

    println!(
        "  URLs:           {}",
        summary.total_urls.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:         {}",
        summary.total_clicks.to_string().bright_green().bold()
    );
    println!(
        "  Average clicks: {}",
        format!("{:.2}", summary.average_clicks).bright_green().bold()
    );
    println!();

    Ok(())
}

async fn shorten_url(
    service: LinkService<PgUrlRepository, RandomCodeGenerator>,
    url: &str,
) -> Result<()> {
    let outcome = service
        .shorten(url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    if outcome.created {
        println!("{}", "Short URL created".green().bold());
    } else {
        println!("{}", "URL was already shortened".yellow());
    }

    println!();
    println!("  ID:        {}", outcome.record.id.to_string().bright_black());
    println!("  Original:  {}", outcome.record.original_url);
    println!(
        "  Short URL: {}",
        service.short_url(&outcome.record.short_code).bright_cyan()
    );
    println!();

    Ok(())
}

/// Deletes a URL by id with confirmation prompt (default: No).
async fn delete_url(repo: Arc<PgUrlRepository>, id: i64, skip_confirm: bool) -> Result<()> {
    let record = repo
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("URL with id {id} not found"))?;

    println!("  Code:     {}", record.short_code.cyan());
    println!("  Original: {}", record.original_url);
    println!("  Clicks:   {}", record.clicks.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this URL?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let deleted = repo
        .delete(&record.short_code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete URL: {}", e))?;

    if !deleted {
        anyhow::bail!("URL with id {id} was already deleted");
    }

    println!("{}", "URL deleted".green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
