//! CLI administration tool for shortlink.
//!
//! Provides commands for inspecting analytics, managing links, and checking
//! the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Monthly analytics
//! cargo run --bin admin -- stats
//!
//! # Latest links, or one user's links
//! cargo run --bin admin -- links list
//! cargo run --bin admin -- links list --user 6f1c...
//!
//! # Delete a link (asks for confirmation)
//! cargo run --bin admin -- links delete 42
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use shortlink::application::services::AnalyticsService;
use shortlink::domain::entities::Owner;
use shortlink::domain::repositories::UrlRepository;
use shortlink::infrastructure::persistence::{PgUrlRepository, PgVisitRepository};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
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

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show this and last month's analytics
    Stats,

    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinksAction {
    /// List links, newest first
    List {
        /// Only links owned by this user id
        #[arg(short, long)]
        user: Option<String>,

        /// Maximum rows when listing all links
        #[arg(short, long, default_value_t = 50)]
        limit: i64,
    },

    /// Delete a link and its visits
    Delete {
        /// Link id
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    short_code: String,
    long_url: String,
    user_id: Option<String>,
    created_at: DateTime<Utc>,
    total_visits: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Links { action } => handle_links_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    pool.close().await;

    Ok(())
}

fn format_growth(growth: f64) -> ColoredString {
    let text = format!("{:+.1}%", growth);
    if growth < 0.0 {
        text.red()
    } else {
        text.green()
    }
}

/// Displays monthly analytics.
///
/// Same numbers as `GET /api/analytics/users`, computed in this machine's
/// local time zone.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Monthly analytics".bright_blue().bold());
    println!();

    let pool = Arc::new(pool.clone());
    let service = AnalyticsService::new(
        Arc::new(PgUrlRepository::new(pool.clone())),
        Arc::new(PgVisitRepository::new(pool)),
    );

    let summary = service
        .monthly_summary(&Local::now())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to compute analytics: {}", e))?;

    println!(
        "  {:<10} {:>10} {:>10} {:>10}",
        "".bright_white(),
        "Current".bright_white().bold(),
        "Previous".bright_white().bold(),
        "Growth".bright_white().bold()
    );
    println!("  {}", "-".repeat(44).bright_black());

    for (label, current, previous, growth) in [
        (
            "Visitors",
            summary.current_month_users,
            summary.previous_month_users,
            summary.users_growth,
        ),
        (
            "Clicks",
            summary.current_month_clicks,
            summary.previous_month_clicks,
            summary.clicks_growth,
        ),
        (
            "Links",
            summary.current_month_links,
            summary.previous_month_links,
            summary.links_growth,
        ),
    ] {
        println!(
            "  {:<10} {:>10} {:>10} {:>10}",
            label.cyan(),
            current.to_string().bright_green().bold(),
            previous.to_string().bright_black(),
            format_growth(growth)
        );
    }
    println!();

    Ok(())
}

/// Dispatches link management commands.
async fn handle_links_action(action: LinksAction, pool: &PgPool) -> Result<()> {
    match action {
        LinksAction::List { user, limit } => list_links(pool, user, limit).await,
        LinksAction::Delete { id, yes } => {
            let repo = PgUrlRepository::new(Arc::new(pool.clone()));
            delete_link(&repo, id, yes).await
        }
    }
}

/// Lists links with visit counts.
///
/// # Output Format
///
/// ```text
///   ID    Code      Visits  Created            URL
///   ----------------------------------------------------------------------
///   12    Ab3_x9Qz  4       2026-10-02 09:14   https://example.com/...
/// ```
async fn list_links(pool: &PgPool, user: Option<String>, limit: i64) -> Result<()> {
    println!("{}", "Short links".bright_blue().bold());
    println!();

    let rows: Vec<LinkRow> = match user {
        Some(user_id) => {
            let repo = PgUrlRepository::new(Arc::new(pool.clone()));
            repo.list_with_visits(&Owner::User(user_id))
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?
                .into_iter()
                .map(|item| LinkRow {
                    id: item.url.id,
                    short_code: item.url.short_code,
                    long_url: item.url.long_url,
                    user_id: item.url.user_id,
                    created_at: item.url.created_at,
                    total_visits: item.total_visits,
                })
                .collect()
        }
        None => {
            sqlx::query_as(
                r#"
                SELECT u.id, u.short_code, u.long_url, u.user_id, u.created_at,
                       COUNT(v.id) AS total_visits
                FROM urls u
                LEFT JOIN visits v ON v.url_id = u.id
                GROUP BY u.id
                ORDER BY u.created_at DESC
                LIMIT $1
                "#,
            )
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };

    if rows.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<6} {:<10} {:<7} {:<18} {:<8} {}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Visits".bright_white().bold(),
        "Created".bright_white().bold(),
        "Owner".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "-".repeat(70).bright_black());

    for row in &rows {
        let owner = if row.user_id.is_some() {
            "user".green()
        } else {
            "guest".yellow()
        };

        println!(
            "  {:<6} {:<10} {:<7} {:<18} {:<8} {}",
            row.id.to_string().bright_black(),
            row.short_code.cyan(),
            row.total_visits,
            row.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            owner,
            row.long_url
        );
    }

    println!();
    println!("  Total: {}", rows.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(repo: &PgUrlRepository, id: i64, skip_confirm: bool) -> Result<()> {
    println!("{}", "Delete short link".bright_blue().bold());
    println!();

    let url = repo
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Link not found")?;

    println!("  Code: {}", url.short_code.cyan());
    println!("  URL:  {}", url.long_url);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link and all of its visits?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    repo.delete(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!("{}", "Link deleted".green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let urls: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
                .fetch_one(pool)
                .await?;
            let visits: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visits")
                .fetch_one(pool)
                .await?;
            let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Links:      {}", urls.to_string().bright_green());
            println!("  Visits:     {}", visits.to_string().bright_green());
            println!("  Users:      {}", users.to_string().bright_green());
            println!();
        }
    }

    Ok(())
}
