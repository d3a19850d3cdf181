//! CLI administration tool for clipurl.
//!
//! Lists, toggles and deletes short URLs and prints statistics directly
//! against the database, without going through the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # List short URLs (20 per page), optionally filtered
//! cargo run --bin admin -- list --search example --page 2
//!
//! # Service-wide statistics
//! cargo run --bin admin -- stats
//!
//! # Activate/deactivate a URL
//! cargo run --bin admin -- toggle 42
//!
//! # Delete a URL and its clicks
//! cargo run --bin admin -- delete 42 --yes
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`clipurl::config`]. `DATABASE_URL` defaults to
//! the local SQLite file.

use clipurl::application::services::{AnalyticsService, UrlService};
use clipurl::config;
use clipurl::domain::entities::UrlStats;
use clipurl::domain::repositories::UrlFilter;
use clipurl::infrastructure::persistence::{self, Repositories};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

const PAGE_SIZE: i64 = 20;

/// CLI tool for managing clipurl.
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
    /// List short URLs, newest first
    List {
        /// Case-insensitive filter on URL, code, alias and description
        #[arg(short, long)]
        search: Option<String>,

        /// Page number (20 rows per page)
        #[arg(short, long, default_value_t = 1)]
        page: i64,
    },

    /// Show statistics
    Stats,

    /// Activate or deactivate a short URL
    Toggle {
        /// Record id
        id: i64,
    },

    /// Delete a short URL and all of its clicks
    Delete {
        /// Record id
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

struct Services {
    urls: UrlService,
    analytics: AnalyticsService,
}

impl Services {
    fn new(repositories: Repositories) -> Self {
        Self {
            urls: UrlService::new(repositories.urls.clone(), repositories.clicks.clone()),
            analytics: AnalyticsService::new(repositories.urls, repositories.clicks),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let services = Services::new(persistence::connect(&config).await?);

    match cli.command {
        Commands::List { search, page } => list_urls(&services, search, page).await?,
        Commands::Stats => show_stats(&services).await?,
        Commands::Toggle { id } => toggle_url(&services, id).await?,
        Commands::Delete { id, yes } => delete_url(&services, id, yes).await?,
        Commands::Db { action } => handle_db_action(action, &services).await?,
    }

    Ok(())
}

/// Prints one page of short URLs.
///
/// # Output Format
///
/// ```text
/// Short URLs
///
///   ID    Identifier       Clicks  Status    Long URL
///   ─────────────────────────────────────────────────────────────────
///   12    docs             5       ACTIVE    https://example.com/docs
///   11    x7Kp2Q           0       INACTIVE  https://example.org
/// ```
async fn list_urls(services: &Services, search: Option<String>, page: i64) -> Result<()> {
    println!("{}", "Short URLs".bright_blue().bold());
    println!();

    let filter = UrlFilter::new(page, PAGE_SIZE).with_search(search);
    let result = services.urls.list(filter).await?;

    if result.items.is_empty() {
        println!("{}", "  No URLs found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<16} {:<7} {:<9} {}",
        "ID".bright_white().bold(),
        "Identifier".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Status".bright_white().bold(),
        "Long URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for row in &result.items {
        print_row(row);
    }

    println!();
    println!(
        "  Page {} of {} ({} total)",
        result.page.to_string().bright_white().bold(),
        result.total_pages().to_string().bright_white().bold(),
        result.total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

fn print_row(row: &UrlStats) {
    let url = &row.url;
    let status = if !url.is_active {
        "INACTIVE".red()
    } else if url.is_expired() {
        "EXPIRED".yellow()
    } else {
        "ACTIVE".green()
    };

    println!(
        "  {:<5} {:<16} {:<7} {:<9} {}",
        url.id.to_string().bright_black(),
        url.identifier().cyan(),
        row.click_count,
        status,
        url.long_url
    );
}

/// Displays service-wide statistics.
async fn show_stats(services: &Services) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let summary = services.analytics.summary().await?;

    println!(
        "  URLs:          {}",
        summary.total_urls.to_string().bright_green().bold()
    );
    println!(
        "  Active URLs:   {}",
        summary.active_urls.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:        {}",
        summary.total_clicks.to_string().bright_green().bold()
    );
    println!();

    if !summary.popular.is_empty() {
        println!("{}", "  Most clicked".bright_white().bold());
        for row in &summary.popular {
            print_row(row);
        }
        println!();
    }

    println!("{}", "  Clicks, last 7 days".bright_white().bold());
    for day in &summary.daily {
        println!("  {}  {}", day.date.format("%Y-%m-%d"), day.count);
    }
    println!();

    Ok(())
}

async fn toggle_url(services: &Services, id: i64) -> Result<()> {
    let url = services.urls.toggle(id).await?;

    let state = if url.is_active {
        "activated".green()
    } else {
        "deactivated".yellow()
    };
    println!("  {} {}", url.identifier().cyan(), state.bold());

    Ok(())
}

/// Deletes a URL after confirmation (default: No).
async fn delete_url(services: &Services, id: i64, skip_confirm: bool) -> Result<()> {
    let url = services.urls.get(id).await?;

    println!("  URL:   {}", url.long_url.cyan());
    println!("  Code:  {}", url.identifier().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this URL and all of its clicks?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    services.urls.delete(id).await?;
    println!("{}", "URL deleted successfully".green().bold());

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, services: &Services) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            services.urls.ping().await?;

            println!("{}", "Database connection OK".green().bold());
        }
    }

    Ok(())
}
