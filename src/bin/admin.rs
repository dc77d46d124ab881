//! CLI administration tool for url-shortener.
//!
//! Works directly on the configured storage backend, without the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL on behalf of user 7
//! cargo run --bin admin -- encode https://example.com --user 7
//!
//! # Resolve a code
//! cargo run --bin admin -- decode Ab3dE6gH
//!
//! # List a user's links
//! cargo run --bin admin -- history 7
//!
//! # Delete links immediately (asks for confirmation)
//! cargo run --bin admin -- delete Ab3dE6gH Zx9yW8vU --user 7
//!
//! # View statistics / check storage
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- ping
//! ```
//!
//! # Environment Variables
//!
//! The same variables as the server select the backend: `DATABASE_DSN`,
//! `FILE_STORAGE_PATH`, or neither for a throwaway in-memory store.

use url_shortener::application::services::{Coder, CoderSettings};
use url_shortener::config::{self, Config};
use url_shortener::domain::entities::DeletionRequest;
use url_shortener::domain::repositories::LinkRepository;
use url_shortener::error::AppError;
use url_shortener::infrastructure::persistence::StorageBackend;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing url-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL
    Encode {
        url: String,

        /// Owner of the new link (0 = anonymous)
        #[arg(short, long, default_value_t = 0)]
        user: i64,
    },

    /// Resolve a short code to its URL
    Decode {
        code: String,

        #[arg(short, long, default_value_t = 0)]
        user: i64,
    },

    /// List the live links of a user
    History { user: i64 },

    /// Soft-delete links owned by a user, bypassing the deletion queue
    Delete {
        #[arg(required = true)]
        codes: Vec<String>,

        #[arg(short, long)]
        user: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show statistics
    Stats,

    /// Check storage reachability
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let storage = Arc::new(StorageBackend::from_config(&config).await?);
    let coder = Coder::new(storage.clone(), CoderSettings::from(&config));

    let result = match cli.command {
        Commands::Encode { url, user } => encode(&coder, &config, &url, user).await,
        Commands::Decode { code, user } => decode(&coder, &code, user).await,
        Commands::History { user } => history(&coder, &config, user).await,
        Commands::Delete { codes, user, yes } => delete(storage.as_ref(), codes, user, yes).await,
        Commands::Stats => stats(&coder, storage.name()).await,
        Commands::Ping => ping(&coder, storage.name()).await,
    };

    coder.shutdown().await;
    result
}

async fn encode(
    coder: &Coder<StorageBackend>,
    config: &Config,
    url: &str,
    user: i64,
) -> Result<()> {
    match coder.to_code(url, user).await {
        Ok(code) => {
            println!("{}", "✅ Short link created".green().bold());
            println!("  {}", short_url(config, &code).bright_yellow());
        }
        Err(AppError::Conflict { code }) => {
            println!("{}", "⚠️  URL was already shortened".yellow());
            println!("  {}", short_url(config, &code).bright_yellow());
        }
        Err(e) => anyhow::bail!("Failed to shorten URL: {}", e),
    }

    Ok(())
}

async fn decode(coder: &Coder<StorageBackend>, code: &str, user: i64) -> Result<()> {
    match coder.to_uri(code, user).await {
        Ok(uri) => println!("  {} → {}", code.cyan(), uri.bright_white()),
        Err(AppError::RowDeleted { .. }) => println!("{}", "🗑️  Link was deleted".yellow()),
        Err(AppError::NotFound { .. }) => println!("{}", "❌ Link not found".red()),
        Err(e) => anyhow::bail!("Failed to resolve code: {}", e),
    }

    Ok(())
}

/// Lists a user's live links.
///
/// # Output Format
///
/// ```text
/// 📋 Links of user 7
///
///   Code      Original URL
///   ────────────────────────────────────────
///   Ab3dE6gH  https://example.com
/// ```
async fn history(coder: &Coder<StorageBackend>, config: &Config, user: i64) -> Result<()> {
    println!("{}", format!("📋 Links of user {user}").bright_blue().bold());
    println!();

    let entries = coder
        .get_history(user)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load history: {}", e))?;

    if entries.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<9} {}",
        "Code".bright_white().bold(),
        "Original URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(40).bright_black());

    for entry in &entries {
        println!("  {:<9} {}", entry.code.cyan(), entry.original_uri);
    }

    println!();
    println!(
        "  Total: {}  ({})",
        entries.len().to_string().bright_white().bold(),
        config.base_url.bright_black()
    );
    println!();

    Ok(())
}

/// Soft-deletes `codes` owned by `user` right away.
///
/// Requires confirmation (default: No) unless `--yes` is given. Codes the
/// user does not own are left untouched.
async fn delete(storage: &StorageBackend, codes: Vec<String>, user: i64, yes: bool) -> Result<()> {
    println!("{}", "🗑️  Delete links".bright_blue().bold());
    println!();
    for code in &codes {
        println!("  {}", code.cyan());
    }
    println!();

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {} link(s) of user {}?", codes.len(), user))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let requests: Vec<DeletionRequest> = codes
        .into_iter()
        .map(|code| DeletionRequest::new(user, code))
        .collect();

    storage
        .soft_delete(&requests)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete links: {}", e))?;

    println!("{}", "✅ Links deleted".green().bold());
    println!();

    Ok(())
}

async fn stats(coder: &Coder<StorageBackend>, backend: &str) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let stats = coder
        .get_stats()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    println!("  Backend: {}", backend.bright_white());
    println!("  URLs:    {}", stats.urls.to_string().bright_green().bold());
    println!("  Users:   {}", stats.users.to_string().bright_green().bold());
    println!();

    Ok(())
}

async fn ping(coder: &Coder<StorageBackend>, backend: &str) -> Result<()> {
    println!("{}", format!("🔍 Checking {backend} storage...").bright_blue());

    coder
        .health_check()
        .await
        .map_err(|e| anyhow::anyhow!("Storage check failed: {}", e))?;

    println!("{}", "✅ Storage OK".green().bold());
    Ok(())
}

fn short_url(config: &Config, code: &str) -> String {
    format!("{}/{}", config.base_url, code)
}
