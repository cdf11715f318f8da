//! Sitecms Admin CLI
//!
//! Manages the API keys `sitecms-server` accepts for writes.
//!
//! # Usage
//!
//! ```bash
//! sitecms-admin key add editor
//! sitecms-admin key list
//! sitecms-admin key remove editor
//! ```
//!
//! # Environment Variables
//!
//! - `SITECMS_CONFIG`: Server config file (default: ~/.config/sitecms-server/config.yaml)
//!
//! The server reads keys at startup; restart it after changes.

use clap::{Args, Parser, Subcommand};
use sitecms::server::{generate_key, KeyFile};
use std::path::PathBuf;

// ============================================================================
// CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "sitecms-admin")]
#[command(version)]
#[command(about = "Sitecms server administration tool")]
struct Cli {
    /// Server config file to edit
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API keys
    Key(KeyCommand),
}

#[derive(Args)]
struct KeyCommand {
    #[command(subcommand)]
    command: KeySubcommand,
}

#[derive(Subcommand)]
enum KeySubcommand {
    /// Issue a key for a principal
    Add {
        /// Name recorded with writes made with this key
        principal: String,
        /// Use this key instead of generating one
        #[arg(long)]
        key: Option<String>,
    },
    /// List all keys
    List,
    /// Remove every key of a principal
    Remove { principal: String },
}

fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var("SITECMS_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("sitecms-server")
                .join("config.yaml")
        })
}

/// Shows the start of a key only.
fn masked(key: &str) -> String {
    let visible: String = key.chars().take(6).collect();
    format!("{}…", visible)
}

fn add_key(
    path: PathBuf,
    principal: String,
    key: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let principal = principal.trim();
    if principal.is_empty() {
        return Err("principal must not be empty".into());
    }

    let mut file = KeyFile::read(&path)?;
    let key = key.unwrap_or_else(generate_key);
    let entry = file.add(principal, key)?.clone();
    file.write(&path)?;

    println!("Added key for: {}", entry.principal);
    println!("  Key: {}", entry.key);
    println!("  Config: {}", path.display());

    Ok(())
}

fn list_keys(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let file = KeyFile::read(&path)?;

    if file.api_keys.is_empty() {
        println!("No API keys registered.");
        return Ok(());
    }

    println!("{:<24} {:<12} {:<30}", "PRINCIPAL", "KEY", "CREATED");
    println!("{}", "-".repeat(66));

    for entry in &file.api_keys {
        println!(
            "{:<24} {:<12} {:<30}",
            entry.principal,
            masked(&entry.key),
            entry.created_at.as_deref().unwrap_or("")
        );
    }

    println!();
    println!("Total: {} key(s)", file.api_keys.len());

    Ok(())
}

fn remove_keys(path: PathBuf, principal: String) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = KeyFile::read(&path)?;

    let removed = file.remove_principal(&principal);
    if removed == 0 {
        return Err(format!("No keys found for '{}'", principal).into());
    }
    file.write(&path)?;

    println!("Removed {} key(s) for: {}", removed, principal);

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let path = config_path(cli.config);

    let result = match cli.command {
        Commands::Key(key_cmd) => match key_cmd.command {
            KeySubcommand::Add { principal, key } => add_key(path, principal, key),
            KeySubcommand::List => list_keys(path),
            KeySubcommand::Remove { principal } => remove_keys(path, principal),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
