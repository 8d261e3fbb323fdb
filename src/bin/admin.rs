//! Home Stock Admin CLI
//!
//! Administration tool for managing family groups in the server database.
//!
//! # Usage
//!
//! ```bash
//! home-stock-admin group create Smiths --password summerFun1
//! home-stock-admin group list
//! home-stock-admin group show 4821
//! ```
//!
//! # Environment Variables
//!
//! - `HOME_STOCK_DATABASE_PATH`: SQLite database used by the server

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use home_stock::config::Config;
use home_stock::db::{init_db, GroupRepository};
use home_stock::family::GroupStore;
use home_stock::models::GroupCode;

// ============================================================================
// CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "home-stock-admin")]
#[command(version)]
#[command(about = "Home Stock server administration tool")]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage family groups
    Group(GroupCommand),
}

#[derive(Args)]
struct GroupCommand {
    #[command(subcommand)]
    command: GroupSubcommand,
}

#[derive(Subcommand)]
enum GroupSubcommand {
    /// Create a new family group and print its code
    Create {
        /// Family display name
        name: String,
        /// Shared password members use to join
        #[arg(long, short)]
        password: String,
    },
    /// List all family groups
    List,
    /// Show a family group and its members
    Show {
        /// Four-digit family code
        code: String,
    },
}

// ============================================================================
// Commands
// ============================================================================

async fn create_group(
    config: &Config,
    name: String,
    password: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = home_stock::build_service(config).await?;
    let created = service.create(&name, &password).await?;

    println!("Created family group: {}", name.trim());
    println!("  Code: {}", created.code);
    println!("  ID: {}", created.id);

    Ok(())
}

async fn list_groups(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let repo = GroupRepository::new(init_db(&config.database_path).await?);
    let groups = repo.list().await?;

    if groups.is_empty() {
        println!("No family groups registered.");
        return Ok(());
    }

    println!("{:<6} {:<30} {:<8} {:<20}", "CODE", "NAME", "MEMBERS", "CREATED");
    println!("{}", "-".repeat(66));

    for group in &groups {
        println!(
            "{:<6} {:<30} {:<8} {:<20}",
            group.code,
            group.name,
            group.members.len(),
            group.created_at.format("%Y-%m-%d %H:%M")
        );
    }

    println!();
    println!("Total: {} group(s)", groups.len());

    Ok(())
}

async fn show_group(config: &Config, code: String) -> Result<(), Box<dyn std::error::Error>> {
    let code = GroupCode::parse(&code)?;
    let repo = GroupRepository::new(init_db(&config.database_path).await?);

    match repo.find_by_code(&code).await? {
        Some(group) => print!("{}", group),
        None => {
            eprintln!("Error: No family group with code '{}'", code);
            std::process::exit(1);
        }
    }

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "home_stock=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match Config::load(cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Group(group_cmd) => match group_cmd.command {
            GroupSubcommand::Create { name, password } => {
                create_group(&config, name, password).await
            }
            GroupSubcommand::List => list_groups(&config).await,
            GroupSubcommand::Show { code } => show_group(&config, code).await,
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
