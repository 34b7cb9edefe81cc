//! Donghang CLI - database migrations and inbox tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the inquiries table
//! dh-cli migrate
//!
//! # Print the inbox (optionally unread only)
//! dh-cli inquiries list --unread
//!
//! # Check a password against ADMIN_PASSWORD
//! dh-cli admin check-password 'hunter2'
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `inquiries list` - List stored inquiries
//! - `admin check-password` - Verify a candidate admin password

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dh-cli")]
#[command(author, version, about = "Donghang call center CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations against `DATABASE_URL`
    Migrate,
    /// Inspect the inquiry inbox
    Inquiries {
        #[command(subcommand)]
        action: InquiriesAction,
    },
    /// Admin session tools
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum InquiriesAction {
    /// List inquiries, newest first
    List {
        /// Only show inquiries not yet marked as read
        #[arg(short, long)]
        unread: bool,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Check a password against the configured admin password (exit 0 on match)
    CheckPassword {
        /// Candidate password
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Inquiries { action } => match action {
            InquiriesAction::List { unread } => commands::inquiries::list(unread).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::CheckPassword { password } => {
                commands::admin::check_password(&password)?;
            }
        },
    }
    Ok(())
}
