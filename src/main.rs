// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity store command-line client
//!
//! Drives the activity store against a live API: list activities grouped by
//! day, show one activity, or delete one.

use activity_store::{
    config::Config,
    services::HttpActivityApi,
    ActivityStore,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "activity-store", about = "Browse and manage activities")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List all activities grouped by day
    List,
    /// Show a single activity
    Show { id: String },
    /// Delete an activity
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    tracing::info!(api = %config.api_base_url, "Starting activity client");

    let store = ActivityStore::new(HttpActivityApi::new(&config)?);

    match cli.command.unwrap_or(Command::List) {
        Command::List => {
            store.load_activities().await?;
            for (day, activities) in store.activities_by_date() {
                println!("{}", day);
                for activity in activities {
                    println!(
                        "  {}  {} ({}, {} @ {})",
                        activity.id, activity.title, activity.category, activity.venue, activity.city
                    );
                }
            }
        }
        Command::Show { id } => {
            let activity = store.load_activity(&id).await?;
            println!("{}", serde_json::to_string_pretty(&activity)?);
        }
        Command::Delete { id } => {
            store.delete_activity(&id, "cli").await?;
            println!("Deleted {}", id);
        }
    }

    Ok(())
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("activity_store=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
