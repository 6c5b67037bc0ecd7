// Tracker Core - Manga/Anime Library Storage
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracker_core::storage::queries;
use tracker_core::{logging, Config, Database, MediaKind};

#[derive(Parser)]
#[command(name = "tracker-cli")]
#[command(about = "Tracker CLI - inspect a library database", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overrides the config
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the library view (one row per item and category)
    Library {
        /// manga or anime
        #[arg(short, long)]
        kind: MediaKind,
        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the categories of one item
    Categories {
        #[arg(short, long)]
        kind: MediaKind,
        /// Item id
        #[arg(long)]
        id: i64,
    },
    /// Count unread chapters / unseen episodes in the library
    Unconsumed {
        /// Restrict to one kind; both when omitted
        #[arg(short, long)]
        kind: Option<MediaKind>,
    },
    /// Look for a favorite with the same title from another source
    Duplicate {
        #[arg(short, long)]
        kind: MediaKind,
        #[arg(short, long)]
        title: String,
        /// Source of the item about to be added
        #[arg(short, long)]
        source: i64,
    },
    /// Integrity check and page statistics
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(database) = cli.database {
        config.database_path = database;
    }
    logging::init(&config.log_level);

    let db = Database::from_config(&config)
        .await
        .with_context(|| format!("Failed to open {}", config.database_path.display()))?;

    match cli.command {
        Commands::Library { kind, json } => {
            let entries = queries::get_library(db.pool(), kind).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                let (unconsumed, consumed) = match kind {
                    MediaKind::Manga => ("unread", "read"),
                    MediaKind::Anime => ("unseen", "seen"),
                };
                for entry in &entries {
                    println!(
                        "[{:>3}] {:<40} {} {}, {} {}  (category {})",
                        entry.item.id,
                        entry.item.title,
                        entry.unconsumed_count,
                        unconsumed,
                        entry.consumed_count,
                        consumed,
                        entry.category
                    );
                }
                println!("{} rows", entries.len());
            }
        }
        Commands::Categories { kind, id } => {
            let categories = queries::get_categories_for_item(db.pool(), kind, id).await?;
            if categories.is_empty() {
                println!("{} {} has no categories", kind, id);
            }
            for category in categories {
                println!("{:>3}  {}", category.category_id, category.name);
            }
        }
        Commands::Unconsumed { kind } => match kind {
            Some(kind) => {
                let count = queries::count_unconsumed_in_library(db.pool(), kind).await?;
                println!("{}: {}", kind, count);
            }
            None => {
                let count = queries::library_badge_count(db.pool()).await?;
                println!("total: {}", count);
            }
        },
        Commands::Duplicate { kind, title, source } => {
            match queries::find_duplicate_favorite(db.pool(), kind, &title, source).await? {
                Some(item) => println!(
                    "Duplicate of {} {} '{}' from source {}",
                    kind, item.id, item.title, item.source
                ),
                None => println!("No duplicate for '{}'", title),
            }
        }
        Commands::Check => {
            let ok = db.check_integrity().await?;
            let stats = db.get_stats().await?;
            println!("integrity: {}", if ok { "ok" } else { "FAILED" });
            println!("{}", serde_json::to_string_pretty(&stats)?);
            if stats.should_vacuum() {
                info!(unused = stats.unused_percentage(), "vacuuming database");
                db.vacuum().await?;
            }
        }
    }

    db.close().await?;
    Ok(())
}
