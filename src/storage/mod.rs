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


//! Database storage and models
//!
//! This module handles all database operations using SQLite via sqlx.
//!
//! # Database Schema
//! - categories: user-defined tags, shared by both libraries
//! - mangas / chapters / mangas_categories: text-media library
//! - animes / episodes / animes_categories: video-media library
//!
//! # Usage Example
//! ```no_run
//! use tracker_core::storage::{queries, Database, MediaKind, NewLibraryItem};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new("./library.db").await?;
//!
//! let item = NewLibraryItem::new(1, "/manga/42".to_string(), "Alpha".to_string())
//!     .with_favorite(true);
//! queries::insert_item(db.pool(), MediaKind::Manga, &item).await?;
//!
//! for entry in queries::get_library(db.pool(), MediaKind::Manga).await? {
//!     println!("{} ({} unread)", entry.item.title, entry.unconsumed_count);
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod query_builder;
pub mod schema;

// Re-export commonly used types
pub use aggregate::{aggregate_library, CategoryLink, LibrarySnapshot};
pub use database::{Database, DatabaseStats};
pub use models::{
    Category, LibraryEntry, LibraryItem, NewCategory, NewLibraryItem, NewSubItem,
    PublishingStatus, SubItem, UNCATEGORIZED,
};
pub use schema::{LibrarySchema, MediaKind};
