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


//! Database models
//!
//! Row types for both libraries. Mangas and animes share a column set, so a
//! single [`LibraryItem`] covers both; chapters and episodes are read through
//! column aliases into [`SubItem`].
//!
//! # Design Notes
//! - Timestamps are epoch milliseconds (INTEGER columns)
//! - Booleans are stored as INTEGER 0/1
//! - Many-to-many item/category links use one junction table per media kind

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use super::schema::{LibrarySchema, COMPUTED_COL_CATEGORY};

/// Category id reported for items without any category link
pub const UNCATEGORIZED: i64 = 0;

// ============================================================================
// ENUMS
// ============================================================================

/// Publishing / airing status reported by the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum PublishingStatus {
    Unknown = 0,
    Ongoing = 1,
    Completed = 2,
    Licensed = 3,
}

impl PublishingStatus {
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => PublishingStatus::Ongoing,
            2 => PublishingStatus::Completed,
            3 => PublishingStatus::Licensed,
            _ => PublishingStatus::Unknown,
        }
    }
}

// ============================================================================
// MAIN ENTITIES
// ============================================================================

/// A manga or anime row
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct LibraryItem {
    pub id: i64,
    /// Id of the source the item was fetched from
    pub source: i64,
    pub url: String,
    pub title: String,
    #[sqlx(default)]
    pub artist: Option<String>,
    #[sqlx(default)]
    pub author: Option<String>,
    #[sqlx(default)]
    pub description: Option<String>,
    #[sqlx(default)]
    pub genre: Option<String>,
    pub status: i32, // PublishingStatus as integer
    #[sqlx(default)]
    pub thumbnail_url: Option<String>,
    pub favorite: bool,
    pub last_update: i64,
    pub initialized: bool,
    pub date_added: i64,
}

impl LibraryItem {
    pub fn get_status(&self) -> PublishingStatus {
        PublishingStatus::from_i32(self.status)
    }

    /// Genres as a list (stored comma-separated)
    pub fn get_genres(&self) -> Vec<String> {
        self.genre
            .as_deref()
            .map(|g| {
                g.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A chapter (manga) or episode (anime)
///
/// Read through aliases: `manga_id`/`anime_id` as `item_id`,
/// `read`/`seen` as `consumed`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SubItem {
    pub id: i64,
    pub item_id: i64,
    pub url: String,
    pub name: String,
    pub number: f32,
    pub consumed: bool,
    pub date_upload: i64,
    pub date_fetch: i64,
}

/// User-defined category, shared by both libraries
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub name: String,
    pub sort: i32,
    pub flags: i64,
}

/// One row of the library view: an item, its progress counts and one of
/// its categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
    #[serde(flatten)]
    pub item: LibraryItem,
    pub unconsumed_count: i64,
    pub consumed_count: i64,
    /// [`UNCATEGORIZED`] when the item has no category link
    pub category: i64,
}

impl LibraryEntry {
    /// Decode a row of the library query for `schema`
    pub fn from_row(row: &SqliteRow, schema: &LibrarySchema) -> sqlx::Result<Self> {
        Ok(Self {
            item: LibraryItem::from_row(row)?,
            unconsumed_count: row.try_get(schema.computed_col_unconsumed)?,
            consumed_count: row.try_get(schema.computed_col_consumed)?,
            category: row.try_get(COMPUTED_COL_CATEGORY)?,
        })
    }

    pub fn total_count(&self) -> i64 {
        self.unconsumed_count + self.consumed_count
    }

    pub fn is_uncategorized(&self) -> bool {
        self.category == UNCATEGORIZED
    }
}

// ============================================================================
// NEW RECORD STRUCTS (for inserts)
// ============================================================================

/// New manga/anime record for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLibraryItem {
    pub source: i64,
    pub url: String,
    pub title: String,
    pub artist: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub status: i32,
    pub thumbnail_url: Option<String>,
    pub favorite: bool,
    pub date_added: i64,
}

impl NewLibraryItem {
    pub fn new(source: i64, url: String, title: String) -> Self {
        Self {
            source,
            url,
            title,
            artist: None,
            author: None,
            description: None,
            genre: None,
            status: PublishingStatus::Unknown as i32,
            thumbnail_url: None,
            favorite: false,
            date_added: Utc::now().timestamp_millis(),
        }
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// New chapter/episode record for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubItem {
    pub item_id: i64,
    pub url: String,
    pub name: String,
    pub number: f32,
    pub consumed: bool,
    pub date_upload: i64,
}

impl NewSubItem {
    pub fn new(item_id: i64, url: String, number: f32) -> Self {
        Self {
            item_id,
            url,
            name: String::new(),
            number,
            consumed: false,
            date_upload: 0,
        }
    }

    pub fn consumed(mut self, consumed: bool) -> Self {
        self.consumed = consumed;
        self
    }
}

/// New category record for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub sort: i32,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, sort: i32) -> Self {
        Self {
            name: name.into(),
            sort,
        }
    }
}
