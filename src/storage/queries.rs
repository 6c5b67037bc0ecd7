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


//! Database query functions
//!
//! Repository functions for both libraries. Functions that differ only by
//! media kind take a [`MediaKind`] and build their SQL from its schema.
//!
//! # Query Patterns
//! - Async/await for all database operations
//! - Library reads are side-effect free
//! - Multi-row writes run in a transaction

use crate::error::{Result, TrackerError};
use crate::storage::models::*;
use crate::storage::query_builder;
use crate::storage::schema::{MediaKind, CATEGORY_TABLE};
use chrono::Utc;
use futures_util::stream::{BoxStream, StreamExt};
use sqlx::SqlitePool;
use tracing::debug;

// ============================================================================
// LIBRARY VIEW
// ============================================================================

/// Favorite items with their progress counts, one row per category link
///
/// Items without categories appear once with [`UNCATEGORIZED`]. Rows are
/// ordered by title.
pub async fn get_library(pool: &SqlitePool, kind: MediaKind) -> Result<Vec<LibraryEntry>> {
    let schema = kind.schema();
    let rows = sqlx::query(query_builder::library_statement(kind))
        .fetch_all(pool)
        .await?;
    let entries = rows
        .iter()
        .map(|row| LibraryEntry::from_row(row, schema))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    debug!(%kind, rows = entries.len(), "loaded library");
    Ok(entries)
}

/// Lazy form of [`get_library`]: rows are decoded as SQLite produces them
///
/// The stream holds a pool connection until it is dropped or exhausted.
pub fn stream_library(pool: &SqlitePool, kind: MediaKind) -> BoxStream<'_, Result<LibraryEntry>> {
    let schema = kind.schema();

    sqlx::query(query_builder::library_statement(kind))
        .fetch(pool)
        .map(move |row| -> Result<LibraryEntry> {
            let row = row?;
            LibraryEntry::from_row(&row, schema).map_err(TrackerError::from)
        })
        .boxed()
}

/// Categories linked to one item; unknown ids yield an empty list
pub async fn get_categories_for_item(
    pool: &SqlitePool,
    kind: MediaKind,
    item_id: i64,
) -> Result<Vec<Category>> {
    let sql = query_builder::categories_for_item_query(kind.schema());
    let categories = sqlx::query_as::<_, Category>(&sql)
        .bind(item_id)
        .fetch_all(pool)
        .await?;

    Ok(categories)
}

/// Number of unconsumed chapters/episodes across favorite items
pub async fn count_unconsumed_in_library(pool: &SqlitePool, kind: MediaKind) -> Result<i64> {
    let sql = query_builder::unconsumed_total_query(kind.schema());
    let count: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;

    Ok(count)
}

/// Unconsumed total of both libraries, as shown on the updates badge
pub async fn library_badge_count(pool: &SqlitePool) -> Result<i64> {
    let mut total = 0;
    for kind in MediaKind::ALL {
        total += count_unconsumed_in_library(pool, kind).await?;
    }
    Ok(total)
}

/// Favorite with the same title from a different source
///
/// Used before adding an item to the library to warn about duplicates.
pub async fn find_duplicate_favorite(
    pool: &SqlitePool,
    kind: MediaKind,
    title: &str,
    source: i64,
) -> Result<Option<LibraryItem>> {
    let sql = query_builder::duplicate_favorite_query(kind.schema());
    let item = sqlx::query_as::<_, LibraryItem>(&sql)
        .bind(title)
        .bind(source)
        .fetch_optional(pool)
        .await?;

    Ok(item)
}

// ============================================================================
// ITEM QUERIES
// ============================================================================

/// Insert a new manga/anime
///
/// Returns the id of the inserted row.
pub async fn insert_item(pool: &SqlitePool, kind: MediaKind, item: &NewLibraryItem) -> Result<i64> {
    let sql = format!(
        r#"
        INSERT INTO {} (
            source, url, title, artist, author, description, genre,
            status, thumbnail_url, favorite, date_added
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        kind.schema().item_table
    );

    let result = sqlx::query(&sql)
        .bind(item.source)
        .bind(&item.url)
        .bind(&item.title)
        .bind(&item.artist)
        .bind(&item.author)
        .bind(&item.description)
        .bind(&item.genre)
        .bind(item.status)
        .bind(&item.thumbnail_url)
        .bind(item.favorite)
        .bind(item.date_added)
        .execute(pool)
        .await?;

    let id = result.last_insert_rowid();
    debug!(%kind, id, title = %item.title, "inserted item");
    Ok(id)
}

/// Find manga/anime by ID
pub async fn find_item_by_id(pool: &SqlitePool, kind: MediaKind, id: i64) -> Result<Option<LibraryItem>> {
    let schema = kind.schema();
    let sql = format!(
        "SELECT * FROM {} WHERE {} = ?",
        schema.item_table, schema.item_col_id
    );
    let item = sqlx::query_as::<_, LibraryItem>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(item)
}

/// Add an item to, or remove it from, the library
pub async fn set_favorite(pool: &SqlitePool, kind: MediaKind, id: i64, favorite: bool) -> Result<()> {
    let schema = kind.schema();
    let sql = format!(
        "UPDATE {} SET {} = ? WHERE {} = ?",
        schema.item_table, schema.item_col_favorite, schema.item_col_id
    );
    let result = sqlx::query(&sql)
        .bind(favorite)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(TrackerError::not_found(format!("{} {}", kind, id)));
    }

    debug!(%kind, id, favorite, "updated favorite flag");
    Ok(())
}

/// Delete an item (and its sub-items and category links via CASCADE)
pub async fn delete_item(pool: &SqlitePool, kind: MediaKind, id: i64) -> Result<()> {
    let schema = kind.schema();
    let sql = format!(
        "DELETE FROM {} WHERE {} = ?",
        schema.item_table, schema.item_col_id
    );
    sqlx::query(&sql).bind(id).execute(pool).await?;

    Ok(())
}

// ============================================================================
// CHAPTER / EPISODE QUERIES
// ============================================================================

/// Insert a chapter or episode
pub async fn insert_sub_item(pool: &SqlitePool, kind: MediaKind, sub_item: &NewSubItem) -> Result<i64> {
    let schema = kind.schema();
    let sql = format!(
        r#"
        INSERT INTO {} ({}, url, name, number, {}, date_upload, date_fetch)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
        schema.sub_item_table, schema.sub_item_col_item_id, schema.sub_item_col_consumed
    );

    let result = sqlx::query(&sql)
        .bind(sub_item.item_id)
        .bind(&sub_item.url)
        .bind(&sub_item.name)
        .bind(sub_item.number)
        .bind(sub_item.consumed)
        .bind(sub_item.date_upload)
        .bind(Utc::now().timestamp_millis())
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Mark a chapter read/unread or an episode seen/unseen
pub async fn set_sub_item_consumed(
    pool: &SqlitePool,
    kind: MediaKind,
    sub_item_id: i64,
    consumed: bool,
) -> Result<()> {
    let schema = kind.schema();
    let sql = format!(
        "UPDATE {} SET {} = ? WHERE {} = ?",
        schema.sub_item_table, schema.sub_item_col_consumed, schema.sub_item_col_id
    );
    let result = sqlx::query(&sql)
        .bind(consumed)
        .bind(sub_item_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(TrackerError::not_found(format!(
            "{} {}",
            schema.sub_item_table, sub_item_id
        )));
    }

    Ok(())
}

/// Chapters/episodes of one item, ordered by number
pub async fn list_sub_items(pool: &SqlitePool, kind: MediaKind, item_id: i64) -> Result<Vec<SubItem>> {
    let sql = query_builder::sub_items_for_item_query(kind.schema());
    let sub_items = sqlx::query_as::<_, SubItem>(&sql)
        .bind(item_id)
        .fetch_all(pool)
        .await?;

    Ok(sub_items)
}

// ============================================================================
// CATEGORY QUERIES
// ============================================================================

/// Insert a new category
pub async fn insert_category(pool: &SqlitePool, category: &NewCategory) -> Result<i64> {
    if category.name.trim().is_empty() {
        return Err(TrackerError::invalid_input("Category name must not be empty"));
    }

    let sql = format!("INSERT INTO {} (name, sort) VALUES (?, ?)", CATEGORY_TABLE);
    let result = sqlx::query(&sql)
        .bind(&category.name)
        .bind(category.sort)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// All categories ordered by sort position
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<Category>> {
    let sql = query_builder::list_categories_query();
    let categories = sqlx::query_as::<_, Category>(&sql).fetch_all(pool).await?;

    Ok(categories)
}

/// Link item to category (no-op when already linked)
pub async fn add_item_to_category(
    pool: &SqlitePool,
    kind: MediaKind,
    item_id: i64,
    category_id: i64,
) -> Result<()> {
    let schema = kind.schema();
    let sql = format!(
        "INSERT OR IGNORE INTO {} ({}, {}) VALUES (?, ?)",
        schema.junction_table, schema.junction_col_item_id, schema.junction_col_category_id
    );
    sqlx::query(&sql)
        .bind(item_id)
        .bind(category_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Replace the category set of an item
///
/// An empty slice leaves the item uncategorized. [`UNCATEGORIZED`] entries
/// are skipped since category 0 is never stored.
pub async fn set_item_categories(
    pool: &SqlitePool,
    kind: MediaKind,
    item_id: i64,
    category_ids: &[i64],
) -> Result<()> {
    let schema = kind.schema();
    let delete_sql = format!(
        "DELETE FROM {} WHERE {} = ?",
        schema.junction_table, schema.junction_col_item_id
    );
    let insert_sql = format!(
        "INSERT OR IGNORE INTO {} ({}, {}) VALUES (?, ?)",
        schema.junction_table, schema.junction_col_item_id, schema.junction_col_category_id
    );

    let mut tx = pool.begin().await?;

    sqlx::query(&delete_sql)
        .bind(item_id)
        .execute(&mut *tx)
        .await?;

    for &category_id in category_ids.iter().filter(|&&id| id != UNCATEGORIZED) {
        sqlx::query(&insert_sql)
            .bind(item_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    debug!(%kind, item_id, categories = ?category_ids, "replaced item categories");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::Database;
    use futures_util::TryStreamExt;

    async fn favorite(db: &Database, kind: MediaKind, title: &str) -> i64 {
        let item = NewLibraryItem::new(1, format!("/{}", title), title.to_string()).with_favorite(true);
        insert_item(db.pool(), kind, &item).await.expect("Failed to insert item")
    }

    #[tokio::test]
    async fn test_insert_and_find_item() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        let new_item = NewLibraryItem::new(7, "/manga/1".to_string(), "Test Manga".to_string())
            .with_author("Someone");
        let id = insert_item(db.pool(), MediaKind::Manga, &new_item)
            .await
            .expect("Failed to insert item");
        assert!(id > 0);

        let found = find_item_by_id(db.pool(), MediaKind::Manga, id)
            .await
            .expect("Failed to find item")
            .expect("Item missing");
        assert_eq!(found.title, "Test Manga");
        assert_eq!(found.author.as_deref(), Some("Someone"));
        assert!(!found.favorite);

        // Same id in the other library is a different row
        let other = find_item_by_id(db.pool(), MediaKind::Anime, id)
            .await
            .expect("Failed to query anime");
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn test_set_favorite_missing_item() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        let err = set_favorite(db.pool(), MediaKind::Anime, 99, true)
            .await
            .expect_err("Expected not found");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_sub_items_round_trip_through_aliases() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let anime = favorite(&db, MediaKind::Anime, "Show").await;

        let ep1 = insert_sub_item(db.pool(), MediaKind::Anime, &NewSubItem::new(anime, "/e1".into(), 1.0))
            .await
            .expect("Failed to insert episode");
        insert_sub_item(db.pool(), MediaKind::Anime, &NewSubItem::new(anime, "/e2".into(), 2.0))
            .await
            .expect("Failed to insert episode");

        set_sub_item_consumed(db.pool(), MediaKind::Anime, ep1, true)
            .await
            .expect("Failed to mark seen");

        let episodes = list_sub_items(db.pool(), MediaKind::Anime, anime)
            .await
            .expect("Failed to list episodes");
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].item_id, anime);
        assert!(episodes[0].consumed);
        assert!(!episodes[1].consumed);
    }

    #[tokio::test]
    async fn test_set_item_categories_replaces_links() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let manga = favorite(&db, MediaKind::Manga, "Alpha").await;
        let reading = insert_category(db.pool(), &NewCategory::new("Reading", 1)).await.unwrap();
        let later = insert_category(db.pool(), &NewCategory::new("Later", 2)).await.unwrap();

        set_item_categories(db.pool(), MediaKind::Manga, manga, &[reading, later])
            .await
            .expect("Failed to set categories");
        set_item_categories(db.pool(), MediaKind::Manga, manga, &[later, UNCATEGORIZED])
            .await
            .expect("Failed to set categories");

        let categories = get_categories_for_item(db.pool(), MediaKind::Manga, manga)
            .await
            .expect("Failed to get categories");
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Later");
    }

    #[tokio::test]
    async fn test_insert_category_rejects_blank_name() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        let err = insert_category(db.pool(), &NewCategory::new("  ", 0))
            .await
            .expect_err("Expected validation error");
        assert!(matches!(err, TrackerError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_duplicate_favorite_ignores_same_source() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        favorite(&db, MediaKind::Manga, "One Piece").await;

        let dup = find_duplicate_favorite(db.pool(), MediaKind::Manga, " one piece ", 2)
            .await
            .expect("Failed to query duplicates");
        assert_eq!(dup.map(|m| m.title), Some("One Piece".to_string()));

        let same_source = find_duplicate_favorite(db.pool(), MediaKind::Manga, "One Piece", 1)
            .await
            .expect("Failed to query duplicates");
        assert!(same_source.is_none());
    }

    #[tokio::test]
    async fn test_stream_matches_collected_library() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        favorite(&db, MediaKind::Manga, "Beta").await;
        favorite(&db, MediaKind::Manga, "Alpha").await;

        let streamed: Vec<LibraryEntry> = stream_library(db.pool(), MediaKind::Manga)
            .try_collect()
            .await
            .expect("Failed to stream library");
        let collected = get_library(db.pool(), MediaKind::Manga)
            .await
            .expect("Failed to load library");

        assert_eq!(streamed, collected);
        assert_eq!(streamed[0].item.title, "Alpha");
    }
}
