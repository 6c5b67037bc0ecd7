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


//! In-memory library aggregation
//!
//! Produces the same rows as the library query from already loaded rows:
//! count sub-items per owner and flag, keep favorites, sort by title, then
//! left-join the category links.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::error::Result;
use crate::storage::models::{LibraryEntry, LibraryItem, SubItem, UNCATEGORIZED};
use crate::storage::schema::MediaKind;

/// Row of an item/category junction table
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CategoryLink {
    pub item_id: i64,
    pub category_id: i64,
}

/// Full contents of one library's tables
#[derive(Debug, Clone, Default)]
pub struct LibrarySnapshot {
    pub items: Vec<LibraryItem>,
    pub sub_items: Vec<SubItem>,
    pub links: Vec<CategoryLink>,
}

impl LibrarySnapshot {
    /// Read every item, sub-item and category link of `kind`
    pub async fn load(pool: &SqlitePool, kind: MediaKind) -> Result<Self> {
        let s = kind.schema();

        let items = sqlx::query_as::<_, LibraryItem>(&format!("SELECT * FROM {}", s.item_table))
            .fetch_all(pool)
            .await?;

        let sub_items = sqlx::query_as::<_, SubItem>(&format!(
            "SELECT {id}, {owner} AS item_id, url, name, number, {flag} AS consumed, date_upload, date_fetch FROM {table}",
            id = s.sub_item_col_id,
            owner = s.sub_item_col_item_id,
            flag = s.sub_item_col_consumed,
            table = s.sub_item_table,
        ))
        .fetch_all(pool)
        .await?;

        let links = sqlx::query_as::<_, CategoryLink>(&format!(
            "SELECT {} AS item_id, {} AS category_id FROM {}",
            s.junction_col_item_id, s.junction_col_category_id, s.junction_table
        ))
        .fetch_all(pool)
        .await?;

        Ok(Self {
            items,
            sub_items,
            links,
        })
    }

    pub fn aggregate(&self) -> Vec<LibraryEntry> {
        aggregate_library(&self.items, &self.sub_items, &self.links)
    }
}

/// Build library rows from plain rows
///
/// Ordering matches the SQL form: title, then item id, then category id.
pub fn aggregate_library(
    items: &[LibraryItem],
    sub_items: &[SubItem],
    links: &[CategoryLink],
) -> Vec<LibraryEntry> {
    // (unconsumed, consumed) per owner
    let mut counts: HashMap<i64, (i64, i64)> = HashMap::new();
    for sub_item in sub_items {
        let entry = counts.entry(sub_item.item_id).or_default();
        if sub_item.consumed {
            entry.1 += 1;
        } else {
            entry.0 += 1;
        }
    }

    let mut categories: HashMap<i64, Vec<i64>> = HashMap::new();
    for link in links {
        categories.entry(link.item_id).or_default().push(link.category_id);
    }
    for ids in categories.values_mut() {
        ids.sort_unstable();
        ids.dedup();
    }

    let mut favorites: Vec<&LibraryItem> = items.iter().filter(|item| item.favorite).collect();
    favorites.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
    favorites.dedup_by_key(|item| item.id);

    let mut entries = Vec::with_capacity(favorites.len());
    for item in favorites {
        let (unconsumed_count, consumed_count) = counts.get(&item.id).copied().unwrap_or((0, 0));
        let row = |category| LibraryEntry {
            item: item.clone(),
            unconsumed_count,
            consumed_count,
            category,
        };

        match categories.get(&item.id) {
            Some(ids) => entries.extend(ids.iter().map(|&id| row(id))),
            None => entries.push(row(UNCATEGORIZED)),
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, title: &str, favorite: bool) -> LibraryItem {
        LibraryItem {
            id,
            source: 1,
            url: format!("/{}", id),
            title: title.to_string(),
            artist: None,
            author: None,
            description: None,
            genre: None,
            status: 0,
            thumbnail_url: None,
            favorite,
            last_update: 0,
            initialized: true,
            date_added: 0,
        }
    }

    fn sub(id: i64, item_id: i64, consumed: bool) -> SubItem {
        SubItem {
            id,
            item_id,
            url: format!("/c/{}", id),
            name: String::new(),
            number: id as f32,
            consumed,
            date_upload: 0,
            date_fetch: 0,
        }
    }

    #[test]
    fn test_counts_and_uncategorized_default() {
        let items = vec![item(1, "Zeta", true), item(2, "Alpha", true)];
        let subs = vec![sub(1, 1, false), sub(2, 1, true), sub(3, 1, false)];

        let rows = aggregate_library(&items, &subs, &[]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item.title, "Alpha");
        assert_eq!((rows[0].unconsumed_count, rows[0].consumed_count), (0, 0));
        assert_eq!(rows[0].category, UNCATEGORIZED);
        assert_eq!((rows[1].unconsumed_count, rows[1].consumed_count), (2, 1));
    }

    #[test]
    fn test_one_row_per_category_and_non_favorites_dropped() {
        let items = vec![item(1, "Alpha", true), item(2, "Gamma", false)];
        let links = vec![
            CategoryLink { item_id: 1, category_id: 5 },
            CategoryLink { item_id: 1, category_id: 2 },
            CategoryLink { item_id: 2, category_id: 2 },
        ];

        let rows = aggregate_library(&items, &[], &links);

        let categories: Vec<i64> = rows.iter().map(|r| r.category).collect();
        assert_eq!(categories, vec![2, 5]);
        assert!(rows.iter().all(|r| r.item.id == 1));
    }

    #[test]
    fn test_duplicate_item_rows_collapse() {
        let items = vec![item(1, "Alpha", true), item(1, "Alpha", true)];
        assert_eq!(aggregate_library(&items, &[], &[]).len(), 1);
    }
}
