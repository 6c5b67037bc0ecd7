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


//! SQL composition for the per-kind queries
//!
//! Every function here is pure: it takes a [`LibrarySchema`] and returns
//! the statement text. Binding and execution live in `queries`.

use std::sync::OnceLock;

use super::schema::{
    LibrarySchema, MediaKind, ANIME, CATEGORY_COL_ID, CATEGORY_COL_NAME, CATEGORY_COL_SORT,
    CATEGORY_TABLE, COMPUTED_COL_CATEGORY, MANGA,
};

static MANGA_LIBRARY: OnceLock<String> = OnceLock::new();
static ANIME_LIBRARY: OnceLock<String> = OnceLock::new();

/// [`library_query`] built once per media kind
///
/// Streaming fetches need SQL text that outlives the returned stream.
pub fn library_statement(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Manga => MANGA_LIBRARY.get_or_init(|| library_query(&MANGA)),
        MediaKind::Anime => ANIME_LIBRARY.get_or_init(|| library_query(&ANIME)),
    }
}

/// Library view: one row per (favorite item, category link)
///
/// Sub-item counts come from two grouped LEFT JOINs (consumed = 0 and
/// consumed = 1), coalesced to 0 for items without sub-items. The category
/// join is also a LEFT JOIN so that items without any link still produce a
/// single row, tagged with category 0.
///
/// SQLite does not promise that a subquery's ORDER BY survives the outer
/// join, so the final ordering is repeated on the outer statement with item
/// id and category as tie breakers.
pub fn library_query(s: &LibrarySchema) -> String {
    format!(
        r#"
        SELECT M.*, COALESCE(MC.{junction_category}, 0) AS {category}
        FROM (
            SELECT {items}.*,
                COALESCE(C.{unconsumed}, 0) AS {unconsumed},
                COALESCE(R.{consumed}, 0) AS {consumed}
            FROM {items}
            LEFT JOIN (
                SELECT {sub_owner}, COUNT(*) AS {unconsumed}
                FROM {sub_items}
                WHERE {flag} = 0
                GROUP BY {sub_owner}
            ) AS C
            ON {items}.{id} = C.{sub_owner}
            LEFT JOIN (
                SELECT {sub_owner}, COUNT(*) AS {consumed}
                FROM {sub_items}
                WHERE {flag} = 1
                GROUP BY {sub_owner}
            ) AS R
            ON {items}.{id} = R.{sub_owner}
            WHERE {items}.{favorite} = 1
            GROUP BY {items}.{id}
            ORDER BY {items}.{title}
        ) AS M
        LEFT JOIN (
            SELECT * FROM {junction}
        ) AS MC
        ON MC.{junction_item} = M.{id}
        ORDER BY M.{title}, M.{id}, {category}
        "#,
        items = s.item_table,
        id = s.item_col_id,
        title = s.item_col_title,
        favorite = s.item_col_favorite,
        sub_items = s.sub_item_table,
        sub_owner = s.sub_item_col_item_id,
        flag = s.sub_item_col_consumed,
        junction = s.junction_table,
        junction_item = s.junction_col_item_id,
        junction_category = s.junction_col_category_id,
        unconsumed = s.computed_col_unconsumed,
        consumed = s.computed_col_consumed,
        category = COMPUTED_COL_CATEGORY,
    )
}

/// Categories linked to one item (bind: item id)
///
/// No ORDER BY; rows come back in join order.
pub fn categories_for_item_query(s: &LibrarySchema) -> String {
    format!(
        r#"
        SELECT {categories}.* FROM {categories}
        JOIN {junction} ON {categories}.{category_id} =
        {junction}.{junction_category}
        WHERE {junction}.{junction_item} = ?
        "#,
        categories = CATEGORY_TABLE,
        category_id = CATEGORY_COL_ID,
        junction = s.junction_table,
        junction_category = s.junction_col_category_id,
        junction_item = s.junction_col_item_id,
    )
}

/// Sub-items of one item with columns aliased to [`SubItem`] names (bind: item id)
///
/// [`SubItem`]: super::models::SubItem
pub fn sub_items_for_item_query(s: &LibrarySchema) -> String {
    format!(
        r#"
        SELECT {id}, {owner} AS item_id, url, name, number,
            {flag} AS consumed, date_upload, date_fetch
        FROM {sub_items}
        WHERE {owner} = ?
        ORDER BY number, {id}
        "#,
        id = s.sub_item_col_id,
        owner = s.sub_item_col_item_id,
        flag = s.sub_item_col_consumed,
        sub_items = s.sub_item_table,
    )
}

/// Number of unconsumed sub-items across all favorite items
pub fn unconsumed_total_query(s: &LibrarySchema) -> String {
    format!(
        r#"
        SELECT COUNT(*)
        FROM {sub_items}
        JOIN {items} ON {items}.{id} = {sub_items}.{owner}
        WHERE {items}.{favorite} = 1 AND {sub_items}.{flag} = 0
        "#,
        sub_items = s.sub_item_table,
        items = s.item_table,
        id = s.item_col_id,
        owner = s.sub_item_col_item_id,
        favorite = s.item_col_favorite,
        flag = s.sub_item_col_consumed,
    )
}

/// Favorite item with the same title from another source (bind: title, source)
///
/// Titles compare trimmed and case-folded (ASCII, as SQLite's LOWER).
pub fn duplicate_favorite_query(s: &LibrarySchema) -> String {
    format!(
        r#"
        SELECT * FROM {items}
        WHERE {favorite} = 1
            AND LOWER(TRIM({title})) = LOWER(TRIM(?))
            AND source != ?
        ORDER BY {id}
        LIMIT 1
        "#,
        items = s.item_table,
        favorite = s.item_col_favorite,
        title = s.item_col_title,
        id = s.item_col_id,
    )
}

/// All categories ordered for display
pub fn list_categories_query() -> String {
    format!(
        "SELECT * FROM {categories} ORDER BY {sort}, {name}",
        categories = CATEGORY_TABLE,
        sort = CATEGORY_COL_SORT,
        name = CATEGORY_COL_NAME,
    )
}
