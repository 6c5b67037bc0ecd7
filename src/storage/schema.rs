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


//! Table and column names
//!
//! The manga and anime libraries use symmetric schemas. Every query that
//! differs only by media kind is built from a [`LibrarySchema`] instead of
//! being written twice.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;

/// Shared category table
pub const CATEGORY_TABLE: &str = "categories";
pub const CATEGORY_COL_ID: &str = "category_id";
pub const CATEGORY_COL_NAME: &str = "name";
pub const CATEGORY_COL_SORT: &str = "sort";

/// Alias of the category column in library rows
pub const COMPUTED_COL_CATEGORY: &str = "category";

/// Media kind of a library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Text media: mangas with chapters
    Manga,
    /// Video media: animes with episodes
    Anime,
}

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Manga, MediaKind::Anime];

    pub fn schema(self) -> &'static LibrarySchema {
        LibrarySchema::for_kind(self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Manga => "manga",
            MediaKind::Anime => "anime",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manga" => Ok(MediaKind::Manga),
            "anime" => Ok(MediaKind::Anime),
            other => Err(TrackerError::invalid_input(format!(
                "Unknown media kind '{}', expected 'manga' or 'anime'",
                other
            ))),
        }
    }
}

/// Symbolic names for one media kind's tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibrarySchema {
    pub kind: MediaKind,

    pub item_table: &'static str,
    pub item_col_id: &'static str,
    pub item_col_title: &'static str,
    pub item_col_favorite: &'static str,

    pub sub_item_table: &'static str,
    pub sub_item_col_id: &'static str,
    pub sub_item_col_item_id: &'static str,
    /// 0 = unconsumed (unread / unseen), 1 = consumed
    pub sub_item_col_consumed: &'static str,

    pub junction_table: &'static str,
    pub junction_col_item_id: &'static str,
    pub junction_col_category_id: &'static str,

    pub computed_col_unconsumed: &'static str,
    pub computed_col_consumed: &'static str,
}

pub const MANGA: LibrarySchema = LibrarySchema {
    kind: MediaKind::Manga,
    item_table: "mangas",
    item_col_id: "id",
    item_col_title: "title",
    item_col_favorite: "favorite",
    sub_item_table: "chapters",
    sub_item_col_id: "id",
    sub_item_col_item_id: "manga_id",
    sub_item_col_consumed: "read",
    junction_table: "mangas_categories",
    junction_col_item_id: "manga_id",
    junction_col_category_id: "category_id",
    computed_col_unconsumed: "unread_count",
    computed_col_consumed: "read_count",
};

pub const ANIME: LibrarySchema = LibrarySchema {
    kind: MediaKind::Anime,
    item_table: "animes",
    item_col_id: "id",
    item_col_title: "title",
    item_col_favorite: "favorite",
    sub_item_table: "episodes",
    sub_item_col_id: "id",
    sub_item_col_item_id: "anime_id",
    sub_item_col_consumed: "seen",
    junction_table: "animes_categories",
    junction_col_item_id: "anime_id",
    junction_col_category_id: "category_id",
    computed_col_unconsumed: "unseen_count",
    computed_col_consumed: "seen_count",
};

impl LibrarySchema {
    pub fn for_kind(kind: MediaKind) -> &'static LibrarySchema {
        match kind {
            MediaKind::Manga => &MANGA,
            MediaKind::Anime => &ANIME,
        }
    }
}
