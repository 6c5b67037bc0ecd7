//! Library view behaviour against a real SQLite database
//!
//! Each scenario runs for both the manga and the anime library.

use tracker_core::storage::queries::{self, get_categories_for_item, get_library};
use tracker_core::storage::{
    Database, LibraryEntry, LibrarySnapshot, MediaKind, NewCategory, NewLibraryItem, NewSubItem,
    UNCATEGORIZED,
};

struct Seeded {
    db: Database,
    alpha: i64,
    beta: i64,
    gamma: i64,
    cat1: i64,
    cat2: i64,
}

/// Alpha: favorite, 2 unconsumed + 1 consumed, categories {1, 2}
/// Beta: favorite, no sub-items, no categories
/// Gamma: not favorite, one sub-item, category 1
async fn seed(kind: MediaKind) -> Seeded {
    let db = Database::new_in_memory().await.expect("Failed to create database");
    let pool = db.pool();

    let cat1 = queries::insert_category(pool, &NewCategory::new("Reading", 1)).await.unwrap();
    let cat2 = queries::insert_category(pool, &NewCategory::new("Favorites", 2)).await.unwrap();

    // Inserted out of title order on purpose
    let gamma = queries::insert_item(pool, kind, &NewLibraryItem::new(1, "/gamma".into(), "Gamma".into()))
        .await
        .unwrap();
    let beta = queries::insert_item(
        pool,
        kind,
        &NewLibraryItem::new(1, "/beta".into(), "Beta".into()).with_favorite(true),
    )
    .await
    .unwrap();
    let alpha = queries::insert_item(
        pool,
        kind,
        &NewLibraryItem::new(2, "/alpha".into(), "Alpha".into()).with_favorite(true),
    )
    .await
    .unwrap();

    for (n, consumed) in [(1.0, false), (2.0, true), (3.0, false)] {
        let sub = NewSubItem::new(alpha, format!("/alpha/{}", n), n).consumed(consumed);
        queries::insert_sub_item(pool, kind, &sub).await.unwrap();
    }
    queries::insert_sub_item(pool, kind, &NewSubItem::new(gamma, "/gamma/1".into(), 1.0))
        .await
        .unwrap();

    queries::set_item_categories(pool, kind, alpha, &[cat2, cat1]).await.unwrap();
    queries::add_item_to_category(pool, kind, gamma, cat1).await.unwrap();

    Seeded {
        db,
        alpha,
        beta,
        gamma,
        cat1,
        cat2,
    }
}

fn summary(rows: &[LibraryEntry]) -> Vec<(String, i64, i64, i64)> {
    rows.iter()
        .map(|r| (r.item.title.clone(), r.unconsumed_count, r.consumed_count, r.category))
        .collect()
}

#[tokio::test]
async fn test_reference_scenario() {
    for kind in MediaKind::ALL {
        let s = seed(kind).await;
        let rows = get_library(s.db.pool(), kind).await.expect("Failed to load library");

        assert_eq!(
            summary(&rows),
            vec![
                ("Alpha".to_string(), 2, 1, s.cat1),
                ("Alpha".to_string(), 2, 1, s.cat2),
                ("Beta".to_string(), 0, 0, UNCATEGORIZED),
            ],
            "{} library",
            kind
        );
    }
}

#[tokio::test]
async fn test_non_favorites_never_appear() {
    for kind in MediaKind::ALL {
        let s = seed(kind).await;
        let rows = get_library(s.db.pool(), kind).await.unwrap();
        assert!(rows.iter().all(|r| r.item.id != s.gamma));
        assert!(rows.iter().all(|r| r.item.favorite));

        // Un-favoriting drops every row of the item
        queries::set_favorite(s.db.pool(), kind, s.alpha, false).await.unwrap();
        let rows = get_library(s.db.pool(), kind).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item.id, s.beta);
    }
}

#[tokio::test]
async fn test_uncategorized_favorite_kept_once() {
    for kind in MediaKind::ALL {
        let s = seed(kind).await;

        // Removing all categories must not remove the item from the view
        queries::set_item_categories(s.db.pool(), kind, s.alpha, &[]).await.unwrap();
        let rows = get_library(s.db.pool(), kind).await.unwrap();

        let alpha_rows: Vec<_> = rows.iter().filter(|r| r.item.id == s.alpha).collect();
        assert_eq!(alpha_rows.len(), 1);
        assert!(alpha_rows[0].is_uncategorized());
        assert_eq!(alpha_rows[0].total_count(), 3);
    }
}

#[tokio::test]
async fn test_rows_per_category_share_item_and_counts() {
    for kind in MediaKind::ALL {
        let s = seed(kind).await;
        let rows = get_library(s.db.pool(), kind).await.unwrap();

        let alpha_rows: Vec<_> = rows.iter().filter(|r| r.item.id == s.alpha).collect();
        assert_eq!(alpha_rows.len(), 2);
        assert_eq!(alpha_rows[0].item, alpha_rows[1].item);
        assert_eq!(alpha_rows[0].unconsumed_count, alpha_rows[1].unconsumed_count);
        assert_eq!(alpha_rows[0].consumed_count, alpha_rows[1].consumed_count);
    }
}

#[tokio::test]
async fn test_counts_follow_consumed_flags() {
    for kind in MediaKind::ALL {
        let s = seed(kind).await;
        let pool = s.db.pool();

        let subs = queries::list_sub_items(pool, kind, s.alpha).await.unwrap();
        for sub in &subs {
            queries::set_sub_item_consumed(pool, kind, sub.id, true).await.unwrap();
        }

        let rows = get_library(pool, kind).await.unwrap();
        let alpha = rows.iter().find(|r| r.item.id == s.alpha).unwrap();
        assert_eq!((alpha.unconsumed_count, alpha.consumed_count), (0, 3));

        let beta = rows.iter().find(|r| r.item.id == s.beta).unwrap();
        assert_eq!((beta.unconsumed_count, beta.consumed_count), (0, 0));
    }
}

#[tokio::test]
async fn test_rows_sorted_by_title() {
    let kind = MediaKind::Anime;
    let db = Database::new_in_memory().await.unwrap();
    for (i, title) in ["delta", "Charlie", "alpha", "Bravo", "Bravo"].iter().enumerate() {
        let url = format!("/{}/{}", title, i);
        let item = NewLibraryItem::new(1, url, title.to_string()).with_favorite(true);
        queries::insert_item(db.pool(), kind, &item).await.unwrap();
    }

    let rows = get_library(db.pool(), kind).await.unwrap();
    let titles: Vec<&str> = rows.iter().map(|r| r.item.title.as_str()).collect();

    // Binary collation: upper case sorts before lower case
    assert_eq!(titles, vec!["Bravo", "Bravo", "Charlie", "alpha", "delta"]);
    assert!(rows[0].item.id < rows[1].item.id);
}

#[tokio::test]
async fn test_libraries_are_independent() {
    let s = seed(MediaKind::Manga).await;

    let anime_rows = get_library(s.db.pool(), MediaKind::Anime).await.unwrap();
    assert!(anime_rows.is_empty());

    let categories = get_categories_for_item(s.db.pool(), MediaKind::Anime, s.alpha)
        .await
        .unwrap();
    assert!(categories.is_empty());
}

#[tokio::test]
async fn test_categories_for_item() {
    for kind in MediaKind::ALL {
        let s = seed(kind).await;
        let pool = s.db.pool();

        let mut ids: Vec<i64> = get_categories_for_item(pool, kind, s.alpha)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.category_id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![s.cat1, s.cat2]);

        assert!(get_categories_for_item(pool, kind, s.beta).await.unwrap().is_empty());
        assert!(get_categories_for_item(pool, kind, 4242).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_deleting_item_cascades() {
    for kind in MediaKind::ALL {
        let s = seed(kind).await;
        let pool = s.db.pool();

        queries::delete_item(pool, kind, s.alpha).await.unwrap();

        assert!(queries::list_sub_items(pool, kind, s.alpha).await.unwrap().is_empty());
        assert!(get_categories_for_item(pool, kind, s.alpha).await.unwrap().is_empty());
        let rows = get_library(pool, kind).await.unwrap();
        assert_eq!(summary(&rows), vec![("Beta".to_string(), 0, 0, UNCATEGORIZED)]);
    }
}

#[tokio::test]
async fn test_sql_matches_in_memory_aggregation() {
    for kind in MediaKind::ALL {
        let s = seed(kind).await;
        let pool = s.db.pool();

        // A second uncategorized favorite with mixed progress
        let delta = queries::insert_item(
            pool,
            kind,
            &NewLibraryItem::new(3, "/delta".into(), "Delta".into()).with_favorite(true),
        )
        .await
        .unwrap();
        queries::insert_sub_item(pool, kind, &NewSubItem::new(delta, "/d/1".into(), 1.0).consumed(true))
            .await
            .unwrap();

        let from_sql = get_library(pool, kind).await.unwrap();
        let from_memory = LibrarySnapshot::load(pool, kind).await.unwrap().aggregate();

        assert_eq!(from_sql, from_memory, "{} library", kind);
    }
}

#[tokio::test]
async fn test_unconsumed_badge_counts_favorites_only() {
    let manga = seed(MediaKind::Manga).await;
    let pool = manga.db.pool();

    // Gamma's unread chapter is outside the library
    assert_eq!(queries::count_unconsumed_in_library(pool, MediaKind::Manga).await.unwrap(), 2);
    assert_eq!(queries::count_unconsumed_in_library(pool, MediaKind::Anime).await.unwrap(), 0);

    let show = queries::insert_item(
        pool,
        MediaKind::Anime,
        &NewLibraryItem::new(9, "/show".into(), "Show".into()).with_favorite(true),
    )
    .await
    .unwrap();
    queries::insert_sub_item(pool, MediaKind::Anime, &NewSubItem::new(show, "/e/1".into(), 1.0))
        .await
        .unwrap();

    assert_eq!(queries::library_badge_count(pool).await.unwrap(), 3);
}
