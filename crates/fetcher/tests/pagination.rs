//! End-to-end pagination against a real SQLite archive.

use archive::{ArchiveStore, ImportRecord, Post};
use fetcher::{BrowseConfig, PageFetcher, PageKind, SqliteSource};
use query::{Featured, FilterState, SortDirection};
use std::collections::HashSet;
use std::num::NonZeroU32;
use std::sync::Arc;

const CATEGORIES: [&str; 3] = ["Design", "Programming", "Art"];

fn record(i: usize) -> ImportRecord {
    let title = match i {
        7 => "Writing a Shader by Hand".to_string(),
        _ => format!("Post {i:02}"),
    };
    let summary = match i {
        12 => "Uses 100% of the GPU".to_string(),
        _ => "A post about games".to_string(),
    };
    ImportRecord {
        post: Post {
            title,
            authors: if i % 2 == 0 { "Ana Silva" } else { "Ben Okafor" }.to_string(),
            date: format!("2020-{:02}-{:02}", i / 28 + 1, i % 28 + 1),
            summary,
            category_name: CATEGORIES[i % 3].to_string(),
            link: format!("https://www.gamedeveloper.com/post-{i}"),
            thumbnail: None,
            featured: i % 5 == 0,
        },
        time_to_read: "4 min read".to_string(),
    }
}

fn seeded_store(n: usize) -> ArchiveStore {
    let mut store = ArchiveStore::open_in_memory().unwrap();
    let records: Vec<_> = (0..n).map(record).collect();
    store.import(&records).unwrap();
    store
}

fn fetcher_with(n: usize, page_size: u32) -> PageFetcher {
    let source = SqliteSource::from_connection(seeded_store(n).into_connection());
    PageFetcher::new(Arc::new(source), NonZeroU32::new(page_size).unwrap())
}

async fn collect_all(fetcher: &PageFetcher, filter: FilterState) -> Vec<Post> {
    let mut page = fetcher.reset(filter).await.unwrap();
    let mut posts = Vec::new();
    loop {
        let last = page.is_last();
        posts.extend(page.into_posts());
        if last {
            break;
        }
        page = fetcher.more().await.unwrap();
    }
    posts
}

#[tokio::test]
async fn test_pages_cover_every_post_once_in_order() {
    let fetcher = fetcher_with(45, 20);

    let first = fetcher.reset(FilterState::default()).await.unwrap();
    assert_eq!(first.kind(), PageKind::Reset);
    assert_eq!(first.len(), 20);

    let posts = collect_all(&fetcher, FilterState::default()).await;
    assert_eq!(posts.len(), 45);

    let links: HashSet<_> = posts.iter().map(|p| p.link.as_str()).collect();
    assert_eq!(links.len(), 45);
    assert!(posts.windows(2).all(|w| w[0].date > w[1].date));
    assert_eq!(fetcher.cursor().unwrap().offset(), 40);
}

#[tokio::test]
async fn test_reset_twice_yields_same_first_page() {
    let fetcher = fetcher_with(30, 10);
    let filter = FilterState::default().with_sort("Title", SortDirection::Ascending);

    let a = fetcher.reset(filter.clone()).await.unwrap();
    let b = fetcher.reset(filter).await.unwrap();

    assert_eq!(a.posts(), b.posts());
    assert_eq!(a.posts()[0].title, "Post 00");
}

#[tokio::test]
async fn test_category_filter() {
    let fetcher = fetcher_with(45, 20);
    let posts = collect_all(&fetcher, FilterState::default().with_category("Programming")).await;

    assert_eq!(posts.len(), 15);
    assert!(posts.iter().all(|p| p.category_name == "Programming"));
}

#[tokio::test]
async fn test_all_category_matches_everything() {
    let fetcher = fetcher_with(45, 50);
    let page = fetcher
        .reset(FilterState::default().with_category("All"))
        .await
        .unwrap();

    assert_eq!(page.len(), 45);
    assert!(page.is_last());
}

#[tokio::test]
async fn test_featured_filter() {
    let fetcher = fetcher_with(45, 20);

    let featured = collect_all(&fetcher, FilterState::default().with_featured(Featured::FeaturedOnly)).await;
    assert_eq!(featured.len(), 9);
    assert!(featured.iter().all(|p| p.featured));

    let regular = collect_all(&fetcher, FilterState::default().with_featured(Featured::NotFeatured)).await;
    assert_eq!(regular.len(), 36);
    assert!(regular.iter().all(|p| !p.featured));
}

#[tokio::test]
async fn test_text_match_is_case_insensitive_substring() {
    let fetcher = fetcher_with(45, 20);

    let by_title = collect_all(&fetcher, FilterState::default().with_text("shader")).await;
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].title, "Writing a Shader by Hand");

    let by_author = collect_all(&fetcher, FilterState::default().with_text("OKAFOR")).await;
    assert_eq!(by_author.len(), 22);
}

#[tokio::test]
async fn test_wildcards_match_literally() {
    let fetcher = fetcher_with(45, 20);

    let percent = collect_all(&fetcher, FilterState::default().with_text("%")).await;
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].summary, "Uses 100% of the GPU");

    let underscore = collect_all(&fetcher, FilterState::default().with_text("_")).await;
    assert!(underscore.is_empty());
}

#[tokio::test]
async fn test_date_range_is_inclusive() {
    let fetcher = fetcher_with(45, 20);
    let filter = FilterState::default().with_date_range("2020-01-05", "2020-01-10");

    let posts = collect_all(&fetcher, filter).await;

    assert_eq!(posts.len(), 6);
    assert_eq!(posts.first().unwrap().date, "2020-01-10");
    assert_eq!(posts.last().unwrap().date, "2020-01-05");
}

#[tokio::test]
async fn test_no_matches_is_an_empty_last_page() {
    let fetcher = fetcher_with(45, 20);
    let page = fetcher
        .reset(FilterState::default().with_text("no such post"))
        .await
        .unwrap();

    assert_eq!(page.kind(), PageKind::Reset);
    assert!(page.is_empty());
    assert!(page.is_last());
}

#[tokio::test]
async fn test_exact_multiple_ends_with_empty_page() {
    let fetcher = fetcher_with(45, 9);
    let first = fetcher
        .reset(FilterState::default().with_featured(Featured::FeaturedOnly))
        .await
        .unwrap();
    assert_eq!(first.len(), 9);
    assert!(!first.is_last());

    let second = fetcher.more().await.unwrap();
    assert_eq!(second.kind(), PageKind::Append);
    assert!(second.is_empty());
    assert!(second.is_last());
}

#[tokio::test]
async fn test_categories() {
    let fetcher = fetcher_with(10, 20);
    assert_eq!(
        fetcher.categories().await.unwrap(),
        vec!["Art", "Design", "Programming"]
    );
}

#[tokio::test]
async fn test_archive_file_with_configured_fetcher() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("Data").join("blogs.db");
    let mut store = ArchiveStore::open(&db).unwrap();
    store.import(&(0..25).map(record).collect::<Vec<_>>()).unwrap();
    drop(store);

    let config = BrowseConfig {
        database: db.clone(),
        page_size: 10,
        ..BrowseConfig::defaults()
    };
    let source = SqliteSource::open_read_only(&config.database).unwrap();
    let fetcher = PageFetcher::from_config(Arc::new(source), &config).unwrap();

    let posts = collect_all(&fetcher, FilterState::default()).await;
    assert_eq!(posts.len(), 25);
}
