//! Integration tests for loading an export file into an on-disk archive.

use archive::{ArchiveError, ArchiveStore};
use std::io::Write;

fn write_export(dir: &tempfile::TempDir, lines: &[&str]) -> std::path::PathBuf {
    let path = dir.path().join("export.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    path
}

#[test]
fn test_load_from_file_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_export(
        &dir,
        &[
            r#"{"articleName":"One","articleUrl":"/one","date":"Feb 02, 2015","categoryName":"Art"}"#,
            r#"{"articleName":"Two","articleUrl":"/two","date":"Feb 03, 2015","categoryName":"Audio"}"#,
        ],
    );
    let db = dir.path().join("Data").join("blogs.db");

    let summary = ArchiveStore::load_from_file(&db, &export).unwrap();

    assert!(db.exists());
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.total_posts, 2);
}

#[test]
fn test_reimport_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let regular = write_export(&dir, &[r#"{"articleName":"One","articleUrl":"/one"}"#]);
    let db = dir.path().join("blogs.db");

    ArchiveStore::load_from_file(&db, &regular).unwrap();
    let again = ArchiveStore::load_from_file(&db, &regular).unwrap();

    assert_eq!(again.inserted, 0);
    assert_eq!(again.unchanged, 1);
    assert_eq!(again.total_posts, 1);

    let featured = dir.path().join("featured.jsonl");
    std::fs::write(
        &featured,
        r#"{"articleName":"One","articleUrl":"/one","featured":true}"#,
    )
    .unwrap();
    let promoted = ArchiveStore::load_from_file(&db, &featured).unwrap();
    assert_eq!(promoted.promoted, 1);
}

#[test]
fn test_missing_export_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = ArchiveStore::load_from_file(
        &dir.path().join("blogs.db"),
        &dir.path().join("nope.jsonl"),
    );

    assert!(matches!(result, Err(ArchiveError::FileNotFound { .. })));
}
