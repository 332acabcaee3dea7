use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use resimg_core::validation::validate_resource;
use resimg_storage::{AssetCatalog, PathResolver};
use tempfile::tempdir;

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"x").unwrap();
}

fn allowed() -> Vec<String> {
    vec!["models".to_string(), "vehicles".to_string()]
}

fn catalog(root: &Path) -> AssetCatalog {
    AssetCatalog::new(
        PathResolver::new(root),
        allowed(),
        vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()],
    )
}

fn sizes(labels: &[&str]) -> BTreeSet<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_sizes_reflect_directories_containing_the_file() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(root, "models/7/cat.jpeg");
    touch(root, "models/7/500x400/cat.jpeg");
    touch(root, "models/7/400x300/cat.jpeg");
    touch(root, "models/7/dog.jpeg");
    touch(root, "models/7/500x400/dog.jpeg");
    // a size that is no longer configured still counts
    touch(root, "models/7/64x64/cat.jpeg");
    fs::create_dir_all(root.join("models/7/200x200")).unwrap();

    let target = validate_resource("models", 7, &allowed()).unwrap();
    let records = catalog(root).list_for_resource_id(&target).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].filename, "cat.jpeg");
    assert_eq!(records[0].path, "models/7/cat.jpeg");
    assert_eq!(records[0].resource, "models");
    assert_eq!(records[0].resource_id, 7);
    assert_eq!(records[0].sizes, sizes(&["400x300", "500x400", "64x64"]));
    assert_eq!(records[1].filename, "dog.jpeg");
    assert_eq!(records[1].sizes, sizes(&["500x400"]));
}

#[tokio::test]
async fn test_listing_tolerates_stray_entries() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(root, "models/7/cat.jpeg");
    touch(root, "models/7/thumbs/cat.jpeg");
    touch(root, "models/7/500x400.old/cat.jpeg");
    touch(root, "models/7/٥x٥/cat.jpeg");
    touch(root, "models/7/notes.txt");
    touch(root, "models/drafts/cat.jpeg");
    touch(root, "models/0/cat.jpeg");
    touch(root, "unknown_type/3/cat.jpeg");
    touch(root, "stray.png");

    let records = catalog(root).list_all().await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path, "models/7/cat.jpeg");
    assert!(records[0].sizes.is_empty());
}

#[tokio::test]
async fn test_zero_padded_id_directory_is_not_an_alias() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(root, "models/7/cat.jpeg");
    touch(root, "models/007/dog.jpeg");

    let records = catalog(root).list_all().await.unwrap();
    let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["models/7/cat.jpeg"]);

    let target = validate_resource("models", 7, &allowed()).unwrap();
    let records = catalog(root).list_for_resource_id(&target).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].filename, "cat.jpeg");
}

#[tokio::test]
async fn test_list_all_sorted_by_path() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(root, "vehicles/3/van.png");
    touch(root, "models/12/b.jpg");
    touch(root, "models/7/a.jpeg");
    touch(root, "models/7/Z.jpeg");

    let records = catalog(root).list_all().await.unwrap();
    let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();

    assert_eq!(
        paths,
        vec![
            "models/12/b.jpg",
            "models/7/Z.jpeg",
            "models/7/a.jpeg",
            "vehicles/3/van.png",
        ]
    );
}

#[tokio::test]
async fn test_missing_resource_id_lists_nothing() {
    let dir = tempdir().unwrap();
    let target = validate_resource("vehicles", 99, &allowed()).unwrap();

    let records = catalog(dir.path())
        .list_for_resource_id(&target)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_missing_store_root_is_an_error() {
    let dir = tempdir().unwrap();
    let result = catalog(&dir.path().join("does-not-exist")).list_all().await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_listing_sees_changes_without_caching() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let catalog = catalog(root);
    touch(root, "models/7/cat.jpeg");
    assert_eq!(catalog.list_all().await.unwrap().len(), 1);

    touch(root, "models/7/dog.jpeg");
    assert_eq!(catalog.list_all().await.unwrap().len(), 2);

    fs::remove_file(root.join("models/7/cat.jpeg")).unwrap();
    let records = catalog.list_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].filename, "dog.jpeg");
}
