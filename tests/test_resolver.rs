//! Tests for request path resolution against a serve root

use serverium::error::ConfigError;
use serverium::http::resolver::{ResolvedTarget, ServeRoot, resolve};
use std::fs;
use tempfile::TempDir;

async fn site() -> (TempDir, ServeRoot) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>hi</h1>\n").unwrap();
    fs::write(dir.path().join("app.js"), "console.log(1);").unwrap();
    fs::create_dir(dir.path().join("css")).unwrap();
    fs::write(dir.path().join("css/site.css"), "body{}").unwrap();

    let root = ServeRoot::new(dir.path()).await.unwrap();
    (dir, root)
}

#[tokio::test]
async fn test_serve_root_rejects_missing_directory() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let err = ServeRoot::new(&missing).await.unwrap_err();
    assert!(matches!(err, ConfigError::InvalidDirectory(_)));
}

#[tokio::test]
async fn test_serve_root_rejects_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.txt");
    fs::write(&file, "x").unwrap();

    assert!(ServeRoot::new(&file).await.is_err());
}

#[tokio::test]
async fn test_root_path_serves_index() {
    let (_dir, root) = site().await;

    let target = resolve("/", &root).await;
    assert_eq!(target, ResolvedTarget::ServeFile(root.path().join("index.html")));
}

#[tokio::test]
async fn test_nested_file() {
    let (_dir, root) = site().await;

    let target = resolve("/css/site.css", &root).await;
    assert_eq!(target, ResolvedTarget::ServeFile(root.path().join("css/site.css")));
}

#[tokio::test]
async fn test_directory_is_forbidden() {
    let (_dir, root) = site().await;

    assert_eq!(resolve("/css", &root).await, ResolvedTarget::Forbidden);
    assert_eq!(resolve("/css/", &root).await, ResolvedTarget::Forbidden);
    assert_eq!(resolve("/.", &root).await, ResolvedTarget::Forbidden);
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let (_dir, root) = site().await;

    assert_eq!(resolve("/missing.txt", &root).await, ResolvedTarget::NotFound);
    assert_eq!(resolve("/app.js/child", &root).await, ResolvedTarget::NotFound);
}

#[tokio::test]
async fn test_missing_index_is_not_found() {
    let dir = TempDir::new().unwrap();
    let root = ServeRoot::new(dir.path()).await.unwrap();

    assert_eq!(resolve("/", &root).await, ResolvedTarget::NotFound);
}

#[tokio::test]
async fn test_traversal_is_forbidden() {
    let outer = TempDir::new().unwrap();
    fs::write(outer.path().join("secret.txt"), "top secret").unwrap();
    fs::create_dir(outer.path().join("www")).unwrap();
    fs::write(outer.path().join("www/index.html"), "hi").unwrap();
    let root = ServeRoot::new(&outer.path().join("www")).await.unwrap();

    for path in [
        "/../secret.txt",
        "/./../secret.txt",
        "/a/../../secret.txt",
        "/../www/../secret.txt",
        "//etc/passwd",
    ] {
        assert_eq!(resolve(path, &root).await, ResolvedTarget::Forbidden, "{path}");
    }
}

#[tokio::test]
async fn test_inner_parent_segments_stay_inside() {
    let (_dir, root) = site().await;

    let target = resolve("/css/../app.js", &root).await;
    assert_eq!(target, ResolvedTarget::ServeFile(root.path().join("app.js")));
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_out_of_root_is_forbidden() {
    let outer = TempDir::new().unwrap();
    fs::write(outer.path().join("secret.txt"), "top secret").unwrap();
    fs::create_dir(outer.path().join("www")).unwrap();
    std::os::unix::fs::symlink(
        outer.path().join("secret.txt"),
        outer.path().join("www/link.txt"),
    )
    .unwrap();
    let root = ServeRoot::new(&outer.path().join("www")).await.unwrap();

    assert_eq!(resolve("/link.txt", &root).await, ResolvedTarget::Forbidden);
}
