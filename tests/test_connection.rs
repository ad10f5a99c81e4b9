//! End-to-end tests for a single connection, driven over an in-memory pipe

use serverium::http::connection::Connection;
use serverium::http::resolver::ServeRoot;
use serverium::http::response::{Body, NOT_FOUND_BODY, Response, StatusCode};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn exchange(root: &Path, request: &[u8]) -> Vec<u8> {
    let root = Arc::new(ServeRoot::new(root).await.unwrap());
    let (client, server) = tokio::io::duplex(64 * 1024);
    let handler = tokio::spawn(Connection::new(server, root).run());

    let (mut rd, mut wr) = tokio::io::split(client);
    wr.write_all(request).await.unwrap();

    let mut out = Vec::new();
    rd.read_to_end(&mut out).await.unwrap();
    handler.await.unwrap().unwrap();
    out
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[tokio::test]
async fn test_index_served_byte_exact() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>hi</h1>\n").unwrap();

    let out = exchange(dir.path(), b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

    assert_eq!(
        text(&out),
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 12\r\n\r\n<h1>hi</h1>\n"
    );
}

#[tokio::test]
async fn test_large_binary_file_streamed_whole() {
    let dir = TempDir::new().unwrap();
    let data: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    fs::write(dir.path().join("big.png"), &data).unwrap();

    let out = exchange(dir.path(), b"GET /big.png HTTP/1.1\r\n\r\n").await;

    let head = b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 100000\r\n\r\n";
    assert!(out.starts_with(head));
    assert_eq!(&out[head.len()..], &data[..]);
}

#[tokio::test]
async fn test_missing_file_gets_synthetic_404() {
    let dir = TempDir::new().unwrap();

    let out = text(&exchange(dir.path(), b"GET /missing.txt HTTP/1.1\r\n\r\n").await);

    assert!(out.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(out.contains(&format!("Content-Length: {}\r\n", NOT_FOUND_BODY.len())));
    assert!(out.contains("Please add an index.html file"));
    assert!(out.ends_with(NOT_FOUND_BODY));
}

#[tokio::test]
async fn test_direct_404_ignores_custom_page() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("404.html"), "custom not found").unwrap();

    let out = text(&exchange(dir.path(), b"GET /nothing HTTP/1.1\r\n\r\n").await);

    assert!(out.ends_with(NOT_FOUND_BODY));
    assert!(!out.contains("custom not found"));
}

#[tokio::test]
async fn test_directory_gets_bare_403() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();

    let out = exchange(dir.path(), b"GET /sub HTTP/1.1\r\n\r\n").await;

    assert_eq!(
        text(&out),
        "HTTP/1.1 403 Error: Access forbidden.\r\n\r\nError: Access forbidden."
    );
}

#[tokio::test]
async fn test_directory_gets_custom_403_page() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("403.html"), "<p>nope</p>").unwrap();

    let out = exchange(dir.path(), b"GET /sub HTTP/1.1\r\n\r\n").await;

    assert_eq!(
        text(&out),
        "HTTP/1.1 403 Error: Access forbidden.\r\nContent-Type: text/html\r\nContent-Length: 11\r\n\r\n<p>nope</p>"
    );
}

#[tokio::test]
async fn test_traversal_is_forbidden() {
    let outer = TempDir::new().unwrap();
    fs::write(outer.path().join("secret.txt"), "top secret").unwrap();
    let www = outer.path().join("www");
    fs::create_dir(&www).unwrap();

    let out = text(&exchange(&www, b"GET /../secret.txt HTTP/1.1\r\n\r\n").await);

    assert!(out.starts_with("HTTP/1.1 403 "));
    assert!(!out.contains("top secret"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_index_typed_by_requested_name() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("page-v2"), "<p>v2</p>\n").unwrap();
    std::os::unix::fs::symlink(dir.path().join("page-v2"), dir.path().join("index.html"))
        .unwrap();

    let out = exchange(dir.path(), b"GET / HTTP/1.1\r\n\r\n").await;

    assert_eq!(
        text(&out),
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 10\r\n\r\n<p>v2</p>\n"
    );
}

#[tokio::test]
async fn test_non_utf8_path_still_answered() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), "hi").unwrap();

    let out = text(&exchange(dir.path(), b"GET /\xff\xfe HTTP/1.1\r\n\r\n").await);

    assert!(out.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(out.ends_with(NOT_FOUND_BODY));
}

#[tokio::test]
async fn test_malformed_request_line_closes_silently() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), "hi").unwrap();

    let out = exchange(dir.path(), b"GARBAGE\r\n").await;
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_empty_connection_closes_silently() {
    let dir = TempDir::new().unwrap();
    let root = Arc::new(ServeRoot::new(dir.path()).await.unwrap());
    let (client, server) = tokio::io::duplex(1024);
    let handler = tokio::spawn(Connection::new(server, root).run());

    let (mut rd, mut wr) = tokio::io::split(client);
    wr.shutdown().await.unwrap();

    let mut out = Vec::new();
    rd.read_to_end(&mut out).await.unwrap();
    assert!(out.is_empty());
    assert!(handler.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_error_page_not_found_variant() {
    let dir = TempDir::new().unwrap();
    let root = ServeRoot::new(dir.path()).await.unwrap();

    let bare = Response::error_page(&root, StatusCode::NotFound).await;
    assert_eq!(bare.reason, "Error: File not found.");
    assert!(bare.headers.is_empty());
    assert_eq!(bare.body, Body::Bytes(b"Error: File not found.".to_vec()));

    fs::write(dir.path().join("404.html"), "gone").unwrap();
    let custom = Response::error_page(&root, StatusCode::NotFound).await;
    assert_eq!(custom.status, StatusCode::NotFound);
    assert_eq!(custom.header("Content-Type"), Some("text/html"));
    assert_eq!(custom.header("Content-Length"), Some("4"));
    assert!(matches!(custom.body, Body::File { len: 4, .. }));
}
