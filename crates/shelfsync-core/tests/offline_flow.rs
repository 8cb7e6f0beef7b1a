use std::sync::Arc;
use std::time::Duration;

use shelfsync_core::{providers::RemoteCatalog, LocalStore, SyncPhase, Synchronizer};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const PRODUCTS: &str = r#"[
    {"id":1,"title":"Mens Casual Premium Slim Fit T-Shirts","price":22.3,"description":"","category":"men's clothing","image":"","rating":{"rate":4.1,"count":259}},
    {"id":2,"title":"Mens Cotton Jacket","price":55.99,"description":"","category":"men's clothing","image":"","rating":{"rate":4.7,"count":500}},
    {"id":3,"title":"White Gold Plated Princess","price":9.99,"description":"","category":"jewelery","image":"","rating":{"rate":3.0,"count":400}}
]"#;
const CATEGORIES: &str = r#"["jewelery","men's clothing"]"#;

/// Tiny catalog server: answers every connection based on the request path
async fn serve_catalog() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

                let (status, body) = match path.as_str() {
                    "/products" => ("200 OK", PRODUCTS.to_string()),
                    "/products/categories" => ("200 OK", CATEGORIES.to_string()),
                    _ => ("404 Not Found", "{}".to_string()),
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

/// An address nothing listens on
async fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn synchronizer(base_url: &str, db: &std::path::Path) -> Synchronizer {
    let storage = Arc::new(LocalStore::open(db).unwrap());
    let source = Arc::new(RemoteCatalog::new(base_url, Duration::from_secs(5)).unwrap());
    Synchronizer::new(source, storage, 2)
}

#[tokio::test]
async fn test_catalog_survives_restart_without_network() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.db");

    // First run: online, catalog fetched and cached, one favorite added
    {
        let url = serve_catalog().await;
        let sync = synchronizer(&url, &db);
        sync.start().await;

        let state = sync.state().snapshot();
        assert_eq!(state.items().len(), 3);
        assert_eq!(state.categories().len(), 2);
        assert_eq!(state.visible_count(), 2);
        assert!(state.has_more());
        assert_eq!(state.phase(), SyncPhase::Idle);

        let jacket = state.items()[1].clone();
        assert!(sync.favorites().add(jacket));
    }

    // Second run: the API is gone
    let url = dead_endpoint().await;
    let sync = synchronizer(&url, &db);
    sync.start().await;

    let state = sync.state().snapshot();
    assert_eq!(state.items().len(), 3);
    assert_eq!(state.categories().len(), 2);
    assert!(state.is_offline());
    assert_eq!(state.error(), None);
    assert!(sync.favorites().is_favorite(2));

    sync.state().set_search_query("MENS");
    sync.state().set_selected_category(Some("men's clothing".to_string()));
    let state = sync.state().snapshot();
    assert_eq!(state.filtered_items().len(), 2);
    assert!(!state.has_more());
}

#[tokio::test]
async fn test_first_run_without_network_reports_error() {
    let dir = TempDir::new().unwrap();
    let url = dead_endpoint().await;
    let sync = synchronizer(&url, &dir.path().join("store.db"));

    sync.start().await;

    let state = sync.state().snapshot();
    assert!(state.items().is_empty());
    assert!(state.error().is_some());
    assert!(!state.is_offline());
    assert_eq!(state.phase(), SyncPhase::Error);

    sync.state().clear_error();
    assert_eq!(sync.state().read(|s| s.phase()), SyncPhase::Idle);
}
