//! Integration test: the server serves the project root and injects the
//! reload client into HTML

use forge_common::ServerConfig;
use forge_dev_server::{DevServer, ReloadChannel};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        path
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).to_string()
}

#[tokio::test]
async fn serves_html_with_injected_client() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("index.html"),
        "<html><body><h1>site</h1></body></html>",
    )
    .unwrap();

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let server = DevServer::new(tmp.path().to_path_buf(), config, ReloadChannel::new());
    let addr = server.start().await.unwrap();

    let response = get(addr, "/").await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("<h1>site</h1>"));
    assert!(response.contains("__forge_reload"));
}

#[tokio::test]
async fn serves_css_without_injection() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("dist/css")).unwrap();
    std::fs::write(tmp.path().join("dist/css/app.css"), "body{margin:0}").unwrap();

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let server = DevServer::new(tmp.path().to_path_buf(), config, ReloadChannel::new());
    let addr = server.start().await.unwrap();

    let response = get(addr, "/dist/css/app.css").await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("text/css"));
    assert!(response.contains("body{margin:0}"));
    assert!(!response.contains("__forge_reload"));
}

#[tokio::test]
async fn unknown_path_is_404() {
    let tmp = tempfile::TempDir::new().unwrap();

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let server = DevServer::new(tmp.path().to_path_buf(), config, ReloadChannel::new());
    let addr = server.start().await.unwrap();

    let response = get(addr, "/missing.js").await;
    assert!(response.starts_with("HTTP/1.1 404"));
}

#[tokio::test]
async fn parent_traversal_is_rejected() {
    let tmp = tempfile::TempDir::new().unwrap();

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let server = DevServer::new(tmp.path().to_path_buf(), config, ReloadChannel::new());
    let addr = server.start().await.unwrap();

    let response = get(addr, "/../secret.txt").await;
    assert!(!response.starts_with("HTTP/1.1 200"));
}
