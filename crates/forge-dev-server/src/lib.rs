//! Development server with live reload
//!
//! Serves static files from the project root, injects the reload client into
//! HTML responses, and pushes change notifications to connected browsers
//! over a WebSocket endpoint.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    extract::{ws::WebSocket, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};

use forge_common::{Result, ServerConfig};

pub mod reload;
pub mod watcher;

pub use reload::{ReloadChannel, ReloadMessage};
pub use watcher::FileWatcher;

/// WebSocket endpoint the injected client connects back to
pub const RELOAD_ENDPOINT: &str = "/__forge_reload";

/// Static file server wired to the live-reload channel
pub struct DevServer {
    /// Directory served as the site root
    root: PathBuf,

    config: ServerConfig,
    channel: ReloadChannel,
}

/// Server state shared across handlers
#[derive(Clone)]
struct ServerState {
    root: PathBuf,
    channel: ReloadChannel,
}

impl DevServer {
    /// Create a new development server rooted at `root`
    pub fn new(root: PathBuf, config: ServerConfig, channel: ReloadChannel) -> Self {
        Self {
            root,
            config,
            channel,
        }
    }

    /// Bind the listener and start serving on a background task.
    ///
    /// Returns the bound address once the server is listening; this is the
    /// completion signal the dev composite sequences on.
    pub async fn start(self) -> Result<SocketAddr> {
        let listener =
            tokio::net::TcpListener::bind(format!("{}:{}", self.config.host, self.config.port))
                .await?;
        let addr = listener.local_addr()?;

        let app = self.router();
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Dev server error: {}", e);
            }
        });

        tracing::info!("✓ Dev server running on http://{}", addr);
        Ok(addr)
    }

    /// Create the Axum router
    fn router(&self) -> Router {
        let state = ServerState {
            root: self.root.clone(),
            channel: self.channel.clone(),
        };

        Router::new()
            .route("/", get(index_handler))
            .route(RELOAD_ENDPOINT, get(reload_websocket_handler))
            .route("/{*path}", get(serve_handler))
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .with_state(state)
    }
}

/// WebSocket handler for the reload channel
async fn reload_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<ServerState>,
) -> Response {
    ws.on_upgrade(|socket| reload_websocket(socket, state))
}

/// Handle one reload client connection
async fn reload_websocket(socket: WebSocket, state: ServerState) {
    tracing::info!("Reload client connected");

    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.channel.subscribe();

    let hello = serde_json::to_string(&ReloadMessage::Connected).unwrap_or_default();
    if sender
        .send(axum::extract::ws::Message::Text(hello.into()))
        .await
        .is_err()
    {
        return;
    }

    // Forward channel messages to the client
    let send_task = tokio::spawn(async move {
        while let Ok(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(_) => continue,
            };
            if sender
                .send(axum::extract::ws::Message::Text(json.into()))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    // Drain the client side until it closes
    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let axum::extract::ws::Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    tracing::info!("Reload client disconnected");
}

/// Serve the site root
async fn index_handler(State(state): State<ServerState>) -> Response {
    serve_path(&state, "index.html").await
}

/// Serve any other path under the project root
async fn serve_handler(
    State(state): State<ServerState>,
    axum::extract::Path(path): axum::extract::Path<String>,
) -> Response {
    serve_path(&state, &path).await
}

async fn serve_path(state: &ServerState, path: &str) -> Response {
    if path.split('/').any(|segment| segment == "..") {
        return (StatusCode::BAD_REQUEST, "invalid path").into_response();
    }

    let mut file_path = state.root.join(path);
    if file_path.is_dir() {
        file_path = file_path.join("index.html");
    }

    tracing::debug!("Serving: {}", file_path.display());

    let content = match tokio::fs::read(&file_path).await {
        Ok(content) => content,
        Err(_) => return (StatusCode::NOT_FOUND, "not found").into_response(),
    };

    let content_type = guess_content_type(&file_path);

    if content_type.starts_with("text/html") {
        let html = String::from_utf8_lossy(&content);
        let injected = inject_reload_client(&html);
        return (
            [(axum::http::header::CONTENT_TYPE, content_type.as_str())],
            injected,
        )
            .into_response();
    }

    (
        [(axum::http::header::CONTENT_TYPE, content_type.as_str())],
        content,
    )
        .into_response()
}

/// Guess content type from file extension
fn guess_content_type(path: &std::path::Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8".to_string(),
        Some("css") => "text/css; charset=utf-8".to_string(),
        Some("js") | Some("mjs") => "application/javascript; charset=utf-8".to_string(),
        Some("json") | Some("map") => "application/json; charset=utf-8".to_string(),
        Some("png") => "image/png".to_string(),
        Some("jpg") | Some("jpeg") => "image/jpeg".to_string(),
        Some("gif") => "image/gif".to_string(),
        Some("svg") => "image/svg+xml".to_string(),
        Some("woff") => "font/woff".to_string(),
        Some("woff2") => "font/woff2".to_string(),
        _ => "application/octet-stream".to_string(),
    }
}

/// Insert the reload client script before `</body>`, or append it when the
/// document has no closing body tag
pub fn inject_reload_client(html: &str) -> String {
    let script = format!("<script>{}</script>", reload_client_js());
    match html.rfind("</body>") {
        Some(pos) => {
            let mut out = String::with_capacity(html.len() + script.len());
            out.push_str(&html[..pos]);
            out.push_str(&script);
            out.push_str(&html[pos..]);
            out
        }
        None => format!("{}{}", html, script),
    }
}

/// Browser-side reload client: hot-swaps stylesheets on all-CSS updates,
/// reloads the page otherwise
fn reload_client_js() -> String {
    format!(
        r#"// forge reload client
(function() {{
  if (typeof window === 'undefined') return;

  var protocol = window.location.protocol === 'https:' ? 'wss:' : 'ws:';
  var ws = new WebSocket(protocol + '//' + window.location.host + '{endpoint}');

  ws.onmessage = function(event) {{
    var message = JSON.parse(event.data);

    switch (message.type) {{
      case 'update':
        var allCss = message.paths.length > 0 && message.paths.every(function(p) {{
          return p.lastIndexOf('.css') === p.length - 4;
        }});
        if (!allCss) {{
          window.location.reload();
          return;
        }}
        var links = document.querySelectorAll('link[rel="stylesheet"]');
        for (var i = 0; i < links.length; i++) {{
          var href = links[i].getAttribute('href').split('?')[0];
          links[i].setAttribute('href', href + '?t=' + Date.now());
        }}
        console.log('[forge] styles hot-swapped');
        break;

      case 'full-reload':
        window.location.reload();
        break;

      case 'connected':
        console.log('[forge] live reload connected');
        break;
    }}
  }};

  ws.onclose = function() {{
    console.log('[forge] reload channel closed, retrying in 1s');
    setTimeout(function() {{ window.location.reload(); }}, 1000);
  }};
}})();
"#,
        endpoint = RELOAD_ENDPOINT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_before_body_close() {
        let html = "<html><body><h1>hi</h1></body></html>";
        let out = inject_reload_client(html);
        assert!(out.contains("<script>"));
        assert!(out.find("<script>").unwrap() < out.find("</body>").unwrap());
    }

    #[test]
    fn test_inject_appends_without_body() {
        let html = "<h1>fragment</h1>";
        let out = inject_reload_client(html);
        assert!(out.starts_with("<h1>fragment</h1>"));
        assert!(out.ends_with("</script>"));
    }

    #[test]
    fn test_content_types() {
        assert!(guess_content_type(std::path::Path::new("a.css")).starts_with("text/css"));
        assert!(guess_content_type(std::path::Path::new("a.js")).contains("javascript"));
        assert_eq!(guess_content_type(std::path::Path::new("a.bin")), "application/octet-stream");
    }
}
