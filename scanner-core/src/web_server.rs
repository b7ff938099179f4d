use crate::scanner::Scanner;
use crate::static_files::{content_type_for, file_chunks, resolve_path};
use crate::structs::{NetworkEntry, ScanRecord};
use crate::traits::FileSystem;
use axum::{
    Router,
    body::Body,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Sent when the scan result cannot be serialized.
const EMPTY_JSON_ARRAY: &[u8] = b"[]";

/// Web 服务器状态
pub struct AppState {
    pub scanner: Scanner,
    pub fs: Arc<dyn FileSystem>,
    /// Served for `/`, relative to the mount root.
    pub default_document: String,
}

/// Builds the router: `/scan` first, every other GET falls through to the
/// static file handler.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/scan", get(api_scan))
        .fallback(get(serve_static_file))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `bind_addr` and serves until the listener fails.
pub async fn run_server(state: Arc<AppState>, bind_addr: SocketAddr) -> crate::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("🌐 Web server listening on {}", bind_addr);
    serve(listener, state).await
}

/// Serves on an already bound listener.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> crate::Result<()> {
    axum::serve(listener, router(state).into_make_service()).await?;
    Ok(())
}

/// Serializes scan records as the `/scan` JSON array, falling back to `[]`.
pub fn scan_json(records: &[ScanRecord]) -> Vec<u8> {
    let entries: Vec<NetworkEntry> = records.iter().map(NetworkEntry::from).collect();
    serde_json::to_vec(&entries).unwrap_or_else(|e| {
        tracing::error!("Failed to serialize scan results: {}", e);
        EMPTY_JSON_ARRAY.to_vec()
    })
}

// --- Route Handlers ---

/// Runs a fresh scan and returns it as JSON. A failed scan is reported to
/// the client as an empty array.
async fn api_scan(State(state): State<Arc<AppState>>) -> Response {
    tracing::debug!("Handling /scan");
    let records = match state.scanner.scan().await {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("❌ Scan failed: {}", e);
            Vec::new()
        }
    };

    (
        [(header::CONTENT_TYPE, "application/json")],
        scan_json(&records),
    )
        .into_response()
}

/// Streams the file behind the request path in fixed-size chunks.
async fn serve_static_file(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let Some(path) = resolve_path(state.fs.mount_root(), uri.path(), &state.default_document)
    else {
        tracing::warn!("Rejected request path: {}", uri.path());
        return StatusCode::NOT_FOUND.into_response();
    };

    let reader = match state.fs.open(&path).await {
        Ok(reader) => reader,
        Err(e) => {
            tracing::warn!("File not found: {} ({})", path, e);
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    let mut response = Response::builder().status(StatusCode::OK);
    if let Some(mime) = content_type_for(&path) {
        response = response.header(header::CONTENT_TYPE, mime.as_ref());
    }
    response
        .body(Body::from_stream(file_chunks(reader)))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::mock::MockRadio;
    use crate::config::{ScanSettings, StorageConfig};
    use crate::filesystems::disk::DiskFs;
    use crate::filesystems::embed::EmbedFs;
    use crate::format::AuthMode;
    use crate::traits::WifiRadio;
    use axum::http::{Method, Request};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tower::ServiceExt;

    fn state_with(radio: MockRadio, fs: Arc<dyn FileSystem>) -> Arc<AppState> {
        let radio: Arc<dyn WifiRadio> = Arc::new(radio);
        Arc::new(AppState {
            scanner: Scanner::new(radio, &ScanSettings::default()),
            fs,
            default_document: "/scanner/index.html".to_string(),
        })
    }

    fn home_and_cafe() -> MockRadio {
        MockRadio::with_networks(vec![
            ScanRecord::new(b"Home", -40, 6, AuthMode::Open.code()),
            ScanRecord::new(b"Cafe", -70, 11, AuthMode::Wpa2Psk.code()),
        ])
    }

    fn embed_fs() -> Arc<dyn FileSystem> {
        Arc::new(EmbedFs::new(&StorageConfig::default()))
    }

    /// A disk filesystem in a temp dir holding `style.css` (2500 bytes),
    /// `data.bin` and the default document.
    fn disk_fixture() -> (tempfile::TempDir, Arc<dyn FileSystem>, Vec<u8>) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root");
        std::fs::create_dir_all(root.join("scanner")).unwrap();
        let css: Vec<u8> = (0..2500u32).map(|i| b'a' + (i % 26) as u8).collect();
        std::fs::write(root.join("style.css"), &css).unwrap();
        std::fs::write(root.join("data.bin"), [1u8, 2, 3]).unwrap();
        std::fs::write(root.join("scanner/index.html"), "<html>scanner</html>").unwrap();
        std::fs::write(dir.path().join("secret.txt"), "top secret").unwrap();

        let storage = StorageConfig {
            mount_root: root.to_string_lossy().into_owned(),
            ..StorageConfig::default()
        };
        (dir, Arc::new(DiskFs::new(&storage)), css)
    }

    async fn get(state: Arc<AppState>, uri: &str) -> Response {
        router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    fn content_type(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn scan_returns_networks_in_radio_order() {
        let response = get(state_with(home_and_cafe(), embed_fs()), "/scan").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), Some("application/json"));
        assert_eq!(
            String::from_utf8(body_bytes(response).await).unwrap(),
            r#"[{"ssid":"Home","rssi":-40,"channel":6,"auth":"WIFI_AUTH_OPEN"},{"ssid":"Cafe","rssi":-70,"channel":11,"auth":"WIFI_AUTH_WPA2_PSK"}]"#
        );
    }

    #[tokio::test]
    async fn failed_scan_is_an_empty_array() {
        let radio = home_and_cafe().failing_start();
        let response = get(state_with(radio, embed_fs()), "/scan").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), Some("application/json"));
        assert_eq!(body_bytes(response).await, b"[]");
    }

    #[tokio::test]
    async fn no_networks_is_an_empty_array() {
        let radio = MockRadio::with_networks(Vec::new());
        let response = get(state_with(radio, embed_fs()), "/scan").await;
        assert_eq!(body_bytes(response).await, b"[]");
    }

    #[tokio::test]
    async fn scan_output_is_valid_json_for_odd_ssids() {
        let radio = MockRadio::with_networks(vec![
            ScanRecord::new(b"quote\"back\\slash", -50, 1, 99),
            ScanRecord::new(&[0xff, 0xfe, b'x'], -60, 2, 4),
        ]);
        let response = get(state_with(radio, embed_fs()), "/scan").await;
        let parsed: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        let list = parsed.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["ssid"], "quote\"back\\slash");
        assert_eq!(list[0]["auth"], "WIFI_AUTH_UNKNOWN");
    }

    #[tokio::test]
    async fn scan_only_answers_get() {
        let response = router(state_with(home_and_cafe(), embed_fs()))
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/scan")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn root_serves_default_document() {
        let state = state_with(home_and_cafe(), embed_fs());
        let root = get(state.clone(), "/").await;
        assert_eq!(root.status(), StatusCode::OK);
        assert_eq!(content_type(&root), Some("text/html"));
        let direct = get(state, "/scanner/index.html").await;
        assert_eq!(body_bytes(root).await, body_bytes(direct).await);
    }

    #[tokio::test]
    async fn relative_default_document_is_served_for_root() {
        let (_dir, fs, _) = disk_fixture();
        let radio: Arc<dyn WifiRadio> = Arc::new(home_and_cafe());
        let state = Arc::new(AppState {
            scanner: Scanner::new(radio, &ScanSettings::default()),
            fs,
            default_document: "scanner/index.html".to_string(),
        });

        let response = get(state, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), Some("text/html"));
        assert_eq!(body_bytes(response).await, b"<html>scanner</html>");
    }

    #[tokio::test]
    async fn static_file_round_trips_with_content_type() {
        let (_dir, fs, css) = disk_fixture();
        let response = get(state_with(home_and_cafe(), fs), "/style.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), Some("text/css"));
        assert!(response.headers().get(header::CONTENT_LENGTH).is_none());
        assert_eq!(body_bytes(response).await, css);
    }

    #[tokio::test]
    async fn unknown_extension_has_no_content_type() {
        let (_dir, fs, _) = disk_fixture();
        let response = get(state_with(home_and_cafe(), fs), "/data.bin").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), None);
        assert_eq!(body_bytes(response).await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn missing_file_is_404_without_body() {
        let (_dir, fs, _) = disk_fixture();
        let response = get(state_with(home_and_cafe(), fs), "/missing.css").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn traversal_outside_mount_root_is_404() {
        let (_dir, fs, _) = disk_fixture();
        let response = get(state_with(home_and_cafe(), fs), "/../secret.txt").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Issues a raw HTTP/1.1 GET and returns the response head and the
    /// still chunk-encoded body.
    async fn raw_get(addr: SocketAddr, path: &str) -> (String, Vec<u8>) {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        tokio::time::timeout(Duration::from_secs(5), async {
            while !raw.ends_with(b"0\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed early");
                raw.extend_from_slice(&buf[..n]);
            }
        })
        .await
        .unwrap();

        let split = raw.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        let head = String::from_utf8(raw[..split].to_vec()).unwrap();
        (head.to_ascii_lowercase(), raw[split + 4..].to_vec())
    }

    /// Decodes chunked transfer framing into the individual chunks,
    /// terminator included.
    fn decode_chunks(mut body: &[u8]) -> Vec<Vec<u8>> {
        let mut chunks = Vec::new();
        loop {
            let line_end = body.windows(2).position(|w| w == b"\r\n").unwrap();
            let size_line = std::str::from_utf8(&body[..line_end]).unwrap();
            let size_hex = size_line.split(';').next().unwrap().trim();
            let size = usize::from_str_radix(size_hex, 16).unwrap();
            let data_start = line_end + 2;
            chunks.push(body[data_start..data_start + size].to_vec());
            assert_eq!(&body[data_start + size..data_start + size + 2], b"\r\n");
            body = &body[data_start + size + 2..];
            if size == 0 {
                return chunks;
            }
        }
    }

    #[tokio::test]
    async fn file_is_sent_as_1024_byte_chunks_with_terminator() {
        let (_dir, fs, css) = disk_fixture();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve(listener, state_with(home_and_cafe(), fs)));

        let (head, body) = raw_get(addr, "/style.css").await;
        assert!(head.starts_with("http/1.1 200"));
        assert!(head.contains("transfer-encoding: chunked"));
        assert!(head.contains("content-type: text/css"));

        let chunks = decode_chunks(&body);
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![1024, 1024, 452, 0]);
        assert_eq!(chunks.concat(), css);

        server.abort();
    }
}
