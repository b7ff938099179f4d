//! Core library for the Wi-Fi scanner access point.
//! This crate defines the capability traits (radio, filesystem) and data
//! structures, the scan pipeline that turns a radio scan into a bounded result
//! set, and the web server that serves scan results as JSON next to the
//! static UI. Concrete radio and filesystem implementations are picked by
//! feature flags in `factory`.

pub mod backends;
pub mod config;
pub mod factory;
pub mod filesystems;
pub mod format;
pub mod scanner;
pub mod static_files;
pub mod structs;
pub mod traits;
pub mod web_server;

// Define a shared Error and Result type for the entire crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Filesystem mount failed: {0}")]
    Mount(String),

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A specialized `Result` type for this crate's operations.
pub type Result<T> = std::result::Result<T, Error>;

use config::AppConfig;
use scanner::Scanner;
use std::sync::Arc;
use traits::{FileSystem, WifiRadio};
use web_server::AppState;

/// 核心启动流程：初始化无线电、挂载文件系统、运行 Web 服务器
///
/// Any error returned here happened during bring-up or stopped the listener;
/// callers should treat it as fatal.
pub async fn run_scanner(
    config: &AppConfig,
    radio: Arc<dyn WifiRadio>,
    fs: Arc<dyn FileSystem>,
) -> Result<()> {
    radio.initialize(&config.ap).await?;
    tracing::info!(
        "📡 WiFi initialized in AP+STA mode. SSID: {}",
        config.ap.ssid
    );

    let info = fs.mount().await?;
    tracing::info!(
        "💾 Mounted {}: total {} bytes, used {} bytes",
        fs.mount_root(),
        info.total,
        info.used
    );

    let state = Arc::new(AppState {
        scanner: Scanner::new(radio, &config.scan),
        fs,
        default_document: config.storage.default_document.clone(),
    });
    web_server::run_server(state, config.http.bind_addr).await
}
