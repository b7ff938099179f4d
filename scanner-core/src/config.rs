use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

/// Built-in configuration, used when no override file is given.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../configs.toml");

/// Default upper bound on networks returned per scan (MAX_AP_LIST).
pub const DEFAULT_MAX_AP_LIST: usize = 20;

/// 顶层应用配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ap: ApConfig,
    pub http: HttpConfig,
    pub scan: ScanSettings,
    pub storage: StorageConfig,
    /// `[wpa_cli]` 表（可选，仅 wpa_cli 后端使用）
    pub wpa_cli: WpaCliConfig,
}

/// The access point broadcast next to the scanning station.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApConfig {
    pub ssid: String,
    /// Empty means an open network.
    pub password: String,
    pub channel: u8,
    pub max_connection: u8,
}

impl Default for ApConfig {
    fn default() -> Self {
        Self {
            ssid: "ESP32-Scanner".to_string(),
            password: String::new(),
            channel: 1,
            max_connection: 4,
        }
    }
}

impl ApConfig {
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind_addr: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([192, 168, 4, 1], 80)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    pub max_ap_list: usize,
    pub show_hidden: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_ap_list: DEFAULT_MAX_AP_LIST,
            show_hidden: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub mount_root: String,
    /// Served for `/`, relative to the mount root.
    pub default_document: String,
    /// Maximum number of files open at once.
    pub max_files: usize,
    pub format_if_mount_failed: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mount_root: "/spiffs".to_string(),
            default_document: "/scanner/index.html".to_string(),
            max_files: 5,
            format_if_mount_failed: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WpaCliConfig {
    /// `wpa_cli` executable, looked up in `PATH` unless absolute.
    pub wpa_cli_path: String,
    pub interface_name: String,
    /// Interface hostapd broadcasts the AP on.
    pub ap_interface_name: String,
    /// How long to wait between `scan` and `scan_results`.
    pub scan_wait_secs: u64,
    /// When set, a hostapd config is generated here and hostapd is started.
    pub hostapd_conf_path: Option<String>,
}

impl Default for WpaCliConfig {
    fn default() -> Self {
        Self {
            wpa_cli_path: "wpa_cli".to_string(),
            interface_name: "wlan0".to_string(),
            ap_interface_name: "uap0".to_string(),
            scan_wait_secs: 5,
            hostapd_conf_path: None,
        }
    }
}

// ============= 配置加载函数 =============

/// 从 TOML 字符串加载应用配置
pub fn load_config_from_toml_str(s: &str) -> crate::Result<AppConfig> {
    Ok(toml::from_str(s)?)
}

/// Loads the configuration from `path`, or the built-in defaults when no
/// path is given.
pub fn load_config(path: Option<&Path>) -> crate::Result<AppConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            load_config_from_toml_str(&content)
        }
        None => load_config_from_toml_str(DEFAULT_CONFIG_TOML),
    }
}
