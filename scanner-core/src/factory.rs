use crate::config::AppConfig;
use crate::traits::{FileSystem, WifiRadio};
use std::sync::Arc;

/// Creates the radio selected at compile time. Without a backend feature
/// the mock radio is used.
pub fn create_radio(config: &AppConfig) -> Arc<dyn WifiRadio> {
    #[cfg(feature = "backend_wpa_cli")]
    {
        tracing::info!(
            "🚀 Radio: wpa_cli backend on {}",
            config.wpa_cli.interface_name
        );
        Arc::new(crate::backends::wpa_cli::WpaCliRadio::new(
            config.wpa_cli.clone(),
        ))
    }
    #[cfg(not(feature = "backend_wpa_cli"))]
    {
        let _ = config;
        tracing::info!("🚀 Radio: mock backend (for local development)");
        Arc::new(crate::backends::mock::MockRadio::new())
    }
}

/// Creates the filesystem selected at compile time. Without a filesystem
/// feature the embedded image is used.
pub fn create_filesystem(config: &AppConfig) -> Arc<dyn FileSystem> {
    #[cfg(feature = "fs_disk")]
    {
        tracing::info!(
            "💿 Filesystem: disk provider at {}",
            config.storage.mount_root
        );
        Arc::new(crate::filesystems::disk::DiskFs::new(&config.storage))
    }
    #[cfg(not(feature = "fs_disk"))]
    {
        tracing::info!("📦 Filesystem: embedded provider (for deployment)");
        Arc::new(crate::filesystems::embed::EmbedFs::new(&config.storage))
    }
}
