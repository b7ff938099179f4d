use super::{OpenLimiter, strip_mount_root};
use crate::config::StorageConfig;
use crate::structs::MountInfo;
use crate::traits::{FileReader, FileSystem};
use crate::{Error, Result};
use async_trait::async_trait;
use rust_embed::RustEmbed;
use std::io::Cursor;

// 用于在二进制文件中嵌入 Web UI
#[derive(RustEmbed)]
#[folder = "../ui/"]
struct Asset;

/// A filesystem image compiled into the binary. The mount root is virtual.
#[derive(Debug)]
pub struct EmbedFs {
    mount_root: String,
    limiter: OpenLimiter,
}

impl EmbedFs {
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            mount_root: storage.mount_root.clone(),
            limiter: OpenLimiter::new(storage.max_files),
        }
    }
}

#[async_trait]
impl FileSystem for EmbedFs {
    async fn mount(&self) -> Result<MountInfo> {
        let used: u64 = Asset::iter()
            .filter_map(|name| Asset::get(&name))
            .map(|file| file.data.len() as u64)
            .sum();
        Ok(MountInfo { total: used, used })
    }

    fn mount_root(&self) -> &str {
        &self.mount_root
    }

    async fn open(&self, path: &str) -> Result<FileReader> {
        let relative = strip_mount_root(&self.mount_root, path)
            .map(|rest| rest.trim_start_matches('/'))
            .ok_or_else(|| Error::AssetNotFound(path.to_string()))?;

        let asset = Asset::get(relative).ok_or_else(|| {
            tracing::debug!("Asset not found: {}", path);
            Error::AssetNotFound(path.to_string())
        })?;

        self.limiter.wrap(Box::new(Cursor::new(asset.data))).await
    }
}
