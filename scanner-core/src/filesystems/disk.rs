use super::OpenLimiter;
use crate::config::StorageConfig;
use crate::structs::MountInfo;
use crate::traits::{FileReader, FileSystem};
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// A filesystem backed by a host directory, used as mount root directly.
#[derive(Debug)]
pub struct DiskFs {
    mount_root: String,
    format_if_mount_failed: bool,
    limiter: OpenLimiter,
}

impl DiskFs {
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            mount_root: storage.mount_root.clone(),
            format_if_mount_failed: storage.format_if_mount_failed,
            limiter: OpenLimiter::new(storage.max_files),
        }
    }

    /// Total size of every regular file below the mount root.
    async fn used_bytes(&self) -> Result<u64> {
        let mut used = 0;
        let mut pending = vec![PathBuf::from(&self.mount_root)];
        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let meta = entry.metadata().await?;
                if meta.is_dir() {
                    pending.push(entry.path());
                } else if meta.is_file() {
                    used += meta.len();
                }
            }
        }
        Ok(used)
    }
}

#[async_trait]
impl FileSystem for DiskFs {
    /// Checks the mount root is a directory, creating it when
    /// `format_if_mount_failed` is set. Capacity is unknown, so `total`
    /// reports the bytes in use.
    async fn mount(&self) -> Result<MountInfo> {
        match fs::metadata(&self.mount_root).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(Error::Mount(format!(
                    "{} is not a directory",
                    self.mount_root
                )));
            }
            Err(e) if self.format_if_mount_failed => {
                tracing::warn!(
                    "Mount root {} unavailable ({}), creating it",
                    self.mount_root,
                    e
                );
                fs::create_dir_all(&self.mount_root)
                    .await
                    .map_err(|e| Error::Mount(format!("{}: {}", self.mount_root, e)))?;
            }
            Err(e) => return Err(Error::Mount(format!("{}: {}", self.mount_root, e))),
        }

        let used = self.used_bytes().await?;
        Ok(MountInfo { total: used, used })
    }

    fn mount_root(&self) -> &str {
        &self.mount_root
    }

    async fn open(&self, path: &str) -> Result<FileReader> {
        let not_found = |_| Error::AssetNotFound(path.to_string());
        let meta = fs::metadata(path).await.map_err(not_found)?;
        if !meta.is_file() {
            return Err(Error::AssetNotFound(path.to_string()));
        }
        let file = fs::File::open(path).await.map_err(not_found)?;
        self.limiter.wrap(Box::new(file)).await
    }
}
