use crate::config::ApConfig;
use crate::structs::{MountInfo, ScanConfig, ScanRecord};
use async_trait::async_trait;
use tokio::io::AsyncRead;

// 平台能力接口：无线电与文件系统。具体实现见 `backends` 与 `filesystems`。

/// A readable file handle. Dropping it closes the file.
pub type FileReader = Box<dyn AsyncRead + Send + Unpin>;

/// Access to the wireless radio.
///
/// Implementations model a single physical radio. Callers that need a
/// consistent start/count/fetch sequence must serialize access themselves
/// (see [`crate::scanner::Scanner`]).
#[async_trait]
pub trait WifiRadio: Send + Sync {
    /// Brings the radio up in AP + STA mode, broadcasting the configured AP.
    async fn initialize(&self, ap: &ApConfig) -> crate::Result<()>;

    /// Runs a scan and returns once it has completed.
    async fn start_scan(&self, config: &ScanConfig) -> crate::Result<()>;

    /// Number of networks found by the last completed scan.
    async fn result_count(&self) -> crate::Result<usize>;

    /// Appends at most `max` records from the last scan to `out`.
    async fn fetch_records(&self, out: &mut Vec<ScanRecord>, max: usize) -> crate::Result<()>;
}

/// Read-only access to the mounted asset filesystem.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Mounts the filesystem and reports its usage.
    async fn mount(&self) -> crate::Result<MountInfo>;

    /// The prefix every request path is resolved against.
    fn mount_root(&self) -> &str;

    /// Opens the file at `path` (mount root included) for reading.
    async fn open(&self, path: &str) -> crate::Result<FileReader>;
}
