use crate::config::ApConfig;
use crate::format::AuthMode;
use crate::structs::{ScanConfig, ScanRecord};
use crate::traits::WifiRadio;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::sleep;

/// A mock radio for local development and tests.
/// It simulates scanning without any real hardware interaction.
#[derive(Debug, Default)]
pub struct MockRadio {
    networks: Vec<ScanRecord>,
    scan_delay: Duration,
    fail_start: bool,
    fail_fetch: bool,
    ignore_fetch_limit: bool,
    reported_count: Option<usize>,
    // 模拟驱动内部保存的上一次扫描结果
    last_scan: Mutex<Vec<ScanRecord>>,
    scans: AtomicUsize,
    active: AtomicUsize,
    peak_active: AtomicUsize,
}

impl MockRadio {
    /// A radio that finds a fixed list of fake networks.
    pub fn new() -> Self {
        let networks = vec![
            ScanRecord::new(b"MyHomeWiFi", -38, 6, AuthMode::Wpa2Wpa3Psk.code()),
            ScanRecord::new(b"CafeGuest", -55, 11, AuthMode::Open.code()),
            ScanRecord::new(b"Neighbor's Network", -67, 1, AuthMode::Wpa2Psk.code()),
            ScanRecord::new(b"xfinitywifi", -71, 6, AuthMode::Enterprise.code()),
            ScanRecord::new(b"", -84, 3, AuthMode::WpaPsk.code()),
        ];
        Self::with_networks(networks).with_scan_delay(Duration::from_secs(2))
    }

    pub fn with_networks(networks: Vec<ScanRecord>) -> Self {
        Self {
            networks,
            ..Self::default()
        }
    }

    pub fn with_scan_delay(mut self, delay: Duration) -> Self {
        self.scan_delay = delay;
        self
    }

    /// Every `start_scan` fails.
    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    /// Every `fetch_records` fails.
    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    /// Report `count` results regardless of how many networks were found.
    pub fn reporting_count(mut self, count: usize) -> Self {
        self.reported_count = Some(count);
        self
    }

    /// Hand out every record on fetch, even past the requested maximum.
    pub fn ignoring_fetch_limit(mut self) -> Self {
        self.ignore_fetch_limit = true;
        self
    }

    /// Number of scans started so far.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    /// Highest number of scans that were in progress at the same time.
    pub fn peak_concurrent_scans(&self) -> usize {
        self.peak_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WifiRadio for MockRadio {
    async fn initialize(&self, ap: &ApConfig) -> Result<()> {
        tracing::info!(
            "🤖 [MockRadio] AP '{}' up on channel {} (simulated)",
            ap.ssid,
            ap.channel
        );
        Ok(())
    }

    async fn start_scan(&self, config: &ScanConfig) -> Result<()> {
        tracing::debug!("🤖 [MockRadio] Scanning for networks...");
        self.scans.fetch_add(1, Ordering::SeqCst);

        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_active.fetch_max(active, Ordering::SeqCst);
        if !self.scan_delay.is_zero() {
            sleep(self.scan_delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.fail_start {
            return Err(Error::CommandFailed("Simulated scan failure".into()));
        }

        let found: Vec<ScanRecord> = self
            .networks
            .iter()
            .filter(|record| config.matches(record))
            .cloned()
            .collect();
        tracing::debug!("🤖 [MockRadio] Found {} networks.", found.len());
        if let Ok(mut last) = self.last_scan.lock() {
            *last = found;
        }
        Ok(())
    }

    async fn result_count(&self) -> Result<usize> {
        if let Some(count) = self.reported_count {
            return Ok(count);
        }
        Ok(self.last_scan.lock().map(|last| last.len()).unwrap_or(0))
    }

    async fn fetch_records(&self, out: &mut Vec<ScanRecord>, max: usize) -> Result<()> {
        if self.fail_fetch {
            return Err(Error::CommandFailed("Simulated record retrieval failure".into()));
        }
        let limit = if self.ignore_fetch_limit { usize::MAX } else { max };
        if let Ok(last) = self.last_scan.lock() {
            out.extend(last.iter().take(limit).cloned());
        }
        Ok(())
    }
}
