//! Scan driver adapter: runs one blocking scan on the shared radio and hands
//! back a bounded, caller-owned result set.

use crate::config::ScanSettings;
use crate::structs::{ScanConfig, ScanRecord};
use crate::traits::WifiRadio;
use std::collections::TryReserveError;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Why a scan produced no results. All variants are recoverable.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan could not be started: {0}")]
    Start(#[source] crate::Error),

    #[error("failed to allocate storage for {requested} scan records")]
    Allocation {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("failed to retrieve scan records: {0}")]
    Retrieval(#[source] crate::Error),
}

/// Owns the radio handle and serializes scans on it.
pub struct Scanner {
    radio: Arc<dyn WifiRadio>,
    // 无线电是单例：同一时刻只允许一个 start/count/fetch 序列。
    lock: Mutex<()>,
    config: ScanConfig,
    max_ap_list: usize,
}

impl Scanner {
    pub fn new(radio: Arc<dyn WifiRadio>, settings: &ScanSettings) -> Self {
        Self {
            radio,
            lock: Mutex::new(()),
            config: ScanConfig {
                show_hidden: settings.show_hidden,
                ..ScanConfig::default()
            },
            max_ap_list: settings.max_ap_list,
        }
    }

    /// Scans every channel and returns at most `max_ap_list` records, in the
    /// order the radio reported them.
    ///
    /// On error nothing is returned; any storage allocated for the records
    /// has already been released.
    pub async fn scan(&self) -> Result<Vec<ScanRecord>, ScanError> {
        let _guard = self.lock.lock().await;

        self.radio
            .start_scan(&self.config)
            .await
            .map_err(ScanError::Start)?;

        let reported = self
            .radio
            .result_count()
            .await
            .map_err(ScanError::Retrieval)?;
        let count = reported.min(self.max_ap_list);
        if count < reported {
            tracing::debug!(
                "Radio reported {} networks, keeping the first {}",
                reported,
                count
            );
        }

        let mut records = Vec::new();
        records
            .try_reserve_exact(count)
            .map_err(|source| ScanError::Allocation {
                requested: count,
                source,
            })?;

        self.radio
            .fetch_records(&mut records, count)
            .await
            .map_err(ScanError::Retrieval)?;
        records.truncate(count);

        tracing::debug!("Scan complete: {} networks", records.len());
        Ok(records)
    }
}
