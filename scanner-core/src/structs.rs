use crate::format::auth_mode_label;
use serde::Serialize;

/// Maximum SSID length in bytes (IEEE 802.11).
pub const SSID_MAX_LEN: usize = 32;

/// Raw SSID bytes, bounded to [`SSID_MAX_LEN`].
pub type SsidBytes = heapless::Vec<u8, SSID_MAX_LEN>;

/// One network found during a scan, as reported by the radio.
///
/// The SSID is kept as opaque bytes: it may contain NUL padding or bytes that
/// are not valid UTF-8. Authentication and cipher fields hold the raw driver
/// codes; see [`crate::format`] for their labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRecord {
    pub ssid: SsidBytes,
    pub bssid: [u8; 6],
    /// 信号强度 (dBm)
    pub rssi: i8,
    pub primary_channel: u8,
    pub auth_mode: u32,
    pub pairwise_cipher: u32,
    pub group_cipher: u32,
}

impl ScanRecord {
    /// Builds a record from arbitrary SSID bytes, keeping at most
    /// [`SSID_MAX_LEN`] of them.
    pub fn new(ssid: &[u8], rssi: i8, primary_channel: u8, auth_mode: u32) -> Self {
        Self {
            ssid: bounded_ssid(ssid),
            rssi,
            primary_channel,
            auth_mode,
            ..Self::default()
        }
    }

    /// SSID rendered as text: cut at the first NUL and decoded lossily.
    pub fn ssid_text(&self) -> String {
        let end = self
            .ssid
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.ssid.len());
        String::from_utf8_lossy(&self.ssid[..end]).into_owned()
    }
}

/// Truncates `bytes` to the SSID bound.
pub fn bounded_ssid(bytes: &[u8]) -> SsidBytes {
    let mut ssid = SsidBytes::new();
    let len = bytes.len().min(SSID_MAX_LEN);
    // Cannot overflow: `len` never exceeds the capacity.
    let _ = ssid.extend_from_slice(&bytes[..len]);
    ssid
}

/// Parameters for a single scan request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Only report this SSID. `None` reports every network.
    pub ssid: Option<Vec<u8>>,
    pub bssid: Option<[u8; 6]>,
    /// `0` scans every channel.
    pub channel: u8,
    pub show_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ssid: None,
            bssid: None,
            channel: 0,
            show_hidden: true,
        }
    }
}

impl ScanConfig {
    /// Whether `record` passes this scan's filters.
    pub fn matches(&self, record: &ScanRecord) -> bool {
        if !self.show_hidden && record.ssid.is_empty() {
            return false;
        }
        if let Some(ssid) = &self.ssid {
            if record.ssid.as_slice() != ssid.as_slice() {
                return false;
            }
        }
        if let Some(bssid) = self.bssid {
            if record.bssid != bssid {
                return false;
            }
        }
        self.channel == 0 || record.primary_channel == self.channel
    }
}

/// Filesystem usage reported after mounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MountInfo {
    pub total: u64,
    pub used: u64,
}

/// One element of the `/scan` JSON array.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NetworkEntry {
    pub ssid: String,
    pub rssi: i8,
    pub channel: u8,
    pub auth: &'static str,
}

impl From<&ScanRecord> for NetworkEntry {
    fn from(record: &ScanRecord) -> Self {
        Self {
            ssid: record.ssid_text(),
            rssi: record.rssi,
            channel: record.primary_channel,
            auth: auth_mode_label(record.auth_mode),
        }
    }
}
