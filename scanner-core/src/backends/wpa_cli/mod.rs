// 后端：wpa_cli（通过 wpa_cli 命令驱动 wpa_supplicant 扫描，hostapd 提供 AP）

mod parsing;

use crate::config::{ApConfig, WpaCliConfig};
use crate::structs::{ScanConfig, ScanRecord};
use crate::traits::WifiRadio;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

/// Radio backend for Linux hosts running wpa_supplicant.
#[derive(Debug)]
pub struct WpaCliRadio {
    config: WpaCliConfig,
    // 控制 hostapd 进程的句柄
    hostapd: Mutex<Option<Child>>,
    // 上一次扫描结果，等待 fetch_records 取走
    last_scan: Mutex<Vec<ScanRecord>>,
}

impl WpaCliRadio {
    pub fn new(config: WpaCliConfig) -> Self {
        Self {
            config,
            hostapd: Mutex::new(None),
            last_scan: Mutex::new(Vec::new()),
        }
    }

    /// Runs `wpa_cli -i <iface> <args>` for a single-token reply
    /// (`PONG`, `OK`) and returns it trimmed.
    async fn wpa_cli(&self, args: &[&str]) -> Result<String> {
        Ok(self.wpa_cli_raw(args).await?.trim().to_string())
    }

    /// Runs `wpa_cli -i <iface> <args>` and returns stdout untouched. SSIDs
    /// may end in whitespace, so table output must not be trimmed.
    async fn wpa_cli_raw(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.config.wpa_cli_path)
            .arg("-i")
            .arg(&self.config.interface_name)
            .args(args)
            .output()
            .await?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            return Err(Error::CommandFailed(format!(
                "wpa_cli {} failed: {}",
                args.join(" "),
                error_msg.trim()
            )));
        }
        Ok(String::from_utf8(output.stdout)?)
    }

    async fn start_hostapd(&self, ap: &ApConfig, conf_path: &str) -> Result<()> {
        let conf = render_hostapd_conf(ap, &self.config.ap_interface_name);
        tokio::fs::write(conf_path, conf.as_bytes()).await?;
        tracing::info!("Created hostapd config at: {}", conf_path);

        let mut hostapd = self.hostapd.lock().await;
        if let Some(mut old) = hostapd.take() {
            let _ = old.kill().await;
        }
        let child = Command::new("hostapd").arg(conf_path).spawn()?;
        *hostapd = Some(child);
        Ok(())
    }
}

/// Renders a hostapd configuration broadcasting `ap` on `interface`.
pub fn render_hostapd_conf(ap: &ApConfig, interface: &str) -> String {
    let mut conf = format!(
        "interface={}\nssid={}\nhw_mode=g\nchannel={}\nmax_num_sta={}\n",
        interface, ap.ssid, ap.channel, ap.max_connection
    );
    if !ap.is_open() {
        conf.push_str(&format!(
            "wpa=2\nwpa_passphrase={}\nwpa_key_mgmt=WPA-PSK\nrsn_pairwise=CCMP\n",
            ap.password
        ));
    }
    conf
}

#[async_trait]
impl WifiRadio for WpaCliRadio {
    async fn initialize(&self, ap: &ApConfig) -> Result<()> {
        let reply = self.wpa_cli(&["ping"]).await?;
        if reply != "PONG" {
            return Err(Error::CommandFailed(format!(
                "wpa_supplicant is not answering on {} (got '{}')",
                self.config.interface_name, reply
            )));
        }

        match &self.config.hostapd_conf_path {
            Some(path) => {
                self.start_hostapd(ap, path).await?;
                tracing::info!(
                    "📡 [WpaCli] AP '{}' started on {}",
                    ap.ssid,
                    self.config.ap_interface_name
                );
            }
            None => tracing::warn!("📡 [WpaCli] No hostapd_conf_path configured, AP not managed"),
        }
        Ok(())
    }

    async fn start_scan(&self, config: &ScanConfig) -> Result<()> {
        let reply = self.wpa_cli(&["scan"]).await?;
        if reply != "OK" {
            return Err(Error::CommandFailed(format!("scan rejected: {}", reply)));
        }

        // wpa_supplicant 的扫描是异步的，固定等待一段时间再取结果
        tokio::time::sleep(Duration::from_secs(self.config.scan_wait_secs)).await;

        let output = self.wpa_cli_raw(&["scan_results"]).await?;
        let records: Vec<ScanRecord> = parsing::parse_scan_results(&output)
            .into_iter()
            .filter(|record| config.matches(record))
            .collect();
        tracing::debug!("📡 [WpaCli] Scan finished with {} networks", records.len());

        *self.last_scan.lock().await = records;
        Ok(())
    }

    async fn result_count(&self) -> Result<usize> {
        Ok(self.last_scan.lock().await.len())
    }

    async fn fetch_records(&self, out: &mut Vec<ScanRecord>, max: usize) -> Result<()> {
        // Records are handed out once, like the driver's own result buffer.
        let mut last = self.last_scan.lock().await;
        let take = max.min(last.len());
        out.extend(last.drain(..take));
        last.clear();
        Ok(())
    }
}
