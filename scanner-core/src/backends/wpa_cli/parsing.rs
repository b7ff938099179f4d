use crate::format::{AuthMode, CipherType};
use crate::structs::{ScanRecord, bounded_ssid};

/// 将 wpa_supplicant 输出中的 `\xHH` 转义序列反转义回原始字节。
/// SSIDs are opaque bytes; wpa_cli escapes anything outside printable ASCII.
pub(super) fn unescape_wpa_ssid(s: &str) -> Vec<u8> {
    fn hex_val(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(10 + b - b'a'),
            b'A'..=b'F' => Some(10 + b - b'A'),
            _ => None,
        }
    }

    let bs = s.as_bytes();
    let mut out = Vec::with_capacity(bs.len());
    let mut i = 0;
    while i < bs.len() {
        if bs[i] != b'\\' || i + 1 >= bs.len() {
            out.push(bs[i]);
            i += 1;
            continue;
        }
        match bs[i + 1] {
            b'x' | b'X' if i + 3 < bs.len() => {
                if let (Some(hi), Some(lo)) = (hex_val(bs[i + 2]), hex_val(bs[i + 3])) {
                    out.push((hi << 4) | lo);
                    i += 4;
                } else {
                    out.push(b'\\');
                    i += 1;
                }
            }
            b'\\' => {
                out.push(b'\\');
                i += 2;
            }
            b'"' => {
                out.push(b'"');
                i += 2;
            }
            _ => {
                out.push(b'\\');
                i += 1;
            }
        }
    }
    out
}

/// 将频率（MHz）转换为 IEEE 802.11 信道号；未知频率返回 0。
pub(super) fn frequency_to_channel(freq: u32) -> u8 {
    let channel = match freq {
        2484 => 14,
        2412..=2472 => (freq - 2407) / 5,
        5160..=5885 => (freq - 5000) / 5,
        5955..=7115 => (freq - 5950) / 5,
        _ => 0,
    };
    u8::try_from(channel).unwrap_or(0)
}

/// Maps the wpa_supplicant flag string (e.g. `[WPA2-PSK-CCMP][ESS]`) to an
/// authentication mode.
pub(super) fn auth_mode_from_flags(flags: &str) -> AuthMode {
    let wpa = flags.contains("[WPA-");
    let rsn = flags.contains("[WPA2-") || flags.contains("[RSN-");
    let sae = flags.contains("SAE");
    let psk = flags.contains("PSK");

    if flags.contains("SUITE-B-192") {
        AuthMode::Wpa3Ent192
    } else if flags.contains("EAP") {
        AuthMode::Enterprise
    } else if sae && psk {
        AuthMode::Wpa2Wpa3Psk
    } else if sae {
        AuthMode::Wpa3Psk
    } else if wpa && rsn {
        AuthMode::WpaWpa2Psk
    } else if rsn {
        AuthMode::Wpa2Psk
    } else if wpa {
        AuthMode::WpaPsk
    } else if flags.contains("WEP") {
        AuthMode::Wep
    } else {
        AuthMode::Open
    }
}

/// Pairwise and group ciphers implied by the flag string. Mixed TKIP+CCMP
/// networks use TKIP as group cipher.
pub(super) fn ciphers_from_flags(flags: &str) -> (CipherType, CipherType) {
    if flags.contains("TKIP+CCMP") {
        (CipherType::TkipCcmp, CipherType::Tkip)
    } else if flags.contains("GCMP-256") {
        (CipherType::Gcmp256, CipherType::Gcmp256)
    } else if flags.contains("CCMP") {
        (CipherType::Ccmp, CipherType::Ccmp)
    } else if flags.contains("GCMP") {
        (CipherType::Gcmp, CipherType::Gcmp)
    } else if flags.contains("TKIP") {
        (CipherType::Tkip, CipherType::Tkip)
    } else if flags.contains("WEP") {
        (CipherType::Wep40, CipherType::Wep40)
    } else {
        (CipherType::None, CipherType::None)
    }
}

fn parse_bssid(s: &str) -> [u8; 6] {
    let mut bssid = [0u8; 6];
    let octets: Vec<u8> = s
        .split(':')
        .filter_map(|part| u8::from_str_radix(part, 16).ok())
        .collect();
    if octets.len() == 6 {
        bssid.copy_from_slice(&octets);
    }
    bssid
}

/// 解析 SCAN_RESULTS 的输出
/// 格式: bssid / frequency / signal level / flags / ssid
///
/// Hidden networks (empty SSID) are kept; the scan filter decides about them.
pub(super) fn parse_scan_results(output: &str) -> Vec<ScanRecord> {
    let mut records = Vec::new();
    for line in output.lines().skip(1) {
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 4 {
            continue;
        }

        let freq: u32 = parts[1].parse().unwrap_or(0);
        let signal_dbm: i16 = parts[2].parse().unwrap_or(-100);
        let flags = parts[3];
        let ssid = unescape_wpa_ssid(parts.get(4).copied().unwrap_or(""));
        let (pairwise, group) = ciphers_from_flags(flags);

        records.push(ScanRecord {
            ssid: bounded_ssid(&ssid),
            bssid: parse_bssid(parts[0]),
            rssi: signal_dbm.clamp(i8::MIN as i16, i8::MAX as i16) as i8,
            primary_channel: frequency_to_channel(freq),
            auth_mode: auth_mode_from_flags(flags).code(),
            pairwise_cipher: pairwise.code(),
            group_cipher: group.code(),
        });
    }
    records
}
