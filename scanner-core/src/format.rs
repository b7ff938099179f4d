//! Human-readable labels for the radio's authentication and cipher codes.
//!
//! Codes follow the ESP-IDF `wifi_auth_mode_t` / `wifi_cipher_type_t`
//! numbering. Every function here is total: unknown codes map to a stable
//! `*_UNKNOWN` label.

pub const AUTH_UNKNOWN: &str = "WIFI_AUTH_UNKNOWN";
pub const CIPHER_UNKNOWN: &str = "WIFI_CIPHER_TYPE_UNKNOWN";

/// Authentication modes with a published label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum AuthMode {
    Open = 0,
    Wep = 1,
    WpaPsk = 2,
    Wpa2Psk = 3,
    WpaWpa2Psk = 4,
    Enterprise = 5,
    Wpa3Psk = 6,
    Wpa2Wpa3Psk = 7,
    // 8 (WAPI_PSK) and 9 (OWE) are reported as unknown.
    Wpa3Ent192 = 10,
}

impl AuthMode {
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0 => Self::Open,
            1 => Self::Wep,
            2 => Self::WpaPsk,
            3 => Self::Wpa2Psk,
            4 => Self::WpaWpa2Psk,
            5 => Self::Enterprise,
            6 => Self::Wpa3Psk,
            7 => Self::Wpa2Wpa3Psk,
            10 => Self::Wpa3Ent192,
            _ => return None,
        })
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "WIFI_AUTH_OPEN",
            Self::Wep => "WIFI_AUTH_WEP",
            Self::WpaPsk => "WIFI_AUTH_WPA_PSK",
            Self::Wpa2Psk => "WIFI_AUTH_WPA2_PSK",
            Self::WpaWpa2Psk => "WIFI_AUTH_WPA_WPA2_PSK",
            Self::Enterprise => "WIFI_AUTH_ENTERPRISE",
            Self::Wpa3Psk => "WIFI_AUTH_WPA3_PSK",
            Self::Wpa2Wpa3Psk => "WIFI_AUTH_WPA2_WPA3_PSK",
            Self::Wpa3Ent192 => "WIFI_AUTH_WPA3_ENT_192",
        }
    }
}

/// Cipher suites, shared by the pairwise and group cipher fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CipherType {
    None = 0,
    Wep40 = 1,
    Wep104 = 2,
    Tkip = 3,
    Ccmp = 4,
    TkipCcmp = 5,
    AesCmac128 = 6,
    Sms4 = 7,
    Gcmp = 8,
    Gcmp256 = 9,
}

impl CipherType {
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0 => Self::None,
            1 => Self::Wep40,
            2 => Self::Wep104,
            3 => Self::Tkip,
            4 => Self::Ccmp,
            5 => Self::TkipCcmp,
            6 => Self::AesCmac128,
            7 => Self::Sms4,
            8 => Self::Gcmp,
            9 => Self::Gcmp256,
            _ => return None,
        })
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "WIFI_CIPHER_TYPE_NONE",
            Self::Wep40 => "WIFI_CIPHER_TYPE_WEP40",
            Self::Wep104 => "WIFI_CIPHER_TYPE_WEP104",
            Self::Tkip => "WIFI_CIPHER_TYPE_TKIP",
            Self::Ccmp => "WIFI_CIPHER_TYPE_CCMP",
            Self::TkipCcmp => "WIFI_CIPHER_TYPE_TKIP_CCMP",
            Self::AesCmac128 => "WIFI_CIPHER_TYPE_AES_CMAC128",
            Self::Sms4 => "WIFI_CIPHER_TYPE_SMS4",
            Self::Gcmp => "WIFI_CIPHER_TYPE_GCMP",
            Self::Gcmp256 => "WIFI_CIPHER_TYPE_GCMP256",
        }
    }
}

/// Label for an authentication mode code.
pub fn auth_mode_label(code: u32) -> &'static str {
    AuthMode::from_code(code).map_or(AUTH_UNKNOWN, AuthMode::label)
}

/// Label for a pairwise cipher code.
pub fn cipher_label(code: u32) -> &'static str {
    CipherType::from_code(code).map_or(CIPHER_UNKNOWN, CipherType::label)
}

/// Label for a group cipher code. AES-CMAC-128 is not a group cipher and
/// reports as unknown.
pub fn group_cipher_label(code: u32) -> &'static str {
    match CipherType::from_code(code) {
        Some(CipherType::AesCmac128) | None => CIPHER_UNKNOWN,
        Some(cipher) => cipher.label(),
    }
}
