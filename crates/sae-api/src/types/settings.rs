use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Settings ─────────────────────────────────────────────────────────

/// Global SAE settings, as returned by `GET /settings`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub holidays_enabled: bool,
    /// URL of the holiday calendar; `{0}` is replaced by the year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holidays_url: Option<String>,
    #[serde(default)]
    pub modbus_settings: Vec<ModbusSettings>,
    /// Any other settings the backend stores.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Settings {
    /// Look up a Modbus/TCP connection by the id controls and meters reference.
    pub fn modbus(&self, id: &str) -> Option<&ModbusSettings> {
        self.modbus_settings.iter().find(|m| m.modbus_tcp_id == id)
    }
}

/// A Modbus/TCP connection referenced by `idref` in controls and meters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModbusSettings {
    pub modbus_tcp_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modbus_tcp_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modbus_tcp_port: Option<u16>,
}

/// Server defaults for settings, as returned by `GET /settingsdefaults`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDefaults {
    pub holidays_url: Option<String>,
    pub modbus_tcp_host: Option<String>,
    pub modbus_tcp_port: Option<u16>,
}

impl SettingsDefaults {
    /// A new Modbus/TCP connection pre-populated from these defaults.
    pub fn new_modbus_settings(&self, id: impl Into<String>) -> ModbusSettings {
        ModbusSettings {
            modbus_tcp_id: id.into(),
            modbus_tcp_host: self.modbus_tcp_host.clone(),
            modbus_tcp_port: self.modbus_tcp_port,
        }
    }
}
