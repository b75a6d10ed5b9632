use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::Value;

use super::{has_known_class, short_class};

// ── Meters ───────────────────────────────────────────────────────────

/// How SAE measures an appliance's power, as returned by `GET /meter?id={id}`.
///
/// `Meter::None` is the empty record, with the same rules as
/// [`crate::Control::None`]. Unmodelled meter classes decode to `Meter::Other`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(remote = "Self", tag = "@class")]
pub enum Meter {
    #[serde(rename = "de.avanux.smartapplianceenabler.meter.S0ElectricityMeter")]
    S0ElectricityMeter(S0ElectricityMeter),

    #[serde(rename = "de.avanux.smartapplianceenabler.meter.ModbusElectricityMeter")]
    ModbusElectricityMeter(ModbusElectricityMeter),

    #[serde(rename = "de.avanux.smartapplianceenabler.meter.HttpElectricityMeter")]
    HttpElectricityMeter(HttpElectricityMeter),

    #[serde(skip)]
    Other(Value),

    #[default]
    #[serde(skip)]
    None,
}

const METER_CLASSES: &[&str] = &[
    "de.avanux.smartapplianceenabler.meter.S0ElectricityMeter",
    "de.avanux.smartapplianceenabler.meter.ModbusElectricityMeter",
    "de.avanux.smartapplianceenabler.meter.HttpElectricityMeter",
];

impl Serialize for Meter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Other(raw) => raw.serialize(serializer),
            _ => Meter::serialize(self, serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Meter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        if has_known_class(&raw, METER_CLASSES)? {
            Meter::deserialize(raw).map_err(de::Error::custom)
        } else {
            Ok(Self::Other(raw))
        }
    }
}

impl Meter {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn kind(&self) -> &str {
        match self {
            Self::S0ElectricityMeter(_) => "S0ElectricityMeter",
            Self::ModbusElectricityMeter(_) => "ModbusElectricityMeter",
            Self::HttpElectricityMeter(_) => "HttpElectricityMeter",
            Self::Other(raw) => short_class(raw),
            Self::None => "None",
        }
    }
}

/// Pulse counter on a GPIO pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S0ElectricityMeter {
    pub gpio: u8,
    /// `UP` or `DOWN`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_pull_resistance: Option<String>,
    pub impulses_per_kwh: u32,
    /// Seconds of pulses averaged into one power value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_interval: Option<u32>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModbusElectricityMeter {
    /// References `ModbusSettings::modbus_tcp_id`.
    pub idref: String,
    pub slave_address: u8,
    pub register_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_interval: Option<u32>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpElectricityMeter {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Multiplier turning the extracted value into watts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor_to_watt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_interval: Option<u32>,
    /// `JSON` when `path` is a JSON path into the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── Defaults ─────────────────────────────────────────────────────────

/// Server defaults for meters, as returned by `GET /meterdefaults`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterDefaults {
    #[serde(default)]
    pub s0_electricity_meter: S0ElectricityMeterDefaults,
    #[serde(default)]
    pub modbus_electricity_meter: ModbusElectricityMeterDefaults,
    #[serde(default)]
    pub http_electricity_meter: HttpElectricityMeterDefaults,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S0ElectricityMeterDefaults {
    pub pin_pull_resistance: Option<String>,
    pub impulses_per_kwh: Option<u32>,
    pub measurement_interval: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModbusElectricityMeterDefaults {
    pub poll_interval: Option<u32>,
    pub measurement_interval: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpElectricityMeterDefaults {
    pub factor_to_watt: Option<f64>,
    pub poll_interval: Option<u32>,
    pub measurement_interval: Option<u32>,
}

impl MeterDefaults {
    /// A new S0 meter on `gpio` pre-populated from these defaults.
    ///
    /// Falls back to 1000 impulses/kWh when the server has no default.
    pub fn new_s0_meter(&self, gpio: u8) -> S0ElectricityMeter {
        let d = &self.s0_electricity_meter;
        S0ElectricityMeter {
            gpio,
            pin_pull_resistance: d.pin_pull_resistance.clone(),
            impulses_per_kwh: d.impulses_per_kwh.unwrap_or(1000),
            measurement_interval: d.measurement_interval,
            extra: HashMap::new(),
        }
    }
}
