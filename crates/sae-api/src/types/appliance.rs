use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Appliances ───────────────────────────────────────────────────────

/// Appliance overview, as returned by `GET /appliances`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceHeader {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    /// Device category as configured by the user (e.g. `WashingMachine`, `EVCharger`).
    #[serde(rename = "type")]
    pub appliance_type: String,
    /// Whether a control is configured, i.e. SAE can switch the appliance.
    #[serde(default)]
    pub controllable: bool,
}

/// Full appliance configuration, as returned by `GET /appliance?id={id}`.
///
/// Times are in seconds, power values in watts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub appliance_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_power_consumption: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_power_consumption: Option<u32>,
    /// One of `Measurement` or `Estimation`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_power_method: Option<String>,
    #[serde(default)]
    pub interruptions_allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_on_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_on_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_off_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_off_time: Option<u32>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_fields_survive_in_extra() {
        let raw = json!({
            "id": "F-00000001-000000000001-00",
            "vendor": "Bosch",
            "name": "Dishwasher",
            "type": "DishWasher",
            "serial": "123",
            "maxPowerConsumption": 2000,
            "interruptionsAllowed": true,
            "notificationSenderId": "notify-1"
        });

        let info: ApplianceInfo = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(info.max_power_consumption, Some(2000));
        assert!(info.interruptions_allowed);
        assert_eq!(info.extra.get("notificationSenderId"), Some(&json!("notify-1")));

        assert_eq!(serde_json::to_value(&info).unwrap(), raw);
    }

    #[test]
    fn sparse_appliance_decodes() {
        let raw = json!({
            "id": "F-1",
            "name": "Pump",
            "type": "Pump",
            "interruptionsAllowed": false
        });

        let info: ApplianceInfo = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(info.vendor, None);
        assert_eq!(info.serial, None);
        assert_eq!(info.max_power_consumption, None);
        assert_eq!(serde_json::to_value(&info).unwrap(), raw);
    }
}
