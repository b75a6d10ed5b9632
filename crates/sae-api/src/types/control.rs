use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::Value;

use super::{has_known_class, short_class};

// ── Controls ─────────────────────────────────────────────────────────

/// How SAE switches an appliance, as returned by `GET /control?id={id}`.
///
/// `Control::None` is the empty record: the server has no control stored
/// for the appliance. It is never sent; writing it means deleting the stored
/// control (see [`crate::ConfigChange`]).
///
/// A stored control of a class not listed here decodes to `Control::Other`
/// and is written back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(remote = "Self", tag = "@class")]
pub enum Control {
    #[serde(rename = "de.avanux.smartapplianceenabler.control.AlwaysOnSwitch")]
    AlwaysOnSwitch,

    #[serde(rename = "de.avanux.smartapplianceenabler.control.Switch")]
    Switch(GpioSwitch),

    #[serde(rename = "de.avanux.smartapplianceenabler.control.ModbusSwitch")]
    ModbusSwitch(ModbusSwitch),

    #[serde(rename = "de.avanux.smartapplianceenabler.control.HttpSwitch")]
    HttpSwitch(HttpSwitch),

    #[serde(rename = "de.avanux.smartapplianceenabler.control.MockSwitch")]
    MockSwitch,

    #[serde(rename = "de.avanux.smartapplianceenabler.control.ev.ElectricVehicleCharger")]
    ElectricVehicleCharger(ElectricVehicleCharger),

    #[serde(skip)]
    Other(Value),

    #[default]
    #[serde(skip)]
    None,
}

const CONTROL_CLASSES: &[&str] = &[
    "de.avanux.smartapplianceenabler.control.AlwaysOnSwitch",
    "de.avanux.smartapplianceenabler.control.Switch",
    "de.avanux.smartapplianceenabler.control.ModbusSwitch",
    "de.avanux.smartapplianceenabler.control.HttpSwitch",
    "de.avanux.smartapplianceenabler.control.MockSwitch",
    "de.avanux.smartapplianceenabler.control.ev.ElectricVehicleCharger",
];

impl Serialize for Control {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Other(raw) => raw.serialize(serializer),
            _ => Control::serialize(self, serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Control {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        if has_known_class(&raw, CONTROL_CLASSES)? {
            Control::deserialize(raw).map_err(de::Error::custom)
        } else {
            Ok(Self::Other(raw))
        }
    }
}

impl Control {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Short type name for display (`"Switch"`, `"HttpSwitch"`, ...).
    pub fn kind(&self) -> &str {
        match self {
            Self::AlwaysOnSwitch => "AlwaysOnSwitch",
            Self::Switch(_) => "Switch",
            Self::ModbusSwitch(_) => "ModbusSwitch",
            Self::HttpSwitch(_) => "HttpSwitch",
            Self::MockSwitch => "MockSwitch",
            Self::ElectricVehicleCharger(_) => "ElectricVehicleCharger",
            Self::Other(raw) => short_class(raw),
            Self::None => "None",
        }
    }

    /// Status rows for the vehicles attached to an EV charger control.
    /// Empty for every other control type.
    pub fn ev_statuses(&self) -> Vec<EvStatus> {
        match self {
            Self::ElectricVehicleCharger(charger) => {
                charger.vehicles.iter().map(EvStatus::from).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Relay on a Raspberry Pi GPIO pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpioSwitch {
    pub gpio: u8,
    #[serde(default)]
    pub reverse_states: bool,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Coil or holding register on a Modbus/TCP slave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModbusSwitch {
    /// References `ModbusSettings::modbus_tcp_id`.
    pub idref: String,
    pub slave_address: u8,
    /// Register address, usually hex (`"0x0001"`).
    pub register_address: String,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Switch driven by HTTP calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpSwitch {
    pub on_url: String,
    pub off_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_data: Option<String>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── Electric vehicles ────────────────────────────────────────────────

/// Wallbox control with the vehicles that may charge on it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricVehicleCharger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phases: Option<u8>,
    /// Seconds between charger state polls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_charging_state_detection_delay: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_initial_charging: Option<bool>,
    #[serde(default)]
    pub vehicles: Vec<ElectricVehicle>,
    /// Catch-all for additional fields not modeled above, e.g. the nested
    /// wallbox protocol `control`.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// A vehicle known to an EV charger. Energy in Wh, power in W, SOC in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricVehicle {
    pub id: u32,
    pub name: String,
    #[serde(default = "default_battery_capacity")]
    pub battery_capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phases: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_charge_power: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_soc_manual: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_soc_schedule: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_soc_optional_energy: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soc_script: Option<SocScript>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl ElectricVehicle {
    pub const DEFAULT_BATTERY_CAPACITY: u32 = 20_000;

    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            battery_capacity: Self::DEFAULT_BATTERY_CAPACITY,
            phases: None,
            max_charge_power: None,
            default_soc_manual: None,
            default_soc_schedule: None,
            default_soc_optional_energy: None,
            soc_script: None,
            extra: HashMap::new(),
        }
    }
}

fn default_battery_capacity() -> u32 {
    ElectricVehicle::DEFAULT_BATTERY_CAPACITY
}

/// External script printing the vehicle's state of charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocScript {
    pub script: String,
    /// Regex with one capture group extracting the SOC from the script output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_regex: Option<String>,
}

/// Per-vehicle summary shown in the charger status view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvStatus {
    pub id: u32,
    pub name: String,
    pub soc_manual: Option<u8>,
}

impl From<&ElectricVehicle> for EvStatus {
    fn from(ev: &ElectricVehicle) -> Self {
        Self {
            id: ev.id,
            name: ev.name.clone(),
            soc_manual: ev.default_soc_manual,
        }
    }
}

// ── Defaults ─────────────────────────────────────────────────────────

/// Server defaults for controls, as returned by `GET /controldefaults`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlDefaults {
    #[serde(default)]
    pub electric_vehicle_charger: ElectricVehicleChargerDefaults,
    #[serde(default)]
    pub electric_vehicle: ElectricVehicleDefaults,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricVehicleChargerDefaults {
    pub voltage: Option<u32>,
    pub phases: Option<u8>,
    pub poll_interval: Option<u32>,
    pub start_charging_state_detection_delay: Option<u32>,
    pub force_initial_charging: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricVehicleDefaults {
    #[serde(default = "default_battery_capacity")]
    pub battery_capacity: u32,
    #[serde(default)]
    pub phases: Option<u8>,
    #[serde(default)]
    pub max_charge_power: Option<u32>,
}

impl Default for ElectricVehicleDefaults {
    fn default() -> Self {
        Self {
            battery_capacity: ElectricVehicle::DEFAULT_BATTERY_CAPACITY,
            phases: None,
            max_charge_power: None,
        }
    }
}

impl ControlDefaults {
    /// A new vehicle record pre-populated from these defaults.
    pub fn new_vehicle(&self, id: u32, name: impl Into<String>) -> ElectricVehicle {
        ElectricVehicle {
            battery_capacity: self.electric_vehicle.battery_capacity,
            phases: self.electric_vehicle.phases,
            max_charge_power: self.electric_vehicle.max_charge_power,
            ..ElectricVehicle::new(id, name)
        }
    }

    /// A new EV charger control pre-populated from these defaults.
    pub fn new_charger(&self) -> ElectricVehicleCharger {
        let d = &self.electric_vehicle_charger;
        ElectricVehicleCharger {
            voltage: d.voltage,
            phases: d.phases,
            poll_interval: d.poll_interval,
            start_charging_state_detection_delay: d.start_charging_state_detection_delay,
            force_initial_charging: d.force_initial_charging,
            vehicles: Vec::new(),
            extra: HashMap::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_tagged_switch() {
        let control: Control = serde_json::from_value(json!({
            "@class": "de.avanux.smartapplianceenabler.control.Switch",
            "gpio": 17,
            "reverseStates": true
        }))
        .unwrap();

        assert_eq!(
            control,
            Control::Switch(GpioSwitch {
                gpio: 17,
                reverse_states: true,
                extra: HashMap::new(),
            })
        );
        assert_eq!(control.kind(), "Switch");
    }

    #[test]
    fn unit_variant_carries_only_the_tag() {
        let value = serde_json::to_value(Control::AlwaysOnSwitch).unwrap();
        assert_eq!(
            value,
            json!({ "@class": "de.avanux.smartapplianceenabler.control.AlwaysOnSwitch" })
        );
    }

    #[test]
    fn unmodelled_class_is_kept_raw() {
        let raw = json!({
            "@class": "de.avanux.smartapplianceenabler.control.StartingCurrentSwitch",
            "powerThreshold": 20,
            "control": { "@class": "de.avanux.smartapplianceenabler.control.Switch", "gpio": 1 }
        });

        let control: Control = serde_json::from_value(raw.clone()).unwrap();
        assert!(matches!(control, Control::Other(_)));
        assert_eq!(control.kind(), "StartingCurrentSwitch");
        assert!(control.ev_statuses().is_empty());
        assert_eq!(serde_json::to_value(&control).unwrap(), raw);
    }

    #[test]
    fn modelled_class_with_bad_fields_is_an_error() {
        let result: Result<Control, _> = serde_json::from_value(json!({
            "@class": "de.avanux.smartapplianceenabler.control.Switch",
            "gpio": "seventeen"
        }));
        assert!(result.is_err());

        let untagged: Result<Control, _> = serde_json::from_value(json!({ "gpio": 17 }));
        assert!(untagged.is_err());
    }

    #[test]
    fn charger_keeps_unmodelled_fields() {
        let raw = json!({
            "@class": "de.avanux.smartapplianceenabler.control.ev.ElectricVehicleCharger",
            "voltage": 230,
            "control": {
                "@class": "de.avanux.smartapplianceenabler.control.ev.EVModbusControl",
                "idref": "wallbox"
            },
            "vehicles": [{ "id": 1, "name": "Leaf", "batteryCapacity": 40000, "chargeLoss": 11 }]
        });

        let control: Control = serde_json::from_value(raw.clone()).unwrap();
        let Control::ElectricVehicleCharger(charger) = &control else {
            panic!("expected EV charger, got {control:?}");
        };
        assert_eq!(charger.extra["control"]["idref"], "wallbox");
        assert_eq!(charger.vehicles[0].extra["chargeLoss"], 11);
        assert_eq!(serde_json::to_value(&control).unwrap(), raw);
    }

    #[test]
    fn empty_record_cannot_be_serialized() {
        assert!(Control::None.is_empty());
        assert!(serde_json::to_string(&Control::None).is_err());
    }

    #[test]
    fn vehicle_battery_capacity_falls_back_to_default() {
        let ev: ElectricVehicle =
            serde_json::from_value(json!({ "id": 1, "name": "Nissan Leaf" })).unwrap();
        assert_eq!(ev.battery_capacity, 20_000);
        assert_eq!(ev, ElectricVehicle::new(1, "Nissan Leaf"));
    }

    #[test]
    fn ev_statuses_list_charger_vehicles() {
        let mut leaf = ElectricVehicle::new(1, "Leaf");
        leaf.default_soc_manual = Some(80);
        let control = Control::ElectricVehicleCharger(ElectricVehicleCharger {
            vehicles: vec![leaf, ElectricVehicle::new(2, "Zoe")],
            ..ElectricVehicleCharger::default()
        });

        let statuses = control.ev_statuses();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].soc_manual, Some(80));
        assert_eq!(statuses[1].name, "Zoe");
        assert!(Control::MockSwitch.ev_statuses().is_empty());
    }

    #[test]
    fn defaults_prepopulate_new_records() {
        let defaults: ControlDefaults = serde_json::from_value(json!({
            "electricVehicleCharger": { "voltage": 230, "phases": 1, "pollInterval": 10 },
            "electricVehicle": { "batteryCapacity": 40000, "phases": 3 }
        }))
        .unwrap();

        let ev = defaults.new_vehicle(3, "e-Golf");
        assert_eq!(ev.battery_capacity, 40_000);
        assert_eq!(ev.phases, Some(3));
        assert_eq!(ev.max_charge_power, None);

        let charger = defaults.new_charger();
        assert_eq!(charger.voltage, Some(230));
        assert_eq!(charger.poll_interval, Some(10));
        assert!(charger.vehicles.is_empty());
    }

    #[test]
    fn missing_defaults_groups_use_fallbacks() {
        let defaults: ControlDefaults = serde_json::from_value(json!({})).unwrap();
        assert_eq!(defaults, ControlDefaults::default());
        assert_eq!(
            defaults.electric_vehicle.battery_capacity,
            ElectricVehicle::DEFAULT_BATTERY_CAPACITY
        );
    }
}
