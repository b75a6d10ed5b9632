//! Records exchanged with the SAE REST API.
//!
//! Field names use camelCase on the wire. Polymorphic records (controls,
//! meters, timeframes, requests) carry the backend's `@class` discriminator.
//! Records the backend may extend keep unknown fields in a flattened `extra`
//! map so a read followed by a write loses nothing. Controls and meters of
//! a class this crate does not model are kept as raw JSON for the same reason.

use serde::de;
use serde_json::Value;

mod appliance;
mod change;
mod control;
mod meter;
mod schedule;
mod settings;

pub use appliance::{ApplianceHeader, ApplianceInfo};
pub use change::ConfigChange;
pub use control::{
    Control, ControlDefaults, ElectricVehicle, ElectricVehicleCharger,
    ElectricVehicleChargerDefaults, ElectricVehicleDefaults, EvStatus, GpioSwitch, HttpSwitch,
    ModbusSwitch, SocScript,
};
pub use meter::{
    HttpElectricityMeter, HttpElectricityMeterDefaults, Meter, MeterDefaults,
    ModbusElectricityMeter, ModbusElectricityMeterDefaults, S0ElectricityMeter,
    S0ElectricityMeterDefaults,
};
pub use schedule::{
    ConsecutiveDaysTimeframe, DayTimeframe, EnergyRequest, Request, RuntimeRequest, Schedule,
    SocRequest, TimeOfDay, TimeOfDayOfWeek, Timeframe,
};
pub use settings::{ModbusSettings, Settings, SettingsDefaults};

/// Whether `raw` is tagged with one of `classes`.
///
/// A record without a string `@class` is an error, not an unknown class.
fn has_known_class<E: de::Error>(raw: &Value, classes: &[&str]) -> Result<bool, E> {
    raw.get("@class")
        .and_then(Value::as_str)
        .map(|class| classes.contains(&class))
        .ok_or_else(|| E::missing_field("@class"))
}

/// Last segment of a fully qualified `@class`, or `"Unknown"`.
fn short_class(raw: &Value) -> &str {
    raw.get("@class")
        .and_then(Value::as_str)
        .and_then(|class| class.rsplit('.').next())
        .unwrap_or("Unknown")
}
