use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Schedules ────────────────────────────────────────────────────────

/// A time window in which the appliance should run, as returned by `GET /schedules?id={id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default)]
    pub enabled: bool,
    pub timeframe: Timeframe,
    pub request: Request,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// When a schedule applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@class")]
pub enum Timeframe {
    /// Same window on selected days of the week.
    #[serde(rename = "de.avanux.smartapplianceenabler.schedule.DayTimeframe")]
    Day(DayTimeframe),

    /// One window spanning several days (e.g. Friday 18:00 to Monday 06:00).
    #[serde(rename = "de.avanux.smartapplianceenabler.schedule.ConsecutiveDaysTimeframe")]
    ConsecutiveDays(ConsecutiveDaysTimeframe),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTimeframe {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    /// ISO day numbers, 1 = Monday … 7 = Sunday, 8 = holiday. Empty means every day.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days_of_week_values: Vec<u8>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsecutiveDaysTimeframe {
    pub start: TimeOfDayOfWeek,
    pub end: TimeOfDayOfWeek,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    #[serde(default)]
    pub second: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOfDayOfWeek {
    pub day_of_week: u8,
    pub hour: u8,
    pub minute: u8,
    #[serde(default)]
    pub second: u8,
}

/// What the appliance should achieve inside the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@class")]
pub enum Request {
    /// Run time in seconds.
    #[serde(rename = "de.avanux.smartapplianceenabler.schedule.RuntimeRequest")]
    Runtime(RuntimeRequest),

    /// Energy in Wh.
    #[serde(rename = "de.avanux.smartapplianceenabler.schedule.EnergyRequest")]
    Energy(EnergyRequest),

    /// Charge a vehicle to a state of charge.
    #[serde(rename = "de.avanux.smartapplianceenabler.schedule.SocRequest")]
    Soc(SocRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    pub max: u32,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    pub max: u32,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocRequest {
    /// References `ElectricVehicle::id`.
    pub ev_id: u32,
    pub soc: u8,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── Display ──────────────────────────────────────────────────────────

const DAY_NAMES: [&str; 8] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun", "Holiday"];

fn day_name(day: u8) -> &'static str {
    usize::from(day)
        .checked_sub(1)
        .and_then(|i| DAY_NAMES.get(i))
        .copied()
        .unwrap_or("?")
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl fmt::Display for TimeOfDayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}:{:02}",
            day_name(self.day_of_week),
            self.hour,
            self.minute
        )
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(day) => {
                write!(f, "{}-{}", day.start, day.end)?;
                if !day.days_of_week_values.is_empty() {
                    let days: Vec<_> = day
                        .days_of_week_values
                        .iter()
                        .map(|d| day_name(*d))
                        .collect();
                    write!(f, " ({})", days.join(","))?;
                }
                Ok(())
            }
            Self::ConsecutiveDays(span) => write!(f, "{} - {}", span.start, span.end),
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Runtime(r) => match r.min {
                Some(min) => write!(f, "runtime {min}-{}s", r.max),
                None => write!(f, "runtime {}s", r.max),
            },
            Self::Energy(r) => match r.min {
                Some(min) => write!(f, "energy {min}-{}Wh", r.max),
                None => write!(f, "energy {}Wh", r.max),
            },
            Self::Soc(r) => write!(f, "soc {}% (ev {})", r.soc, r.ev_id),
        }
    }
}
