use reqwest::Method;

use super::{Control, Meter};

/// Write intent for a per-appliance configuration record.
///
/// The control and meter endpoints share one path for replacing and removing
/// the stored record; which verb is sent depends only on the variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigChange<T> {
    /// Replace the stored record (`PUT` with a JSON body).
    Save(T),
    /// Remove the stored record (`DELETE`, no body).
    Delete,
}

impl<T> ConfigChange<T> {
    pub fn method(&self) -> Method {
        match self {
            Self::Save(_) => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }

    pub fn as_ref(&self) -> ConfigChange<&T> {
        match self {
            Self::Save(value) => ConfigChange::Save(value),
            Self::Delete => ConfigChange::Delete,
        }
    }
}

impl<'a> From<&'a Control> for ConfigChange<&'a Control> {
    /// The empty record turns into a delete.
    fn from(control: &'a Control) -> Self {
        if control.is_empty() {
            Self::Delete
        } else {
            Self::Save(control)
        }
    }
}

impl<'a> From<&'a Meter> for ConfigChange<&'a Meter> {
    /// The empty record turns into a delete.
    fn from(meter: &'a Meter) -> Self {
        if meter.is_empty() {
            Self::Delete
        } else {
            Self::Save(meter)
        }
    }
}
