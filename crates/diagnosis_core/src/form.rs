//! Environment form state
//!
//! Partial-update semantics: each setter touches exactly one field of the
//! [`EnvironmentRecord`]. No field is required.

use crate::error::{CoreError, Result};
use crate::types::{EnvironmentRecord, SoilStatus, Weather};
use std::str::FromStr;

/// Field names, matching the keys of the `env_data` payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvField {
    Location,
    Temp,
    Humidity,
    SoilStatus,
    Weather,
}

impl EnvField {
    pub const ALL: [EnvField; 5] = [
        EnvField::Location,
        EnvField::Temp,
        EnvField::Humidity,
        EnvField::SoilStatus,
        EnvField::Weather,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            EnvField::Location => "location",
            EnvField::Temp => "temp",
            EnvField::Humidity => "humidity",
            EnvField::SoilStatus => "soil_status",
            EnvField::Weather => "weather",
        }
    }
}

impl FromStr for EnvField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        EnvField::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| CoreError::InvalidField {
                field: "name",
                value: s.to_string(),
            })
    }
}

/// Mutable record behind the environment step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentForm {
    record: EnvironmentRecord,
}

impl EnvironmentForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update one field from raw input text. Blank input clears the field.
    ///
    /// Temperature and humidity must parse as numbers; on failure the field
    /// keeps its previous value.
    pub fn set_field(&mut self, field: EnvField, value: &str) -> Result<()> {
        let value = value.trim();
        let blank = value.is_empty();
        match field {
            EnvField::Location => {
                self.record.location = (!blank).then(|| value.to_string());
            }
            EnvField::Temp => self.record.temp = parse_number(field, value)?,
            EnvField::Humidity => self.record.humidity = parse_number(field, value)?,
            EnvField::SoilStatus => {
                self.record.soil_status = (!blank).then(|| SoilStatus::from(value));
            }
            EnvField::Weather => {
                self.record.weather = (!blank).then(|| Weather::from(value));
            }
        }
        Ok(())
    }

    /// Exclusive single-select; replaces any prior soil choice
    pub fn select_soil(&mut self, soil: SoilStatus) {
        self.record.soil_status = Some(soil);
    }

    /// Exclusive single-select; replaces any prior weather choice
    pub fn select_weather(&mut self, weather: Weather) {
        self.record.weather = Some(weather);
    }

    pub fn record(&self) -> &EnvironmentRecord {
        &self.record
    }

    /// The `env_data` JSON text
    pub fn to_json(&self) -> String {
        env_data_json(&self.record)
    }

    pub fn reset(&mut self) {
        self.record = EnvironmentRecord::default();
    }
}

/// Serialize a record the way the `env_data` part expects
pub fn env_data_json(record: &EnvironmentRecord) -> String {
    // Only Option<primitive> fields: serialization cannot fail.
    serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string())
}

/// Text an input control should show for `field`; empty when unset
pub fn input_value(record: &EnvironmentRecord, field: EnvField) -> String {
    match field {
        EnvField::Location => record.location.clone().unwrap_or_default(),
        EnvField::Temp => record.temp.map(|t| t.to_string()).unwrap_or_default(),
        EnvField::Humidity => record.humidity.map(|h| h.to_string()).unwrap_or_default(),
        EnvField::SoilStatus => record
            .soil_status
            .as_ref()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
        EnvField::Weather => record
            .weather
            .as_ref()
            .map(|w| w.as_str().to_string())
            .unwrap_or_default(),
    }
}

fn parse_number(field: EnvField, value: &str) -> Result<Option<f64>> {
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(CoreError::InvalidField {
            field: field.key(),
            value: value.to_string(),
        }),
    }
}
