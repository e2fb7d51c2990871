//! Core types for the diagnosis pipeline
//!
//! The closed-set fields of the backend contract (soil status, weather,
//! severity) are sum types with an `Other` variant so that values the contract
//! did not anticipate survive a round trip instead of failing to parse.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generates a wire enum backed by fixed string values plus `Other(String)`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            /// Value outside the known set, kept verbatim
            Other(String),
        }

        impl $name {
            /// Known values in display order
            pub const KNOWN: &'static [$name] = &[$($name::$variant),+];

            /// Wire representation
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Other(value) => value,
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $(
                    if value.eq_ignore_ascii_case($wire) {
                        return $name::$variant;
                    }
                )+
                $name::Other(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::from(value.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(value) => value,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Observed soil condition around the plant
    SoilStatus {
        Dry => "dry",
        Moist => "moist",
        Wet => "wet",
        Waterlogged => "waterlogged",
        Cracked => "cracked",
    }
}

wire_enum! {
    /// Weather at the time the photo was taken
    Weather {
        Sunny => "sunny",
        Cloudy => "cloudy",
        Rainy => "rainy",
        Stormy => "stormy",
        Foggy => "foggy",
    }
}

wire_enum! {
    /// Severity grade reported by the classifier
    Severity {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
}

impl SoilStatus {
    /// Label shown on the single-select button
    pub fn label(&self) -> &str {
        match self {
            SoilStatus::Dry => "Dry",
            SoilStatus::Moist => "Moist",
            SoilStatus::Wet => "Wet",
            SoilStatus::Waterlogged => "Waterlogged",
            SoilStatus::Cracked => "Cracked",
            SoilStatus::Other(value) => value,
        }
    }
}

impl Weather {
    pub fn label(&self) -> &str {
        match self {
            Weather::Sunny => "Sunny",
            Weather::Cloudy => "Cloudy",
            Weather::Rainy => "Rainy",
            Weather::Stormy => "Stormy",
            Weather::Foggy => "Foggy",
            Weather::Other(value) => value,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Weather::Sunny => "☀️",
            Weather::Cloudy => "☁️",
            Weather::Rainy => "🌧️",
            Weather::Stormy => "⛈️",
            Weather::Foggy => "🌫️",
            Weather::Other(_) => "❔",
        }
    }
}

/// Environmental metadata submitted alongside the image.
///
/// Every key is always serialized; unset fields are `null`, never omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentRecord {
    /// Free-text place name
    pub location: Option<String>,
    /// Air temperature in °C
    pub temp: Option<f64>,
    /// Relative humidity in percent
    pub humidity: Option<f64>,
    pub soil_status: Option<SoilStatus>,
    pub weather: Option<Weather>,
}

impl EnvironmentRecord {
    /// True when no field has been set
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Classification returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub disease: String,
    pub severity: Severity,
    /// Classifier confidence (0.0-1.0)
    pub confidence: f64,
}

/// Where a displayed result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrigin {
    /// Parsed from a successful backend reply
    Backend,
    /// Demonstration payload installed after a failed request
    Fallback,
}

/// The result shown in result mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub prediction: Prediction,
    /// Treatment advice in the Markdown subset understood by [`crate::markdown`]
    pub remedy_markdown: String,
    /// Raw base64, data URI or http(s) URL
    pub reference_image: Option<String>,
    pub origin: ResultOrigin,
}

impl DiagnosisResult {
    pub fn is_fallback(&self) -> bool {
        self.origin == ResultOrigin::Fallback
    }
}
