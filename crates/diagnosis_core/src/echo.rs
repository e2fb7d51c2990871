//! Display helpers for result mode: the environment echo and prediction badges

use crate::types::{EnvironmentRecord, Severity};

pub const NOT_PROVIDED: &str = "Not provided";

/// One labelled row of the "environmental details provided" panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoRow {
    pub label: &'static str,
    pub value: String,
}

/// Rows for every environment field, in form order
pub fn environment_summary(record: &EnvironmentRecord) -> Vec<EchoRow> {
    let row = |label, value: Option<String>| EchoRow {
        label,
        value: value.unwrap_or_else(|| NOT_PROVIDED.to_string()),
    };

    vec![
        row("Location", record.location.clone()),
        row("Temperature", record.temp.map(|t| format!("{}°C", trim_number(t)))),
        row("Humidity", record.humidity.map(|h| format!("{}%", trim_number(h)))),
        row("Soil Status", record.soil_status.as_ref().map(|s| s.to_string())),
        row("Weather", record.weather.as_ref().map(|w| w.to_string())),
    ]
}

/// Confidence as a percentage with two decimals, e.g. `98.50%`
pub fn confidence_percent(confidence: f64) -> String {
    format!("{:.2}%", confidence * 100.0)
}

/// Width of the confidence bar, clamped to 0–100
pub fn confidence_bar_width(confidence: f64) -> f64 {
    (confidence * 100.0).clamp(0.0, 100.0)
}

/// Visual tone of a severity badge; unknown grades get the neutral tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Danger,
    Warning,
    Ok,
}

impl Tone {
    pub fn css_class(&self) -> &'static str {
        match self {
            Tone::Danger => "severity-high",
            Tone::Warning => "severity-medium",
            Tone::Ok => "severity-low",
        }
    }
}

pub fn severity_tone(severity: &Severity) -> Tone {
    match severity {
        Severity::High => Tone::Danger,
        Severity::Medium => Tone::Warning,
        _ => Tone::Ok,
    }
}

// 25.0 -> "25", 25.5 -> "25.5"; f64 Display never switches to exponent form
fn trim_number(value: f64) -> String {
    value.to_string()
}
