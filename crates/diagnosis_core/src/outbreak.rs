//! Outbreak map data
//!
//! Types for the `/outbreak/data` and `/outbreak/add` backend endpoints. The
//! disease label set is closed; map coordinates and severities are whatever
//! the backend stored.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const OUTBREAK_DATA_PATH: &str = "/outbreak/data";
pub const OUTBREAK_ADD_PATH: &str = "/outbreak/add";

/// Cotton disease classes known to the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CottonDisease {
    #[serde(rename = "Cotton___Bacterial_blight")]
    BacterialBlight,
    #[serde(rename = "Cotton___Verticillium_wilt")]
    VerticilliumWilt,
    #[serde(rename = "Cotton___Fusarium_wilt")]
    FusariumWilt,
    #[serde(rename = "Cotton___Alternaria_leaf_spot")]
    AlternariaLeafSpot,
    #[serde(rename = "Cotton___Anthracnose")]
    Anthracnose,
    #[serde(rename = "Cotton___Healthy")]
    Healthy,
}

impl CottonDisease {
    pub const ALL: [CottonDisease; 6] = [
        CottonDisease::BacterialBlight,
        CottonDisease::VerticilliumWilt,
        CottonDisease::FusariumWilt,
        CottonDisease::AlternariaLeafSpot,
        CottonDisease::Anthracnose,
        CottonDisease::Healthy,
    ];

    /// Class label as sent to and stored by the backend
    pub fn label(&self) -> &'static str {
        match self {
            CottonDisease::BacterialBlight => "Cotton___Bacterial_blight",
            CottonDisease::VerticilliumWilt => "Cotton___Verticillium_wilt",
            CottonDisease::FusariumWilt => "Cotton___Fusarium_wilt",
            CottonDisease::AlternariaLeafSpot => "Cotton___Alternaria_leaf_spot",
            CottonDisease::Anthracnose => "Cotton___Anthracnose",
            CottonDisease::Healthy => "Cotton___Healthy",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CottonDisease::BacterialBlight => "Bacterial blight",
            CottonDisease::VerticilliumWilt => "Verticillium wilt",
            CottonDisease::FusariumWilt => "Fusarium wilt",
            CottonDisease::AlternariaLeafSpot => "Alternaria leaf spot",
            CottonDisease::Anthracnose => "Anthracnose",
            CottonDisease::Healthy => "Healthy",
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, CottonDisease::Healthy)
    }
}

impl fmt::Display for CottonDisease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CottonDisease {
    type Err = CoreError;

    /// Accepts the class label or the display name, case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        CottonDisease::ALL
            .into_iter()
            .find(|d| {
                d.label().eq_ignore_ascii_case(wanted)
                    || d.display_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| CoreError::InvalidOutbreak(format!("unknown disease {wanted:?}")))
    }
}

/// One stored outbreak as returned by `/outbreak/data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutbreakPoint {
    pub lat: f64,
    pub lon: f64,
    /// Intensity (0.0-1.0), used as heat-map weight
    pub severity: f64,
    /// Disease class label; kept as text since stored data may predate the current set
    pub class: String,
}

impl OutbreakPoint {
    /// Healthy reports are drawn green, everything else red.
    /// Classes outside the known set count as healthy only if named so.
    pub fn is_healthy(&self) -> bool {
        match self.class.parse::<CottonDisease>() {
            Ok(disease) => disease.is_healthy(),
            Err(_) => self.class.to_lowercase().contains("healthy"),
        }
    }

    pub fn marker_color(&self) -> &'static str {
        if self.is_healthy() {
            "green"
        } else {
            "red"
        }
    }

    /// `Cotton___Fusarium_wilt` -> `Cotton Fusarium wilt`
    pub fn display_class(&self) -> String {
        self.class
            .split('_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A new outbreak to record via `/outbreak/add`
#[derive(Debug, Clone, PartialEq)]
pub struct OutbreakReport {
    place: String,
    disease: CottonDisease,
    severity: f64,
}

impl OutbreakReport {
    pub fn new(place: impl Into<String>, disease: CottonDisease, severity: f64) -> Result<Self> {
        let place = place.into().trim().to_string();
        if place.is_empty() {
            return Err(CoreError::InvalidOutbreak("place is required".to_string()));
        }
        if !(0.0..=1.0).contains(&severity) {
            return Err(CoreError::InvalidOutbreak(format!(
                "severity must be between 0 and 1, got {severity}"
            )));
        }
        Ok(Self {
            place,
            disease,
            severity,
        })
    }

    pub fn place(&self) -> &str {
        &self.place
    }

    pub fn disease(&self) -> CottonDisease {
        self.disease
    }

    pub fn severity(&self) -> f64 {
        self.severity
    }

    /// Form fields in the order the endpoint documents them
    pub fn form_fields(&self) -> [(&'static str, String); 3] {
        [
            ("place", self.place.clone()),
            ("disease", self.disease.label().to_string()),
            ("severity", self.severity.to_string()),
        ]
    }
}

impl Default for OutbreakReport {
    fn default() -> Self {
        Self {
            place: "Mumbai, Maharashtra".to_string(),
            disease: CottonDisease::ALL[0],
            severity: 0.5,
        }
    }
}

/// Body of `/outbreak/add`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutbreakAddResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<OutbreakPoint>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disease_labels_round_trip_through_serde() {
        let json = serde_json::to_string(&CottonDisease::AlternariaLeafSpot).unwrap();
        assert_eq!(json, r#""Cotton___Alternaria_leaf_spot""#);
    }

    #[test]
    fn test_disease_parses_label_or_display_name() {
        assert_eq!(
            "Cotton___Fusarium_wilt".parse::<CottonDisease>().unwrap(),
            CottonDisease::FusariumWilt
        );
        assert_eq!(
            "anthracnose".parse::<CottonDisease>().unwrap(),
            CottonDisease::Anthracnose
        );
        assert!("Late Blight".parse::<CottonDisease>().is_err());
    }

    #[test]
    fn test_report_rejects_out_of_range_severity() {
        assert!(OutbreakReport::new("Surat", CottonDisease::Healthy, 1.2).is_err());
        assert!(OutbreakReport::new("Surat", CottonDisease::Healthy, -0.1).is_err());
        assert!(OutbreakReport::new("  ", CottonDisease::Healthy, 0.3).is_err());
        assert!(OutbreakReport::new("Surat", CottonDisease::Healthy, 1.0).is_ok());
    }

    #[test]
    fn test_default_report() {
        let report = OutbreakReport::default();
        assert_eq!(report.place(), "Mumbai, Maharashtra");
        assert_eq!(report.disease(), CottonDisease::BacterialBlight);
        assert_eq!(report.severity(), 0.5);
    }

    #[test]
    fn test_point_marker_color_and_display() {
        let point: OutbreakPoint = serde_json::from_str(
            r#"{"lat": 19.07, "lon": 72.87, "severity": 0.4, "class": "Cotton___Healthy"}"#,
        )
        .unwrap();
        assert!(point.is_healthy());
        assert_eq!(point.marker_color(), "green");
        assert_eq!(point.display_class(), "Cotton Healthy");
    }

    #[test]
    fn test_add_response_error() {
        let response: OutbreakAddResponse =
            serde_json::from_str(r#"{"success": false, "error": "Could not geocode place"}"#)
                .unwrap();
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error.as_deref(), Some("Could not geocode place"));
    }

    #[test]
    fn test_point_health_uses_disease_set() {
        let point = |class: &str| OutbreakPoint {
            lat: 0.0,
            lon: 0.0,
            severity: 0.5,
            class: class.to_string(),
        };
        assert!(point("Healthy").is_healthy());
        assert!(!point("Cotton___Anthracnose").is_healthy());
        assert!(point("cotton_healthy_legacy").is_healthy());
        assert_eq!(point("Cotton___Verticillium_wilt").marker_color(), "red");
        assert!(CottonDisease::Healthy.is_healthy());
        assert!(!CottonDisease::FusariumWilt.is_healthy());
    }
}
