//! Community report submission: draft validation and row shaping.
//!
//! A draft is what the form collects. `into_submission` turns it into the
//! rows the hosted `detailed_reports` / `report_measurements` tables expect.

use chrono::{DateTime, Utc};
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};

use crate::aqi::{classify, try_compute_index, AqiResult};
use crate::breakpoints::PollutantKind;
use crate::DashboardError;

pub const MIN_SEVERITY: u8 = 1;
pub const MAX_SEVERITY: u8 = 5;
pub const DEFAULT_SEVERITY: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportClassification {
    #[default]
    Hazard,
    Violation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    AirQuality,
    WaterQuality,
    SoilContamination,
    NoisePollution,
    HazardousWaste,
    IllegalDumping,
    EmissionsViolation,
    DischargeViolation,
    PermitViolation,
    Other,
}

impl ReportCategory {
    /// Measurement types the form suggests for this category.
    pub fn measurement_types(self) -> &'static [&'static str] {
        match self {
            ReportCategory::AirQuality => &[
                "PM2.5", "PM10", "Ozone", "NO2", "SO2", "CO", "Benzene", "VOC",
            ],
            ReportCategory::WaterQuality => &[
                "pH",
                "Dissolved Oxygen",
                "Turbidity",
                "PFAS",
                "Lead",
                "Nitrate",
                "Phosphate",
                "E. coli",
            ],
            ReportCategory::SoilContamination => &[
                "Lead",
                "Arsenic",
                "Mercury",
                "pH",
                "Organic Matter",
                "Nitrogen",
            ],
            ReportCategory::NoisePollution => &["Decibels (dB)", "Duration (minutes)"],
            ReportCategory::HazardousWaste => {
                &["Volume (gallons)", "Weight (lbs)", "Container Count"]
            }
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationType {
    Industrial,
    Commercial,
    Government,
    Residential,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Pending,
    Verified,
    Dismissed,
}

/// A measurement row as typed into the form; every field is free text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MeasurementDraft {
    pub measurement_type: String,
    pub value: String,
    pub unit: String,
    pub method: String,
}

/// Raw form state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportDraft {
    pub classification: ReportClassification,
    /// An unselected category arrives as `""`.
    #[serde(deserialize_with = "blank_as_none")]
    pub category: Option<ReportCategory>,
    pub address: String,
    pub city: String,
    pub county: String,
    pub region: String,
    pub latitude: String,
    pub longitude: String,
    pub organization_name: String,
    pub organization_type: OrganizationType,
    pub issue_description: String,
    pub impact_description: String,
    pub severity: u8,
    pub submitter_name: String,
    pub submitter_email: String,
    pub submitter_phone: String,
    pub is_anonymous: bool,
    pub follow_up_requested: bool,
    pub measurements: Vec<MeasurementDraft>,
}

impl Default for ReportDraft {
    fn default() -> Self {
        ReportDraft {
            classification: ReportClassification::default(),
            category: None,
            address: String::new(),
            city: String::new(),
            county: String::new(),
            region: String::new(),
            latitude: String::new(),
            longitude: String::new(),
            organization_name: String::new(),
            organization_type: OrganizationType::default(),
            issue_description: String::new(),
            impact_description: String::new(),
            severity: DEFAULT_SEVERITY,
            submitter_name: String::new(),
            submitter_email: String::new(),
            submitter_phone: String::new(),
            is_anonymous: false,
            follow_up_requested: false,
            measurements: Vec::new(),
        }
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<ReportCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) => ReportCategory::deserialize(code.into_deserializer()).map(Some),
    }
}

/// `report_measurements` row, minus the report id the backend assigns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub measurement_type: String,
    pub measurement_value: f64,
    pub measurement_unit: String,
    pub measurement_method: Option<String>,
}

/// `detailed_reports` row plus its measurements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSubmission {
    pub report_classification: ReportClassification,
    pub category: ReportCategory,
    /// WKT `POINT(lng lat)`.
    pub location: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub region: Option<String>,
    pub organization_name: Option<String>,
    pub organization_type: OrganizationType,
    pub issue_description: String,
    pub impact_description: Option<String>,
    pub severity: u8,
    pub submitter_name: Option<String>,
    pub submitter_email: Option<String>,
    pub submitter_phone: Option<String>,
    pub is_anonymous: bool,
    pub follow_up_requested: bool,
    pub status: ReportStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip)]
    pub measurements: Vec<Measurement>,
}

/// AQI reading derived from one air-quality measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementAqi<'a> {
    pub measurement: &'a Measurement,
    pub pollutant: PollutantKind,
    pub result: AqiResult,
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_finite(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn wkt_point(latitude: &str, longitude: &str) -> Option<String> {
    let lat = parse_finite(latitude)?;
    let lng = parse_finite(longitude)?;
    Some(format!("POINT({lng} {lat})"))
}

impl MeasurementDraft {
    fn is_complete(&self) -> bool {
        [&self.measurement_type, &self.value, &self.unit]
            .iter()
            .all(|f| !f.trim().is_empty())
    }

    fn into_measurement(self) -> Measurement {
        let value = parse_finite(&self.value).unwrap_or(0.0);
        Measurement {
            measurement_type: self.measurement_type.trim().to_string(),
            measurement_value: value,
            measurement_unit: self.unit.trim().to_string(),
            measurement_method: optional(&self.method),
        }
    }
}

impl ReportDraft {
    pub fn into_submission(self, now: DateTime<Utc>) -> Result<ReportSubmission, DashboardError> {
        let category = self.category.ok_or(DashboardError::MissingField("category"))?;
        if self.issue_description.trim().is_empty() {
            return Err(DashboardError::MissingField("issue_description"));
        }
        if !(MIN_SEVERITY..=MAX_SEVERITY).contains(&self.severity) {
            return Err(DashboardError::SeverityOutOfRange(self.severity));
        }

        let location = wkt_point(&self.latitude, &self.longitude);
        let (submitter_name, submitter_email, submitter_phone) = if self.is_anonymous {
            (None, None, None)
        } else {
            (
                optional(&self.submitter_name),
                optional(&self.submitter_email),
                optional(&self.submitter_phone),
            )
        };

        let drafted = self.measurements.len();
        let measurements: Vec<Measurement> = self
            .measurements
            .into_iter()
            .filter(MeasurementDraft::is_complete)
            .map(MeasurementDraft::into_measurement)
            .collect();
        if measurements.len() < drafted {
            tracing::debug!(
                dropped = drafted - measurements.len(),
                "incomplete measurement rows dropped"
            );
        }

        Ok(ReportSubmission {
            report_classification: self.classification,
            category,
            location,
            address: optional(&self.address),
            city: optional(&self.city),
            county: optional(&self.county),
            region: optional(&self.region),
            organization_name: optional(&self.organization_name),
            organization_type: self.organization_type,
            issue_description: self.issue_description.trim().to_string(),
            impact_description: optional(&self.impact_description),
            severity: self.severity,
            submitter_name,
            submitter_email,
            submitter_phone,
            is_anonymous: self.is_anonymous,
            follow_up_requested: self.follow_up_requested,
            status: ReportStatus::Pending,
            submitted_at: now,
            measurements,
        })
    }
}

impl ReportSubmission {
    /// AQI bundles for air-quality measurements of pollutants with a
    /// breakpoint table. Other measurements are skipped.
    pub fn aqi_annotations(&self) -> Vec<MeasurementAqi<'_>> {
        if self.category != ReportCategory::AirQuality {
            return Vec::new();
        }
        self.measurements
            .iter()
            .filter_map(|m| {
                let pollutant = PollutantKind::from(m.measurement_type.as_str());
                if !pollutant.has_table() {
                    return None;
                }
                match try_compute_index(m.measurement_value, &pollutant) {
                    Ok(index) => Some(MeasurementAqi {
                        measurement: m,
                        pollutant,
                        result: classify(index),
                    }),
                    Err(e) => {
                        tracing::warn!(measurement = %m.measurement_type, error = %e, "skipping AQI annotation");
                        None
                    }
                }
            })
            .collect()
    }

    pub fn worst_aqi(&self) -> Option<AqiResult> {
        self.aqi_annotations()
            .into_iter()
            .map(|a| a.result)
            .max_by_key(|r| r.value)
    }
}
