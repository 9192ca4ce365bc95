#![forbid(unsafe_code)]

//! Environmental dashboard core: AQI breakpoint interpolation and
//! classification, plus the curriculum, report, violation, and water-quality
//! logic the dashboard widgets sit on.

use thiserror::Error;

pub mod aqi;
pub mod breakpoints;
pub mod carbon;
pub mod config;
pub mod curriculum;
pub mod reading;
pub mod reports;
pub mod violations;
pub mod water;

pub use aqi::{assess, classify, compute_index, try_compute_index, AqiLevel, AqiResult, Caution, AQI_MAX};
pub use breakpoints::{Breakpoint, BreakpointTable, PollutantKind};
pub use config::DashboardConfig;
pub use curriculum::{ApChemUnit, CurriculumCatalog, CurriculumMapping, MonitoringModule};

/// Errors surfaced by dashboard ingestion and validation paths.
///
/// The AQI functions themselves never fail; only the strict ingestion
/// variant (`try_compute_index`) reports bad concentrations.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("concentration must be finite and non-negative, got {0}")]
    InvalidConcentration(f64),
    #[error("required field is blank: {0}")]
    MissingField(&'static str),
    #[error("severity {0} is outside 1..=5")]
    SeverityOutOfRange(u8),
    #[error("unknown curriculum unit: {0}")]
    UnknownUnit(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("row {line}: {reason}")]
    Row { line: usize, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
