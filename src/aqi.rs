//! AQI computation: breakpoint interpolation and severity classification.
//!
//! Both entry points are pure. Rounding is half away from zero (`f64::round`).

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::breakpoints::{Breakpoint, PollutantKind};
use crate::DashboardError;

/// Largest index the scale reports; readings above a table saturate here.
pub const AQI_MAX: u16 = 500;

/// Convert a concentration into a 0..=500 index.
///
/// - unrecognized kinds use the pm25 table
/// - readings above the table (and NaN) saturate to [`AQI_MAX`]
/// - negative readings clamp to the table floor
/// - readings in the gap between two rows take the lower row's top index
pub fn compute_index(concentration: f64, kind: &PollutantKind) -> u16 {
    if !kind.has_table() {
        tracing::debug!(pollutant = %kind, "no breakpoint table, using pm25");
    }
    let table = kind.table();
    if concentration.is_nan() {
        tracing::debug!(pollutant = %kind, "NaN concentration, saturating");
        return AQI_MAX;
    }
    let c = concentration.max(table.floor());

    let mut previous: Option<&Breakpoint> = None;
    for row in table.rows() {
        if c <= row.c_high {
            if c >= row.c_low {
                return interpolate(row, c);
            }
            return previous.map_or(row.i_low, |p| p.i_high);
        }
        previous = Some(row);
    }

    tracing::debug!(pollutant = %kind, concentration, "above breakpoint table, saturating");
    AQI_MAX
}

fn interpolate(row: &Breakpoint, c: f64) -> u16 {
    let slope = f64::from(row.i_high - row.i_low) / (row.c_high - row.c_low);
    let index = slope * (c - row.c_low) + f64::from(row.i_low);
    index.round().clamp(0.0, f64::from(AQI_MAX)) as u16
}

/// Strict variant for ingestion: rejects readings that `compute_index`
/// would otherwise clamp or saturate silently.
pub fn try_compute_index(concentration: f64, kind: &PollutantKind) -> Result<u16, DashboardError> {
    if !concentration.is_finite() || concentration < 0.0 {
        return Err(DashboardError::InvalidConcentration(concentration));
    }
    Ok(compute_index(concentration, kind))
}

/// `classify(compute_index(..))`.
pub fn assess(concentration: f64, kind: &PollutantKind) -> AqiResult {
    classify(compute_index(concentration, kind))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiLevel {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiLevel {
    pub const ALL: [AqiLevel; 6] = [
        AqiLevel::Good,
        AqiLevel::Moderate,
        AqiLevel::UnhealthySensitive,
        AqiLevel::Unhealthy,
        AqiLevel::VeryUnhealthy,
        AqiLevel::Hazardous,
    ];

    /// Boundaries are inclusive on the lower level: 50 is good, 51 moderate.
    pub fn from_index(index: u16) -> Self {
        match index {
            0..=50 => AqiLevel::Good,
            51..=100 => AqiLevel::Moderate,
            101..=150 => AqiLevel::UnhealthySensitive,
            151..=200 => AqiLevel::Unhealthy,
            201..=300 => AqiLevel::VeryUnhealthy,
            _ => AqiLevel::Hazardous,
        }
    }

    /// Highest index still in this level; `None` for hazardous.
    pub fn upper_bound(self) -> Option<u16> {
        match self {
            AqiLevel::Good => Some(50),
            AqiLevel::Moderate => Some(100),
            AqiLevel::UnhealthySensitive => Some(150),
            AqiLevel::Unhealthy => Some(200),
            AqiLevel::VeryUnhealthy => Some(300),
            AqiLevel::Hazardous => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AqiLevel::Good => "good",
            AqiLevel::Moderate => "moderate",
            AqiLevel::UnhealthySensitive => "unhealthy_sensitive",
            AqiLevel::Unhealthy => "unhealthy",
            AqiLevel::VeryUnhealthy => "very_unhealthy",
            AqiLevel::Hazardous => "hazardous",
        }
    }

    pub fn guidance(self) -> &'static Guidance {
        match self {
            AqiLevel::Good => &GOOD,
            AqiLevel::Moderate => &MODERATE,
            AqiLevel::UnhealthySensitive => &UNHEALTHY_SENSITIVE,
            AqiLevel::Unhealthy => &UNHEALTHY,
            AqiLevel::VeryUnhealthy => &VERY_UNHEALTHY,
            AqiLevel::Hazardous => &HAZARDOUS,
        }
    }
}

impl fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cautionary statement for a level. `NoneRequired` is a real answer
/// ("no caution needed"), not a missing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caution {
    NoneRequired,
    Advise(&'static str),
}

impl Caution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Caution::NoneRequired => "None",
            Caution::Advise(text) => text,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Caution::Advise(_))
    }
}

impl Serialize for Caution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Static display bundle attached to each level.
#[derive(Debug, PartialEq, Eq)]
pub struct Guidance {
    pub color: &'static str,
    pub description: &'static str,
    pub health_implications: &'static str,
    pub cautionary_statement: Caution,
}

static GOOD: Guidance = Guidance {
    color: "#22c55e",
    description: "Good",
    health_implications: "Air quality is satisfactory, and air pollution poses little or no risk.",
    cautionary_statement: Caution::NoneRequired,
};

static MODERATE: Guidance = Guidance {
    color: "#fbbf24",
    description: "Moderate",
    health_implications: "Air quality is acceptable. However, there may be a risk for some people.",
    cautionary_statement: Caution::Advise(
        "Unusually sensitive people should consider limiting prolonged outdoor exertion.",
    ),
};

static UNHEALTHY_SENSITIVE: Guidance = Guidance {
    color: "#f97316",
    description: "Unhealthy for Sensitive Groups",
    health_implications: "Members of sensitive groups may experience health effects.",
    cautionary_statement: Caution::Advise(
        "Active children and adults, and people with respiratory disease should limit prolonged outdoor exertion.",
    ),
};

static UNHEALTHY: Guidance = Guidance {
    color: "#ef4444",
    description: "Unhealthy",
    health_implications: "Some members of the general public may experience health effects.",
    cautionary_statement: Caution::Advise(
        "Active children and adults, and people with respiratory disease should avoid prolonged outdoor exertion.",
    ),
};

static VERY_UNHEALTHY: Guidance = Guidance {
    color: "#a855f7",
    description: "Very Unhealthy",
    health_implications: "Health alert: The risk of health effects is increased for everyone.",
    cautionary_statement: Caution::Advise("Everyone should avoid prolonged outdoor exertion."),
};

static HAZARDOUS: Guidance = Guidance {
    color: "#7f1d1d",
    description: "Hazardous",
    health_implications: "Health warning of emergency conditions: everyone is more likely to be affected.",
    cautionary_statement: Caution::Advise("Everyone should avoid all outdoor exertion."),
};

/// Classification bundle handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AqiResult {
    pub value: u16,
    pub level: AqiLevel,
    pub color: &'static str,
    pub description: &'static str,
    pub health_implications: &'static str,
    pub cautionary_statement: Caution,
}

/// Map an index onto its level and display bundle. Total over `u16`;
/// everything above 300 is hazardous.
pub fn classify(index: u16) -> AqiResult {
    let level = AqiLevel::from_index(index);
    let g = level.guidance();
    AqiResult {
        value: index,
        level,
        color: g.color,
        description: g.description,
        health_implications: g.health_implications,
        cautionary_statement: g.cautionary_statement,
    }
}
