//! Water-quality gauges: PFAS against the EPA limit, filter wear, and
//! threshold exceedance counts for the trend charts.

use serde::{Deserialize, Serialize};

/// Share of `limit` reached by `level`, in percent. A non-positive limit
/// reads as 0.
pub fn percent_of_limit(level: f64, limit: f64) -> f64 {
    if limit <= 0.0 {
        0.0
    } else {
        level / limit * 100.0
    }
}

/// Remaining filter life in percent, floored at 0.
pub fn filter_life_percent(usage: f64, capacity: f64) -> f64 {
    if capacity <= 0.0 {
        return 0.0;
    }
    (100.0 - usage / capacity * 100.0).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementWindow {
    Soon,
    TwoToThreeWeeks,
    OneToTwoMonths,
}

impl ReplacementWindow {
    pub fn from_life(percent: f64) -> Self {
        if percent < 20.0 {
            ReplacementWindow::Soon
        } else if percent < 50.0 {
            ReplacementWindow::TwoToThreeWeeks
        } else {
            ReplacementWindow::OneToTwoMonths
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReplacementWindow::Soon => "Soon",
            ReplacementWindow::TwoToThreeWeeks => "In 2-3 weeks",
            ReplacementWindow::OneToTwoMonths => "In 1-2 months",
        }
    }
}

/// Readings strictly above `threshold`.
pub fn exceedances(readings: &[f64], threshold: f64) -> usize {
    readings.iter().filter(|&&r| r > threshold).count()
}
