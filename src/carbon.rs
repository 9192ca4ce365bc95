//! Sequestration figures for the carbon panel: formation storage against
//! industrial emissions.

use serde::{Deserialize, Serialize};

/// Storage capacity of one geological formation, in million metric tons CO2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    pub name: String,
    pub capacity_mt: f64,
}

/// Annual emissions of one industry sector, in million tons per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustrySource {
    pub name: String,
    pub emissions_mt: f64,
    /// Capture capacity the sector could host, same unit.
    pub capacity_mt: f64,
}

pub fn total_capacity(formations: &[Formation]) -> f64 {
    formations.iter().map(|f| f.capacity_mt).sum()
}

pub fn total_emissions(sources: &[IndustrySource]) -> f64 {
    sources.iter().map(|s| s.emissions_mt).sum()
}

/// Years of storage at the current emission rate. `None` when nothing is
/// emitted.
pub fn years_of_capacity(capacity: f64, emissions: f64) -> Option<f64> {
    (emissions > 0.0).then(|| capacity / emissions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formation(name: &str, capacity_mt: f64) -> Formation {
        Formation { name: name.into(), capacity_mt }
    }

    fn source(name: &str, emissions_mt: f64, capacity_mt: f64) -> IndustrySource {
        IndustrySource { name: name.into(), emissions_mt, capacity_mt }
    }

    fn alabama() -> (Vec<Formation>, Vec<IndustrySource>) {
        let formations = vec![
            formation("Tuscaloosa Marine Shale", 850.0),
            formation("Black Warrior Basin", 620.0),
            formation("Chattanooga Shale", 480.0),
            formation("Knox Group", 390.0),
        ];
        let sources = vec![
            source("Steel Production", 2.4, 3.5),
            source("Chemical Plants", 1.8, 2.2),
            source("Cement", 1.2, 1.8),
            source("Power Generation", 3.1, 4.0),
            source("Refineries", 1.6, 2.1),
        ];
        (formations, sources)
    }

    #[test]
    fn panel_totals() {
        let (formations, sources) = alabama();
        assert_eq!(total_capacity(&formations), 2340.0);
        assert!((total_emissions(&sources) - 10.1).abs() < 1e-9);
        let years = years_of_capacity(total_capacity(&formations), total_emissions(&sources)).unwrap();
        assert_eq!(format!("{years:.1}"), "231.7");
    }

    #[test]
    fn no_emissions_means_no_horizon() {
        assert_eq!(years_of_capacity(2340.0, 0.0), None);
        assert_eq!(years_of_capacity(2340.0, -1.0), None);
        assert_eq!(total_emissions(&[]), 0.0);
        assert_eq!(total_capacity(&[]), 0.0);
    }

    #[test]
    fn rows_deserialize() {
        let f: Formation = serde_json::from_str(r#"{"name":"Knox Group","capacity_mt":390}"#).unwrap();
        assert_eq!(f.capacity_mt, 390.0);
    }
}
