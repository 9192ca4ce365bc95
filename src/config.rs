//! Dashboard configuration, read from a JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::DashboardError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// EPA PFAS limit, parts per trillion.
    pub pfas_limit_ppt: f64,
    /// Benzene chart threshold, µg/m³.
    pub benzene_threshold_ugm3: f64,
    /// `tracing_subscriber` filter directive; `RUST_LOG` wins when set.
    pub log_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            pfas_limit_ppt: 70.0,
            benzene_threshold_ugm3: 15.0,
            log_filter: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        tracing::debug!(path = %path.display(), "loaded dashboard config");
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DashboardError> {
        let config: DashboardConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if !self.pfas_limit_ppt.is_finite() || self.pfas_limit_ppt <= 0.0 {
            return Err(DashboardError::Config(format!(
                "pfas_limit_ppt must be positive, got {}",
                self.pfas_limit_ppt
            )));
        }
        if !self.benzene_threshold_ugm3.is_finite() || self.benzene_threshold_ugm3 < 0.0 {
            return Err(DashboardError::Config(format!(
                "benzene_threshold_ugm3 must be non-negative, got {}",
                self.benzene_threshold_ugm3
            )));
        }
        Ok(())
    }

    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let c = DashboardConfig::default();
        assert_eq!(c.pfas_limit_ppt, 70.0);
        assert_eq!(c.benzene_threshold_ugm3, 15.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn missing_keys_take_defaults() {
        let c = DashboardConfig::from_json_str(r#"{"pfas_limit_ppt": 4.0}"#).unwrap();
        assert_eq!(c.pfas_limit_ppt, 4.0);
        assert_eq!(c.log_filter, "info");
    }

    #[test]
    fn rejects_bad_limits() {
        assert!(matches!(
            DashboardConfig::from_json_str(r#"{"pfas_limit_ppt": 0}"#),
            Err(DashboardError::Config(_))
        ));
        assert!(matches!(
            DashboardConfig::from_json_str(r#"{"benzene_threshold_ugm3": -1}"#),
            Err(DashboardError::Config(_))
        ));
        assert!(matches!(
            DashboardConfig::from_json_str("not json"),
            Err(DashboardError::Json(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"benzene_threshold_ugm3": 9.5, "log_filter": "debug"}}"#).unwrap();
        let c = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(c.benzene_threshold_ugm3, 9.5);
        assert_eq!(c.log_filter, "debug");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            DashboardConfig::load(dir.path().join("absent.json")),
            Err(DashboardError::Io(_))
        ));
    }
}
