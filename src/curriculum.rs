//! Curriculum mappings: admin-curated chemistry popups tied to dashboard metrics.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::DashboardError;

/// AP Chemistry units the dashboard can filter by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ApChemUnit {
    Unit3_1,
    Unit3_2,
    Unit3_3,
    Unit5,
    Unit7,
}

impl ApChemUnit {
    pub const ALL: [ApChemUnit; 5] = [
        ApChemUnit::Unit3_1,
        ApChemUnit::Unit3_2,
        ApChemUnit::Unit3_3,
        ApChemUnit::Unit5,
        ApChemUnit::Unit7,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ApChemUnit::Unit3_1 => "Unit 3.1",
            ApChemUnit::Unit3_2 => "Unit 3.2",
            ApChemUnit::Unit3_3 => "Unit 3.3",
            ApChemUnit::Unit5 => "Unit 5",
            ApChemUnit::Unit7 => "Unit 7",
        }
    }
}

impl FromStr for ApChemUnit {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        ApChemUnit::ALL
            .into_iter()
            .find(|u| u.code() == code)
            .ok_or_else(|| DashboardError::UnknownUnit(code.to_string()))
    }
}

impl TryFrom<String> for ApChemUnit {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ApChemUnit> for String {
    fn from(unit: ApChemUnit) -> Self {
        unit.code().to_string()
    }
}

impl fmt::Display for ApChemUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One row of the hosted `curriculum_mapping` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumMapping {
    pub id: Uuid,
    pub unit_code: String,
    pub topic_title: String,
    pub popup_content: String,
    pub target_metric: String,
    pub chemistry_concept: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CurriculumMapping {
    pub fn belongs_to(&self, unit: ApChemUnit) -> bool {
        self.unit_code == unit.code()
    }
}

/// Monitoring panels that host metric widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonitoringModule {
    #[serde(rename = "cokewatch")]
    CokeWatch,
    #[serde(rename = "pfas")]
    PfasCheck,
    #[serde(rename = "carbon")]
    CarbonSink,
}

const COKEWATCH_METRICS: &[&str] = &[
    "aqi",
    "benzene",
    "wind",
    "co",
    "no2",
    "ozone",
    "pm25",
    "so2",
    "voc",
    "temperature",
];

const PFAS_METRICS: &[&str] = &[
    "pfas",
    "epa_limit",
    "filter_life",
    "ph",
    "lead",
    "heavy_metals",
    "turbidity",
    "dissolved_oxygen",
];

const CARBON_METRICS: &[&str] = &[
    "carbon",
    "emissions",
    "carbon_capture",
    "greenhouse_gas",
    "atmospheric",
];

impl MonitoringModule {
    pub fn metrics(self) -> &'static [&'static str] {
        match self {
            MonitoringModule::CokeWatch => COKEWATCH_METRICS,
            MonitoringModule::PfasCheck => PFAS_METRICS,
            MonitoringModule::CarbonSink => CARBON_METRICS,
        }
    }

    /// The module whose metric family lists `metric`, if any.
    pub fn family_of(metric: &str) -> Option<Self> {
        [
            MonitoringModule::CokeWatch,
            MonitoringModule::PfasCheck,
            MonitoringModule::CarbonSink,
        ]
        .into_iter()
        .find(|m| m.metrics().contains(&metric))
    }
}

/// Route a metric to its module; unlisted metrics land on CokeWatch.
pub fn module_for_metric(metric: &str) -> MonitoringModule {
    MonitoringModule::family_of(metric).unwrap_or(MonitoringModule::CokeWatch)
}

/// Widget highlight predicate.
pub fn is_highlighted(highlighted: Option<&str>, metric: &str) -> bool {
    highlighted == Some(metric)
}

/// A unit's mappings split by the module that shows them.
#[derive(Debug, Default, PartialEq)]
pub struct ModuleMetrics<'a> {
    pub cokewatch: Vec<&'a CurriculumMapping>,
    pub pfas: Vec<&'a CurriculumMapping>,
    pub carbon: Vec<&'a CurriculumMapping>,
}

impl ModuleMetrics<'_> {
    pub fn total(&self) -> usize {
        self.cokewatch.len() + self.pfas.len() + self.carbon.len()
    }

    pub fn count_for(&self, module: MonitoringModule) -> usize {
        match module {
            MonitoringModule::CokeWatch => self.cokewatch.len(),
            MonitoringModule::PfasCheck => self.pfas.len(),
            MonitoringModule::CarbonSink => self.carbon.len(),
        }
    }
}

/// All known mappings, kept ordered by unit code.
#[derive(Debug, Clone, Default)]
pub struct CurriculumCatalog {
    mappings: Vec<CurriculumMapping>,
}

impl CurriculumCatalog {
    pub fn from_rows(mut rows: Vec<CurriculumMapping>) -> Self {
        rows.sort_by(|a, b| a.unit_code.cmp(&b.unit_code));
        CurriculumCatalog { mappings: rows }
    }

    pub fn insert(&mut self, mapping: CurriculumMapping) {
        let at = self
            .mappings
            .partition_point(|m| m.unit_code <= mapping.unit_code);
        self.mappings.insert(at, mapping);
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurriculumMapping> {
        self.mappings.iter()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.mappings.iter().filter(|m| m.is_active).count()
    }

    /// Popup content for a widget. Nothing is shown until a unit is picked.
    pub fn educational_content(
        &self,
        target_metric: &str,
        active_unit: Option<ApChemUnit>,
    ) -> Option<&CurriculumMapping> {
        let unit = active_unit?;
        self.for_unit(unit)
            .find(|m| m.target_metric == target_metric)
    }

    pub fn has_educational_content(&self, target_metric: &str, active_unit: Option<ApChemUnit>) -> bool {
        self.educational_content(target_metric, active_unit).is_some()
    }

    pub fn for_unit(&self, unit: ApChemUnit) -> impl Iterator<Item = &CurriculumMapping> {
        self.mappings
            .iter()
            .filter(move |m| m.is_active && m.belongs_to(unit))
    }

    /// `None` when the unit has no active mappings at all.
    pub fn metrics_by_module(&self, unit: ApChemUnit) -> Option<ModuleMetrics<'_>> {
        let mut grouped = ModuleMetrics::default();
        let mut seen = 0usize;
        for m in self.for_unit(unit) {
            seen += 1;
            match MonitoringModule::family_of(&m.target_metric) {
                Some(MonitoringModule::CokeWatch) => grouped.cokewatch.push(m),
                Some(MonitoringModule::PfasCheck) => grouped.pfas.push(m),
                Some(MonitoringModule::CarbonSink) => grouped.carbon.push(m),
                None => {}
            }
        }
        (seen > 0).then_some(grouped)
    }

    /// Admin view: every mapping (active or not) keyed by unit code.
    pub fn grouped_by_unit(&self) -> BTreeMap<&str, Vec<&CurriculumMapping>> {
        let mut out: BTreeMap<&str, Vec<&CurriculumMapping>> = BTreeMap::new();
        for m in &self.mappings {
            out.entry(m.unit_code.as_str()).or_default().push(m);
        }
        out
    }
}

/// Admin form payload for a new mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCurriculumMapping {
    pub unit_code: String,
    pub topic_title: String,
    pub popup_content: String,
    pub target_metric: String,
    pub chemistry_concept: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

fn required(value: &str, field: &'static str) -> Result<String, DashboardError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

impl NewCurriculumMapping {
    pub fn into_mapping(self, now: DateTime<Utc>) -> Result<CurriculumMapping, DashboardError> {
        let unit_code = required(&self.unit_code, "unit_code")?;
        let topic_title = required(&self.topic_title, "topic_title")?;
        let popup_content = required(&self.popup_content, "popup_content")?;
        let target_metric = required(&self.target_metric, "target_metric")?;
        let chemistry_concept = required(&self.chemistry_concept, "chemistry_concept")?;
        let unit: ApChemUnit = unit_code.parse()?;

        Ok(CurriculumMapping {
            id: Uuid::new_v4(),
            unit_code: unit.code().to_string(),
            topic_title,
            popup_content,
            target_metric,
            chemistry_concept,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 15, 9, 30, 0).unwrap()
    }

    fn mapping(unit: &str, metric: &str, active: bool) -> CurriculumMapping {
        CurriculumMapping {
            id: Uuid::new_v4(),
            unit_code: unit.into(),
            topic_title: format!("{metric} in {unit}"),
            popup_content: "content".into(),
            target_metric: metric.into(),
            chemistry_concept: "Intermolecular Forces".into(),
            is_active: active,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn catalog() -> CurriculumCatalog {
        CurriculumCatalog::from_rows(vec![
            mapping("Unit 5", "ozone", true),
            mapping("Unit 3.1", "benzene", true),
            mapping("Unit 3.1", "pfas", true),
            mapping("Unit 3.1", "carbon_capture", false),
            mapping("Unit 3.1", "mystery", true),
        ])
    }

    #[test]
    fn unit_codes_round_trip_through_serde() {
        let json = serde_json::to_string(&ApChemUnit::Unit3_2).unwrap();
        assert_eq!(json, "\"Unit 3.2\"");
        let unit: ApChemUnit = serde_json::from_str("\"Unit 7\"").unwrap();
        assert_eq!(unit, ApChemUnit::Unit7);
        assert!(serde_json::from_str::<ApChemUnit>("\"Unit 9\"").is_err());
    }

    #[test]
    fn metrics_route_to_modules() {
        assert_eq!(module_for_metric("benzene"), MonitoringModule::CokeWatch);
        assert_eq!(module_for_metric("filter_life"), MonitoringModule::PfasCheck);
        assert_eq!(module_for_metric("greenhouse_gas"), MonitoringModule::CarbonSink);
        assert_eq!(module_for_metric("unknown"), MonitoringModule::CokeWatch);
        assert_eq!(MonitoringModule::family_of("unknown"), None);
    }

    #[test]
    fn no_content_without_active_unit() {
        let c = catalog();
        assert!(c.educational_content("benzene", None).is_none());
        assert!(!c.has_educational_content("benzene", None));
    }

    #[test]
    fn content_matches_metric_and_unit() {
        let c = catalog();
        let hit = c
            .educational_content("benzene", Some(ApChemUnit::Unit3_1))
            .unwrap();
        assert_eq!(hit.target_metric, "benzene");
        assert!(c.educational_content("benzene", Some(ApChemUnit::Unit5)).is_none());
        // inactive rows never pop up
        assert!(c
            .educational_content("carbon_capture", Some(ApChemUnit::Unit3_1))
            .is_none());
    }

    #[test]
    fn groups_unit_metrics_by_module() {
        let c = catalog();
        let grouped = c.metrics_by_module(ApChemUnit::Unit3_1).unwrap();
        assert_eq!(grouped.cokewatch.len(), 1);
        assert_eq!(grouped.pfas.len(), 1);
        assert_eq!(grouped.carbon.len(), 0);
        // "mystery" belongs to no family
        assert_eq!(grouped.total(), 2);
        assert_eq!(grouped.count_for(MonitoringModule::PfasCheck), 1);
        assert!(c.metrics_by_module(ApChemUnit::Unit7).is_none());
    }

    #[test]
    fn catalog_stays_sorted_on_insert() {
        let mut c = catalog();
        c.insert(mapping("Unit 3.3", "lead", true));
        let codes: Vec<&str> = c.iter().map(|m| m.unit_code.as_str()).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
        assert_eq!(c.len(), 6);
        assert_eq!(c.active_count(), 5);
    }

    #[test]
    fn admin_grouping_includes_inactive_rows() {
        let c = catalog();
        let groups = c.grouped_by_unit();
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["Unit 3.1", "Unit 5"]);
        assert_eq!(groups["Unit 3.1"].len(), 4);
    }

    #[test]
    fn highlight_predicate() {
        assert!(is_highlighted(Some("pm25"), "pm25"));
        assert!(!is_highlighted(Some("pm25"), "o3"));
        assert!(!is_highlighted(None, "pm25"));
    }

    fn new_mapping() -> NewCurriculumMapping {
        NewCurriculumMapping {
            unit_code: "Unit 3.1".into(),
            topic_title: " Intermolecular Forces in Benzene ".into(),
            popup_content: "Benzene is nonpolar...".into(),
            target_metric: "benzene".into(),
            chemistry_concept: "Intermolecular Forces".into(),
            is_active: true,
        }
    }

    #[test]
    fn new_mapping_requires_every_field() {
        let mut blank = new_mapping();
        blank.popup_content = "   ".into();
        assert!(matches!(
            blank.into_mapping(ts()),
            Err(DashboardError::MissingField("popup_content"))
        ));

        let mut bad_unit = new_mapping();
        bad_unit.unit_code = "Unit 12".into();
        assert!(matches!(
            bad_unit.into_mapping(ts()),
            Err(DashboardError::UnknownUnit(_))
        ));
    }

    #[test]
    fn new_mapping_builds_row() {
        let m = new_mapping().into_mapping(ts()).unwrap();
        assert_eq!(m.topic_title, "Intermolecular Forces in Benzene");
        assert_eq!(m.created_at, m.updated_at);
        assert!(m.belongs_to(ApChemUnit::Unit3_1));
    }

    #[test]
    fn new_mapping_defaults_to_active() {
        let payload = r#"{"unit_code":"Unit 5","topic_title":"t","popup_content":"p",
            "target_metric":"ph","chemistry_concept":"Equilibrium"}"#;
        let parsed: NewCurriculumMapping = serde_json::from_str(payload).unwrap();
        assert!(parsed.is_active);
    }
}
