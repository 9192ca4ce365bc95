//! Readings file ingestion for the command-line driver.
//!
//! Rows are `site,pollutant,concentration,unit`, split on commas (no quoting).

use std::fmt;
use std::io::BufRead;

use crate::aqi::{classify, try_compute_index, AqiResult};
use crate::breakpoints::PollutantKind;
use crate::config::DashboardConfig;
use crate::water::{exceedances, percent_of_limit};
use crate::DashboardError;

#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub site: String,
    pub pollutant: PollutantKind,
    pub concentration: f64,
    pub unit: String,
}

impl Reading {
    /// Strict AQI for this reading. Unrecognized pollutants are scored on
    /// the pm25 table.
    pub fn assess(&self) -> Result<AqiResult, DashboardError> {
        let index = try_compute_index(self.concentration, &self.pollutant)?;
        Ok(classify(index))
    }

    pub fn is_pfas(&self) -> bool {
        self.pollutant.code().eq_ignore_ascii_case("pfas")
    }
}

/// Parse one CSV row. `line` is 1-based and only used for error context.
pub fn parse_csv_row(raw: &str, line: usize) -> Result<Reading, DashboardError> {
    let parts: Vec<&str> = raw.split(',').map(|s| s.trim()).collect();
    if parts.len() != 4 {
        return Err(DashboardError::Row {
            line,
            reason: format!("expected 4 columns, found {}", parts.len()),
        });
    }
    if parts[0].is_empty() {
        return Err(DashboardError::Row {
            line,
            reason: "site is blank".into(),
        });
    }
    let concentration: f64 = parts[2].parse().map_err(|_| DashboardError::Row {
        line,
        reason: format!("concentration {:?} is not a number", parts[2]),
    })?;
    Ok(Reading {
        site: parts[0].to_string(),
        pollutant: PollutantKind::from(parts[1]),
        concentration,
        unit: parts[3].to_string(),
    })
}

fn is_header(raw: &str) -> bool {
    raw.split(',')
        .next()
        .is_some_and(|first| first.trim().eq_ignore_ascii_case("site"))
}

/// Read every row. A header is recognised on the first line that is neither
/// blank nor a `#` comment. I/O failures abort; malformed rows are collected and
/// logged so one bad line does not sink the whole file.
pub fn parse_readings<R: BufRead>(reader: R) -> Result<(Vec<Reading>, Vec<DashboardError>), DashboardError> {
    let mut readings = Vec::new();
    let mut rejected = Vec::new();
    let mut seen_content = false;
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let first = !seen_content;
        seen_content = true;
        if first && is_header(trimmed) {
            continue;
        }
        match parse_csv_row(trimmed, idx + 1) {
            Ok(r) => readings.push(r),
            Err(e) => {
                tracing::warn!(error = %e, "rejected reading row");
                rejected.push(e);
            }
        }
    }
    Ok((readings, rejected))
}

/// What a readings file scores to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Aqi(AqiResult),
    /// PFAS share of the configured limit, in percent.
    PfasPercent(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredReading<'a> {
    pub reading: &'a Reading,
    pub outcome: Outcome,
}

impl fmt::Display for ScoredReading<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.reading;
        match self.outcome {
            Outcome::Aqi(result) => write!(
                f,
                "{},{},{},{},{}",
                r.site, r.pollutant, r.concentration, result.value, result.level
            ),
            Outcome::PfasPercent(pct) => write!(
                f,
                "{},{},{},{:.1}% of limit,-",
                r.site, r.pollutant, r.concentration, pct
            ),
        }
    }
}

/// Per-reading rows plus the closing lines of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary<'a> {
    pub rows: Vec<ScoredReading<'a>>,
    /// Highest AQI seen; the earliest reading wins a tie.
    pub worst: Option<(&'a Reading, AqiResult)>,
    /// Readings that failed strict assessment.
    pub skipped: usize,
    pub benzene_threshold: f64,
    pub benzene_above: usize,
    pub benzene_total: usize,
}

/// Score every reading. PFAS is measured against the configured limit
/// rather than an AQI table; readings the strict variant rejects are
/// skipped and counted.
pub fn summarize<'a>(readings: &'a [Reading], config: &DashboardConfig) -> RunSummary<'a> {
    let mut rows = Vec::with_capacity(readings.len());
    let mut worst: Option<(&Reading, AqiResult)> = None;
    let mut skipped = 0;

    for reading in readings {
        if reading.is_pfas() {
            let pct = percent_of_limit(reading.concentration, config.pfas_limit_ppt);
            rows.push(ScoredReading { reading, outcome: Outcome::PfasPercent(pct) });
            continue;
        }
        match reading.assess() {
            Ok(result) => {
                if !worst.is_some_and(|(_, w)| w.value >= result.value) {
                    worst = Some((reading, result));
                }
                rows.push(ScoredReading { reading, outcome: Outcome::Aqi(result) });
            }
            Err(e) => {
                tracing::warn!(site = %reading.site, error = %e, "skipping reading");
                skipped += 1;
            }
        }
    }

    let benzene: Vec<f64> = readings
        .iter()
        .filter(|r| r.pollutant == PollutantKind::Benzene)
        .map(|r| r.concentration)
        .collect();

    RunSummary {
        rows,
        worst,
        skipped,
        benzene_threshold: config.benzene_threshold_ugm3,
        benzene_above: exceedances(&benzene, config.benzene_threshold_ugm3),
        benzene_total: benzene.len(),
    }
}

impl fmt::Display for RunSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "site,pollutant,concentration,aqi,level")?;
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        if let Some((reading, w)) = self.worst {
            writeln!(
                f,
                "# worst: {} {} ({}) at {} - {}",
                w.value,
                w.description,
                w.color,
                reading.site,
                w.cautionary_statement.as_str()
            )?;
        }
        write!(
            f,
            "# benzene above {}: {} of {}",
            self.benzene_threshold, self.benzene_above, self.benzene_total
        )
    }
}
