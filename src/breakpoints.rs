//! Pollutant kinds and the EPA-style breakpoint tables behind them.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One table row: the concentration band `[c_low, c_high]` maps linearly
/// onto the index band `[i_low, i_high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub c_low: f64,
    pub c_high: f64,
    pub i_low: u16,
    pub i_high: u16,
}

const fn bp(c_low: f64, c_high: f64, i_low: u16, i_high: u16) -> Breakpoint {
    Breakpoint {
        c_low,
        c_high,
        i_low,
        i_high,
    }
}

/// Breakpoint rows for one pollutant, ascending by concentration.
#[derive(Debug, Clone, Copy)]
pub struct BreakpointTable {
    rows: &'static [Breakpoint],
}

impl BreakpointTable {
    pub fn rows(&self) -> &'static [Breakpoint] {
        self.rows
    }

    /// Lowest concentration the table covers.
    pub fn floor(&self) -> f64 {
        self.rows.first().map_or(0.0, |r| r.c_low)
    }

    /// Highest concentration the table covers; anything above saturates.
    pub fn ceiling(&self) -> f64 {
        self.rows.last().map_or(0.0, |r| r.c_high)
    }

    /// Rows are non-degenerate, strictly ascending, and non-overlapping in
    /// both concentration and index.
    pub fn is_well_formed(&self) -> bool {
        !self.rows.is_empty()
            && self
                .rows
                .iter()
                .all(|r| r.c_low < r.c_high && r.i_low < r.i_high)
            && self
                .rows
                .windows(2)
                .all(|w| w[0].c_high < w[1].c_low && w[0].i_high < w[1].i_low)
    }
}

/// Fine particulate matter, µg/m³.
pub static PM25: BreakpointTable = BreakpointTable {
    rows: &[
        bp(0.0, 12.0, 0, 50),
        bp(12.1, 35.4, 51, 100),
        bp(35.5, 55.4, 101, 150),
        bp(55.5, 150.4, 151, 200),
        bp(150.5, 250.4, 201, 300),
        bp(250.5, 500.0, 301, 500),
    ],
};

/// Coarse particulate matter, µg/m³.
pub static PM10: BreakpointTable = BreakpointTable {
    rows: &[
        bp(0.0, 54.0, 0, 50),
        bp(55.0, 154.0, 51, 100),
        bp(155.0, 254.0, 101, 150),
        bp(255.0, 354.0, 151, 200),
        bp(355.0, 424.0, 201, 300),
        bp(425.0, 604.0, 301, 500),
    ],
};

/// Ozone, ppb. The table stops at 300; higher readings saturate to 500.
pub static OZONE: BreakpointTable = BreakpointTable {
    rows: &[
        bp(0.0, 54.0, 0, 50),
        bp(55.0, 70.0, 51, 100),
        bp(71.0, 85.0, 101, 150),
        bp(86.0, 105.0, 151, 200),
        bp(106.0, 200.0, 201, 300),
    ],
};

/// Benzene, µg/m³.
pub static BENZENE: BreakpointTable = BreakpointTable {
    rows: &[
        bp(0.0, 5.0, 0, 50),
        bp(5.1, 10.0, 51, 100),
        bp(10.1, 20.0, 101, 150),
        bp(20.1, 40.0, 151, 200),
        bp(40.1, 80.0, 201, 300),
        bp(80.1, 200.0, 301, 500),
    ],
};

/// Which breakpoint table a reading is scored against.
///
/// Parsing never fails: names without a table of their own (NO2, SO2, CO,
/// free text) are kept as `Unrecognized` and scored on the pm25 table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PollutantKind {
    Pm25,
    Pm10,
    Ozone,
    Benzene,
    Unrecognized(String),
}

impl PollutantKind {
    pub fn code(&self) -> &str {
        match self {
            PollutantKind::Pm25 => "pm25",
            PollutantKind::Pm10 => "pm10",
            PollutantKind::Ozone => "o3",
            PollutantKind::Benzene => "benzene",
            PollutantKind::Unrecognized(name) => name,
        }
    }

    /// True when the kind has a breakpoint table of its own.
    pub fn has_table(&self) -> bool {
        !matches!(self, PollutantKind::Unrecognized(_))
    }

    /// Table used for scoring. Kinds without their own table share pm25.
    pub fn table(&self) -> &'static BreakpointTable {
        match self {
            PollutantKind::Pm25 => &PM25,
            PollutantKind::Pm10 => &PM10,
            PollutantKind::Ozone => &OZONE,
            PollutantKind::Benzene => &BENZENE,
            PollutantKind::Unrecognized(_) => &PM25,
        }
    }
}

impl From<&str> for PollutantKind {
    fn from(raw: &str) -> Self {
        let name = raw.trim();
        match name.to_ascii_lowercase().as_str() {
            "pm25" | "pm2.5" | "pm2_5" => PollutantKind::Pm25,
            "pm10" => PollutantKind::Pm10,
            "o3" | "ozone" => PollutantKind::Ozone,
            "benzene" | "c6h6" => PollutantKind::Benzene,
            _ => PollutantKind::Unrecognized(name.to_string()),
        }
    }
}

impl From<String> for PollutantKind {
    fn from(raw: String) -> Self {
        PollutantKind::from(raw.as_str())
    }
}

impl From<PollutantKind> for String {
    fn from(kind: PollutantKind) -> Self {
        match kind {
            PollutantKind::Unrecognized(name) => name,
            known => known.code().to_string(),
        }
    }
}

impl FromStr for PollutantKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PollutantKind::from(s))
    }
}

impl fmt::Display for PollutantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
