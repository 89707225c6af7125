use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format used by dataset tokens and CLI arguments.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` token. Surrounding whitespace is ignored.
pub fn parse_date(token: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(token.trim(), DATE_FORMAT).ok()
}

/// An administrative area (state or union territory).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Region {
    /// Display name, also the dataset key.
    pub name: String,
    /// Short code used by boundary geometry (e.g. "MH"). `None` for names missing from the table.
    pub code: Option<String>,
}

impl Region {
    /// Build a region from its display name, looking the code up in the static table.
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            code: crate::regions::code_for(name).map(str::to_string),
        }
    }

    /// Code if known, otherwise the display name.
    pub fn label(&self) -> &str {
        self.code.as_deref().unwrap_or(&self.name)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({})", self.name, code),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Which of the two series an observation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// Recorded observations; authoritative.
    Historical,
    /// Model predictions; used only where history has no entry.
    Forecast,
}

impl SeriesKind {
    /// Accepts both the dataset vocabulary (`past`, `prediction`) and ours.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "historical" | "past" | "actual" => Some(SeriesKind::Historical),
            "forecast" | "prediction" | "predicted" => Some(SeriesKind::Forecast),
            _ => None,
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKind::Historical => write!(f, "historical"),
            SeriesKind::Forecast => write!(f, "forecast"),
        }
    }
}

/// One `(date, value)` pair. Serialized as a two-element array, like the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(NaiveDate, f64)", into = "(NaiveDate, f64)")]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

impl From<(NaiveDate, f64)> for Observation {
    fn from((date, value): (NaiveDate, f64)) -> Self {
        Self { date, value }
    }
}

impl From<Observation> for (NaiveDate, f64) {
    fn from(o: Observation) -> Self {
        (o.date, o.value)
    }
}

/// Ordered observations of a single kind for a single region. May be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub kind: SeriesKind,
    pub points: Vec<Observation>,
}

impl TimeSeries {
    pub fn new(kind: SeriesKind, points: Vec<Observation>) -> Self {
        Self { kind, points }
    }

    pub fn empty(kind: SeriesKind) -> Self {
        Self::new(kind, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.points.iter()
    }

    /// Exact-date lookup. Does not assume the series is sorted.
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.points.iter().find(|o| o.date == date).map(|o| o.value)
    }

    /// Last entry in stored order.
    pub fn last(&self) -> Option<&Observation> {
        self.points.last()
    }

    /// Final `n` entries, or all of them if the series is shorter.
    pub fn tail(&self, n: usize) -> &[Observation] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}

/// Historical and forecast series for one region. Built once at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
    pub region: Region,
    pub historical: TimeSeries,
    pub forecast: TimeSeries,
}

impl CaseRecord {
    pub fn new(region: Region, historical: Vec<Observation>, forecast: Vec<Observation>) -> Self {
        Self {
            region,
            historical: TimeSeries::new(SeriesKind::Historical, historical),
            forecast: TimeSeries::new(SeriesKind::Forecast, forecast),
        }
    }

    pub fn series(&self, kind: SeriesKind) -> &TimeSeries {
        match kind {
            SeriesKind::Historical => &self.historical,
            SeriesKind::Forecast => &self.forecast,
        }
    }
}

/// Raw per-region entry of the dataset document.
///
/// The forecast service writes `past` / `prediction`; `historical` / `forecast`
/// are accepted too. A missing or `null` series reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    #[serde(default, alias = "historical")]
    pub past: Option<Vec<Observation>>,
    #[serde(default, alias = "forecast")]
    pub prediction: Option<Vec<Observation>>,
}

impl DatasetEntry {
    pub fn into_record(self, name: &str) -> CaseRecord {
        CaseRecord::new(
            Region::from_name(name),
            self.past.unwrap_or_default(),
            self.prediction.unwrap_or_default(),
        )
    }
}

impl From<&CaseRecord> for DatasetEntry {
    fn from(r: &CaseRecord) -> Self {
        Self {
            past: Some(r.historical.points.clone()),
            prediction: Some(r.forecast.points.clone()),
        }
    }
}
