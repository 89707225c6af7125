//! Date lookups: which value applies to a region on a given day.
//!
//! Historical data is ground truth; the forecast is consulted only for dates
//! the history does not cover. Matching is exact, there is no interpolation.

use crate::error::LookupError;
use crate::models::{CaseRecord, Region, parse_date};
use crate::store::CaseRecordStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Value for `date_token`, historical first, then forecast.
///
/// An unparsable token is treated as "no match".
pub fn resolve(record: &CaseRecord, date_token: &str) -> Option<f64> {
    let date = parse_date(date_token)?;
    resolve_date(record, date)
}

pub fn resolve_date(record: &CaseRecord, date: NaiveDate) -> Option<f64> {
    record
        .historical
        .value_on(date)
        .or_else(|| record.forecast.value_on(date))
}

/// One region's value on the selected date, as shown on the date heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionValue {
    pub region: Region,
    /// Resolved value rounded to a whole number of cases; `None` when neither series has the date.
    pub value: Option<f64>,
}

/// Resolve every region of the store for one date.
pub fn snapshot(store: &CaseRecordStore, date_token: &str) -> Vec<RegionValue> {
    let date = parse_date(date_token);
    store
        .records()
        .map(|r| RegionValue {
            region: r.region.clone(),
            value: date.and_then(|d| resolve_date(r, d)).map(f64::round),
        })
        .collect()
}

/// Whether any region has a value in the snapshot.
pub fn has_data(snapshot: &[RegionValue]) -> bool {
    snapshot.iter().any(|r| r.value.is_some())
}

/// Forecast-only lookup for a single region, as used by the prediction screen.
pub fn predicted_value(
    store: &CaseRecordStore,
    region: &str,
    date_token: &str,
) -> Result<f64, LookupError> {
    let record = store
        .get(region)
        .ok_or_else(|| LookupError::RegionNotFound(region.trim().to_string()))?;
    let date =
        parse_date(date_token).ok_or_else(|| LookupError::InvalidDate(date_token.to_string()))?;
    record
        .forecast
        .value_on(date)
        .ok_or_else(|| LookupError::NoForecast {
            region: record.region.name.clone(),
            date: date.to_string(),
        })
}
