//! Per-region comparison of the last recorded value against the last forecast value.

use crate::error::LookupError;
use crate::models::{CaseRecord, Observation, Region};
use crate::store::CaseRecordStore;
use serde::{Deserialize, Serialize};

/// Number of trailing historical entries kept in an aggregate.
pub const LAST_N_DAYS: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionAggregate {
    pub region: Region,
    pub latest_historical: f64,
    pub latest_forecast: f64,
    /// `(latest_historical - latest_forecast) / latest_historical * 100`, two decimals.
    pub percentage_difference: f64,
    pub last_7_days: Vec<Observation>,
}

/// Round half away from zero to two decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Aggregate with the default seven-day window.
///
/// `None` when either series is empty or when the latest historical value is
/// zero (the percentage difference would be undefined).
pub fn compute(record: &CaseRecord) -> Option<RegionAggregate> {
    compute_window(record, LAST_N_DAYS)
}

pub fn compute_window(record: &CaseRecord, window: usize) -> Option<RegionAggregate> {
    try_compute_window(record, window).ok()
}

/// Like [`compute_window`], but says why a region has no aggregate.
pub fn try_compute_window(
    record: &CaseRecord,
    window: usize,
) -> Result<RegionAggregate, LookupError> {
    let undefined =
        || LookupError::Undefined(format!("percentage difference of {}", record.region.name));
    let latest_historical = record.historical.last().ok_or_else(undefined)?.value;
    let latest_forecast = record.forecast.last().ok_or_else(undefined)?.value;
    let percentage_difference =
        percentage_difference(latest_historical, latest_forecast).ok_or_else(undefined)?;
    Ok(RegionAggregate {
        region: record.region.clone(),
        latest_historical,
        latest_forecast,
        percentage_difference,
        last_7_days: record.historical.tail(window).to_vec(),
    })
}

/// `(base - other) / base * 100` rounded to two decimals; `None` if not finite.
pub fn percentage_difference(base: f64, other: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    let pct = round2((base - other) / base * 100.0);
    pct.is_finite().then_some(pct)
}

/// Aggregates for every region that has one, in store order.
pub fn compute_all(store: &CaseRecordStore) -> Vec<RegionAggregate> {
    store.records().filter_map(compute).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_to_two_places() {
        assert_eq!(round2(20.0), 20.0);
        assert_eq!(round2(-1.23456), -1.23);
        assert_eq!(round2(2.675_1), 2.68);
    }

    #[test]
    fn zero_base_is_undefined() {
        assert_eq!(percentage_difference(0.0, 5.0), None);
        assert_eq!(percentage_difference(f64::NAN, 5.0), None);
        assert_eq!(percentage_difference(100.0, 80.0), Some(20.0));
    }

    #[test]
    fn strict_variant_names_the_region() {
        let goa = CaseRecord::new(Region::from_name("Goa"), vec![], vec![]);
        match try_compute_window(&goa, LAST_N_DAYS) {
            Err(LookupError::Undefined(what)) => assert!(what.contains("Goa")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
