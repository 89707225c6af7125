use crate::models::{Region, SeriesKind, TimeSeries};
use crate::store::CaseRecordStore;
use serde::{Deserialize, Serialize};

/// Summary statistics for one region's series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub region: Region,
    pub kind: SeriesKind,
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Count, min, max, mean, median of a series.
pub fn summarize(region: &Region, series: &TimeSeries) -> Summary {
    let mut vals: Vec<f64> = series
        .iter()
        .map(|o| o.value)
        .filter(|v| v.is_finite())
        .collect();
    vals.sort_by(f64::total_cmp);
    let count = vals.len();
    let min = vals.first().cloned();
    let max = vals.last().cloned();
    let mean = if count > 0 {
        Some(vals.iter().copied().sum::<f64>() / count as f64)
    } else {
        None
    };
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };
    Summary {
        region: region.clone(),
        kind: series.kind,
        count,
        min,
        max,
        mean,
        median,
    }
}

/// One summary per region, in store order.
pub fn region_summaries(store: &CaseRecordStore, kind: SeriesKind) -> Vec<Summary> {
    store
        .records()
        .map(|r| summarize(&r.region, r.series(kind)))
        .collect()
}

/// Forecast error against actual observations on the dates both series share.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Accuracy {
    /// Number of shared dates.
    pub n: usize,
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    /// Mean absolute percentage error as a fraction; `None` if every actual value was zero.
    pub mape: Option<f64>,
}

/// `None` when the two series share no date.
pub fn forecast_accuracy(actual: &TimeSeries, predicted: &TimeSeries) -> Option<Accuracy> {
    let pairs: Vec<(f64, f64)> = actual
        .iter()
        .filter_map(|a| predicted.value_on(a.date).map(|p| (a.value, p)))
        .collect();
    if pairs.is_empty() {
        return None;
    }
    let n = pairs.len() as f64;
    let mae = pairs.iter().map(|(a, p)| (a - p).abs()).sum::<f64>() / n;
    let mse = pairs.iter().map(|(a, p)| (a - p).powi(2)).sum::<f64>() / n;
    let pct: Vec<f64> = pairs
        .iter()
        .filter(|(a, _)| *a != 0.0)
        .map(|(a, p)| ((a - p) / a).abs())
        .collect();
    let mape = if pct.is_empty() {
        None
    } else {
        Some(pct.iter().sum::<f64>() / pct.len() as f64)
    };
    Some(Accuracy {
        n: pairs.len(),
        mae,
        mse,
        rmse: mse.sqrt(),
        mape,
    })
}

/// Score the forecasts of `predicted` against the history of `actual`, region by region.
///
/// Regions missing from either store, or without shared dates, are skipped.
pub fn accuracy_by_region(
    actual: &CaseRecordStore,
    predicted: &CaseRecordStore,
) -> Vec<(Region, Accuracy)> {
    predicted
        .records()
        .filter_map(|p| {
            let a = actual.get(&p.region.name)?;
            forecast_accuracy(&a.historical, &p.forecast).map(|acc| (p.region.clone(), acc))
        })
        .collect()
}
