use crate::aggregate::RegionAggregate;
use crate::error::DatasetError;
use crate::models::{CaseRecord, DatasetEntry, Observation, Region, SeriesKind, parse_date};
use crate::scale::ColoredRegion;
use crate::store::CaseRecordStore;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use log::warn;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Prefix cells that a spreadsheet would evaluate as a formula.
fn sanitize_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{s}"),
        _ => s.to_string(),
    }
}

fn code_cell(region: &Region) -> String {
    region.code.clone().unwrap_or_default()
}

/// Save a colored snapshot (one row per region) as CSV with header.
pub fn save_snapshot_csv<P: AsRef<Path>>(rows: &[ColoredRegion], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize(("region", "code", "value", "color", "hotspot"))?;
    for r in rows {
        wtr.serialize((
            sanitize_cell(&r.region.name),
            code_cell(&r.region),
            r.value,
            r.color.to_string(),
            r.hotspot,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save a colored snapshot as pretty JSON array.
pub fn save_snapshot_json<P: AsRef<Path>>(rows: &[ColoredRegion], path: P) -> Result<()> {
    write_json(rows, path.as_ref())
}

/// Save per-region aggregates as CSV with header. The seven-day slice is written as `date=value` pairs.
pub fn save_aggregates_csv<P: AsRef<Path>>(aggs: &[RegionAggregate], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize((
        "region",
        "code",
        "latest_historical",
        "latest_forecast",
        "percentage_difference",
        "last_7_days",
    ))?;
    for a in aggs {
        let window = a
            .last_7_days
            .iter()
            .map(|o| format!("{}={}", o.date, o.value))
            .collect::<Vec<_>>()
            .join(";");
        wtr.serialize((
            sanitize_cell(&a.region.name),
            code_cell(&a.region),
            a.latest_historical,
            a.latest_forecast,
            a.percentage_difference,
            window,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_aggregates_json<P: AsRef<Path>>(aggs: &[RegionAggregate], path: P) -> Result<()> {
    write_json(aggs, path.as_ref())
}

/// Write the store back out in the dataset document shape (`past` / `prediction`).
pub fn save_dataset_json<P: AsRef<Path>>(store: &CaseRecordStore, path: P) -> Result<()> {
    let doc: BTreeMap<&str, DatasetEntry> = store
        .records()
        .map(|r| (r.region.name.as_str(), DatasetEntry::from(r)))
        .collect();
    write_json(&doc, path.as_ref())
}

fn write_json<T: serde::Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Import tidy CSV rows (`region,kind,date,value`) into a store.
///
/// `kind` is `historical`/`past` or `forecast`/`prediction`. Rows are kept in
/// file order within each series. A row with an unknown kind, a bad date, or a
/// non-numeric value aborts the import.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<CaseRecordStore, DatasetError> {
    let f = File::open(path.as_ref())?;
    load_csv_reader(f)
}

pub fn load_csv_reader<R: Read>(reader: R) -> Result<CaseRecordStore, DatasetError> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut series: BTreeMap<String, (Vec<Observation>, Vec<Observation>)> = BTreeMap::new();

    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        // Header is line 1.
        let line = row.position().map(|p| p.line()).unwrap_or(i as u64 + 2);
        let invalid = |reason: String| DatasetError::InvalidRow { line, reason };

        if row.iter().all(|c| c.is_empty()) {
            warn!("skipping empty CSV row at line {line}");
            continue;
        }
        let region = row.get(0).unwrap_or_default().trim_start_matches('\'');
        if region.is_empty() {
            return Err(invalid("missing region".into()));
        }
        let kind_s = row.get(1).unwrap_or_default();
        let kind = SeriesKind::parse(kind_s)
            .ok_or_else(|| invalid(format!("unknown series kind '{kind_s}'")))?;
        let date_s = row.get(2).unwrap_or_default();
        let date = parse_date(date_s).ok_or_else(|| invalid(format!("invalid date '{date_s}'")))?;
        let value_s = row.get(3).unwrap_or_default();
        let value: f64 = value_s
            .parse()
            .map_err(|_| invalid(format!("invalid value '{value_s}'")))?;

        let entry = series.entry(region.to_string()).or_default();
        let obs = Observation::new(date, value);
        match kind {
            SeriesKind::Historical => entry.0.push(obs),
            SeriesKind::Forecast => entry.1.push(obs),
        }
    }

    Ok(CaseRecordStore::from_records(series.into_iter().map(
        |(name, (historical, forecast))| {
            CaseRecord::new(Region::from_name(&name), historical, forecast)
        },
    )))
}
