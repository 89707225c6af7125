use casemap::aggregate::compute_all;
use casemap::models::{Region, SeriesKind};
use casemap::scale::{GREENS, HOTSPOT_COLOR, QuantileScale, paint};
use casemap::{CaseRecordStore, DatasetError, storage};
use std::fs;
use tempfile::tempdir;

#[test]
fn save_snapshot_csv_and_json() {
    let dir = tempdir().unwrap();
    let a = Region::from_name("Goa");
    let b = Region::from_name("Kerala");
    let scale = QuantileScale::build(&[1.0, 2.0], &GREENS).with_hotspot(HOTSPOT_COLOR);
    let rows = paint([(&a, Some(1.0)), (&b, Some(2.0))], &scale);

    let csv_path = dir.path().join("snap.csv");
    storage::save_snapshot_csv(&rows, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("region,code,value,color,hotspot"));
    assert!(csv_txt.contains("Kerala,KL,2.0,#ff5722,true"));

    let json_path = dir.path().join("snap.json");
    storage::save_snapshot_json(&rows, &json_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 2);
    assert_eq!(v[0]["color"], GREENS[0].to_string());
}

#[test]
fn save_aggregates_csv_lists_window() {
    let dir = tempdir().unwrap();
    let store = CaseRecordStore::bundled().unwrap();
    let aggs = compute_all(&store);
    let p = dir.path().join("diff.csv");
    storage::save_aggregates_csv(&aggs, &p).unwrap();
    let txt = fs::read_to_string(&p).unwrap();
    assert_eq!(txt.lines().count(), 1 + aggs.len());
    assert!(txt.contains("2022-04-28="));

    let j = dir.path().join("diff.json");
    storage::save_aggregates_json(&aggs, &j).unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&j).unwrap()).unwrap();
    assert_eq!(v[0]["last_7_days"].as_array().unwrap().len(), 7);
}

// Cells a spreadsheet would run as a formula get a leading quote.
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let dir = tempdir().unwrap();
    let evil = Region::from_name("=HYPERLINK(\"http://x\")");
    let scale = QuantileScale::build(&[1.0], &GREENS);
    let rows = paint([(&evil, Some(1.0))], &scale);
    let p = dir.path().join("evil.csv");
    storage::save_snapshot_csv(&rows, &p).unwrap();

    let mut rdr = csv::Reader::from_path(&p).unwrap();
    let rec = rdr.records().next().unwrap().unwrap();
    assert!(rec.get(0).unwrap().starts_with("'="));
}

#[test]
fn csv_import_builds_both_series() {
    let data = "region,kind,date,value\n\
                Goa,past,2022-04-01,100\n\
                Goa,past,2022-04-02,110\n\
                Goa,prediction,2022-04-03,120.5\n\
                'Kerala,historical,2022-04-01,7\n";
    let store = storage::load_csv_reader(data.as_bytes()).unwrap();
    assert_eq!(store.len(), 2);
    let goa = store.get("GA").unwrap();
    assert_eq!(goa.series(SeriesKind::Historical).len(), 2);
    assert_eq!(goa.forecast.last().unwrap().value, 120.5);
    assert!(store.get("Kerala").unwrap().forecast.is_empty());
}

#[test]
fn csv_import_reports_bad_rows() {
    let data = "region,kind,date,value\nGoa,past,2022-04-01,100\nGoa,guess,2022-04-02,1\n";
    match storage::load_csv_reader(data.as_bytes()) {
        Err(DatasetError::InvalidRow { line, reason }) => {
            assert_eq!(line, 3);
            assert!(reason.contains("guess"));
        }
        other => panic!("expected InvalidRow, got {other:?}"),
    }

    let bad_date = "region,kind,date,value\nGoa,past,April 1,100\n";
    assert!(matches!(
        storage::load_csv_reader(bad_date.as_bytes()),
        Err(DatasetError::InvalidRow { .. })
    ));
}

#[test]
fn dataset_json_written_by_import_loads_back() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("in.csv");
    fs::write(&csv_path, "region,kind,date,value\nDelhi,past,2022-04-01,5\n").unwrap();
    let store = storage::load_csv(&csv_path).unwrap();

    let out = dir.path().join("out.json");
    storage::save_dataset_json(&store, &out).unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v["Delhi"]["past"][0][0], "2022-04-01");
    assert_eq!(CaseRecordStore::load(&out).unwrap(), store);
}
