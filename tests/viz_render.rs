use casemap::resolve::snapshot;
use casemap::scale::{HOTSPOT_COLOR, QuantileScale, REDS, paint};
use casemap::viz::{self, ChartOptions, LegendMode};
use casemap::CaseRecordStore;
use std::fs;
use tempfile::tempdir;

fn states() -> Vec<String> {
    vec!["Delhi".into(), "KL".into(), "Goa".into()]
}

#[test]
fn compare_svg_for_every_legend_mode() {
    let store = CaseRecordStore::bundled().unwrap();
    let dir = tempdir().unwrap();
    for (i, legend) in [LegendMode::Inside, LegendMode::Right, LegendMode::Bottom]
        .into_iter()
        .enumerate()
    {
        let out = dir.path().join(format!("compare_{i}.svg"));
        let opts = ChartOptions {
            legend,
            ..ChartOptions::default()
        };
        viz::plot_compare(&store, &states(), i % 2 == 0, &out, &opts).unwrap();
        let svg = fs::read_to_string(&out).unwrap();
        assert!(svg.starts_with("<svg"), "mode {legend:?}");
        assert!(svg.contains("Delhi"));
    }
}

#[test]
fn compare_png_is_written() {
    let store = CaseRecordStore::bundled().unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("compare.png");
    let opts = ChartOptions {
        width: 640,
        height: 360,
        locale: "de".into(),
        ..ChartOptions::default()
    };
    viz::plot_compare(&store, &states(), true, &out, &opts).unwrap();
    assert!(fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn compare_needs_a_known_region() {
    let store = CaseRecordStore::bundled().unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("none.svg");
    let err = viz::plot_compare(&store, &["Atlantis".into()], false, &out, &ChartOptions::default());
    assert!(err.is_err());
}

#[test]
fn choropleth_bars_svg() {
    let store = CaseRecordStore::bundled().unwrap();
    let snap = snapshot(&store, "2022-05-01");
    let domain: Vec<f64> = snap.iter().filter_map(|r| r.value).collect();
    let scale = QuantileScale::build(&domain, &REDS).with_hotspot(HOTSPOT_COLOR);
    let rows = paint(snap.iter().map(|r| (&r.region, r.value)), &scale);

    let dir = tempdir().unwrap();
    let out = dir.path().join("map.svg");
    let opts = ChartOptions {
        height: 900,
        title: Some("Cases by State up to 2022-05-01".into()),
        ..ChartOptions::default()
    };
    viz::plot_choropleth_bars(&rows, &scale, &out, &opts).unwrap();
    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains("Maharashtra"));
    assert!(svg.contains("Hotspot"));
}

#[test]
fn choropleth_bars_reject_empty_rows() {
    let dir = tempdir().unwrap();
    let scale = QuantileScale::build(&[], &REDS);
    let out = dir.path().join("empty.svg");
    assert!(viz::plot_choropleth_bars(&[], &scale, &out, &ChartOptions::default()).is_err());
}
