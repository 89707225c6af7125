//! Visualization utilities: render charts to **SVG** or **PNG** (chosen by file extension).
//!
//! - `plot_compare`: multi-region line chart of recorded cases, optionally
//!   continued by the forecast (Office palette, locale-aware labels)
//! - `plot_choropleth_bars`: ranked bars colored by a quantile scale, standing
//!   in for the map view; includes the low/high ramp and hotspot swatch

pub mod legend;
pub mod text;
pub mod types;
pub mod util;

pub use types::{ChartOptions, DEFAULT_LEGEND_MODE, LegendMode};

use crate::models::CaseRecord;
use crate::scale::{ColoredRegion, QuantileScale};
use crate::store::CaseRecordStore;
use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use log::warn;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::Once;

use legend::{bottom_legend_height_px, draw_color_ramp, draw_legend_panel};
use text::truncate_to_width;
use util::{choose_axis_scale, day_label, format_count, label_area_px, map_locale, office_color, to_rgb};

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// Compare regions over time. `regions` accepts names or codes; unknown ones are skipped.
///
/// With `with_forecast`, each region gets a second, lighter series with its forecast.
pub fn plot_compare<P: AsRef<Path>>(
    store: &CaseRecordStore,
    regions: &[String],
    with_forecast: bool,
    out_path: P,
    opts: &ChartOptions,
) -> Result<()> {
    let mut records: Vec<&CaseRecord> = Vec::new();
    for r in regions {
        match store.get(r) {
            Some(rec) if !records.iter().any(|x| std::ptr::eq(*x, rec)) => records.push(rec),
            Some(_) => {}
            None => warn!("no data for region '{r}', skipping"),
        }
    }
    if records.is_empty() {
        bail!("no data to plot");
    }
    ensure_fonts_registered();

    let mut all = records.iter().flat_map(|r| {
        let fc = if with_forecast { r.forecast.points.as_slice() } else { &[] };
        r.historical.points.iter().chain(fc.iter())
    });
    let first = all.next().ok_or_else(|| anyhow!("no numeric values to plot"))?;
    let (mut min_d, mut max_d) = (first.date, first.date);
    let (mut min_v, mut max_v) = (first.value, first.value);
    for o in all {
        min_d = min_d.min(o.date);
        max_d = max_d.max(o.date);
        min_v = min_v.min(o.value);
        max_v = max_v.max(o.value);
    }
    let mut span = (max_d - min_d).num_days() as f64;
    if span < 1.0 {
        span = 1.0;
    }
    if (max_v - min_v).abs() < f64::EPSILON {
        min_v -= 1.0;
        max_v += 1.0;
    }

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let frame = CompareFrame {
        records: &records,
        with_forecast,
        origin: min_d,
        span,
        min_v,
        max_v,
        opts,
    };
    if is_svg(out_path) {
        let root = SVGBackend::new(path_string.as_str(), (opts.width, opts.height)).into_drawing_area();
        draw_compare(root, &frame)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (opts.width, opts.height)).into_drawing_area();
        draw_compare(root, &frame)
    }
}

struct CompareFrame<'a> {
    records: &'a [&'a CaseRecord],
    with_forecast: bool,
    origin: NaiveDate,
    span: f64,
    min_v: f64,
    max_v: f64,
    opts: &'a ChartOptions,
}

fn draw_compare<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, f: &CompareFrame<'_>) -> Result<()> {
    const MARGIN: i32 = 16;
    let locale = map_locale(&f.opts.locale);

    let (yscale, scale_word) = choose_axis_scale(f.min_v.abs().max(f.max_v.abs()));
    let y_axis_title = if scale_word.is_empty() {
        "Cases".to_string()
    } else {
        format!("Cases ({scale_word})")
    };
    let y_fmt = |v: &f64| {
        if yscale > 1.0 {
            format!("{:.2}", v)
        } else {
            format_count(*v, locale)
        }
    };
    let x_fmt = |x: &f64| day_label(f.origin, *x);

    // (label, color, historical, forecast) per region
    let series: Vec<(String, RGBAColor, Vec<(f64, f64)>, Vec<(f64, f64)>)> = f
        .records
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            let to_xy = |o: &crate::models::Observation| {
                ((o.date - f.origin).num_days() as f64, o.value / yscale)
            };
            let mut hist: Vec<(f64, f64)> = r.historical.iter().map(to_xy).collect();
            hist.sort_by(|a, b| a.0.total_cmp(&b.0));
            let mut fc: Vec<(f64, f64)> = if f.with_forecast {
                r.forecast.iter().map(to_xy).collect()
            } else {
                Vec::new()
            };
            fc.sort_by(|a, b| a.0.total_cmp(&b.0));
            (r.region.name.clone(), office_color(idx), hist, fc)
        })
        .collect();

    let y_labels: Vec<String> = (0..=10)
        .map(|i| y_fmt(&((f.min_v + (f.max_v - f.min_v) * i as f64 / 10.0) / yscale)))
        .collect();
    let left_px = label_area_px(y_labels.iter().map(String::as_str), 12);
    let axis_x_start_px = MARGIN + left_px as i32;

    let mut legend_labels: Vec<String> = Vec::new();
    for (name, _, _, fc) in &series {
        legend_labels.push(name.clone());
        if !fc.is_empty() {
            legend_labels.push(format!("{name} (forecast)"));
        }
    }

    let (root_w, root_h) = root.dim_in_pixel();
    let (plot_area, legend_area) = match f.opts.legend {
        LegendMode::Right => {
            let (plot, legend) = root.split_horizontally((80).percent_width());
            (plot, Some(legend))
        }
        LegendMode::Bottom => {
            let h = bottom_legend_height_px(&legend_labels, axis_x_start_px, root_w as i32).max(40);
            let (plot, legend) = root.split_vertically((root_h as i32 - h).max(40));
            (plot, Some(legend))
        }
        LegendMode::Inside => (root, None),
    };
    plot_area.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    if let Some(ref la) = legend_area {
        la.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    }

    let title = f
        .opts
        .title
        .clone()
        .unwrap_or_else(|| "Compare Cases by State".to_string());
    let mut chart = ChartBuilder::on(&plot_area)
        .margin(MARGIN as u32)
        .caption(title, (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, left_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 48)
        .build_cartesian_2d(0f64..f.span, (f.min_v / yscale)..(f.max_v / yscale))
        .map_err(|e| anyhow!("{:?}", e))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(y_axis_title)
        .x_labels((f.span as usize + 1).min(12))
        .y_labels(10)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let inside = legend_area.is_none();
    let mut legend_items: Vec<(String, RGBAColor)> = Vec::new();
    for (name, color, hist, fc) in &series {
        let color = *color;
        let style = ShapeStyle {
            color,
            filled: false,
            stroke_width: 2,
        };
        let elem = chart
            .draw_series(LineSeries::new(hist.clone(), style))
            .map_err(|e| anyhow!("{:?}", e))?;
        if inside {
            elem.label(name.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        } else {
            legend_items.push((name.clone(), color));
        }

        if !fc.is_empty() {
            let light = color.mix(0.45);
            // Bridge from the last recorded point so the forecast reads as a continuation.
            let mut line = Vec::with_capacity(fc.len() + 1);
            if let Some(last) = hist.iter().rev().find(|p| p.0 < fc[0].0) {
                line.push(*last);
            }
            line.extend(fc.iter().copied());
            chart
                .draw_series(LineSeries::new(line, light.stroke_width(2)))
                .map_err(|e| anyhow!("{:?}", e))?;
            let elem = chart
                .draw_series(fc.iter().map(|(x, y)| Circle::new((*x, *y), 3, light.filled())))
                .map_err(|e| anyhow!("{:?}", e))?;
            let label = format!("{name} (forecast)");
            if inside {
                elem.label(label)
                    .legend(move |(x, y)| Circle::new((x + 10, y), 3, light.filled()));
            } else {
                legend_items.push((label, light));
            }
        }
    }

    if inside {
        chart
            .configure_series_labels()
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .label_font((FontFamily::SansSerif, 14))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;
    } else if let Some(ref la) = legend_area {
        draw_legend_panel(la, &legend_items, f.opts.legend, axis_x_start_px)?;
    }

    plot_area.present().map_err(|e| anyhow!("{:?}", e))?;
    if let Some(ref la) = legend_area {
        la.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

/// Ranked horizontal bars, one per region, filled with the colors already chosen by `scale`.
///
/// Regions without a value are listed last with an empty bar and "no data".
pub fn plot_choropleth_bars<P: AsRef<Path>>(
    rows: &[ColoredRegion],
    scale: &QuantileScale,
    out_path: P,
    opts: &ChartOptions,
) -> Result<()> {
    if rows.is_empty() {
        bail!("no data to plot");
    }
    ensure_fonts_registered();

    let mut ranked: Vec<&ColoredRegion> = rows.iter().collect();
    ranked.sort_by(|a, b| match (a.value, b.value) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.region.name.cmp(&b.region.name),
    });

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    if is_svg(out_path) {
        let root = SVGBackend::new(path_string.as_str(), (opts.width, opts.height)).into_drawing_area();
        draw_bars(root, &ranked, scale, opts)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (opts.width, opts.height)).into_drawing_area();
        draw_bars(root, &ranked, scale, opts)
    }
}

fn draw_bars<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    ranked: &[&ColoredRegion],
    scale: &QuantileScale,
    opts: &ChartOptions,
) -> Result<()> {
    const MARGIN: i32 = 16;
    const LABEL_PX: u32 = 12;
    let locale = map_locale(&opts.locale);
    let n = ranked.len() as i32;

    let max_v = ranked
        .iter()
        .filter_map(|r| r.value)
        .fold(0.0f64, f64::max);
    let x_max = if max_v > 0.0 { max_v * 1.05 } else { 1.0 };

    // Top row is the largest value.
    let labels: Vec<String> = ranked
        .iter()
        .map(|r| truncate_to_width(&r.region.name, LABEL_PX, 200))
        .collect();
    let left_px = label_area_px(labels.iter().map(String::as_str), LABEL_PX);

    let (_w, root_h) = root.dim_in_pixel();
    let (plot_area, ramp_area) = root.split_vertically((root_h as i32 - 48).max(40));
    plot_area.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    ramp_area.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let title = opts
        .title
        .clone()
        .unwrap_or_else(|| "Cases by State".to_string());
    let mut chart = ChartBuilder::on(&plot_area)
        .margin(MARGIN as u32)
        .caption(title, (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, left_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0f64..x_max, 0f64..n as f64)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_fmt = |v: &f64| format_count(*v, locale);
    chart
        .configure_mesh()
        .disable_y_mesh()
        .disable_y_axis()
        .x_desc("Cases")
        .x_labels(8)
        .x_label_formatter(&x_fmt)
        .label_style((FontFamily::SansSerif, LABEL_PX))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let name_style =
        TextStyle::from((FontFamily::SansSerif, LABEL_PX)).pos(Pos::new(HPos::Right, VPos::Center));
    let value_style =
        TextStyle::from((FontFamily::SansSerif, LABEL_PX - 1)).pos(Pos::new(HPos::Left, VPos::Center));

    for (i, row) in ranked.iter().enumerate() {
        let top = (n - i as i32) as f64 - 0.1;
        let bottom = (n - i as i32 - 1) as f64 + 0.1;
        let mid = (top + bottom) / 2.0;
        let v = row.value.unwrap_or(0.0);

        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(0.0, bottom), (v, top)],
                to_rgb(row.color).filled(),
            )))
            .map_err(|e| anyhow!("{:?}", e))?;

        // Region name in the left label area, just outside the axis.
        let (px, py) = chart.backend_coord(&(0.0, mid));
        plot_area
            .draw(&Text::new(labels[i].clone(), (px - 6, py), name_style.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;

        let value_text = match row.value {
            Some(v) if row.hotspot => format!("{} (hotspot)", format_count(v, locale)),
            Some(v) => format_count(v, locale),
            None => "no data".to_string(),
        };
        chart
            .draw_series(std::iter::once(Text::new(
                value_text,
                (v + x_max * 0.005, mid),
                value_style.clone(),
            )))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    draw_color_ramp(&ramp_area, scale, MARGIN + left_px as i32)?;

    plot_area.present().map_err(|e| anyhow!("{:?}", e))?;
    ramp_area.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
