//! Utility functions for visualization: colors, axis scaling, locale mapping, label sizing.

use crate::scale::Color as ScaleColor;
use chrono::{Duration, NaiveDate};
use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;

use super::text::estimate_text_width_px;

/// Microsoft Office (2013+) chart series palette.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

/// Series color by position; wraps after ten series.
#[inline]
pub fn office_color(idx: usize) -> RGBAColor {
    OFFICE10[idx % OFFICE10.len()].to_rgba()
}

/// Scale color to a Plotters color.
#[inline]
pub fn to_rgb(c: ScaleColor) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

/// Pick a single Y-axis scale and its human label based on the overall magnitude.
/// Returns (scale, label), e.g. (1e6, "millions").
pub fn choose_axis_scale(max_abs: f64) -> (f64, &'static str) {
    if max_abs >= 1.0e9 {
        (1.0e9, "billions")
    } else if max_abs >= 1.0e6 {
        (1.0e6, "millions")
    } else if max_abs >= 1.0e3 {
        (1.0e3, "thousands")
    } else {
        (1.0, "")
    }
}

/// Map a locale tag to a `num_format::Locale`. Unknown tags fall back to English.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "hi" | "hi_in" | "en_in" => &Locale::en_IN,
        _ => &Locale::en,
    }
}

/// Whole number with locale thousands separators, e.g. `7,874,602`.
pub fn format_count(v: f64, locale: &Locale) -> String {
    let n = v.round() as i64;
    n.to_formatted_string(locale)
}

/// Day offset (x coordinate) back to a `MM-DD` tick label.
pub fn day_label(origin: NaiveDate, offset: f64) -> String {
    let d = origin + Duration::days(offset.round() as i64);
    d.format("%m-%d").to_string()
}

/// Width of the left label area needed for `labels`, clamped to a sensible range.
pub fn label_area_px<'a>(labels: impl IntoIterator<Item = &'a str>, font_px: u32) -> u32 {
    let max_px = labels
        .into_iter()
        .map(|s| estimate_text_width_px(s, font_px))
        .max()
        .unwrap_or(0);
    // Tick marks and a little breathing room.
    max_px.saturating_add(18).clamp(48, 220)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_scale_steps() {
        assert_eq!(choose_axis_scale(999.0), (1.0, ""));
        assert_eq!(choose_axis_scale(7_874_602.0), (1.0e6, "millions"));
    }

    #[test]
    fn count_formatting_follows_locale() {
        assert_eq!(format_count(7_874_602.4, map_locale("en")), "7,874,602");
        assert_eq!(format_count(7_874_602.0, map_locale("de")), "7.874.602");
    }

    #[test]
    fn series_colors_wrap_and_scale_colors_convert() {
        assert_eq!(office_color(0), office_color(10));
        assert_eq!(office_color(1), RGBColor(237, 125, 49).to_rgba());
        assert_eq!(to_rgb(ScaleColor::rgb(0xff, 0x57, 0x22)), RGBColor(255, 87, 34));
    }

    #[test]
    fn day_labels() {
        let origin = NaiveDate::from_ymd_opt(2022, 4, 28).unwrap();
        assert_eq!(day_label(origin, 3.0), "05-01");
    }
}
