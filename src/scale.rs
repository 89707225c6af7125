//! Quantile color scales for choropleth-style views.
//!
//! The domain (all region values at one point in time) is sorted and split
//! into as many equal-population buckets as the palette has colors; the first
//! `M mod N` buckets take the one extra member. A value is colored by the
//! bucket whose range it falls into. A domain smaller than the palette is
//! spread across it instead, so its maximum still gets the darkest color.
//! Missing values, and every value when the domain is empty, get the neutral
//! default color.

use crate::models::Region;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 8-bit sRGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or the short `#rgb` form (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<Vec<_>>>()?;
        match digits.as_slice() {
            [r, g, b] => Some(Self::rgb(r * 17, g * 17, b * 17)),
            [r1, r0, g1, g0, b1, b0] => Some(Self::rgb(r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0)),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s).ok_or_else(|| format!("invalid color '{s}', expected #rrggbb"))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// Neutral gray for regions without a value.
pub const DEFAULT_COLOR: Color = Color::rgb(0xee, 0xee, 0xee);

/// Highlight for the region(s) holding the domain maximum.
pub const HOTSPOT_COLOR: Color = Color::rgb(0xff, 0x57, 0x22);

/// Light to dark greens (date heatmap with hotspot).
pub const GREENS: [Color; 9] = [
    Color::rgb(0xe8, 0xf5, 0xe9),
    Color::rgb(0xc8, 0xe6, 0xc9),
    Color::rgb(0xa5, 0xd6, 0xa7),
    Color::rgb(0x81, 0xc7, 0x84),
    Color::rgb(0x66, 0xbb, 0x6a),
    Color::rgb(0x4c, 0xaf, 0x50),
    Color::rgb(0x43, 0xa0, 0x47),
    Color::rgb(0x38, 0x8e, 0x3c),
    Color::rgb(0x2e, 0x7d, 0x32),
];

/// Light to dark reds (percentage-difference map).
pub const REDS: [Color; 9] = [
    Color::rgb(0xff, 0xed, 0xea),
    Color::rgb(0xff, 0xce, 0xc5),
    Color::rgb(0xff, 0xad, 0x9f),
    Color::rgb(0xff, 0x8a, 0x75),
    Color::rgb(0xff, 0x55, 0x33),
    Color::rgb(0xe2, 0x49, 0x2d),
    Color::rgb(0xbe, 0x3d, 0x26),
    Color::rgb(0x9a, 0x31, 0x1f),
    Color::rgb(0x78, 0x26, 0x18),
];

/// Named built-in palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteName {
    #[default]
    Greens,
    Reds,
}

impl PaletteName {
    pub fn colors(self) -> &'static [Color] {
        match self {
            PaletteName::Greens => &GREENS,
            PaletteName::Reds => &REDS,
        }
    }
}

/// Value range covered by one bucket, for drawing a legend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendEntry {
    pub color: Color,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuantileScale {
    sorted: Vec<f64>,
    /// First value of every non-empty bucket after bucket 0.
    thresholds: Vec<f64>,
    /// Palette index for each bucket.
    slots: Vec<usize>,
    palette: Vec<Color>,
    default_color: Color,
    hotspot: Option<Color>,
}

impl QuantileScale {
    /// Build a scale over `domain`. Non-finite values are ignored.
    pub fn build(domain: &[f64], palette: &[Color]) -> Self {
        let mut sorted: Vec<f64> = domain.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);

        let m = sorted.len();
        let n = palette.len();
        let mut thresholds = Vec::new();
        let mut slots = Vec::new();
        if n > 0 && m >= n {
            let (base, rem) = (m / n, m % n);
            for k in 1..n {
                thresholds.push(sorted[k * base + k.min(rem)]);
            }
            slots.extend(0..n);
        } else if m > 0 && n > 0 {
            // Fewer values than colors: spread ranks over the whole palette,
            // lowest value on the first color, highest on the last.
            thresholds.extend_from_slice(&sorted[1..]);
            if m == 1 {
                slots.push(n - 1);
            } else {
                slots.extend((0..m).map(|r| r * (n - 1) / (m - 1)));
            }
        }

        Self {
            sorted,
            thresholds,
            slots,
            palette: palette.to_vec(),
            default_color: DEFAULT_COLOR,
            hotspot: None,
        }
    }

    /// Color the domain maximum with `color`, overriding its bucket.
    pub fn with_hotspot(mut self, color: Color) -> Self {
        self.hotspot = Some(color);
        self
    }

    pub fn with_default_color(mut self, color: Color) -> Self {
        self.default_color = color;
        self
    }

    /// Palette index for `value`, or `None` if the scale has nothing to bucket against.
    pub fn bucket_for(&self, value: f64) -> Option<usize> {
        if self.slots.is_empty() || !value.is_finite() {
            return None;
        }
        self.slots
            .get(self.thresholds.partition_point(|t| *t <= value))
            .copied()
    }

    /// Palette color for `value`; the default color when the value or domain is missing.
    pub fn color_for(&self, value: Option<f64>) -> Color {
        let Some(v) = value else {
            return self.default_color;
        };
        if let Some(hot) = self.hotspot {
            if self.is_hotspot(v) {
                return hot;
            }
        }
        match self.bucket_for(v) {
            Some(idx) => self.palette[idx],
            None => self.default_color,
        }
    }

    /// Whether `value` equals the domain maximum.
    pub fn is_hotspot(&self, value: f64) -> bool {
        self.max() == Some(value)
    }

    pub fn max(&self) -> Option<f64> {
        self.sorted.last().copied()
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    pub fn hotspot_color(&self) -> Option<Color> {
        self.hotspot
    }

    pub fn default_color(&self) -> Color {
        self.default_color
    }

    /// One entry per non-empty bucket, lowest first.
    pub fn legend(&self) -> Vec<LegendEntry> {
        let mut out: Vec<LegendEntry> = Vec::new();
        for &v in &self.sorted {
            let Some(idx) = self.bucket_for(v) else {
                continue;
            };
            let color = self.palette[idx];
            match out.last_mut() {
                Some(last) if last.color == color && last.upper <= v => {
                    last.upper = v;
                    last.count += 1;
                }
                _ => out.push(LegendEntry {
                    color,
                    lower: v,
                    upper: v,
                    count: 1,
                }),
            }
        }
        out
    }
}

/// A region together with the color it is drawn in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColoredRegion {
    pub region: Region,
    pub value: Option<f64>,
    pub color: Color,
    pub hotspot: bool,
}

/// Color each `(region, value)` pair with `scale`.
pub fn paint<'a, I>(rows: I, scale: &QuantileScale) -> Vec<ColoredRegion>
where
    I: IntoIterator<Item = (&'a Region, Option<f64>)>,
{
    rows.into_iter()
        .map(|(region, value)| ColoredRegion {
            region: region.clone(),
            value,
            color: scale.color_for(value),
            hotspot: scale.hotspot_color().is_some() && value.is_some_and(|v| scale.is_hotspot(v)),
        })
        .collect()
}
