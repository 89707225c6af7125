//! Public types and constants for the visualization module.

/// Legend placement for the comparison chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendMode {
    /// Overlay legend inside the plotting area (may overlap data).
    Inside,
    /// Separate panel on the right side.
    Right,
    /// Separate band below the chart.
    Bottom,
}

/// Horizontal legend below the chart keeps labels close to the x-axis start.
pub const DEFAULT_LEGEND_MODE: LegendMode = LegendMode::Bottom;

/// Output size, label locale, legend placement, and an optional caption.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    /// Locale tag for thousands separators ("en", "de", ...).
    pub locale: String,
    pub legend: LegendMode,
    /// Caption; each plot function picks a sensible one when `None`.
    pub title: Option<String>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            locale: "en".to_string(),
            legend: DEFAULT_LEGEND_MODE,
            title: None,
        }
    }
}
