//! Legend drawing for external legend bands and the choropleth color ramp.

use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::text::{estimate_text_width_px, truncate_to_width};
use super::types::LegendMode;
use super::util::to_rgb;
use crate::scale::QuantileScale;

const FONT_PX: u32 = 14;
const MARKER_RADIUS: i32 = 4;
const MARKER_TO_TEXT: i32 = 12;
const TRAILING_GAP: i32 = 16;
const ROW_H: i32 = FONT_PX as i32 + 6;

/// Height a bottom legend band needs for `labels` when wrapped into rows of `width` pixels.
pub fn bottom_legend_height_px(labels: &[String], start_x: i32, width: i32) -> i32 {
    let mut rows = 1;
    let mut x = start_x;
    for label in labels {
        let block = MARKER_TO_TEXT + MARKER_RADIUS + estimate_text_width_px(label, FONT_PX) as i32 + TRAILING_GAP;
        if x + block > width && x > start_x {
            rows += 1;
            x = start_x;
        }
        x += block;
    }
    16 + rows * ROW_H
}

/// Draw `(label, color)` items into a separate legend area.
///
/// `Bottom` flows items left to right starting at `start_x` (aligned with the plot's
/// x-axis) and wraps; `Right` stacks them, truncating labels to the panel width.
pub fn draw_legend_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    items: &[(String, RGBAColor)],
    mode: LegendMode,
    start_x: i32,
) -> Result<()> {
    let (w, _h) = area.dim_in_pixel();
    let w = w as i32;
    let style = TextStyle::from((FontFamily::SansSerif, FONT_PX)).pos(Pos::new(HPos::Left, VPos::Center));

    let mut x = match mode {
        LegendMode::Bottom => start_x,
        _ => 8,
    };
    let mut y = 8 + ROW_H / 2;

    for (label, color) in items {
        let text = match mode {
            LegendMode::Right => {
                let cap = (w - 8 - MARKER_TO_TEXT - MARKER_RADIUS).max(40) as u32;
                truncate_to_width(label, FONT_PX, cap)
            }
            _ => label.clone(),
        };
        let block = MARKER_TO_TEXT + MARKER_RADIUS + estimate_text_width_px(&text, FONT_PX) as i32 + TRAILING_GAP;
        if mode == LegendMode::Bottom && x + block > w && x > start_x {
            x = start_x;
            y += ROW_H;
        }

        area.draw(&Circle::new((x + MARKER_RADIUS, y), MARKER_RADIUS, color.filled()))
            .map_err(|e| anyhow!("{:?}", e))?;
        area.draw(&Text::new(text, (x + MARKER_RADIUS + MARKER_TO_TEXT, y), style.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;

        match mode {
            LegendMode::Right => y += ROW_H,
            _ => x += block,
        }
    }
    Ok(())
}

/// Draw the "Low ▯▯▯ High" palette ramp, plus a hotspot swatch when the scale has one.
pub fn draw_color_ramp<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scale: &QuantileScale,
    start_x: i32,
) -> Result<()> {
    let style = TextStyle::from((FontFamily::SansSerif, FONT_PX)).pos(Pos::new(HPos::Left, VPos::Center));
    let (_w, h) = area.dim_in_pixel();
    let y = (h as i32 / 2).max(ROW_H / 2);
    let swatch_w: i32 = 32;
    let swatch_h: i32 = 16;

    let mut x = start_x;
    area.draw(&Text::new("Low", (x, y), style.clone()))
        .map_err(|e| anyhow!("{:?}", e))?;
    x += estimate_text_width_px("Low", FONT_PX) as i32 + 8;

    for c in scale.palette() {
        area.draw(&Rectangle::new(
            [(x, y - swatch_h / 2), (x + swatch_w, y + swatch_h / 2)],
            to_rgb(*c).filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        x += swatch_w;
    }
    area.draw(&Rectangle::new(
        [(start_x + estimate_text_width_px("Low", FONT_PX) as i32 + 8, y - swatch_h / 2), (x, y + swatch_h / 2)],
        BLACK.stroke_width(1),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    x += 8;
    area.draw(&Text::new("High", (x, y), style.clone()))
        .map_err(|e| anyhow!("{:?}", e))?;
    x += estimate_text_width_px("High", FONT_PX) as i32 + 32;

    if let Some(hot) = scale.hotspot_color() {
        area.draw(&Circle::new((x + 8, y), 8, to_rgb(hot).filled()))
            .map_err(|e| anyhow!("{:?}", e))?;
        area.draw(&Text::new("Hotspot", (x + 24, y), style))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}
