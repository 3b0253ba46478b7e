use std::path::Path;

use anyhow::{Result, anyhow};
use plotters::prelude::*;
use tracing::{info, warn};

use crate::util::ensure_directory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn lerp(self, other: Self, t: f64) -> Self {
        let mix = |from: u8, to: u8| {
            let value = f64::from(from) + (f64::from(to) - f64::from(from)) * t;
            value.round().clamp(0.0, 255.0) as u8
        };
        Self(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    fn to_plotters(self) -> RGBColor {
        RGBColor(self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub vmin: f64,
    pub vmax: f64,
    pub low: Rgb,
    pub high: Rgb,
    pub missing: Rgb,
    pub background: Rgb,
    pub rows: usize,
    pub cols: usize,
    pub cell_px: u32,
    pub gap_px: u32,
    pub margin_px: u32,
    pub colorbar_px: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            vmin: 0.0,
            vmax: 1.0,
            low: Rgb(0xf7, 0xfc, 0xf5),
            high: Rgb(0x00, 0x44, 0x1b),
            missing: Rgb(0x0f, 0x0f, 0x0f),
            background: Rgb(0xff, 0xff, 0xff),
            rows: 4,
            cols: 5,
            cell_px: 90,
            gap_px: 10,
            margin_px: 20,
            colorbar_px: 24,
        }
    }
}

impl ChartStyle {
    pub fn color_for(&self, value: Option<f64>) -> Rgb {
        let Some(value) = value.filter(|v| v.is_finite()) else {
            return self.missing;
        };
        let span = self.vmax - self.vmin;
        let t = if span == 0.0 {
            0.0
        } else {
            ((value - self.vmin) / span).clamp(0.0, 1.0)
        };
        self.low.lerp(self.high, t)
    }

    pub fn grid_position(&self, index: usize) -> Option<(usize, usize)> {
        if self.cols == 0 || index >= self.rows * self.cols {
            return None;
        }
        Some((index / self.cols, index % self.cols))
    }

    fn pitch(&self) -> u32 {
        self.cell_px + self.gap_px
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        let width = 2 * self.margin_px + self.cols as u32 * self.pitch() - self.gap_px;
        let height = 2 * self.margin_px
            + self.rows as u32 * self.pitch()
            + self.gap_px
            + self.colorbar_px;
        (width, height)
    }
}

pub trait ChartRenderer {
    fn render(&self, metric: &str, values: &[Option<f64>], out_path: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct WaffleChartRenderer {
    style: ChartStyle,
}

impl WaffleChartRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }
}

impl ChartRenderer for WaffleChartRenderer {
    fn render(&self, metric: &str, values: &[Option<f64>], out_path: &Path) -> Result<()> {
        if let Some(parent) = out_path.parent() {
            ensure_directory(parent)?;
        }
        let style = &self.style;
        let draw_error = |err: &dyn std::fmt::Display| {
            anyhow!("failed to draw {metric} chart {}: {err}", out_path.display())
        };

        let root = BitMapBackend::new(out_path, style.canvas_size()).into_drawing_area();
        root.fill(&style.background.to_plotters())
            .map_err(|err| draw_error(&err))?;

        let margin = style.margin_px as i32;
        let pitch = style.pitch() as i32;
        let cell = style.cell_px as i32;

        for (index, value) in values.iter().enumerate() {
            let Some((row, col)) = style.grid_position(index) else {
                warn!(metric, dropped = values.len() - index, "more values than grid cells");
                break;
            };
            let x0 = margin + col as i32 * pitch;
            let y0 = margin + row as i32 * pitch;
            let color = style.color_for(*value).to_plotters();
            root.draw(&Rectangle::new([(x0, y0), (x0 + cell, y0 + cell)], color.filled()))
                .map_err(|err| draw_error(&err))?;
        }

        let bar_top = margin + style.rows as i32 * pitch;
        let bar_width = (style.cols as i32 * pitch - style.gap_px as i32).max(1);
        let steps = bar_width.min(256);
        for step in 0..steps {
            let t = f64::from(step) / f64::from((steps - 1).max(1));
            let value = style.vmin + t * (style.vmax - style.vmin);
            let x0 = margin + step * bar_width / steps;
            let x1 = margin + (step + 1) * bar_width / steps;
            let color = style.color_for(Some(value)).to_plotters();
            root.draw(&Rectangle::new(
                [(x0, bar_top), (x1, bar_top + style.colorbar_px as i32)],
                color.filled(),
            ))
            .map_err(|err| draw_error(&err))?;
        }

        root.present().map_err(|err| draw_error(&err))?;
        info!(metric, path = %out_path.display(), "rendered waffle chart");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_scale_endpoints_and_sentinel() {
        let style = ChartStyle::default();
        assert_eq!(style.color_for(Some(0.0)), style.low);
        assert_eq!(style.color_for(Some(1.0)), style.high);
        assert_eq!(style.color_for(None), style.missing);
        assert_eq!(style.color_for(Some(f64::NAN)), style.missing);
    }

    #[test]
    fn out_of_range_values_are_clamped_for_color() {
        let style = ChartStyle::default();
        assert_eq!(style.color_for(Some(-0.5)), style.low);
        assert_eq!(style.color_for(Some(3.0)), style.high);
    }

    #[test]
    fn midpoint_blends_endpoints() {
        let style = ChartStyle {
            low: Rgb(0, 0, 0),
            high: Rgb(200, 100, 50),
            ..ChartStyle::default()
        };
        assert_eq!(style.color_for(Some(0.5)), Rgb(100, 50, 25));
    }

    #[test]
    fn grid_fills_row_major_from_top_left() {
        let style = ChartStyle::default();
        assert_eq!(style.grid_position(0), Some((0, 0)));
        assert_eq!(style.grid_position(4), Some((0, 4)));
        assert_eq!(style.grid_position(5), Some((1, 0)));
        assert_eq!(style.grid_position(19), Some((3, 4)));
        assert_eq!(style.grid_position(20), None);
    }

    #[test]
    fn renderer_writes_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("charts").join("SV.png");
        let values = (0..20)
            .map(|index| (index % 3 != 0).then(|| index as f64 / 20.0))
            .collect::<Vec<_>>();

        WaffleChartRenderer::default()
            .render("SV", &values, &path)
            .expect("chart rendered");

        let bytes = std::fs::read(&path).expect("png exists");
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
