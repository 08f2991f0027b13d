//! Per-year rainfall bar charts shown in the chart panel.
//!
//! Pre-rendered `rainfall_<year>.png` files win when present; otherwise the
//! chart is rasterized from the year's monthly series. Either way the result
//! is cached per year.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use crate::data::{RainfallSource, MONTHS};

/// Default raster size for generated charts (px)
pub const CHART_WIDTH: u32 = 480;
pub const CHART_HEIGHT: u32 = 270;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BAR: Rgba<u8> = Rgba([65, 105, 225, 255]);
const AXIS: Rgba<u8> = Rgba([200, 200, 200, 255]);

/// Fraction of each month slot covered by its bar
const BAR_FILL: f32 = 0.7;

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("chart image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("chart directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `<dir>/rainfall_<year>.png`
pub fn chart_path(dir: &Path, year: i32) -> PathBuf {
    dir.join(format!("rainfall_{year}.png"))
}

/// Rasterize a monthly series as a bar chart.
///
/// Bars are scaled to the series maximum; a series with no positive values
/// draws only the axis. Fewer than 12 values leave the trailing slots empty.
pub fn render_bar_chart(values: &[f32], width: u32, height: u32) -> RgbaImage {
    let width = width.max(1);
    let height = height.max(1);
    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);

    let margin = (width.min(height) / 12).max(1);
    let plot_w = width.saturating_sub(2 * margin).max(1);
    let plot_h = height.saturating_sub(2 * margin).max(1);
    let baseline = margin + plot_h;

    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f32, f32::max);

    if max > 0.0 {
        let slot = plot_w as f32 / MONTHS as f32;
        let bar_w = (slot * BAR_FILL).max(1.0) as u32;
        for (month, &value) in values.iter().take(MONTHS).enumerate() {
            if !value.is_finite() || value <= 0.0 {
                continue;
            }
            let bar_h = ((value / max) * plot_h as f32).round() as u32;
            let x0 = margin + (month as f32 * slot + (slot - bar_w as f32) / 2.0) as u32;
            fill_rect(&mut img, x0, baseline.saturating_sub(bar_h), bar_w, bar_h, BAR);
        }
    }

    fill_rect(&mut img, margin, baseline.min(height - 1), plot_w, 1, AXIS);
    img
}

/// Fill a rectangle, clipped to the image
fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    let x_end = x.saturating_add(w).min(img.width());
    let y_end = y.saturating_add(h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

/// Lazily loaded chart bitmaps keyed by year
#[derive(Debug)]
pub struct ChartCache {
    dir: PathBuf,
    width: u32,
    height: u32,
    charts: HashMap<i32, Option<RgbaImage>>,
}

impl ChartCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            charts: HashMap::new(),
        }
    }

    /// Chart for `year`, `None` when there is neither a file nor data
    pub fn get(&mut self, year: i32, source: &RainfallSource) -> Option<&RgbaImage> {
        let (dir, width, height) = (&self.dir, self.width, self.height);
        self.charts
            .entry(year)
            .or_insert_with(|| load_or_render(dir, year, source, width, height))
            .as_ref()
    }

    /// Drop cached charts (after the chart files were regenerated)
    pub fn clear(&mut self) {
        self.charts.clear();
    }
}

fn load_or_render(
    dir: &Path,
    year: i32,
    source: &RainfallSource,
    width: u32,
    height: u32,
) -> Option<RgbaImage> {
    let path = chart_path(dir, year);
    if path.is_file() {
        match image::open(&path) {
            Ok(img) => return Some(img.to_rgba8()),
            Err(e) => log::warn!("Ignoring unreadable chart {}: {e}", path.display()),
        }
    }
    let values = source.monthly(year);
    if values.is_empty() {
        log::debug!("No chart for {year}: no data");
        return None;
    }
    Some(render_bar_chart(values, width, height))
}

/// Write one PNG per year with data into `dir`; returns how many were written
pub fn render_all(dir: &Path, source: &RainfallSource) -> Result<usize, ChartError> {
    std::fs::create_dir_all(dir).map_err(|source| ChartError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = 0;
    for year in source.years() {
        let values = source.monthly(year);
        if values.is_empty() {
            continue;
        }
        let path = chart_path(dir, year);
        render_bar_chart(values, CHART_WIDTH, CHART_HEIGHT)
            .save(&path)
            .map_err(|source| ChartError::Image {
                path: path.clone(),
                source,
            })?;
        log::info!("Saved: {}", path.display());
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RainfallStore;

    fn bar_height(img: &RgbaImage, x: u32) -> u32 {
        (0..img.height())
            .filter(|&y| *img.get_pixel(x, y) == BAR)
            .count() as u32
    }

    #[test]
    fn test_chart_path() {
        assert_eq!(
            chart_path(Path::new("charts"), 1997),
            Path::new("charts").join("rainfall_1997.png")
        );
    }

    #[test]
    fn test_tallest_bar_is_wettest_month() {
        let mut values = [10.0; 12];
        values[6] = 300.0;
        let img = render_bar_chart(&values, 240, 120);
        assert_eq!(img.dimensions(), (240, 120));

        let margin = 10;
        let slot = (240 - 2 * margin) as f32 / 12.0;
        let center = |m: usize| margin + (m as f32 * slot + slot / 2.0) as u32;
        let july = bar_height(&img, center(6));
        let jan = bar_height(&img, center(0));
        assert!(july > jan * 10, "july {july} jan {jan}");
    }

    #[test]
    fn test_dry_year_draws_no_bars() {
        let img = render_bar_chart(&[0.0; 12], 120, 60);
        assert!(img.pixels().all(|p| *p != BAR));
        assert!(img.pixels().any(|p| *p == AXIS));
    }

    #[test]
    fn test_cache_prefers_file_then_data() {
        let dir = tempfile::tempdir().unwrap();
        let marker = RgbaImage::from_pixel(4, 3, Rgba([1, 2, 3, 255]));
        marker.save(chart_path(dir.path(), 2001)).unwrap();

        let source = RainfallSource::Archive(RainfallStore::from_rows([
            (2001, vec![1.0; 12]),
            (2002, vec![5.0; 12]),
        ]));
        let mut cache = ChartCache::new(dir.path());

        assert_eq!(cache.get(2001, &source).unwrap().dimensions(), (4, 3));
        assert_eq!(
            cache.get(2002, &source).unwrap().dimensions(),
            (CHART_WIDTH, CHART_HEIGHT)
        );
        assert!(cache.get(1999, &source).is_none());
    }

    #[test]
    fn test_render_all_writes_each_year() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("charts");
        let source = RainfallSource::Archive(RainfallStore::from_rows([
            (1990, vec![3.0; 12]),
            (1991, vec![4.0; 12]),
        ]));
        assert_eq!(render_all(&out, &source).unwrap(), 2);
        assert!(chart_path(&out, 1990).is_file());
        assert!(chart_path(&out, 1991).is_file());
    }
}
