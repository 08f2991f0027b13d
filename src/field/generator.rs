//! Trigonometric pseudo-noise field generator.
//!
//! No random state: the output is a pure function of
//! (monthly values, time, parameters), so identical inputs give
//! bit-identical grids.

use rayon::prelude::*;

use super::{FieldCell, Grid};
use crate::params::FieldParams;

/// Field generator with fixed parameters
#[derive(Debug, Clone)]
pub struct FieldGenerator {
    params: FieldParams,
}

/// Per-column inputs shared by every row
#[derive(Clone, Copy, Debug)]
struct ColumnDrive {
    intensity: f64,
    local_time: f64,
}

impl FieldGenerator {
    pub fn new(params: FieldParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut FieldParams {
        &mut self.params
    }

    /// Time scale applied to column `col`
    /// Formula: base_time_scale + intensity * speed_factor
    pub fn column_time_scale(&self, values: &[f32], col: usize) -> f64 {
        let intensity = column_intensity(values, col, self.params.cols) as f64;
        self.params.base_time_scale as f64 + intensity * self.params.speed_factor as f64
    }

    /// Compute the field at `time_s`. Rows are filled in parallel; every cell
    /// depends only on its own coordinates, so the result equals
    /// [`FieldGenerator::generate_sequential`].
    pub fn generate(&self, values: &[f32], time_s: f64) -> Grid {
        let (cols, rows) = (self.params.cols, self.params.rows);
        if cols == 0 || rows == 0 {
            return Grid::from_cells(0, 0, Vec::new());
        }
        let drives = self.column_drives(values, time_s);
        let classes = self.params.glyph_classes;

        let mut cells = vec![FieldCell::default(); cols * rows];
        cells
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    *cell = sample_cell(x, y, drives[x], classes);
                }
            });

        Grid::from_cells(cols, rows, cells)
    }

    /// Single-threaded reference of [`FieldGenerator::generate`]
    pub fn generate_sequential(&self, values: &[f32], time_s: f64) -> Grid {
        let (cols, rows) = (self.params.cols, self.params.rows);
        if cols == 0 || rows == 0 {
            return Grid::from_cells(0, 0, Vec::new());
        }
        let drives = self.column_drives(values, time_s);
        let classes = self.params.glyph_classes;

        let mut cells = Vec::with_capacity(cols * rows);
        for y in 0..rows {
            for (x, drive) in drives.iter().enumerate() {
                cells.push(sample_cell(x, y, *drive, classes));
            }
        }
        Grid::from_cells(cols, rows, cells)
    }

    fn column_drives(&self, values: &[f32], time_s: f64) -> Vec<ColumnDrive> {
        let time_s = if time_s.is_finite() { time_s } else { 0.0 };
        (0..self.params.cols)
            .map(|col| ColumnDrive {
                intensity: column_intensity(values, col, self.params.cols) as f64,
                local_time: time_s * self.column_time_scale(values, col),
            })
            .collect()
    }
}

/// Rainfall intensity feeding column `col` of `cols`: the month value picked
/// by `floor(col / cols * len)` divided by the series maximum.
///
/// Empty series, a non-positive maximum, and non-finite values all give 0.
pub fn column_intensity(values: &[f32], col: usize, cols: usize) -> f32 {
    if values.is_empty() || cols == 0 {
        return 0.0;
    }
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f32::NEG_INFINITY, f32::max);
    if max <= 0.0 {
        return 0.0;
    }
    let index = ((col as f64 / cols as f64) * values.len() as f64).floor() as usize;
    let value = values[index.min(values.len() - 1)];
    let intensity = value / max;
    if intensity.is_finite() {
        intensity.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// One cell of the field: four travelling waves plus two flow terms,
/// weighted by intensity, then perturbed by fixed pseudo-noise and squashed
/// through tanh into [0, 1].
fn sample_cell(x: usize, y: usize, drive: ColumnDrive, classes: usize) -> FieldCell {
    let (x, y) = (x as f64, y as f64);
    let t = drive.local_time;

    // Pattern drifts right and upward
    let flow_x = x + t * 0.2;
    let flow_y = y - t * 0.8;

    let wave1 = (x * 0.18 + flow_y * 0.12 + t * 0.05).sin() * 0.5 + 0.5;
    let wave2 = (x * 0.08 + flow_y * 0.22 + t * 0.08).sin() * 0.4 + 0.6;
    let wave3 = (x * 0.25 + flow_y * 0.08 - t * 0.06).cos() * 0.5 + 0.5;
    let wave4 = (flow_x * 0.15 + flow_y * 0.35 + t * 0.1).sin() * 0.3 + 0.7;

    let horizontal_flow = (x * 0.15 + t * 0.12).sin() * 0.3;
    let diagonal_flow = (x * 0.08 + y * 0.08 + t * 0.09).cos() * 0.25;

    let combined = (wave1 + wave2 + wave3 + wave4) / 4.0 + horizontal_flow + diagonal_flow;
    let modulated = combined * drive.intensity;

    let noise1 = (x * 0.5 + flow_y * 0.4 + t * 0.15).sin() * 0.2;
    let noise2 = (x * 0.7 + y * 0.3 + t * 0.12).cos() * 0.15;
    let randomness = (x * 1.2 + y * 0.8 + t * 0.18).sin() * (x * 0.6 + y * 1.1).cos() * 0.25;
    let value = modulated + noise1 + noise2 + randomness;

    // Decorrelates neighbouring glyph choices from the color density
    let glyph_jitter = (x * 0.3 + y * 0.5 + t * 0.1).sin() * 0.1;

    let norm = (value + glyph_jitter).tanh() * 0.5 + 0.5;
    let density = if norm.is_finite() {
        norm.clamp(0.0, 1.0) as f32
    } else {
        0.5
    };

    FieldCell {
        glyph: glyph_class(density, classes),
        density,
    }
}

/// Bucket a density into `floor(density * (K - 1))`, clamped to [0, K-1]
pub(crate) fn glyph_class(density: f32, classes: usize) -> u8 {
    let top = classes.saturating_sub(1).min(u8::MAX as usize);
    let index = (density.clamp(0.0, 1.0) * top as f32).floor() as usize;
    index.min(top) as u8
}
