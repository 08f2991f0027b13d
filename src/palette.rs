//! Row gradient and per-cell color mapping.
//!
//! Colors are computed in 8-bit sRGB with truncating interpolation, and every
//! channel is clamped on the way out, so no input (including NaN densities or
//! modulation values) can produce a channel outside [0, 255].

use crate::params::{PaletteParams, Rgb};

pub const WHITE: Rgb = [255, 255, 255];

/// Rows past this fraction of the grid height get the bottom whiten boost
const BOTTOM_BAND_START: f32 = 0.6;

/// Share of the top whiten bias that also shifts the palette position
const TOP_PALETTE_SHIFT: f32 = 0.15;

/// Max blend toward white from the whiten controls
const WHITEN_CEILING: f32 = 0.9;

/// Max blend toward the tint color at full density
const TINT_STRENGTH: f32 = 0.95;

/// Extra green/blue added at full density
const DENSITY_GREEN_BOOST: f32 = 35.0;
const DENSITY_BLUE_BOOST: f32 = 70.0;

/// Peak-to-peak brightness swing of the column shimmer
const SHIMMER_DEPTH: f32 = 0.08;

/// Linear interpolation between two colors, truncating toward zero
pub fn lerp_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let mix = |from: u8, to: u8| {
        let from = from as f32;
        to_channel(from + (to as f32 - from) * t)
    };
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

/// Clamp to [0, 255] and truncate; NaN maps to 0
fn to_channel(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// How far into the bottom band a row sits (0 above it, 1 at the last row)
fn bottom_factor(t: f32) -> f32 {
    if t > BOTTOM_BAND_START {
        (t - BOTTOM_BAND_START) / (1.0 - BOTTOM_BAND_START)
    } else {
        0.0
    }
}

/// Gradient color for `row` of `total_rows`: palette position biased up at
/// the top and down at the bottom, then blended toward white so both the
/// top and bottom edges read whiter than the middle.
pub fn base_color_for_row(
    stops: &[Rgb],
    row: usize,
    total_rows: usize,
    top_whiten_bias: f32,
    bottom_whiten_boost: f32,
) -> Rgb {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return WHITE,
    };
    let t = (row as f32 / total_rows.saturating_sub(1).max(1) as f32).clamp(0.0, 1.0);
    let bottom = bottom_factor(t);

    let top_biased = (t - (1.0 - t) * (top_whiten_bias * TOP_PALETTE_SHIFT)).max(0.0);
    let position = if bottom > 0.0 {
        (top_biased + (1.0 - top_biased) * (bottom * bottom_whiten_boost)).min(1.0)
    } else {
        top_biased
    };

    let segments = stops.len() - 1;
    let base = if segments == 0 {
        first
    } else {
        let seg_pos = position.clamp(0.0, 1.0) * segments as f32;
        let i = (seg_pos.floor() as usize).min(segments);
        let frac = seg_pos - i as f32;
        let next = stops.get(i + 1).copied().unwrap_or(last);
        lerp_rgb(stops[i], next, frac)
    };

    let top_influence = (1.0 - t).max(0.0) * top_whiten_bias;
    let bottom_influence = bottom * bottom_whiten_boost;
    let whiten = (top_influence + bottom_influence).min(1.0);
    if whiten > 0.0 {
        lerp_rgb(base, WHITE, whiten * WHITEN_CEILING)
    } else {
        base
    }
}

/// Final color of a cell: tint toward `tint` by density, lift green/blue,
/// then scale brightness by the shimmer value `time_mod` in [0, 1].
pub fn final_cell_color(base: Rgb, tint: Rgb, density: f32, time_mod: f32) -> Rgb {
    let density = if density.is_finite() {
        density.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let time_mod = if time_mod.is_finite() {
        time_mod.clamp(0.0, 1.0)
    } else {
        0.5
    };

    let [r, g, b] = lerp_rgb(base, tint, density * TINT_STRENGTH);
    let g = to_channel(g as f32 + DENSITY_GREEN_BOOST * density);
    let b = to_channel(b as f32 + DENSITY_BLUE_BOOST * density);

    let brightness = 1.0 + (time_mod - 0.5) * SHIMMER_DEPTH;
    [
        to_channel(r as f32 * brightness),
        to_channel(g as f32 * brightness),
        to_channel(b as f32 * brightness),
    ]
}

/// Maps rows and densities to display colors using fixed palette parameters
#[derive(Debug, Clone)]
pub struct PaletteMapper {
    params: PaletteParams,
}

impl PaletteMapper {
    pub fn new(params: PaletteParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PaletteParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut PaletteParams {
        &mut self.params
    }

    pub fn base_color_for_row(&self, row: usize, total_rows: usize) -> Rgb {
        base_color_for_row(
            &self.params.stops,
            row,
            total_rows,
            self.params.top_whiten_bias,
            self.params.bottom_whiten_boost,
        )
    }

    /// Base color for every row, top to bottom
    pub fn row_colors(&self, total_rows: usize) -> Vec<Rgb> {
        (0..total_rows)
            .map(|row| self.base_color_for_row(row, total_rows))
            .collect()
    }

    pub fn final_cell_color(&self, base: Rgb, density: f32, time_mod: f32) -> Rgb {
        final_cell_color(base, self.params.tint, density, time_mod)
    }

    /// Slow brightness shimmer for column `col` at `time_s`, in [0, 1]
    pub fn column_modulation(&self, time_s: f64, col: usize) -> f32 {
        let phase = time_s * self.params.column_mod_rate as f64
            + col as f64 * self.params.column_mod_spacing as f64;
        let value = ((phase.sin() + 1.0) / 2.0) as f32;
        if value.is_finite() {
            value
        } else {
            0.5
        }
    }
}
