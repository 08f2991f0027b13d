//! Row gradient and density tint parameters.

use super::{ensure_positive, ParamError};

/// 8-bit sRGB color triple
pub type Rgb = [u8; 3];

/// Upper bound for both whiten controls
pub const WHITEN_MAX: f32 = 1.5;

/// Increment applied by the whiten live-tuning keys
pub const WHITEN_STEP: f32 = 0.05;

/// Palette mapper parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteParams {
    /// How strongly the top rows are pulled toward white (0..1.5)
    pub top_whiten_bias: f32,

    /// How strongly the bottom 40% of rows are pulled toward white (0..1.5)
    pub bottom_whiten_boost: f32,

    /// Ordered gradient stops, top row -> bottom row (deep blue -> near white)
    pub stops: Vec<Rgb>,

    /// Color dense cells are tinted toward
    pub tint: Rgb,

    /// Angular rate of the per-column brightness shimmer (rad/s)
    pub column_mod_rate: f32,

    /// Phase offset between neighbouring columns (rad/column)
    pub column_mod_spacing: f32,
}

impl Default for PaletteParams {
    fn default() -> Self {
        Self {
            top_whiten_bias: 0.30,
            bottom_whiten_boost: 0.25,
            stops: vec![
                [20, 100, 255],
                [10, 150, 255],
                [0, 200, 255],
                [0, 230, 220],
                [60, 230, 220],
                [190, 245, 250],
            ],
            tint: [230, 255, 255],
            column_mod_rate: 1.2,
            column_mod_spacing: 0.12,
        }
    }
}

impl PaletteParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.stops.len() < 2 {
            return Err(ParamError::TooFewStops(self.stops.len()));
        }
        ensure_positive("column_mod_rate", self.column_mod_rate as f64)?;
        Ok(())
    }

    pub fn nudge_top_whiten(&mut self, delta: f32) -> f32 {
        self.top_whiten_bias = (self.top_whiten_bias + delta).clamp(0.0, WHITEN_MAX);
        self.top_whiten_bias
    }

    pub fn nudge_bottom_whiten(&mut self, delta: f32) -> f32 {
        self.bottom_whiten_boost = (self.bottom_whiten_boost + delta).clamp(0.0, WHITEN_MAX);
        self.bottom_whiten_boost
    }
}
