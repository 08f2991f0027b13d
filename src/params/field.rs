//! Density field generator parameters.

use super::{ensure_positive, ParamError};

/// Multiplier applied by the "faster" live-tuning keys
pub const SPEED_STEP_UP: f32 = 1.2;

/// Multiplier applied by the "slower" live-tuning keys
pub const SPEED_STEP_DOWN: f32 = 0.8;

/// Field generator parameters
#[derive(Debug, Clone, PartialEq)]
pub struct FieldParams {
    /// Grid width in cells
    pub cols: usize,

    /// Grid height in cells
    pub rows: usize,

    /// Extra time scale a column gains at full intensity (dimensionless)
    /// Formula: time_scale = base_time_scale + intensity * speed_factor
    pub speed_factor: f32,

    /// Time scale of a completely dry column (dimensionless)
    pub base_time_scale: f32,

    /// Number of glyph classes K (density symbols, ordered dense -> sparse)
    pub glyph_classes: usize,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            cols: 100,
            rows: 36,
            speed_factor: 6.0,
            base_time_scale: 20.0,
            glyph_classes: 9,
        }
    }
}

impl FieldParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(ParamError::EmptyGrid {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.glyph_classes < 2 {
            return Err(ParamError::TooFewGlyphClasses(self.glyph_classes));
        }
        ensure_positive("speed_factor", self.speed_factor as f64)?;
        ensure_positive("base_time_scale", self.base_time_scale as f64)?;
        Ok(())
    }

    /// Scale the intensity-driven speed up (`faster == true`) or down
    pub fn nudge_speed_factor(&mut self, faster: bool) -> f32 {
        self.speed_factor *= if faster { SPEED_STEP_UP } else { SPEED_STEP_DOWN };
        self.speed_factor
    }

    /// Scale the base animation speed up or down
    pub fn nudge_base_time_scale(&mut self, faster: bool) -> f32 {
        self.base_time_scale *= if faster { SPEED_STEP_UP } else { SPEED_STEP_DOWN };
        self.base_time_scale
    }
}
