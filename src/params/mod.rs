//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (seconds, pixels, mm of rainfall, etc.)
//! - Documented ranges and meanings
//! - A `validate` per struct so bad overrides fail at startup, not mid-frame

mod audio;
mod field;
mod palette;
mod render;
mod ui;

// Re-export all types
pub use audio::{audio_constants, AudioParams};
pub use field::FieldParams;
pub use palette::{PaletteParams, Rgb, WHITEN_MAX, WHITEN_STEP};
pub use render::RenderConfig;
pub use ui::UiParams;

/// Rejected parameter combination
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("grid must have at least one column and one row, got {cols}x{rows}")]
    EmptyGrid { cols: usize, rows: usize },

    #[error("need at least 2 glyph classes, got {0}")]
    TooFewGlyphClasses(usize),

    #[error("{name} must be finite and > 0, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("palette needs at least 2 color stops, got {0}")]
    TooFewStops(usize),

    #[error("year range {first}..={last} is empty")]
    EmptyYearRange { first: i32, last: i32 },

    #[error("volume floor must lie in [0, 1], got {0}")]
    FloorOutOfRange(f32),
}

/// Shared check for "finite and strictly positive" tunables.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<(), ParamError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParamError::NotPositive { name, value })
    }
}
