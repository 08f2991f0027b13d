//! Window and presentation configuration.

use super::{ensure_positive, ParamError};

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Gap between the window border and the glyph grid (pixels)
    pub padding_px: f32,

    /// Clear color behind the grid (linear RGB)
    pub background: [f64; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            padding_px: 8.0,
            background: [0.0, 0.0, 0.0], // black
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ParamError::NotPositive {
                name: "window size",
                value: 0.0,
            });
        }
        if self.padding_px != 0.0 {
            ensure_positive("padding_px", self.padding_px as f64)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_render_config_is_valid() {
        assert_eq!(RenderConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = RenderConfig {
            window_width: 0,
            ..RenderConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
