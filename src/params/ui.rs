//! Year slider and transport button parameters.

use std::ops::RangeInclusive;

use super::ParamError;

/// Interaction layer parameters
#[derive(Debug, Clone, PartialEq)]
pub struct UiParams {
    /// First selectable year (inclusive)
    pub first_year: i32,

    /// Last selectable year (inclusive)
    pub last_year: i32,

    /// Years the slider refuses to land on; snapped to the nearest edge
    pub unavailable_years: RangeInclusive<i32>,

    /// Year selected at startup
    pub initial_year: i32,

    /// How long Start/Stop keep their accent color after a click (seconds)
    pub flash_duration_s: f32,
}

impl Default for UiParams {
    fn default() -> Self {
        Self {
            first_year: 1884,
            last_year: 2025,
            unavailable_years: 1940..=1946,
            initial_year: 2024,
            flash_duration_s: 0.35,
        }
    }
}

impl UiParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.first_year > self.last_year {
            return Err(ParamError::EmptyYearRange {
                first: self.first_year,
                last: self.last_year,
            });
        }
        Ok(())
    }

    /// Number of selectable positions on the slider track (gap included)
    pub fn span(&self) -> i32 {
        self.last_year - self.first_year
    }
}
