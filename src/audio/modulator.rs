//! Month cursor and smoothed rainfall volume.

use crate::clock::sanitize_dt;
use crate::data::{Extent, MONTHS};
use crate::params::AudioParams;

/// Audio-side state: which month is "playing" and how loud it currently is
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioCursor {
    /// Active month, 0 = January
    pub month_index: usize,
    /// Time spent in the active month (seconds)
    pub accumulated_s: f64,
    /// Smoothed playback volume in [0, 1]
    pub volume: f32,
}

/// Steps through the months of the selected year at a fixed cadence and
/// eases the volume toward each month's normalized rainfall.
#[derive(Debug, Clone)]
pub struct AudioModulator {
    params: AudioParams,
    cursor: AudioCursor,
}

impl AudioModulator {
    pub fn new(params: AudioParams) -> Self {
        Self {
            params,
            cursor: AudioCursor::default(),
        }
    }

    pub fn params(&self) -> &AudioParams {
        &self.params
    }

    pub fn cursor(&self) -> AudioCursor {
        self.cursor
    }

    pub fn volume(&self) -> f32 {
        self.cursor.volume
    }

    /// Back to January, silent (reload)
    pub fn reset(&mut self) {
        self.cursor = AudioCursor::default();
    }

    /// Advance the month cursor by `dt_s` and return the smoothed volume.
    ///
    /// Each full `step_duration_s` moves to the next month (mod 12); the
    /// remainder carries over. The volume then moves toward the active
    /// month's target with `alpha = 1 - exp(-smoothing_rate * dt)`.
    pub fn advance(&mut self, dt_s: f64, values: &[f32], extent: Option<Extent>) -> f32 {
        let dt_s = sanitize_dt(dt_s);
        let step = self.params.step_duration_s;

        self.cursor.accumulated_s += dt_s;
        if step > 0.0 && self.cursor.accumulated_s >= step {
            let steps = (self.cursor.accumulated_s / step).floor();
            self.cursor.accumulated_s -= steps * step;
            self.cursor.month_index =
                (self.cursor.month_index + (steps as usize % MONTHS)) % MONTHS;
        }

        let target = target_volume(&self.params, values, extent, self.cursor.month_index);
        let alpha = (1.0 - (-self.params.smoothing_rate * dt_s).exp()) as f32;
        let volume = (1.0 - alpha) * self.cursor.volume + alpha * target;
        self.cursor.volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.cursor.volume
    }
}

/// Rainfall of `month` in a series. Full series index directly; shorter,
/// non-empty ones stand in with their mean; empty gives `None`.
pub fn month_value(values: &[f32], month: usize) -> Option<f32> {
    if values.len() >= MONTHS {
        return values.get(month % MONTHS).copied();
    }
    let finite: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    Some(finite.iter().sum::<f32>() / finite.len() as f32)
}

/// Volume the cursor eases toward for `month`.
///
/// Formula: floor + t^exponent * (1 - floor), with t the month's rainfall
/// normalized by the year's extent (0 when the extent is flat or missing).
/// A year without any data targets silence.
pub fn target_volume(
    params: &AudioParams,
    values: &[f32],
    extent: Option<Extent>,
    month: usize,
) -> f32 {
    let Some(value) = month_value(values, month) else {
        return 0.0;
    };
    let t = extent.map(|e| e.normalize(value)).unwrap_or(0.0);
    let floor = params.floor_volume;
    (floor + t.powf(params.response_exponent) * (1.0 - floor)).clamp(0.0, 1.0)
}
