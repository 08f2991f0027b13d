//! Ambient audio modulation parameters and constants.

use super::{ensure_positive, ParamError};

/// Rainfall-to-volume modulation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct AudioParams {
    /// Time each month stays "active" before the cursor moves on (seconds)
    pub step_duration_s: f64,

    /// Exponential smoothing rate toward the target volume (1/seconds)
    /// Time constant of the fade is 1 / smoothing_rate
    pub smoothing_rate: f64,

    /// Volume of the driest month (0..1), keeps the track audible
    pub floor_volume: f32,

    /// Response curve exponent; < 1 makes moderate rainfall already loud
    /// Formula: target = floor + t^exponent * (1 - floor)
    pub response_exponent: f32,

    /// Sample rate the ambient synth is configured for when the device
    /// does not report one (Hz)
    pub sample_rate_hz: usize,
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            step_duration_s: 0.8,
            smoothing_rate: 0.6,
            floor_volume: 0.05,
            response_exponent: 0.9,
            sample_rate_hz: 44100,
        }
    }
}

impl AudioParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        ensure_positive("step_duration_s", self.step_duration_s)?;
        ensure_positive("smoothing_rate", self.smoothing_rate)?;
        ensure_positive("response_exponent", self.response_exponent as f64)?;
        if !(0.0..=1.0).contains(&self.floor_volume) {
            return Err(ParamError::FloorOutOfRange(self.floor_volume));
        }
        if self.sample_rate_hz == 0 {
            return Err(ParamError::NotPositive {
                name: "sample_rate_hz",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Audio block size (samples per buffer)
    /// 128 = 2.9ms @ 44.1kHz
    pub const BLOCK_SIZE: usize = 128;

    /// Hard clip applied to every output sample
    pub const OUTPUT_LIMIT: f32 = 0.5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_audio_params_are_valid() {
        assert_eq!(AudioParams::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_zero_step() {
        let params = AudioParams {
            step_duration_s: 0.0,
            ..AudioParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamError::NotPositive {
                name: "step_duration_s",
                ..
            })
        ));
    }
}
