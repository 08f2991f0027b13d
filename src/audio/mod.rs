//! Ambient rain audio: rainfall-driven volume modulation and playback.
//!
//! [`AudioModulator`] is pure and runs every frame whether or not a device
//! exists; [`AudioSystem`] owns the cpal stream and only applies the volume.

mod modulator;
mod synthesis;
mod system;
mod track;

// Re-export public types
pub use modulator::{month_value, target_volume, AudioCursor, AudioModulator};
pub use system::{AudioError, AudioSource, AudioSystem};
pub use track::AmbientTrack;
