//! Rainscape library - animated rainfall-intensity field with ambient audio

pub mod audio;
pub mod chart;
pub mod cli;
pub mod clock;
pub mod data;
pub mod field;
pub mod palette;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod ui;
