//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::data::RainfallSource;
use crate::params::{FieldParams, ParamError};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "rainscape")]
#[command(
    about = "Animated rainfall field with year scrubbing and ambient rain",
    long_about = None
)]
pub struct Args {
    /// Rainfall archive (monthly element file)
    #[arg(long, value_name = "PATH", default_value = "monthlyElement.xml")]
    pub data: PathBuf,

    /// Directory of pre-rendered rainfall_<year>.png charts
    #[arg(long, value_name = "DIR", default_value = "rainfall_charts")]
    pub charts: PathBuf,

    /// Looping ambient WAV track (synthesized rain when absent)
    #[arg(long, value_name = "WAV")]
    pub ambient: Option<PathBuf>,

    /// Initial year (snapped into the selectable range)
    #[arg(long, value_name = "YEAR")]
    pub year: Option<i32>,

    /// Grid columns
    #[arg(long)]
    pub cols: Option<usize>,

    /// Grid rows
    #[arg(long)]
    pub rows: Option<usize>,

    /// How much rainfall intensity speeds up a column
    #[arg(long)]
    pub speed_factor: Option<f32>,

    /// Base animation time scale
    #[arg(long)]
    pub base_time_scale: Option<f32>,

    /// Run without opening an audio device
    #[arg(long)]
    pub no_audio: bool,

    /// Ignore the archive and run without rainfall data
    #[arg(long)]
    pub no_data: bool,

    /// Print the colored grid at this simulation time and exit
    #[arg(long, value_name = "SECONDS")]
    pub snapshot: Option<f64>,

    /// Write one chart PNG per archive year into --charts and exit
    #[arg(long)]
    pub render_charts: bool,
}

impl Args {
    /// Field parameters with command-line overrides applied
    pub fn field_params(&self) -> Result<FieldParams, ParamError> {
        let mut params = FieldParams::default();
        if let Some(cols) = self.cols {
            params.cols = cols;
        }
        if let Some(rows) = self.rows {
            params.rows = rows;
        }
        if let Some(speed_factor) = self.speed_factor {
            params.speed_factor = speed_factor;
        }
        if let Some(base_time_scale) = self.base_time_scale {
            params.base_time_scale = base_time_scale;
        }
        params.validate()?;
        Ok(params)
    }

    /// Resolve the rainfall source once
    pub fn rainfall_source(&self) -> RainfallSource {
        if self.no_data {
            log::info!("Rainfall data disabled (--no-data)");
            RainfallSource::Unavailable
        } else {
            RainfallSource::open_or_sample(&self.data)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["rainscape"]).unwrap();
        assert_eq!(args.data, PathBuf::from("monthlyElement.xml"));
        assert_eq!(args.charts, PathBuf::from("rainfall_charts"));
        assert!(!args.no_audio);
        assert_eq!(args.field_params().unwrap(), FieldParams::default());
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "rainscape",
            "--cols",
            "40",
            "--rows",
            "12",
            "--speed-factor",
            "3.5",
            "--year",
            "1942",
            "--snapshot",
            "2.5",
        ])
        .unwrap();
        let params = args.field_params().unwrap();
        assert_eq!((params.cols, params.rows), (40, 12));
        assert_eq!(params.speed_factor, 3.5);
        assert_eq!(args.year, Some(1942));
        assert_eq!(args.snapshot, Some(2.5));
    }

    #[test]
    fn test_invalid_grid_rejected() {
        let args = Args::try_parse_from(["rainscape", "--cols", "0"]).unwrap();
        assert!(matches!(
            args.field_params(),
            Err(ParamError::EmptyGrid { cols: 0, .. })
        ));
    }

    #[test]
    fn test_no_data_source() {
        let args = Args::try_parse_from(["rainscape", "--no-data"]).unwrap();
        assert!(matches!(args.rainfall_source(), RainfallSource::Unavailable));
    }

    #[test]
    fn test_missing_archive_falls_back_to_sample() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.xml");
        let args =
            Args::try_parse_from(["rainscape", "--data", missing.to_str().unwrap()]).unwrap();
        assert!(matches!(args.rainfall_source(), RainfallSource::Sample));
    }
}
