//! Rainfall series storage: year -> twelve monthly totals (mm) plus extents.
//!
//! The store is built once at startup and is read-only afterwards. Lookups
//! for unknown years return an empty slice rather than an error so the
//! per-frame code never has to branch on failure.

mod archive;

use std::collections::BTreeMap;
use std::path::Path;

pub use archive::{parse_archive, parse_cell, DataError};

/// Months in a complete series
pub const MONTHS: usize = 12;

/// Typical-year monthly rainfall (mm), used when no archive is available
pub const SAMPLE_MONTHLY_MM: [f32; MONTHS] = [
    15.2, 8.7, 45.3, 78.9, 156.4, 234.7, 298.5, 267.3, 189.6, 67.8, 23.4, 12.1,
];

/// (min, max) over one year's monthly values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f32,
    pub max: f32,
}

impl Extent {
    /// Extent of a series; `None` when there are no finite values
    pub fn of(values: &[f32]) -> Option<Self> {
        values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some(Extent { min: v, max: v }),
                Some(e) => Some(Extent {
                    min: e.min.min(v),
                    max: e.max.max(v),
                }),
            })
    }

    /// Map `value` into [0, 1]; a flat extent (max <= min) maps everything to 0
    pub fn normalize(&self, value: f32) -> f32 {
        if self.max <= self.min {
            return 0.0;
        }
        let t = (value - self.min) / (self.max - self.min);
        if t.is_finite() {
            t.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Parsed rainfall archive: monthly vectors and their extents, keyed by year
#[derive(Debug, Clone, Default)]
pub struct RainfallStore {
    monthly: BTreeMap<i32, Vec<f32>>,
    extents: BTreeMap<i32, Extent>,
}

impl RainfallStore {
    /// Build from (year, monthly values) rows. Rows with no values are
    /// dropped; a repeated year keeps the last row.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (i32, Vec<f32>)>,
    {
        let mut store = Self::default();
        for (year, values) in rows {
            if values.is_empty() {
                continue;
            }
            match Extent::of(&values) {
                Some(extent) => {
                    store.extents.insert(year, extent);
                }
                None => {
                    store.extents.remove(&year);
                }
            }
            store.monthly.insert(year, values);
        }
        store
    }

    /// Read and parse an archive file
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        parse_archive(&text)
    }

    /// Monthly values for `year`; empty when the year has no usable data
    pub fn monthly(&self, year: i32) -> &[f32] {
        self.monthly.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn extent(&self, year: i32) -> Option<Extent> {
        self.extents.get(&year).copied()
    }

    /// Years with data, ascending
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.monthly.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.monthly.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monthly.is_empty()
    }
}

/// Where rainfall data comes from, decided once at startup
#[derive(Debug, Clone)]
pub enum RainfallSource {
    /// Parsed observatory archive
    Archive(RainfallStore),

    /// Built-in typical year, returned for every year
    Sample,

    /// No data at all: every lookup is empty
    Unavailable,
}

impl RainfallSource {
    /// Load the archive at `path`, falling back to the built-in sample year
    /// when the file is missing, malformed, or holds no rainfall rows.
    pub fn open_or_sample(path: &Path) -> Self {
        match RainfallStore::load(path) {
            Ok(store) if !store.is_empty() => {
                log::info!(
                    "Rainfall archive {}: {} years loaded",
                    path.display(),
                    store.len()
                );
                RainfallSource::Archive(store)
            }
            Ok(_) => {
                log::warn!(
                    "Rainfall archive {} has no usable rows, using sample year",
                    path.display()
                );
                RainfallSource::Sample
            }
            Err(e) => {
                log::warn!(
                    "Rainfall archive {} unavailable ({}), using sample year",
                    path.display(),
                    e
                );
                RainfallSource::Sample
            }
        }
    }

    pub fn monthly(&self, year: i32) -> &[f32] {
        match self {
            RainfallSource::Archive(store) => store.monthly(year),
            RainfallSource::Sample => &SAMPLE_MONTHLY_MM,
            RainfallSource::Unavailable => &[],
        }
    }

    pub fn extent(&self, year: i32) -> Option<Extent> {
        match self {
            RainfallSource::Archive(store) => store.extent(year),
            RainfallSource::Sample => Extent::of(&SAMPLE_MONTHLY_MM),
            RainfallSource::Unavailable => None,
        }
    }

    /// Years that have their own data (empty for sample/unavailable)
    pub fn years(&self) -> Vec<i32> {
        match self {
            RainfallSource::Archive(store) => store.years().collect(),
            RainfallSource::Sample | RainfallSource::Unavailable => Vec::new(),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            RainfallSource::Archive(_) => "archive",
            RainfallSource::Sample => "sample year",
            RainfallSource::Unavailable => "no data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_of_series() {
        let extent = Extent::of(&SAMPLE_MONTHLY_MM).unwrap();
        assert_eq!(extent.min, 8.7);
        assert_eq!(extent.max, 298.5);
        assert!(Extent::of(&[]).is_none());
        assert!(Extent::of(&[f32::NAN]).is_none());
    }

    #[test]
    fn test_flat_extent_normalizes_to_zero() {
        let flat = Extent { min: 50.0, max: 50.0 };
        assert_eq!(flat.normalize(50.0), 0.0);
        assert_eq!(flat.normalize(500.0), 0.0);

        let extent = Extent { min: 0.0, max: 300.0 };
        assert_eq!(extent.normalize(300.0), 1.0);
        assert_eq!(extent.normalize(150.0), 0.5);
        assert_eq!(extent.normalize(-10.0), 0.0);
        assert_eq!(extent.normalize(f32::NAN), 0.0);
    }

    #[test]
    fn test_store_lookup_and_missing_year() {
        let store = RainfallStore::from_rows(vec![
            (2023, SAMPLE_MONTHLY_MM.to_vec()),
            (1941, Vec::new()),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.monthly(2023).len(), MONTHS);
        assert!(store.monthly(1941).is_empty());
        assert!(store.extent(1941).is_none());
        assert_eq!(store.extent(2023).unwrap().max, 298.5);
    }

    #[test]
    fn test_source_variants() {
        let sample = RainfallSource::Sample;
        assert_eq!(sample.monthly(1900), &SAMPLE_MONTHLY_MM);
        assert!(sample.extent(1900).is_some());

        let none = RainfallSource::Unavailable;
        assert!(none.monthly(1900).is_empty());
        assert!(none.extent(1900).is_none());
    }

    #[test]
    fn test_missing_archive_falls_back_to_sample() {
        let source = RainfallSource::open_or_sample(Path::new("/definitely/not/here.xml"));
        assert!(matches!(source, RainfallSource::Sample));
    }
}
