//! Year slider: pointer/keyboard input to a selectable year.

use std::ops::RangeInclusive;

use glam::Vec2;

use super::layout::Rect;
use crate::params::UiParams;

/// Move a year out of the unavailable range to the nearest boundary
/// outside it. Ties go to the earlier year.
pub fn snap_year(year: i32, unavailable: &RangeInclusive<i32>) -> i32 {
    if !unavailable.contains(&year) {
        return year;
    }
    let before = *unavailable.start() - 1;
    let after = *unavailable.end() + 1;
    if year - before <= after - year {
        before
    } else {
        after
    }
}

#[derive(Debug, Clone)]
pub struct YearSlider {
    first: i32,
    last: i32,
    unavailable: RangeInclusive<i32>,
    year: i32,
    grabbed: bool,
}

impl YearSlider {
    pub fn new(params: &UiParams) -> Self {
        let mut slider = Self {
            first: params.first_year,
            last: params.last_year,
            unavailable: params.unavailable_years.clone(),
            year: params.first_year,
            grabbed: false,
        };
        slider.year = slider.clamp_year(params.initial_year);
        slider
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    /// Clamp into [first, last], then snap out of the unavailable range
    pub fn clamp_year(&self, year: i32) -> i32 {
        snap_year(year.clamp(self.first, self.last), &self.unavailable)
            .clamp(self.first, self.last)
    }

    /// Year under horizontal position `x` on `track` (linear, rounded, snapped)
    pub fn year_at(&self, x: f32, track: &Rect) -> i32 {
        let span = (self.last - self.first) as f32;
        let t = if track.size.x > 0.0 {
            ((x - track.origin.x) / track.size.x).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.clamp_year(self.first + (t * span).round() as i32)
    }

    /// Knob position along the track in [0, 1]
    pub fn fraction(&self) -> f32 {
        let span = self.last - self.first;
        if span <= 0 {
            return 0.0;
        }
        (self.year - self.first) as f32 / span as f32
    }

    /// Select `year` (clamped and snapped); returns it when it changed
    pub fn set_year(&mut self, year: i32) -> Option<i32> {
        let year = self.clamp_year(year);
        if year == self.year {
            return None;
        }
        self.year = year;
        Some(year)
    }

    /// Pointer press: grabs the knob when inside `hit_area`
    pub fn press(&mut self, pos: Vec2, hit_area: &Rect, track: &Rect) -> Option<i32> {
        if !hit_area.contains(pos) {
            return None;
        }
        self.grabbed = true;
        self.set_year(self.year_at(pos.x, track))
    }

    /// Pointer motion: only moves the selection while grabbed
    pub fn drag(&mut self, pos: Vec2, track: &Rect) -> Option<i32> {
        if !self.grabbed {
            return None;
        }
        self.set_year(self.year_at(pos.x, track))
    }

    pub fn release(&mut self) {
        self.grabbed = false;
    }

    /// One year forward/back, hopping over the unavailable range
    pub fn step(&mut self, forward: bool) -> Option<i32> {
        let delta = if forward { 1 } else { -1 };
        let mut next = self.year + delta;
        if self.unavailable.contains(&next) {
            next = if forward {
                *self.unavailable.end() + 1
            } else {
                *self.unavailable.start() - 1
            };
        }
        self.set_year(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider() -> YearSlider {
        YearSlider::new(&UiParams::default())
    }

    #[test]
    fn test_snap_year_nearest_boundary() {
        let gap = 1940..=1946;
        assert_eq!(snap_year(1939, &gap), 1939);
        for year in 1940..=1943 {
            assert_eq!(snap_year(year, &gap), 1939);
        }
        for year in 1944..=1946 {
            assert_eq!(snap_year(year, &gap), 1947);
        }
        assert_eq!(snap_year(1947, &gap), 1947);
    }

    #[test]
    fn test_year_at_track_ends() {
        let s = slider();
        let track = Rect::new(100.0, 0.0, 141.0, 10.0);
        assert_eq!(s.year_at(100.0, &track), 1884);
        assert_eq!(s.year_at(241.0, &track), 2025);
        assert_eq!(s.year_at(-50.0, &track), 1884);
        assert_eq!(s.year_at(900.0, &track), 2025);
        // One pixel per year on a 141 px track
        assert_eq!(s.year_at(150.0, &track), 1934);
        assert_eq!(s.year_at(159.0, &track), 1939);
        assert_eq!(s.year_at(161.0, &track), 1947);
    }

    #[test]
    fn test_initial_year() {
        assert_eq!(slider().year(), 2024);
        let params = UiParams {
            initial_year: 1942,
            ..UiParams::default()
        };
        assert_eq!(YearSlider::new(&params).year(), 1939);
    }

    #[test]
    fn test_drag_only_while_grabbed() {
        let mut s = slider();
        let track = Rect::new(0.0, 0.0, 141.0, 10.0);
        let hit = Rect::new(0.0, -10.0, 141.0, 30.0);

        assert_eq!(s.drag(Vec2::new(0.0, 5.0), &track), None);
        assert_eq!(s.press(Vec2::new(500.0, 5.0), &hit, &track), None);
        assert!(!s.is_grabbed());

        assert_eq!(s.press(Vec2::new(10.0, 5.0), &hit, &track), Some(1894));
        assert_eq!(s.drag(Vec2::new(20.0, 50.0), &track), Some(1904));
        s.release();
        assert_eq!(s.drag(Vec2::new(30.0, 5.0), &track), None);
        assert_eq!(s.year(), 1904);
    }

    #[test]
    fn test_step_hops_gap_and_stops_at_ends() {
        let mut s = slider();
        s.set_year(1939);
        assert_eq!(s.step(true), Some(1947));
        assert_eq!(s.step(false), Some(1939));

        s.set_year(2025);
        assert_eq!(s.step(true), None);
        s.set_year(1884);
        assert_eq!(s.step(false), None);
    }

    #[test]
    fn test_fraction() {
        let mut s = slider();
        s.set_year(1884);
        assert_eq!(s.fraction(), 0.0);
        s.set_year(2025);
        assert_eq!(s.fraction(), 1.0);
    }
}
