//! Simulation time accumulator.

/// Accumulated animation time (seconds). Advances only while running, so a
/// paused clock holds the field frozen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationClock {
    time_s: f64,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt_s` when `running`, then return the accumulated time.
    ///
    /// Negative or non-finite deltas count as 0, so time never decreases and
    /// never becomes NaN. A paused tick ignores `dt_s` entirely.
    pub fn tick(&mut self, dt_s: f64, running: bool) -> f64 {
        if running {
            self.time_s += sanitize_dt(dt_s);
        }
        self.time_s
    }

    pub fn time_s(&self) -> f64 {
        self.time_s
    }

    /// Back to t = 0 (reload)
    pub fn reset(&mut self) {
        self.time_s = 0.0;
    }
}

/// Frame delta with negatives and NaN/inf mapped to 0
pub fn sanitize_dt(dt_s: f64) -> f64 {
    if dt_s.is_finite() && dt_s > 0.0 {
        dt_s
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_paused_tick_freezes_time() {
        let mut clock = AnimationClock::new();
        let t = clock.tick(0.5, true);
        assert_eq!(clock.tick(10.0, false), t);
        assert_eq!(clock.tick(f64::INFINITY, false), t);
    }

    #[test]
    fn test_bad_deltas_are_ignored() {
        let mut clock = AnimationClock::new();
        clock.tick(1.0, true);
        assert_eq!(clock.tick(-5.0, true), 1.0);
        assert_eq!(clock.tick(f64::NAN, true), 1.0);
        assert_eq!(clock.tick(f64::NEG_INFINITY, true), 1.0);
    }

    #[test]
    fn test_reset() {
        let mut clock = AnimationClock::new();
        clock.tick(3.0, true);
        clock.reset();
        assert_eq!(clock.time_s(), 0.0);
    }

    fn frame_delta() -> impl Strategy<Value = f64> {
        prop_oneof![
            8 => -1.0e3f64..1.0e3,
            1 => Just(f64::NAN),
            1 => Just(f64::INFINITY),
        ]
    }

    proptest! {
        #[test]
        fn prop_time_is_monotonic(
            steps in prop::collection::vec((frame_delta(), any::<bool>()), 1..200),
        ) {
            let mut clock = AnimationClock::new();
            let mut prev = clock.time_s();
            for (dt, running) in steps {
                let now = clock.tick(dt, running);
                prop_assert!(now.is_finite());
                prop_assert!(now >= prev);
                if !running {
                    prop_assert_eq!(now, prev);
                }
                prev = now;
            }
        }
    }
}
