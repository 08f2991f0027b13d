//! Transport buttons (Start / Stop / Reload).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Start,
    Stop,
    Reload,
}

impl ButtonKind {
    pub const ALL: [ButtonKind; 3] = [ButtonKind::Start, ButtonKind::Stop, ButtonKind::Reload];

    /// Accent shown briefly after a click; Reload has none
    pub fn accent(self) -> Option<[f32; 3]> {
        match self {
            ButtonKind::Start => Some([0.2, 0.8, 0.3]),
            ButtonKind::Stop => Some([0.9, 0.2, 0.2]),
            ButtonKind::Reload => None,
        }
    }
}

/// Press-arm / release-fire button. Releasing outside cancels.
#[derive(Debug, Clone)]
pub struct TransportButton {
    kind: ButtonKind,
    armed: bool,
    flash_remaining_s: f32,
}

impl TransportButton {
    pub fn new(kind: ButtonKind) -> Self {
        Self {
            kind,
            armed: false,
            flash_remaining_s: 0.0,
        }
    }

    pub fn kind(&self) -> ButtonKind {
        self.kind
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Pointer down; arms the button when the pointer is over it
    pub fn press(&mut self, inside: bool) {
        if inside {
            self.armed = true;
        }
    }

    /// Pointer up; returns true when the click fired
    pub fn release(&mut self, inside: bool, flash_duration_s: f32) -> bool {
        let fired = self.armed && inside;
        self.armed = false;
        if fired && self.kind.accent().is_some() {
            self.flash_remaining_s = flash_duration_s;
        }
        fired
    }

    /// Count down the accent flash
    pub fn tick(&mut self, dt_s: f32) {
        if dt_s.is_finite() && dt_s > 0.0 {
            self.flash_remaining_s = (self.flash_remaining_s - dt_s).max(0.0);
        }
    }

    /// Accent color while flashing
    pub fn flash_color(&self) -> Option<[f32; 3]> {
        if self.flash_remaining_s > 0.0 {
            self.kind.accent()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_inside_fires() {
        let mut b = TransportButton::new(ButtonKind::Start);
        b.press(true);
        assert!(b.is_armed());
        assert!(b.release(true, 0.35));
        assert!(!b.is_armed());
    }

    #[test]
    fn test_release_outside_cancels() {
        let mut b = TransportButton::new(ButtonKind::Stop);
        b.press(true);
        assert!(!b.release(false, 0.35));
        assert!(b.flash_color().is_none());
    }

    #[test]
    fn test_release_without_press_does_nothing() {
        let mut b = TransportButton::new(ButtonKind::Reload);
        b.press(false);
        assert!(!b.release(true, 0.35));
    }

    #[test]
    fn test_flash_expires() {
        let mut b = TransportButton::new(ButtonKind::Start);
        b.press(true);
        b.release(true, 0.35);
        assert_eq!(b.flash_color(), ButtonKind::Start.accent());
        b.tick(0.2);
        assert!(b.flash_color().is_some());
        b.tick(0.2);
        assert!(b.flash_color().is_none());
    }

    #[test]
    fn test_reload_has_no_flash() {
        let mut b = TransportButton::new(ButtonKind::Reload);
        b.press(true);
        assert!(b.release(true, 0.35));
        assert!(b.flash_color().is_none());
    }
}
