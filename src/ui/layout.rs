//! Screen-space geometry of the overlay controls (pixels, origin top-left).

use glam::Vec2;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w.max(0.0), h.max(0.0)),
        }
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Half-open containment: left/top edges inside, right/bottom outside
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x < self.right()
            && point.y < self.bottom()
    }

    /// Shrink by `amount` on every side
    pub fn inset(&self, amount: f32) -> Rect {
        Rect::new(
            self.origin.x + amount,
            self.origin.y + amount,
            self.size.x - 2.0 * amount,
            self.size.y - 2.0 * amount,
        )
    }

    /// [x, y, w, h] for instance buffers
    pub fn to_array(&self) -> [f32; 4] {
        [self.origin.x, self.origin.y, self.size.x, self.size.y]
    }
}

/// Margin around the whole overlay, fraction of the shorter window side
const MARGIN_FRACTION: f32 = 0.03;
/// Button edge, fraction of the shorter inner side (never below MIN_BUTTON_PX)
const BUTTON_FRACTION: f32 = 0.08;
const MIN_BUTTON_PX: f32 = 48.0;
/// Gap between buttons, fraction of the button edge
const BUTTON_SPACING: f32 = 0.25;
/// Offsets of the bottom anchors from the inner rect edges
const ANCHOR_X: f32 = 0.035;
const ANCHOR_Y: f32 = 0.04;
/// Chart panel size, fraction of the inner rect
const PANEL_WIDTH: f32 = 0.32;
const PANEL_HEIGHT: f32 = 0.18;
/// Slider track thickness, fraction of the button edge
const TRACK_THICKNESS: f32 = 0.2;

/// Placement of every control for one window size
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub window: Vec2,
    pub inner: Rect,
    /// Start, Stop, Reload (left to right)
    pub buttons: [Rect; 3],
    pub chart_panel: Rect,
    pub slider_track: Rect,
}

impl Layout {
    pub fn compute(width: f32, height: f32) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);

        let margin = (width.min(height) * MARGIN_FRACTION).floor();
        let inner = Rect::new(margin, margin, width - 2.0 * margin, height - 2.0 * margin);

        let button =
            MIN_BUTTON_PX.max((inner.size.x.min(inner.size.y) * BUTTON_FRACTION).floor());
        let spacing = (button * BUTTON_SPACING).floor();
        let total = button * 3.0 + spacing * 2.0;
        let base_x = inner.right() - total - (inner.size.x * ANCHOR_X).floor();
        let base_y = inner.bottom() - button - (inner.size.y * ANCHOR_Y).floor();
        let buttons = [0.0, 1.0, 2.0]
            .map(|i| Rect::new(base_x + (button + spacing) * i, base_y, button, button));

        let panel_w = (inner.size.x * PANEL_WIDTH).floor();
        let panel_h = (inner.size.y * PANEL_HEIGHT).floor();
        let chart_panel = Rect::new(
            inner.origin.x + (inner.size.x * ANCHOR_X).floor(),
            inner.bottom() - panel_h - (inner.size.y * ANCHOR_Y).floor(),
            panel_w,
            panel_h,
        );

        let track_h = (button * TRACK_THICKNESS).max(4.0);
        let track_x = chart_panel.right() + spacing * 2.0;
        let track_w = (base_x - spacing * 2.0 - track_x).max(0.0);
        let slider_track = Rect::new(
            track_x,
            base_y + (button - track_h) * 0.5,
            track_w,
            track_h,
        );

        Self {
            window: Vec2::new(width, height),
            inner,
            buttons,
            chart_panel,
            slider_track,
        }
    }

    /// Region that reacts to slider presses: the track widened to a full
    /// button height so it is easy to grab
    pub fn slider_hit_area(&self) -> Rect {
        let button_h = self.buttons[0].size.y;
        let track = self.slider_track;
        Rect::new(
            track.origin.x,
            track.center().y - button_h * 0.5,
            track.size.x,
            button_h,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_1280x720() {
        let layout = Layout::compute(1280.0, 720.0);
        // margin = 3% of 720
        assert_eq!(layout.inner, Rect::new(21.0, 21.0, 1238.0, 678.0));
        // button = max(48, 8% of 678)
        assert_eq!(layout.buttons[0].size, Vec2::splat(54.0));
        assert_eq!(layout.buttons[1].origin.x - layout.buttons[0].right(), 13.0);
        assert!(layout.buttons[2].right() <= layout.inner.right());
    }

    #[test]
    fn test_small_window_keeps_minimum_button() {
        let layout = Layout::compute(320.0, 240.0);
        assert_eq!(layout.buttons[0].size.x, 48.0);
    }

    #[test]
    fn test_controls_do_not_overlap() {
        let layout = Layout::compute(1280.0, 720.0);
        assert!(layout.chart_panel.right() < layout.slider_track.origin.x);
        assert!(layout.slider_track.right() < layout.buttons[0].origin.x);
        assert!(layout.slider_track.size.x > 0.0);
        assert!(layout.chart_panel.origin.y > layout.inner.center().y);
    }

    #[test]
    fn test_contains_half_open() {
        let r = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(r.contains(Vec2::new(10.0, 10.0)));
        assert!(r.contains(Vec2::new(14.9, 14.9)));
        assert!(!r.contains(Vec2::new(15.0, 12.0)));
        assert!(!r.contains(Vec2::new(9.9, 12.0)));
    }
}
