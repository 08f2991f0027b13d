//! Interaction layer: year slider, transport buttons and key bindings.
//!
//! The core only ever reads [`InteractionState`]. Everything else here turns
//! pointer and keyboard input into that state plus [`UiAction`]s for the
//! owner of the scene to apply.

mod button;
mod layout;
mod slider;

use glam::Vec2;

pub use button::{ButtonKind, TransportButton};
pub use layout::{Layout, Rect};
pub use slider::{snap_year, YearSlider};

use crate::params::{UiParams, WHITEN_STEP};

/// What the per-frame core reads from the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionState {
    pub selected_year: i32,
    pub running: bool,
}

/// Keys the overlay responds to, independent of the windowing backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKey {
    Space,
    Reload,
    Left,
    Right,
    Up,
    Down,
    BracketLeft,
    BracketRight,
    TopWhitenUp,
    TopWhitenDown,
    BottomWhitenUp,
    BottomWhitenDown,
    Escape,
}

/// Effects for the scene owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    Started,
    Stopped,
    /// Reset simulation time and the audio cursor
    Reload,
    YearChanged(i32),
    /// Multiply speed factor by the up/down step
    SpeedFactor { faster: bool },
    /// Multiply base time scale by the up/down step
    BaseTimeScale { faster: bool },
    TopWhiten(f32),
    BottomWhiten(f32),
    Quit,
}

/// All overlay controls and the interaction state they drive
#[derive(Debug, Clone)]
pub struct Controls {
    params: UiParams,
    state: InteractionState,
    slider: YearSlider,
    buttons: [TransportButton; 3],
    layout: Layout,
    pointer: Vec2,
}

impl Controls {
    pub fn new(params: UiParams, width: f32, height: f32) -> Self {
        let slider = YearSlider::new(&params);
        let state = InteractionState {
            selected_year: slider.year(),
            running: true,
        };
        Self {
            params,
            state,
            slider,
            buttons: ButtonKind::ALL.map(TransportButton::new),
            layout: Layout::compute(width, height),
            pointer: Vec2::ZERO,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn slider(&self) -> &YearSlider {
        &self.slider
    }

    pub fn buttons(&self) -> &[TransportButton; 3] {
        &self.buttons
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.layout = Layout::compute(width, height);
    }

    /// Select a year directly (CLI override); clamped and snapped
    pub fn select_year(&mut self, year: i32) -> Option<UiAction> {
        let changed = self.slider.set_year(year);
        self.year_action(changed)
    }

    /// Advance button flash timers
    pub fn tick(&mut self, dt_s: f32) {
        for button in &mut self.buttons {
            button.tick(dt_s);
        }
    }

    pub fn pointer_moved(&mut self, pos: Vec2) -> Option<UiAction> {
        self.pointer = pos;
        let changed = self.slider.drag(pos, &self.layout.slider_track);
        self.year_action(changed)
    }

    pub fn pointer_pressed(&mut self) -> Option<UiAction> {
        let pos = self.pointer;
        for (button, rect) in self.buttons.iter_mut().zip(&self.layout.buttons) {
            button.press(rect.contains(pos));
        }
        let changed = self
            .slider
            .press(pos, &self.layout.slider_hit_area(), &self.layout.slider_track);
        self.year_action(changed)
    }

    pub fn pointer_released(&mut self) -> Option<UiAction> {
        let pos = self.pointer;
        self.slider.release();

        let flash = self.params.flash_duration_s;
        let mut fired = None;
        for (button, rect) in self.buttons.iter_mut().zip(&self.layout.buttons) {
            if button.release(rect.contains(pos), flash) {
                fired = Some(button.kind());
            }
        }
        fired.map(|kind| {
            log::info!("{kind:?} button clicked");
            self.apply_button(kind)
        })
    }

    pub fn key(&mut self, key: ControlKey) -> Option<UiAction> {
        let action = match key {
            ControlKey::Space => {
                let kind = if self.state.running {
                    ButtonKind::Stop
                } else {
                    ButtonKind::Start
                };
                Some(self.apply_button(kind))
            }
            ControlKey::Reload => Some(self.apply_button(ButtonKind::Reload)),
            ControlKey::Left => {
                let changed = self.slider.step(false);
                self.year_action(changed)
            }
            ControlKey::Right => {
                let changed = self.slider.step(true);
                self.year_action(changed)
            }
            ControlKey::Up => Some(UiAction::SpeedFactor { faster: true }),
            ControlKey::Down => Some(UiAction::SpeedFactor { faster: false }),
            ControlKey::BracketRight => Some(UiAction::BaseTimeScale { faster: true }),
            ControlKey::BracketLeft => Some(UiAction::BaseTimeScale { faster: false }),
            ControlKey::TopWhitenUp => Some(UiAction::TopWhiten(WHITEN_STEP)),
            ControlKey::TopWhitenDown => Some(UiAction::TopWhiten(-WHITEN_STEP)),
            ControlKey::BottomWhitenUp => Some(UiAction::BottomWhiten(WHITEN_STEP)),
            ControlKey::BottomWhitenDown => Some(UiAction::BottomWhiten(-WHITEN_STEP)),
            ControlKey::Escape => Some(UiAction::Quit),
        };
        log::debug!("{key:?} -> {action:?}");
        action
    }

    fn apply_button(&mut self, kind: ButtonKind) -> UiAction {
        match kind {
            ButtonKind::Start => {
                self.state.running = true;
                UiAction::Started
            }
            ButtonKind::Stop => {
                self.state.running = false;
                UiAction::Stopped
            }
            ButtonKind::Reload => UiAction::Reload,
        }
    }

    fn year_action(&mut self, changed: Option<i32>) -> Option<UiAction> {
        let year = changed?;
        self.state.selected_year = year;
        log::info!("Year: {year}");
        Some(UiAction::YearChanged(year))
    }
}
