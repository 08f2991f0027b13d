//! Per-frame pipeline: clock, field, palette and audio in one tick.

use std::fmt;

use crate::audio::AudioModulator;
use crate::clock::AnimationClock;
use crate::data::RainfallSource;
use crate::field::FieldGenerator;
use crate::palette::PaletteMapper;
use crate::params::{AudioParams, FieldParams, PaletteParams, Rgb};
use crate::ui::{InteractionState, UiAction};

/// Density alphabet, densest first
pub const GLYPH_ALPHABET: &[u8] = b"@%#*+=-:.";

/// Inputs for one tick
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    /// Wall-clock time since the previous frame (seconds)
    pub dt_s: f64,
    pub interaction: InteractionState,
}

/// Grid cell ready for display
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColoredCell {
    pub glyph: u8,
    pub density: f32,
    pub color: Rgb,
}

/// Everything the presentation layer needs for one frame
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub cols: usize,
    pub rows: usize,
    pub glyph_classes: usize,
    /// Rows outer, columns inner
    pub cells: Vec<ColoredCell>,
    pub time_s: f64,
    pub volume: f32,
    pub month_index: usize,
    pub year: i32,
}

impl Frame {
    pub fn cell(&self, col: usize, row: usize) -> Option<&ColoredCell> {
        if col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    /// Character for a glyph class, spreading K classes over the alphabet
    pub fn glyph_char(&self, glyph: u8) -> char {
        let last = GLYPH_ALPHABET.len() - 1;
        let classes = self.glyph_classes.max(2);
        let index = (glyph as usize).min(classes - 1) * last / (classes - 1);
        GLYPH_ALPHABET[index] as char
    }

    /// Grid as 24-bit ANSI colored text, one line per row
    pub fn to_ansi_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols.max(1)) {
            for cell in row {
                let [r, g, b] = cell.color;
                write!(f, "\x1b[38;2;{r};{g};{b}m{}", self.glyph_char(cell.glyph))?;
            }
            f.write_str("\x1b[0m\n")?;
        }
        Ok(())
    }
}

/// Owns the simulation side: clock, generator, palette and audio cursor
#[derive(Debug, Clone)]
pub struct RainScene {
    clock: AnimationClock,
    generator: FieldGenerator,
    palette: PaletteMapper,
    modulator: AudioModulator,
}

impl RainScene {
    pub fn new(field: FieldParams, palette: PaletteParams, audio: AudioParams) -> Self {
        Self {
            clock: AnimationClock::new(),
            generator: FieldGenerator::new(field),
            palette: PaletteMapper::new(palette),
            modulator: AudioModulator::new(audio),
        }
    }

    pub fn time_s(&self) -> f64 {
        self.clock.time_s()
    }

    pub fn volume(&self) -> f32 {
        self.modulator.volume()
    }

    pub fn field_params(&self) -> &FieldParams {
        self.generator.params()
    }

    pub fn palette_params(&self) -> &PaletteParams {
        self.palette.params()
    }

    /// Advance one frame.
    ///
    /// Order: clock, field from the selected year, colors, audio. The audio
    /// cursor keeps its own time and advances even while paused.
    pub fn tick(&mut self, input: &FrameInput, source: &RainfallSource) -> Frame {
        let year = input.interaction.selected_year;
        let values = source.monthly(year);

        let time_s = self.clock.tick(input.dt_s, input.interaction.running);
        let grid = self.generator.generate(values, time_s);

        let row_colors = self.palette.row_colors(grid.rows());
        let column_mods: Vec<f32> = (0..grid.cols())
            .map(|col| self.palette.column_modulation(time_s, col))
            .collect();

        let palette = &self.palette;
        let column_mods = &column_mods;
        let cells = grid
            .rows_iter()
            .zip(&row_colors)
            .flat_map(|(row, &base)| {
                row.iter().zip(column_mods).map(move |(cell, &time_mod)| ColoredCell {
                    glyph: cell.glyph,
                    density: cell.density,
                    color: palette.final_cell_color(base, cell.density, time_mod),
                })
            })
            .collect();

        let volume = self.modulator.advance(input.dt_s, values, source.extent(year));

        Frame {
            cols: grid.cols(),
            rows: grid.rows(),
            glyph_classes: self.generator.params().glyph_classes,
            cells,
            time_s,
            volume,
            month_index: self.modulator.cursor().month_index,
            year,
        }
    }

    /// Back to t = 0 and January
    pub fn reload(&mut self) {
        self.clock.reset();
        self.modulator.reset();
    }

    /// Apply the scene-side effect of a UI action; others are ignored
    pub fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Reload => {
                self.reload();
                log::info!("Reloaded: time and audio cursor reset");
            }
            UiAction::SpeedFactor { faster } => {
                let v = self.generator.params_mut().nudge_speed_factor(faster);
                log::info!("Speed factor: {v:.3}");
            }
            UiAction::BaseTimeScale { faster } => {
                let v = self.generator.params_mut().nudge_base_time_scale(faster);
                log::info!("Base time scale: {v:.3}");
            }
            UiAction::TopWhiten(delta) => {
                let v = self.palette.params_mut().nudge_top_whiten(delta);
                log::info!("Top whiten bias: {v:.2}");
            }
            UiAction::BottomWhiten(delta) => {
                let v = self.palette.params_mut().nudge_bottom_whiten(delta);
                log::info!("Bottom whiten boost: {v:.2}");
            }
            UiAction::Started | UiAction::Stopped | UiAction::YearChanged(_) | UiAction::Quit => {}
        }
    }
}

impl Default for RainScene {
    fn default() -> Self {
        Self::new(
            FieldParams::default(),
            PaletteParams::default(),
            AudioParams::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(dt_s: f64, running: bool) -> FrameInput {
        FrameInput {
            dt_s,
            interaction: InteractionState {
                selected_year: 2000,
                running,
            },
        }
    }

    #[test]
    fn test_frame_dimensions() {
        let mut scene = RainScene::default();
        let frame = scene.tick(&input(1.0 / 60.0, true), &RainfallSource::Sample);
        assert_eq!((frame.cols, frame.rows), (100, 36));
        assert_eq!(frame.cells.len(), 3600);
    }

    #[test]
    fn test_paused_frames_are_identical() {
        let mut scene = RainScene::default();
        let source = RainfallSource::Sample;
        scene.tick(&input(0.5, true), &source);
        let a = scene.tick(&input(0.1, false), &source);
        let b = scene.tick(&input(0.1, false), &source);
        assert_eq!(a.cells, b.cells);
        assert_eq!(a.time_s, b.time_s);
    }

    #[test]
    fn test_audio_advances_while_paused() {
        let mut scene = RainScene::default();
        let source = RainfallSource::Sample;
        for _ in 0..120 {
            scene.tick(&input(1.0 / 60.0, false), &source);
        }
        assert_eq!(scene.time_s(), 0.0);
        assert!(scene.volume() > 0.0);
    }

    #[test]
    fn test_reload_resets_time_and_cursor() {
        let mut scene = RainScene::default();
        let source = RainfallSource::Sample;
        scene.tick(&input(3.0, true), &source);
        scene.apply(UiAction::Reload);
        assert_eq!(scene.time_s(), 0.0);
        let frame = scene.tick(&input(0.0, true), &source);
        assert_eq!(frame.month_index, 0);
        assert_eq!(frame.volume, 0.0);
    }

    #[test]
    fn test_tuning_actions() {
        let mut scene = RainScene::default();
        scene.apply(UiAction::SpeedFactor { faster: true });
        assert!((scene.field_params().speed_factor - 7.2).abs() < 1e-5);
        scene.apply(UiAction::TopWhiten(-1.0));
        assert_eq!(scene.palette_params().top_whiten_bias, 0.0);
    }

    #[test]
    fn test_unavailable_source_renders_flat_field() {
        let mut scene = RainScene::default();
        let frame = scene.tick(&input(1.0, true), &RainfallSource::Unavailable);
        assert_eq!(frame.cells.len(), 3600);
        assert_eq!(frame.volume, 0.0);
    }

    #[test]
    fn test_ansi_output_shape() {
        let mut scene = RainScene::new(
            FieldParams {
                cols: 4,
                rows: 3,
                ..FieldParams::default()
            },
            PaletteParams::default(),
            AudioParams::default(),
        );
        let frame = scene.tick(&input(0.25, true), &RainfallSource::Sample);
        let text = frame.to_ansi_string();
        assert_eq!(format!("{frame}"), text);
        assert_eq!(text.lines().count(), 3);
        assert_eq!(text.matches("\x1b[38;2;").count(), 12);
        assert!(text.lines().all(|l| l.ends_with("\x1b[0m")));
    }

    #[test]
    fn test_glyph_char_spans_alphabet() {
        let frame = Frame {
            cols: 0,
            rows: 0,
            glyph_classes: 9,
            cells: Vec::new(),
            time_s: 0.0,
            volume: 0.0,
            month_index: 0,
            year: 0,
        };
        assert_eq!(frame.glyph_char(0), '@');
        assert_eq!(frame.glyph_char(8), '.');
        assert_eq!(frame.glyph_char(200), '.');
    }
}
