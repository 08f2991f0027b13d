//! CPU-side instance building: frame cells and overlay controls to quads.

use bytemuck::{Pod, Zeroable};

use crate::params::Rgb;
use crate::scene::Frame;
use crate::ui::{ButtonKind, Controls, Rect};

/// Fragment shape selector, stored in `QuadInstance::shape[0]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Shape {
    Rect = 0,
    /// Filled disc, radius fraction in `shape[1]`
    Disc = 1,
    /// Rounded rectangle, corner radius fraction in `shape[1]`
    RoundedRect = 2,
    PlayIcon = 3,
    StopIcon = 4,
    ReloadIcon = 5,
}

/// One instanced quad (48 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadInstance {
    /// x, y, w, h in pixels, origin top-left
    pub rect: [f32; 4],
    /// Linear RGBA
    pub color: [f32; 4],
    /// kind, parameter, unused, unused
    pub shape: [f32; 4],
}

impl QuadInstance {
    pub fn new(rect: Rect, color: [f32; 4], shape: Shape, param: f32) -> Self {
        Self {
            rect: rect.to_array(),
            color,
            shape: [shape as u32 as f32, param, 0.0, 0.0],
        }
    }
}

/// Smallest disc, as a fraction of the cell half-size (sparsest glyph)
const MIN_DOT: f32 = 0.18;

const PANEL_COLOR: [f32; 4] = [0.12, 0.12, 0.14, 0.85];
const TRACK_COLOR: [f32; 4] = [0.45, 0.45, 0.5, 1.0];
const TRACK_FILL: [f32; 4] = [0.25, 0.41, 0.88, 1.0];
const KNOB_COLOR: [f32; 4] = [0.95, 0.95, 0.95, 1.0];
const BUTTON_UP: [f32; 4] = [0.88, 0.88, 0.9, 0.95];
const BUTTON_DOWN: [f32; 4] = [0.6, 0.6, 0.64, 0.95];
const ICON_COLOR: [f32; 3] = [0.05, 0.05, 0.05];

/// sRGB-encoded channel in [0, 1] to linear
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// 8-bit sRGB color to linear RGBA for an sRGB surface
pub fn rgb_to_linear(rgb: Rgb, alpha: f32) -> [f32; 4] {
    let [r, g, b] = rgb.map(|c| srgb_to_linear(c as f32 / 255.0));
    [r, g, b, alpha]
}

fn rgbf_to_linear([r, g, b]: [f32; 3], alpha: f32) -> [f32; 4] {
    [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), alpha]
}

/// Disc radius fraction for a glyph class: densest fills the cell
pub fn glyph_radius(glyph: u8, classes: usize) -> f32 {
    let last = classes.max(2) - 1;
    let t = (glyph as usize).min(last) as f32 / last as f32;
    1.0 - t * (1.0 - MIN_DOT)
}

/// One disc per frame cell, stretched to fill `area`
pub fn cell_instances(frame: &Frame, area: Rect, out: &mut Vec<QuadInstance>) {
    if frame.cols == 0 || frame.rows == 0 {
        return;
    }
    let cell_w = area.size.x / frame.cols as f32;
    let cell_h = area.size.y / frame.rows as f32;
    out.reserve(frame.cells.len());
    for (i, cell) in frame.cells.iter().enumerate() {
        let col = (i % frame.cols) as f32;
        let row = (i / frame.cols) as f32;
        let rect = Rect::new(
            area.origin.x + col * cell_w,
            area.origin.y + row * cell_h,
            cell_w,
            cell_h,
        );
        out.push(QuadInstance::new(
            rect,
            rgb_to_linear(cell.color, 1.0),
            Shape::Disc,
            glyph_radius(cell.glyph, frame.glyph_classes),
        ));
    }
}

/// Chart panel, slider and transport buttons
pub fn overlay_instances(controls: &Controls, out: &mut Vec<QuadInstance>) {
    let layout = controls.layout();

    out.push(QuadInstance::new(
        layout.chart_panel,
        PANEL_COLOR,
        Shape::RoundedRect,
        0.08,
    ));

    let track = layout.slider_track;
    let fraction = controls.slider().fraction();
    out.push(QuadInstance::new(track, TRACK_COLOR, Shape::RoundedRect, 0.5));
    let filled = Rect::new(track.origin.x, track.origin.y, track.size.x * fraction, track.size.y);
    out.push(QuadInstance::new(filled, TRACK_FILL, Shape::RoundedRect, 0.5));
    let knob_size = track.size.y * 2.5;
    let knob_center = track.origin.x + track.size.x * fraction;
    let knob = Rect::new(
        knob_center - knob_size * 0.5,
        track.center().y - knob_size * 0.5,
        knob_size,
        knob_size,
    );
    out.push(QuadInstance::new(knob, KNOB_COLOR, Shape::Disc, 1.0));

    for (button, rect) in controls.buttons().iter().zip(&layout.buttons) {
        let bg = if button.is_armed() { BUTTON_DOWN } else { BUTTON_UP };
        out.push(QuadInstance::new(*rect, bg, Shape::RoundedRect, 0.2));

        let icon_color = button.flash_color().unwrap_or(ICON_COLOR);
        let (shape, scale) = match button.kind() {
            ButtonKind::Start => (Shape::PlayIcon, 0.4),
            ButtonKind::Stop => (Shape::StopIcon, 0.4),
            ButtonKind::Reload => (Shape::ReloadIcon, 0.45),
        };
        let icon_size = rect.size * scale;
        let icon = Rect::new(
            rect.center().x - icon_size.x * 0.5,
            rect.center().y - icon_size.y * 0.5,
            icon_size.x,
            icon_size.y,
        );
        out.push(QuadInstance::new(icon, rgbf_to_linear(icon_color, 1.0), shape, 0.0));
    }
}

/// Largest rect with the image's aspect ratio centered inside `bounds`
pub fn fit_rect(bounds: Rect, image_w: u32, image_h: u32) -> Rect {
    if image_w == 0 || image_h == 0 || bounds.size.x <= 0.0 || bounds.size.y <= 0.0 {
        return Rect::new(bounds.origin.x, bounds.origin.y, 0.0, 0.0);
    }
    let scale = (bounds.size.x / image_w as f32).min(bounds.size.y / image_h as f32);
    let w = image_w as f32 * scale;
    let h = image_h as f32 * scale;
    Rect::new(
        bounds.center().x - w * 0.5,
        bounds.center().y - h * 0.5,
        w,
        h,
    )
}

/// Area the cell grid covers: the whole window minus padding
pub fn grid_area(width: f32, height: f32, padding: f32) -> Rect {
    Rect::new(padding, padding, width - 2.0 * padding, height - 2.0 * padding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::UiParams;
    use crate::scene::ColoredCell;

    fn frame(cols: usize, rows: usize) -> Frame {
        Frame {
            cols,
            rows,
            glyph_classes: 9,
            cells: vec![
                ColoredCell {
                    glyph: 0,
                    density: 1.0,
                    color: [255, 0, 0],
                };
                cols * rows
            ],
            time_s: 0.0,
            volume: 0.0,
            month_index: 0,
            year: 2000,
        }
    }

    #[test]
    fn test_instance_layout_is_48_bytes() {
        assert_eq!(std::mem::size_of::<QuadInstance>(), 48);
    }

    #[test]
    fn test_cells_tile_area() {
        let mut out = Vec::new();
        cell_instances(&frame(4, 2), Rect::new(10.0, 20.0, 400.0, 100.0), &mut out);
        assert_eq!(out.len(), 8);
        assert_eq!(out[0].rect, [10.0, 20.0, 100.0, 50.0]);
        assert_eq!(out[7].rect, [310.0, 70.0, 100.0, 50.0]);
        assert_eq!(out[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(out[0].shape[0], Shape::Disc as u32 as f32);
    }

    #[test]
    fn test_empty_frame_has_no_cells() {
        let mut out = Vec::new();
        cell_instances(&frame(0, 0), Rect::new(0.0, 0.0, 10.0, 10.0), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_glyph_radius_shrinks_with_sparsity() {
        assert_eq!(glyph_radius(0, 9), 1.0);
        assert!((glyph_radius(8, 9) - MIN_DOT).abs() < 1e-6);
        assert!(glyph_radius(3, 9) > glyph_radius(4, 9));
    }

    #[test]
    fn test_srgb_endpoints() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        assert!((srgb_to_linear(0.5) - 0.214).abs() < 1e-3);
    }

    #[test]
    fn test_fit_rect_keeps_aspect() {
        let fitted = fit_rect(Rect::new(0.0, 0.0, 400.0, 100.0), 200, 100);
        assert_eq!(fitted, Rect::new(100.0, 0.0, 200.0, 100.0));
        let empty = fit_rect(Rect::new(5.0, 5.0, 400.0, 100.0), 0, 100);
        assert_eq!(empty.size, glam::Vec2::ZERO);
    }

    #[test]
    fn test_overlay_has_panel_slider_and_buttons() {
        let controls = Controls::new(UiParams::default(), 1280.0, 720.0);
        let mut out = Vec::new();
        overlay_instances(&controls, &mut out);
        // panel + track + fill + knob + 3 * (button + icon)
        assert_eq!(out.len(), 10);
        assert_eq!(out[0].rect, controls.layout().chart_panel.to_array());
    }
}
