//! Live overlay frame
//!
//! Renders what the user sees while selecting: the frozen capture dimmed
//! around the selection, the selection frame, annotations with the
//! in-progress shape or text, and a help line.

use image::RgbaImage;

use super::annotation::{draw_label, render_all};
use super::canvas::Canvas;
use crate::capture::image::CaptureImage;
use crate::config::{OVERLAY_ALPHA, SELECTION_BORDER_WIDTH, ShapeColor};
use crate::domain::{Point, Rect};
use crate::session::machine::InteractionMachine;

/// Pixel size of the help line
const HELP_FONT_SIZE: u32 = 12;
/// Padding around the help line background
const HELP_PADDING: i32 = 4;
/// Gap between the selection and the help line
const HELP_GAP: i32 = 8;

/// Render one overlay frame in window coordinates
pub fn render_overlay(capture: &CaptureImage, machine: &InteractionMachine) -> RgbaImage {
    let Some(mut canvas) = Canvas::from_rgba(capture.rgba()) else {
        return capture.rgba().clone();
    };
    let bounds = capture.bounds();
    let selection = machine
        .selection_window_rect()
        .and_then(|r| r.intersect(bounds));

    match selection {
        Some(sel) => {
            dim_around(&mut canvas, bounds, sel);
            let color = machine.style().color;
            canvas.stroke_rect(
                sel.left as f32,
                sel.top as f32,
                sel.width() as f32,
                sel.height() as f32,
                color,
                SELECTION_BORDER_WIDTH,
            );
        }
        None => dim(&mut canvas, bounds),
    }

    if machine.selection().is_complete() {
        render_all(&mut canvas, machine.annotations());
        if let Some(preview) = machine.provisional_preview() {
            preview.render(&mut canvas);
        }
        draw_text_edit(&mut canvas, machine);
    }

    draw_help(&mut canvas, bounds, selection, &machine.help_text());
    canvas.into_rgba()
}

fn dim(canvas: &mut Canvas, area: Rect) {
    if area.is_empty() {
        return;
    }
    canvas.fill_rect(
        area.left as f32,
        area.top as f32,
        area.width() as f32,
        area.height() as f32,
        ShapeColor::BLACK,
        OVERLAY_ALPHA,
    );
}

/// Four strips around `sel`, leaving it clear
fn dim_around(canvas: &mut Canvas, outer: Rect, sel: Rect) {
    // Top strip
    dim(canvas, Rect::new(outer.left, outer.top, outer.right, sel.top));
    // Bottom strip
    dim(canvas, Rect::new(outer.left, sel.bottom, outer.right, outer.bottom));
    // Left strip (between top and bottom)
    dim(canvas, Rect::new(outer.left, sel.top, sel.left, sel.bottom));
    // Right strip (between top and bottom)
    dim(canvas, Rect::new(sel.right, sel.top, outer.right, sel.bottom));
}

fn draw_text_edit(canvas: &mut Canvas, machine: &InteractionMachine) {
    let Some(edit) = machine.text_edit() else {
        return;
    };
    let style = machine.style();
    draw_label(canvas, edit.position, edit.text(), &style, true);
    draw_label(canvas, edit.position, edit.text(), &style, false);

    let size = style.font_size();
    let x = edit.position.x as f32 + Canvas::text_width(edit.before_caret(), size);
    let y = edit.position.y as f32;
    canvas.stroke_line((x, y - size as f32), (x, y + 2.0), style.color, 1.0);
}

/// Help line under the selection, above it if there is no room, or at the
/// top of the screen without a selection
fn draw_help(canvas: &mut Canvas, bounds: Rect, selection: Option<Rect>, text: &str) {
    let size = HELP_FONT_SIZE as i32;
    let width = Canvas::text_width(text, HELP_FONT_SIZE) as i32;
    let height = size + 2 * HELP_PADDING;

    let (left, top) = match selection {
        Some(sel) if sel.bottom + HELP_GAP + height <= bounds.bottom => {
            (sel.left, sel.bottom + HELP_GAP)
        }
        Some(sel) => (sel.left, (sel.top - HELP_GAP - height).max(bounds.top)),
        None => (bounds.left + (bounds.width() - width) / 2, bounds.top + 2 * HELP_GAP),
    };
    let left = left.min(bounds.right - width - 2 * HELP_PADDING).max(bounds.left);

    canvas.fill_rect(
        left as f32,
        top as f32,
        (width + 2 * HELP_PADDING) as f32,
        height as f32,
        ShapeColor::BLACK,
        200,
    );
    canvas.draw_text(
        Point::new(left + HELP_PADDING, top + HELP_PADDING + size),
        text,
        HELP_FONT_SIZE,
        ShapeColor::WHITE,
    );
}
