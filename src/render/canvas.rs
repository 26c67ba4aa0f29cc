//! Immediate-mode 2D canvas over a tiny-skia pixmap

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::RgbaImage;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::config::ShapeColor;
use crate::domain::Point;

/// Height and advance of a glyph cell in font units
const GLYPH_CELL: f32 = 8.0;

/// Drawing surface used by annotation rendering
///
/// Every primitive is drawn through `transform`, so callers can record
/// coordinates in window space and render onto a cropped image.
pub struct Canvas {
    pixmap: Pixmap,
    transform: Transform,
}

impl Canvas {
    /// Wrap an image; `None` if it has a zero dimension
    pub fn from_rgba(img: &RgbaImage) -> Option<Self> {
        let size = tiny_skia::IntSize::from_wh(img.width(), img.height())?;
        let pixmap = Pixmap::from_vec(img.as_raw().clone(), size)?;
        Some(Self {
            pixmap,
            transform: Transform::identity(),
        })
    }

    /// Shift every subsequent primitive by `(dx, dy)`
    pub fn set_offset(&mut self, dx: i32, dy: i32) {
        self.transform = Transform::from_translate(dx as f32, dy as f32);
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Copy the pixels back into an image of the same size
    pub fn into_rgba(self) -> RgbaImage {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        let data = self.pixmap.take();
        RgbaImage::from_raw(w, h, data).unwrap_or_else(|| RgbaImage::new(w, h))
    }

    fn paint(color: ShapeColor, alpha: u8) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, alpha);
        paint.anti_alias = true;
        paint
    }

    fn stroke(width: f32) -> Stroke {
        Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        }
    }

    pub fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: ShapeColor, width: f32) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        let Some(path) = pb.finish() else {
            return;
        };
        self.pixmap.stroke_path(
            &path,
            &Self::paint(color, 255),
            &Self::stroke(width),
            self.transform,
            None,
        );
    }

    /// Closed polygon, filled and then stroked with `stroke_width`
    pub fn polygon(&mut self, points: &[(f32, f32)], color: ShapeColor, stroke_width: f32) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(first.0, first.1);
        for p in rest {
            pb.line_to(p.0, p.1);
        }
        pb.close();
        let Some(path) = pb.finish() else {
            return;
        };
        let paint = Self::paint(color, 255);
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, self.transform, None);
        self.pixmap.stroke_path(
            &path,
            &paint,
            &Self::stroke(stroke_width),
            self.transform,
            None,
        );
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: ShapeColor, width: f32) {
        let Some(rect) = tiny_skia::Rect::from_xywh(x, y, w, h) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        let mut stroke = Self::stroke(width);
        stroke.line_cap = LineCap::Square;
        stroke.line_join = LineJoin::Miter;
        self.pixmap.stroke_path(
            &path,
            &Self::paint(color, 255),
            &stroke,
            self.transform,
            None,
        );
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: ShapeColor, alpha: u8) {
        let Some(rect) = tiny_skia::Rect::from_xywh(x, y, w, h) else {
            return;
        };
        let mut paint = Self::paint(color, alpha);
        paint.anti_alias = false;
        self.pixmap.fill_rect(rect, &paint, self.transform, None);
    }

    /// Horizontal advance of `text` at the given pixel size
    pub fn text_width(text: &str, size: u32) -> f32 {
        text.chars().count() as f32 * size as f32
    }

    /// Draw `text` with its baseline starting at `baseline`
    ///
    /// Glyphs come from an 8x8 bitmap font scaled to `size` pixels per cell;
    /// characters without a glyph render as `?`.
    pub fn draw_text(&mut self, baseline: Point, text: &str, size: u32, color: ShapeColor) {
        let cell = size as f32 / GLYPH_CELL;
        let top = baseline.y as f32 - size as f32;
        let mut pb = PathBuilder::new();
        let mut cursor_x = baseline.x as f32;

        for ch in text.chars() {
            let glyph = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?'));
            if let Some(glyph) = glyph {
                for (row_idx, &row) in glyph.iter().enumerate() {
                    for col_idx in 0..8u32 {
                        if (row >> col_idx) & 1 == 0 {
                            continue;
                        }
                        let x = cursor_x + col_idx as f32 * cell;
                        let y = top + row_idx as f32 * cell;
                        if let Some(rect) = tiny_skia::Rect::from_xywh(x, y, cell, cell) {
                            pb.push_rect(rect);
                        }
                    }
                }
            }
            cursor_x += size as f32;
        }

        let Some(path) = pb.finish() else {
            return;
        };
        let mut paint = Self::paint(color, 255);
        paint.anti_alias = false;
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, self.transform, None);
    }
}
