//! Two-pass annotation rendering
//!
//! Every annotation is drawn twice: first a wider outline in the contrasting
//! color, then the main stroke on top, so it stays legible on any background.

use super::canvas::Canvas;
use super::geometry::ArrowGeometry;
use crate::config::ShapeColor;
use crate::domain::{Annotation, ArrowAnnotation, Point, RectAnnotation, Style, TextAnnotation};

/// Offsets of the text halo drawn in the outline pass
const TEXT_HALO: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pass {
    Outline,
    Main,
}

impl Pass {
    fn color(self, style: &Style) -> ShapeColor {
        match self {
            Pass::Outline => style.outline_color(),
            Pass::Main => style.color,
        }
    }

    fn width(self, style: &Style) -> f32 {
        match self {
            Pass::Outline => style.outline_thickness() as f32,
            Pass::Main => style.thickness as f32,
        }
    }
}

impl Annotation {
    /// Draw this annotation onto `canvas`
    pub fn render(&self, canvas: &mut Canvas) {
        for pass in [Pass::Outline, Pass::Main] {
            match self {
                Annotation::Arrow(arrow) => draw_arrow(canvas, arrow, pass),
                Annotation::Rectangle(rect) => draw_rect(canvas, rect, pass),
                Annotation::Text(text) => draw_text(canvas, text, pass),
            }
        }
    }
}

/// Draw every annotation in insertion order
pub fn render_all(canvas: &mut Canvas, annotations: &[Annotation]) {
    for annotation in annotations {
        annotation.render(canvas);
    }
}

fn draw_arrow(canvas: &mut Canvas, arrow: &ArrowAnnotation, pass: Pass) {
    let Some(geometry) = ArrowGeometry::new(arrow.start, arrow.end, arrow.style.thickness) else {
        return;
    };
    let color = pass.color(&arrow.style);
    let width = pass.width(&arrow.style);

    canvas.stroke_line(geometry.start, geometry.shaft_end, color, width);
    // The main head only gets a hairline so its points stay sharp
    let head_stroke = match pass {
        Pass::Outline => width,
        Pass::Main => 1.0,
    };
    canvas.polygon(&geometry.head_polygon(), color, head_stroke);
}

fn draw_rect(canvas: &mut Canvas, rect: &RectAnnotation, pass: Pass) {
    let r = rect.rect;
    canvas.stroke_rect(
        r.left as f32,
        r.top as f32,
        r.width() as f32,
        r.height() as f32,
        pass.color(&rect.style),
        pass.width(&rect.style),
    );
}

fn draw_text(canvas: &mut Canvas, text: &TextAnnotation, pass: Pass) {
    draw_label(canvas, text.position, &text.content, &text.style, pass == Pass::Outline);
}

/// Text with a one pixel halo; also used for the in-progress edit buffer
pub(crate) fn draw_label(
    canvas: &mut Canvas,
    position: Point,
    content: &str,
    style: &Style,
    outline: bool,
) {
    if content.is_empty() {
        return;
    }
    let size = style.font_size();
    if outline {
        let halo = style.outline_color();
        for (dx, dy) in TEXT_HALO {
            canvas.draw_text(position + Point::new(dx, dy), content, size, halo);
        }
    } else {
        canvas.draw_text(position, content, size, style.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaletteColor;
    use image::{Rgba, RgbaImage};

    fn canvas() -> Canvas {
        Canvas::from_rgba(&RgbaImage::from_pixel(100, 100, Rgba([128, 128, 128, 255]))).unwrap()
    }

    #[test]
    fn test_rectangle_is_unfilled_with_outline() {
        let style = Style::new(4, PaletteColor::Blue.color());
        let ann = Annotation::rectangle(Point::new(20, 20), Point::new(80, 80), style).unwrap();
        let mut canvas = canvas();
        ann.render(&mut canvas);
        let img = canvas.into_rgba();

        // Centre of the stroke carries the main color
        assert_eq!(img.get_pixel(20, 50).0, [0, 0, 255, 255]);
        // Just outside the main stroke the outline shows through
        assert_eq!(img.get_pixel(50, 17).0, [255, 255, 255, 255]);
        // Interior untouched
        assert_eq!(img.get_pixel(50, 50).0, [128, 128, 128, 255]);
    }

    #[test]
    fn test_arrow_tip_drawn() {
        let style = Style::new(3, PaletteColor::Red.color());
        let ann = Annotation::arrow(Point::new(10, 50), Point::new(90, 50), style).unwrap();
        let mut canvas = canvas();
        ann.render(&mut canvas);
        let img = canvas.into_rgba();
        assert_eq!(img.get_pixel(50, 50).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(85, 50).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(50, 10).0, [128, 128, 128, 255]);
    }

    #[test]
    fn test_text_has_halo() {
        let style = Style::new(3, PaletteColor::Blue.color());
        let ann = Annotation::text(Point::new(10, 40), "I", style).unwrap();
        let mut canvas = canvas();
        ann.render(&mut canvas);
        let img = canvas.into_rgba();
        let blue = img.pixels().filter(|p| p.0 == [0, 0, 255, 255]).count();
        let white = img.pixels().filter(|p| p.0 == [255, 255, 255, 255]).count();
        assert!(blue > 0);
        assert!(white > 0);
    }
}
