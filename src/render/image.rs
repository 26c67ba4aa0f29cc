//! Image rendering for export
//!
//! Crops the capture to the selection and composites annotations on top.

use image::RgbaImage;

use super::annotation::render_all;
use super::canvas::Canvas;
use crate::capture::image::CaptureImage;
use crate::domain::{Annotation, CoordinateSpace, Rect};

/// Final exported image: `selection` (desktop coordinates) cropped out of
/// `capture` with `annotations` (window coordinates) drawn in order.
///
/// Returns `None` if the selection does not overlap the captured pixels.
pub fn render_selection(
    capture: &CaptureImage,
    coords: &CoordinateSpace,
    selection: Rect,
    annotations: &[Annotation],
) -> Option<RgbaImage> {
    if selection.is_empty() {
        return None;
    }

    let window_rect = coords.rect_to_window(selection);
    let (cropped, clipped) = capture.crop(window_rect)?;
    if annotations.is_empty() {
        return Some(cropped);
    }

    let mut canvas = Canvas::from_rgba(&cropped)?;
    // Annotations are recorded in window space, the cropped image starts at
    // the clipped top-left
    canvas.set_offset(-clipped.left, -clipped.top);
    render_all(&mut canvas, annotations);
    Some(canvas.into_rgba())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaletteColor;
    use crate::domain::{Point, Style};
    use image::Rgba;

    fn capture() -> CaptureImage {
        let rgba = RgbaImage::from_pixel(200, 100, Rgba([10, 10, 10, 255]));
        CaptureImage::new(rgba, Rect::from_xywh(-200, -50, 200, 100))
    }

    #[test]
    fn test_selection_cropped_in_window_space() {
        let capture = capture();
        let coords = CoordinateSpace::new(capture.geometry());
        let img = render_selection(&capture, &coords, Rect::from_xywh(-150, -40, 60, 30), &[])
            .unwrap();
        assert_eq!((img.width(), img.height()), (60, 30));
    }

    #[test]
    fn test_annotations_shifted_to_crop_origin() {
        let capture = capture();
        let coords = CoordinateSpace::new(capture.geometry());
        // Window rect (50, 10)..(150, 90)
        let selection = Rect::from_xywh(-150, -40, 100, 80);
        let style = Style::new(4, PaletteColor::Green.color());
        let rect = Annotation::rectangle(Point::new(60, 20), Point::new(100, 60), style).unwrap();

        let img = render_selection(&capture, &coords, selection, &[rect]).unwrap();
        // Left edge of the rectangle at window x=60 lands at image x=10
        assert_eq!(img.get_pixel(10, 30).0, [0, 255, 0, 255]);
        assert_eq!(img.get_pixel(30, 30).0, [10, 10, 10, 255]);
    }

    #[test]
    fn test_partially_offscreen_selection_is_clipped() {
        let capture = capture();
        let coords = CoordinateSpace::new(capture.geometry());
        let selection = Rect::from_xywh(-60, 20, 200, 200);
        let img = render_selection(&capture, &coords, selection, &[]).unwrap();
        assert_eq!((img.width(), img.height()), (60, 30));
    }

    #[test]
    fn test_disjoint_selection() {
        let capture = capture();
        let coords = CoordinateSpace::new(capture.geometry());
        assert!(render_selection(&capture, &coords, Rect::from_xywh(500, 500, 20, 20), &[]).is_none());
    }
}
