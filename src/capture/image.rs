//! Captured full-desktop image

use image::RgbaImage;

use crate::domain::Rect;

/// Pixels of the whole virtual desktop, taken once per overlay session
///
/// Pixel (0, 0) corresponds to the top-left of `geometry`, so image
/// coordinates and overlay window coordinates coincide.
#[derive(Clone, Debug)]
pub struct CaptureImage {
    rgba: RgbaImage,
    geometry: Rect,
}

impl CaptureImage {
    pub fn new(rgba: RgbaImage, geometry: Rect) -> Self {
        log::debug!(
            "CaptureImage captured: {}x{} pixels for {}x{} desktop at ({}, {})",
            rgba.width(),
            rgba.height(),
            geometry.width(),
            geometry.height(),
            geometry.left,
            geometry.top
        );
        Self { rgba, geometry }
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.rgba
    }

    /// Virtual desktop geometry this image was taken for
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_xywh(0, 0, self.width() as i32, self.height() as i32)
    }

    /// Copy out the part of `window_rect` that lies inside the image
    ///
    /// Returns the pixels together with the clipped rectangle they came from,
    /// or `None` if the two do not overlap.
    pub fn crop(&self, window_rect: Rect) -> Option<(RgbaImage, Rect)> {
        let clipped = window_rect.intersect(self.bounds())?;
        let dims = clipped.dimensions()?;
        let pixels = image::imageops::crop_imm(
            &self.rgba,
            clipped.left as u32,
            clipped.top as u32,
            dims.width(),
            dims.height(),
        )
        .to_image();
        Some((pixels, clipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Image whose red channel encodes x and green channel encodes y
    fn gradient(w: u32, h: u32) -> CaptureImage {
        let rgba = RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        CaptureImage::new(rgba, Rect::from_xywh(-100, 0, w as i32, h as i32))
    }

    #[test]
    fn test_crop_inside() {
        let capture = gradient(100, 80);
        let (img, clipped) = capture.crop(Rect::from_xywh(10, 20, 30, 40)).unwrap();
        assert_eq!(clipped, Rect::from_xywh(10, 20, 30, 40));
        assert_eq!((img.width(), img.height()), (30, 40));
        assert_eq!(img.get_pixel(0, 0).0, [10, 20, 0, 255]);
    }

    #[test]
    fn test_crop_clips_to_intersection() {
        let capture = gradient(100, 80);
        let (img, clipped) = capture.crop(Rect::new(-20, 60, 50, 120)).unwrap();
        assert_eq!(clipped, Rect::new(0, 60, 50, 80));
        assert_eq!((img.width(), img.height()), (50, 20));
        assert_eq!(img.get_pixel(0, 0).0, [0, 60, 0, 255]);
        assert_eq!(img.get_pixel(49, 19).0, [49, 79, 0, 255]);
    }

    #[test]
    fn test_crop_outside_is_none() {
        let capture = gradient(100, 80);
        assert!(capture.crop(Rect::from_xywh(200, 0, 10, 10)).is_none());
    }
}
