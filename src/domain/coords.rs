//! Desktop <-> overlay window coordinate mapping

use super::geometry::{Point, Rect};

/// Translation between desktop-absolute and window-local coordinates.
///
/// The overlay window covers the whole virtual desktop, so window-local
/// coordinates are desktop coordinates shifted by the desktop origin, which
/// may be negative on multi-monitor layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoordinateSpace {
    origin: Point,
}

impl CoordinateSpace {
    pub fn new(virtual_geometry: Rect) -> Self {
        Self {
            origin: virtual_geometry.top_left(),
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn to_window(&self, desktop: Point) -> Point {
        desktop - self.origin
    }

    pub fn to_desktop(&self, window: Point) -> Point {
        window + self.origin
    }

    pub fn rect_to_window(&self, desktop: Rect) -> Rect {
        desktop.translate(-self.origin.x, -self.origin.y)
    }

    pub fn rect_to_desktop(&self, window: Rect) -> Rect {
        window.translate(self.origin.x, self.origin.y)
    }
}
