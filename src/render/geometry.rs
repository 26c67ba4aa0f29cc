//! Shared geometry calculations for annotations
//!
//! Used by both the live overlay and the exported image.

use crate::config::{
    ARROWHEAD_ANGLE, ARROWHEAD_MIN_LENGTH, ARROWHEAD_OFFSET, ARROWHEAD_SCALE, MIN_ARROW_LENGTH,
};
use crate::domain::Point;

/// Resolved arrow outline in floating point window coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowGeometry {
    pub start: (f32, f32),
    /// End of the shaft, pulled back from the tip
    pub shaft_end: (f32, f32),
    pub tip: (f32, f32),
    pub head_left: (f32, f32),
    pub head_right: (f32, f32),
    pub head_length: f32,
}

impl ArrowGeometry {
    /// Compute the arrow for the given thickness, or `None` if it is too short to draw
    pub fn new(start: Point, end: Point, thickness: u32) -> Option<Self> {
        if start.distance(end) < MIN_ARROW_LENGTH {
            return None;
        }

        let (sx, sy) = (start.x as f32, start.y as f32);
        let (ex, ey) = (end.x as f32, end.y as f32);
        let angle = (ey - sy).atan2(ex - sx);
        let head_length = (thickness as f32 * ARROWHEAD_SCALE).max(ARROWHEAD_MIN_LENGTH);

        let pull_back = head_length * ARROWHEAD_OFFSET;
        let shaft_end = (ex - pull_back * angle.cos(), ey - pull_back * angle.sin());

        let head_left = (
            ex - head_length * (angle - ARROWHEAD_ANGLE).cos(),
            ey - head_length * (angle - ARROWHEAD_ANGLE).sin(),
        );
        let head_right = (
            ex - head_length * (angle + ARROWHEAD_ANGLE).cos(),
            ey - head_length * (angle + ARROWHEAD_ANGLE).sin(),
        );

        Some(Self {
            start: (sx, sy),
            shaft_end,
            tip: (ex, ey),
            head_left,
            head_right,
            head_length,
        })
    }

    /// Arrowhead quad: tip, one barb, the shaft end, the other barb
    pub fn head_polygon(&self) -> [(f32, f32); 4] {
        [self.tip, self.head_left, self.shaft_end, self.head_right]
    }
}
