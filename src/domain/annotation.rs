//! Annotation types for drawing on screenshots
//!
//! All annotation types store coordinates in overlay window coordinates.

use std::ops::Deref;
use std::sync::Arc;

use super::geometry::{Point, Rect};
use crate::config::{
    MIN_ARROW_LENGTH, MIN_FONT_SIZE, MIN_RECT_SIZE, OUTLINE_THICKNESS_OFFSET, ShapeColor,
    TEXT_FONT_SCALE,
};

/// Stroke style shared by every annotation kind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Style {
    /// Stroke thickness in pixels, always >= 1
    pub thickness: u32,
    pub color: ShapeColor,
}

impl Style {
    pub fn new(thickness: u32, color: ShapeColor) -> Self {
        Self {
            thickness: thickness.max(1),
            color,
        }
    }

    /// Black or white, whichever contrasts more with the main color
    pub fn outline_color(&self) -> ShapeColor {
        self.color.contrasting()
    }

    pub fn outline_thickness(&self) -> u32 {
        self.thickness + OUTLINE_THICKNESS_OFFSET
    }

    /// Text size in pixels for this thickness
    pub fn font_size(&self) -> u32 {
        (self.thickness * TEXT_FONT_SCALE).max(MIN_FONT_SIZE)
    }
}

/// Arrow annotation from `start` to the tip at `end`
#[derive(Clone, Debug, PartialEq)]
pub struct ArrowAnnotation {
    pub start: Point,
    pub end: Point,
    pub style: Style,
}

/// Outline rectangle annotation (no fill)
#[derive(Clone, Debug, PartialEq)]
pub struct RectAnnotation {
    /// Normalized rectangle
    pub rect: Rect,
    pub style: Style,
}

/// Text annotation; `position` is the left end of the baseline
#[derive(Clone, Debug, PartialEq)]
pub struct TextAnnotation {
    pub position: Point,
    pub content: String,
    pub style: Style,
}

/// Unified annotation type for ordered drawing and undo/redo
#[derive(Clone, Debug, PartialEq)]
pub enum Annotation {
    Arrow(ArrowAnnotation),
    Rectangle(RectAnnotation),
    Text(TextAnnotation),
}

impl Annotation {
    /// Arrow from `start` to `end`, or `None` if it is shorter than `MIN_ARROW_LENGTH`
    pub fn arrow(start: Point, end: Point, style: Style) -> Option<Self> {
        if start.distance(end) < MIN_ARROW_LENGTH {
            return None;
        }
        Some(Annotation::Arrow(ArrowAnnotation { start, end, style }))
    }

    /// Rectangle spanning two corners, or `None` if either side is `MIN_RECT_SIZE` or less
    pub fn rectangle(a: Point, b: Point, style: Style) -> Option<Self> {
        let rect = Rect::from_points(a, b);
        if rect.width() <= MIN_RECT_SIZE || rect.height() <= MIN_RECT_SIZE {
            return None;
        }
        Some(Annotation::Rectangle(RectAnnotation { rect, style }))
    }

    /// Text with surrounding whitespace trimmed, or `None` if nothing is left
    pub fn text(position: Point, content: &str, style: Style) -> Option<Self> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        Some(Annotation::Text(TextAnnotation {
            position,
            content: content.to_string(),
            style,
        }))
    }

    pub fn style(&self) -> &Style {
        match self {
            Annotation::Arrow(a) => &a.style,
            Annotation::Rectangle(r) => &r.style,
            Annotation::Text(t) => &t.style,
        }
    }
}

/// One immutable version of the annotation list, the unit of undo/redo
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot(Arc<[Annotation]>);

impl Snapshot {
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    /// New snapshot with `annotation` appended; `self` is left untouched
    pub fn with(&self, annotation: Annotation) -> Self {
        let mut annotations = self.0.to_vec();
        annotations.push(annotation);
        Self(Arc::from(annotations))
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.0
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for Snapshot {
    type Target = [Annotation];

    fn deref(&self) -> &[Annotation] {
        &self.0
    }
}

impl From<Vec<Annotation>> for Snapshot {
    fn from(annotations: Vec<Annotation>) -> Self {
        Self(Arc::from(annotations))
    }
}
