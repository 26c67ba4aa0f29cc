//! Region selection lifecycle

use super::geometry::{Point, Rect};
use crate::config::MIN_SELECTION_SIZE;

/// Selected region in desktop coordinates
///
/// The rectangle is always stored normalized. A `Complete` region is strictly
/// larger than `MIN_SELECTION_SIZE` in both dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionRegion {
    #[default]
    Empty,
    /// Pointer is held down; `rect` spans from `anchor` to the last position
    Dragging { anchor: Point, rect: Rect },
    Complete(Rect),
}

impl SelectionRegion {
    /// Start a new drag at `anchor`, discarding whatever was selected before
    pub fn begin(&mut self, anchor: Point) {
        *self = SelectionRegion::Dragging {
            anchor,
            rect: Rect::from_points(anchor, anchor),
        };
    }

    /// Track the pointer while dragging; no-op in any other state
    pub fn update(&mut self, current: Point) -> bool {
        match self {
            SelectionRegion::Dragging { anchor, rect } => {
                *rect = Rect::from_points(*anchor, current);
                true
            }
            _ => false,
        }
    }

    /// End the drag. Returns true if the region became `Complete`.
    ///
    /// Drags that are too small revert to `Empty`.
    pub fn finish(&mut self) -> bool {
        let SelectionRegion::Dragging { rect, .. } = *self else {
            return false;
        };
        if rect.width() > MIN_SELECTION_SIZE && rect.height() > MIN_SELECTION_SIZE {
            *self = SelectionRegion::Complete(rect);
            true
        } else {
            log::debug!(
                "Discarding {}x{} selection below minimum size",
                rect.width(),
                rect.height()
            );
            *self = SelectionRegion::Empty;
            false
        }
    }

    /// Current rectangle, if any, while dragging or complete
    pub fn rect(&self) -> Option<Rect> {
        match self {
            SelectionRegion::Empty => None,
            SelectionRegion::Dragging { rect, .. } | SelectionRegion::Complete(rect) => {
                Some(*rect)
            }
        }
    }

    pub fn completed(&self) -> Option<Rect> {
        match self {
            SelectionRegion::Complete(rect) => Some(*rect),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, SelectionRegion::Complete(_))
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, SelectionRegion::Dragging { .. })
    }
}
