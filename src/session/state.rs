use unicode_general_category::{GeneralCategory, get_general_category};

use crate::domain::{Annotation, ArrowAnnotation, Point, Rect, RectAnnotation, Style};

use super::messages::Mode;

/// Interaction phase of the overlay; exactly one is active at a time
#[derive(Clone, Debug, Default, PartialEq)]
pub enum InteractionState {
    /// Waiting for input
    #[default]
    Idle,
    /// Dragging out a selection region
    Selecting,
    /// Dragging out an arrow or rectangle
    Drawing(Provisional),
    /// Typing into a text annotation
    TextEditing(TextEdit),
    /// Terminal; all further input is ignored
    Exiting,
}

/// Shape kinds that are drawn by dragging
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Arrow,
    Rectangle,
}

impl ShapeKind {
    pub fn for_mode(mode: Mode) -> Option<Self> {
        match mode {
            Mode::Arrow => Some(ShapeKind::Arrow),
            Mode::Rectangle => Some(ShapeKind::Rectangle),
            Mode::None | Mode::Text => None,
        }
    }
}

/// In-progress shape, not yet part of the annotation list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Provisional {
    pub kind: ShapeKind,
    pub origin: Point,
    pub current: Point,
}

impl Provisional {
    pub fn new(kind: ShapeKind, origin: Point) -> Self {
        Self {
            kind,
            origin,
            current: origin,
        }
    }

    /// The annotation this drag would commit, subject to the size gates
    pub fn commit(&self, style: Style) -> Option<Annotation> {
        match self.kind {
            ShapeKind::Arrow => Annotation::arrow(self.origin, self.current, style),
            ShapeKind::Rectangle => Annotation::rectangle(self.origin, self.current, style),
        }
    }

    /// Live preview; unlike `commit` small rectangles are still shown
    pub fn preview(&self, style: Style) -> Option<Annotation> {
        match self.kind {
            ShapeKind::Arrow => Some(Annotation::Arrow(ArrowAnnotation {
                start: self.origin,
                end: self.current,
                style,
            })),
            ShapeKind::Rectangle => {
                let rect = Rect::from_points(self.origin, self.current);
                (!rect.is_empty()).then_some(Annotation::Rectangle(RectAnnotation { rect, style }))
            }
        }
    }
}

/// Plain space or any character outside the control, format, separator,
/// private-use, surrogate and unassigned categories
fn is_printable(c: char) -> bool {
    use GeneralCategory::*;
    c == ' '
        || !matches!(
            get_general_category(c),
            Control
                | Format
                | Surrogate
                | PrivateUse
                | Unassigned
                | SpaceSeparator
                | LineSeparator
                | ParagraphSeparator
        )
}

/// Text being typed at `position` with a caret
///
/// `caret` counts characters, not bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextEdit {
    pub position: Point,
    buffer: String,
    caret: usize,
}

impl TextEdit {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            buffer: String::new(),
            caret: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Text left of the caret, used to place it on screen
    pub fn before_caret(&self) -> &str {
        &self.buffer[..self.byte_offset(self.caret)]
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Insert printable text at the caret; returns false if nothing was inserted
    pub fn insert(&mut self, text: &str) -> bool {
        if text.is_empty() || !text.chars().all(is_printable) {
            return false;
        }
        let at = self.byte_offset(self.caret);
        self.buffer.insert_str(at, text);
        self.caret += text.chars().count();
        true
    }

    /// Delete the character before the caret
    pub fn backspace(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        let at = self.byte_offset(self.caret - 1);
        self.buffer.remove(at);
        self.caret -= 1;
        true
    }

    /// Delete the character after the caret
    pub fn delete(&mut self) -> bool {
        if self.caret >= self.char_len() {
            return false;
        }
        let at = self.byte_offset(self.caret);
        self.buffer.remove(at);
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        self.caret -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.caret >= self.char_len() {
            return false;
        }
        self.caret += 1;
        true
    }

    pub fn move_home(&mut self) -> bool {
        let moved = self.caret != 0;
        self.caret = 0;
        moved
    }

    pub fn move_end(&mut self) -> bool {
        let end = self.char_len();
        let moved = self.caret != end;
        self.caret = end;
        moved
    }

    /// Freeze into an annotation; `None` if only whitespace was typed
    pub fn commit(&self, style: Style) -> Option<Annotation> {
        Annotation::text(self.position, &self.buffer, style)
    }
}
