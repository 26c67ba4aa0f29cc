//! Input and action types consumed by the overlay session
//!
//! This module contains:
//! - Device input events delivered by the host window
//! - Actions that can be triggered by shortcuts or toolbar buttons
//! - Effects the state machine asks the host to carry out

use crate::domain::Point;

/// Pointer buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other(u16),
}

/// Keys the overlay distinguishes; everything else arrives as `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Delete,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Character(char),
    Other(u32),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
        alt: false,
    };

    pub fn control(&self) -> bool {
        self.ctrl
    }
}

/// Device input in overlay window coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        button: PointerButton,
        position: Point,
    },
    PointerMove {
        position: Point,
    },
    PointerUp {
        button: PointerButton,
        position: Point,
    },
    KeyDown {
        key: Key,
        modifiers: Modifiers,
        /// Text produced by the key press, if any
        text: Option<String>,
    },
    /// Positive values scroll up
    Scroll {
        delta: i32,
    },
}

impl InputEvent {
    pub fn press(position: Point) -> Self {
        InputEvent::PointerDown {
            button: PointerButton::Primary,
            position,
        }
    }

    pub fn motion(position: Point) -> Self {
        InputEvent::PointerMove { position }
    }

    pub fn release(position: Point) -> Self {
        InputEvent::PointerUp {
            button: PointerButton::Primary,
            position,
        }
    }

    /// Plain key press without modifiers or produced text
    pub fn key(key: Key) -> Self {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
            text: None,
        }
    }

    /// Key press producing `text`
    pub fn typed(text: &str) -> Self {
        let key = text
            .chars()
            .next()
            .map(Key::Character)
            .unwrap_or(Key::Other(0));
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
            text: Some(text.to_string()),
        }
    }

    pub fn shortcut(c: char) -> Self {
        InputEvent::KeyDown {
            key: Key::Character(c),
            modifiers: Modifiers::CTRL,
            text: None,
        }
    }
}

/// Annotation tool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    None,
    Arrow,
    Rectangle,
    Text,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::None => "select",
            Mode::Arrow => "arrow",
            Mode::Rectangle => "rectangle",
            Mode::Text => "text",
        }
    }
}

/// Where a finished image should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    Clipboard,
    File,
}

/// Actions exposed to the host (shortcuts, toolbar buttons)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SetMode(Mode),
    CycleColor,
    Undo,
    Redo,
    /// Commit pending text and hand the image to the clipboard
    CopyToClipboard,
    /// Commit pending text and hand the image to the save flow
    Save,
    Cancel,
}

/// What the host has to do after an event was processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing changed
    Ignored,
    /// State changed, repaint the overlay
    Redraw,
    /// Session is over; export the selection to `target`
    Export(ExportTarget),
    /// Session is over without output
    Exit,
}
