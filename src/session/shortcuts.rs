use super::messages::{Action, Key, Mode, Modifiers};

/// Map a key press outside of text editing to an overlay action
pub fn handle_key_event(key: Key, modifiers: Modifiers) -> Option<Action> {
    match key {
        // Export shortcuts
        Key::Character(c) if c.eq_ignore_ascii_case(&'s') && modifiers.control() => {
            Some(Action::Save)
        }
        Key::Character(c) if c.eq_ignore_ascii_case(&'c') && modifiers.control() => {
            Some(Action::CopyToClipboard)
        }
        // Undo/redo shortcuts
        Key::Character(c) if c.eq_ignore_ascii_case(&'z') && modifiers.control() => {
            Some(Action::Undo)
        }
        Key::Character(c)
            if (c.eq_ignore_ascii_case(&'r') || c.eq_ignore_ascii_case(&'y'))
                && modifiers.control() =>
        {
            Some(Action::Redo)
        }
        Key::Escape => Some(Action::Cancel),
        // Tool shortcuts
        Key::Character('1') => Some(Action::SetMode(Mode::Arrow)),
        Key::Character('2') => Some(Action::SetMode(Mode::Rectangle)),
        Key::Character('3') => Some(Action::SetMode(Mode::Text)),
        Key::Character('4') => Some(Action::CycleColor),
        _ => None,
    }
}
