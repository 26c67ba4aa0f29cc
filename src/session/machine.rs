//! Overlay interaction state machine
//!
//! Consumes pointer and keyboard input in window coordinates, drives the
//! selection, drawing and text-editing lifecycles and keeps the annotation
//! list and its undo history. Rendering and capture live elsewhere; every
//! handler returns an [`Effect`] telling the host what to do next.

use crate::config::{Config, MAX_THICKNESS, MIN_THICKNESS, PaletteColor};
use crate::domain::{
    Annotation, CoordinateSpace, HistoryStack, Point, Rect, SelectionRegion, Snapshot, Style,
};

use super::messages::{Action, Effect, ExportTarget, InputEvent, Key, Mode, PointerButton};
use super::shortcuts::handle_key_event;
use super::state::{InteractionState, Provisional, ShapeKind, TextEdit};

pub struct InteractionMachine {
    coords: CoordinateSpace,
    state: InteractionState,
    selection: SelectionRegion,
    mode: Mode,
    color: PaletteColor,
    thickness: u32,
    annotations: Snapshot,
    history: HistoryStack,
    input_grabbed: bool,
}

impl InteractionMachine {
    pub fn new(coords: CoordinateSpace, config: &Config) -> Self {
        Self {
            coords,
            state: InteractionState::Idle,
            selection: SelectionRegion::Empty,
            mode: Mode::None,
            color: config.color,
            thickness: config.thickness.clamp(MIN_THICKNESS, MAX_THICKNESS),
            annotations: Snapshot::empty(),
            history: HistoryStack::new(config.history_capacity),
            input_grabbed: true,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn selection(&self) -> &SelectionRegion {
        &self.selection
    }

    /// Selection in window coordinates
    pub fn selection_window_rect(&self) -> Option<Rect> {
        self.selection.rect().map(|r| self.coords.rect_to_window(r))
    }

    pub fn coords(&self) -> &CoordinateSpace {
        &self.coords
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn color(&self) -> PaletteColor {
        self.color
    }

    pub fn style(&self) -> Style {
        Style::new(self.thickness, self.color.color())
    }

    /// Committed annotations, in drawing order
    pub fn annotations(&self) -> &[Annotation] {
        self.annotations.annotations()
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Whether the host should keep keyboard and pointer grabbed
    pub fn input_grabbed(&self) -> bool {
        self.input_grabbed
    }

    pub fn is_exiting(&self) -> bool {
        matches!(self.state, InteractionState::Exiting)
    }

    /// Preview of the shape currently being dragged
    pub fn provisional_preview(&self) -> Option<Annotation> {
        match &self.state {
            InteractionState::Drawing(shape) => shape.preview(self.style()),
            _ => None,
        }
    }

    pub fn text_edit(&self) -> Option<&TextEdit> {
        match &self.state {
            InteractionState::TextEditing(edit) => Some(edit),
            _ => None,
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Effect {
        if self.is_exiting() {
            return Effect::Ignored;
        }
        match event {
            InputEvent::PointerDown {
                button: PointerButton::Primary,
                position,
            } => self.pointer_down(position),
            InputEvent::PointerMove { position } => self.pointer_move(position),
            InputEvent::PointerUp {
                button: PointerButton::Primary,
                ..
            } => self.pointer_up(),
            InputEvent::PointerDown { .. } | InputEvent::PointerUp { .. } => Effect::Ignored,
            InputEvent::KeyDown {
                key,
                modifiers,
                text,
            } => {
                if matches!(self.state, InteractionState::TextEditing(_)) {
                    self.text_key(key, text.as_deref())
                } else {
                    match handle_key_event(key, modifiers) {
                        Some(action) => self.apply(action),
                        None => Effect::Ignored,
                    }
                }
            }
            InputEvent::Scroll { delta } => self.scroll(delta),
        }
    }

    pub fn apply(&mut self, action: Action) -> Effect {
        if self.is_exiting() {
            return Effect::Ignored;
        }
        match action {
            Action::SetMode(mode) => {
                self.finish_text_editing();
                self.mode = mode;
                log::debug!("Annotation mode: {}", mode.name());
                Effect::Redraw
            }
            Action::CycleColor => {
                self.color = self.color.next();
                log::debug!("Annotation color: {}", self.color.name());
                Effect::Redraw
            }
            Action::Undo => self.undo(),
            Action::Redo => self.redo(),
            Action::CopyToClipboard => self.export(ExportTarget::Clipboard),
            Action::Save => self.export(ExportTarget::File),
            Action::Cancel => {
                if self.prepare_exit() {
                    Effect::Exit
                } else {
                    Effect::Ignored
                }
            }
        }
    }

    fn pointer_down(&mut self, position: Point) -> Effect {
        let desktop = self.coords.to_desktop(position);

        let Some(selection) = self.selection_window_rect().filter(|_| self.selection.is_complete())
        else {
            self.selection.begin(desktop);
            self.state = InteractionState::Selecting;
            return Effect::Redraw;
        };

        if !selection.contains(position) {
            self.start_new_selection(desktop);
            return Effect::Redraw;
        }

        match self.mode {
            Mode::None => Effect::Ignored,
            Mode::Text => {
                self.finish_text_editing();
                self.state = InteractionState::TextEditing(TextEdit::new(position));
                log::debug!("Text editing started at ({}, {})", position.x, position.y);
                Effect::Redraw
            }
            Mode::Arrow | Mode::Rectangle => {
                self.finish_text_editing();
                if let Some(kind) = ShapeKind::for_mode(self.mode) {
                    self.state = InteractionState::Drawing(Provisional::new(kind, position));
                }
                Effect::Redraw
            }
        }
    }

    /// Click outside a complete selection: throw the session away and start
    /// dragging a fresh region at `desktop`
    fn start_new_selection(&mut self, desktop: Point) {
        log::debug!("Starting new selection at ({}, {})", desktop.x, desktop.y);
        self.finish_text_editing();
        self.mode = Mode::None;
        self.annotations = Snapshot::empty();
        self.history.reset(Snapshot::empty());
        self.selection.begin(desktop);
        self.state = InteractionState::Selecting;
    }

    fn pointer_move(&mut self, position: Point) -> Effect {
        match &mut self.state {
            InteractionState::Selecting => {
                if self.selection.update(self.coords.to_desktop(position)) {
                    Effect::Redraw
                } else {
                    Effect::Ignored
                }
            }
            InteractionState::Drawing(shape) => {
                shape.current = position;
                Effect::Redraw
            }
            _ => Effect::Ignored,
        }
    }

    fn pointer_up(&mut self) -> Effect {
        match std::mem::take(&mut self.state) {
            InteractionState::Selecting => {
                if self.selection.finish() {
                    if let Some(rect) = self.selection.completed() {
                        log::info!(
                            "Selection complete: {}x{} at ({}, {})",
                            rect.width(),
                            rect.height(),
                            rect.left,
                            rect.top
                        );
                    }
                    self.annotations = Snapshot::empty();
                    self.history.reset(Snapshot::empty());
                }
                Effect::Redraw
            }
            InteractionState::Drawing(shape) => {
                if let Some(annotation) = shape.commit(self.style()) {
                    self.commit(annotation);
                } else {
                    log::debug!("Discarding {:?} below minimum size", shape.kind);
                }
                Effect::Redraw
            }
            other => {
                self.state = other;
                Effect::Ignored
            }
        }
    }

    fn scroll(&mut self, delta: i32) -> Effect {
        if !self.selection.is_complete() || delta == 0 {
            return Effect::Ignored;
        }
        let thickness = if delta > 0 {
            (self.thickness + 1).min(MAX_THICKNESS)
        } else {
            self.thickness.saturating_sub(1).max(MIN_THICKNESS)
        };
        if thickness == self.thickness {
            return Effect::Ignored;
        }
        self.thickness = thickness;
        log::debug!("Thickness: {}", self.thickness);
        Effect::Redraw
    }

    fn text_key(&mut self, key: Key, text: Option<&str>) -> Effect {
        match key {
            Key::Enter => {
                self.finish_text_editing();
                return Effect::Redraw;
            }
            Key::Escape => {
                log::debug!("Text edit discarded");
                self.state = InteractionState::Idle;
                return Effect::Redraw;
            }
            _ => {}
        }
        let InteractionState::TextEditing(edit) = &mut self.state else {
            return Effect::Ignored;
        };
        let changed = match key {
            Key::Enter | Key::Escape => false,
            Key::Backspace => edit.backspace(),
            Key::Delete => edit.delete(),
            Key::ArrowLeft => edit.move_left(),
            Key::ArrowRight => edit.move_right(),
            Key::Home => edit.move_home(),
            Key::End => edit.move_end(),
            Key::Character(_) | Key::Other(_) => text.is_some_and(|t| edit.insert(t)),
        };
        if changed {
            Effect::Redraw
        } else {
            Effect::Ignored
        }
    }

    /// Commit the text being edited, if any, and return to idle
    fn finish_text_editing(&mut self) {
        if !matches!(self.state, InteractionState::TextEditing(_)) {
            return;
        }
        let InteractionState::TextEditing(edit) = std::mem::take(&mut self.state) else {
            return;
        };
        if let Some(annotation) = edit.commit(self.style()) {
            self.commit(annotation);
        }
    }

    fn commit(&mut self, annotation: Annotation) {
        self.annotations = self.annotations.with(annotation);
        self.history.push(self.annotations.clone());
        log::debug!(
            "Committed annotation #{} (history {}/{})",
            self.annotations.len(),
            self.history.index() + 1,
            self.history.len()
        );
    }

    fn undo(&mut self) -> Effect {
        match self.history.undo() {
            Some(snapshot) => {
                self.annotations = snapshot.clone();
                log::debug!("Undo");
                Effect::Redraw
            }
            None => Effect::Ignored,
        }
    }

    fn redo(&mut self) -> Effect {
        match self.history.redo() {
            Some(snapshot) => {
                self.annotations = snapshot.clone();
                log::debug!("Redo");
                Effect::Redraw
            }
            None => Effect::Ignored,
        }
    }

    fn export(&mut self, target: ExportTarget) -> Effect {
        if !self.selection.is_complete() {
            log::warn!("No valid selection to export");
            return Effect::Ignored;
        }
        if self.prepare_exit() {
            Effect::Export(target)
        } else {
            Effect::Ignored
        }
    }

    /// Latch into `Exiting`; false if already there
    fn prepare_exit(&mut self) -> bool {
        if self.is_exiting() {
            return false;
        }
        self.finish_text_editing();
        self.input_grabbed = false;
        self.state = InteractionState::Exiting;
        log::debug!("Overlay exiting");
        true
    }

    /// Context help shown under the selection
    pub fn help_text(&self) -> String {
        let Some(rect) = self.selection.rect() else {
            return "Click and drag to select area | Click outside selection to start new area | ESC to exit".to_string();
        };
        if !self.selection.is_complete() {
            return format!("{} x {}", rect.width(), rect.height());
        }
        if self.text_edit().is_some() {
            return format!(
                "TEXT EDITING: Type your text | Enter=Finish | Esc=Cancel | Thickness: {}",
                self.thickness
            );
        }
        let base = match self.mode {
            Mode::None => "SELECT MODE: Press 1=Arrow 2=Rectangle 3=Text".to_string(),
            Mode::Arrow => format!(
                "ARROW MODE: Click & drag to draw arrows | Scroll=Thickness({}) | Keys: 1,2,3=Switch",
                self.thickness
            ),
            Mode::Rectangle => format!(
                "RECTANGLE MODE: Click & drag to draw boxes | Scroll=Thickness({}) | Keys: 1,2,3=Switch",
                self.thickness
            ),
            Mode::Text => format!(
                "TEXT MODE: Click anywhere to start typing | Scroll=Thickness({}) | Keys: 1,2,3=Switch",
                self.thickness
            ),
        };
        let mut help = format!("{base} | 4=Color({})", self.color.name());
        if self.history.can_undo() {
            help.push_str(" | Ctrl+Z=Undo");
        }
        if self.history.can_redo() {
            help.push_str(" | Ctrl+R=Redo");
        }
        help.push_str(" | Ctrl+C=Copy | Ctrl+S=Save");
        help
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::messages::Modifiers;

    /// Machine over a desktop whose origin is (-100, -50)
    fn machine() -> InteractionMachine {
        let coords = CoordinateSpace::new(Rect::from_xywh(-100, -50, 1000, 800));
        InteractionMachine::new(coords, &Config::default())
    }

    fn drag(m: &mut InteractionMachine, from: (i32, i32), to: (i32, i32)) -> Effect {
        m.handle_input(InputEvent::press(Point::new(from.0, from.1)));
        m.handle_input(InputEvent::motion(Point::new(to.0, to.1)));
        m.handle_input(InputEvent::release(Point::new(to.0, to.1)))
    }

    /// Machine with a complete selection covering window (100,100)..(500,400)
    fn selected() -> InteractionMachine {
        let mut m = machine();
        drag(&mut m, (500, 400), (100, 100));
        m
    }

    #[test]
    fn test_selection_stored_in_desktop_coordinates() {
        let m = selected();
        assert_eq!(
            m.selection().completed(),
            Some(Rect::new(0, 50, 400, 350))
        );
        assert_eq!(m.selection_window_rect(), Some(Rect::new(100, 100, 500, 400)));
        assert_eq!(m.state(), &InteractionState::Idle);
        assert_eq!(m.history().len(), 1);
        assert_eq!(m.history().index(), 0);
    }

    #[test]
    fn test_small_selection_discarded() {
        let mut m = machine();
        drag(&mut m, (100, 100), (110, 300));
        assert_eq!(m.selection(), &SelectionRegion::Empty);
        assert_eq!(m.state(), &InteractionState::Idle);
        assert!(m.history().is_empty());
    }

    #[test]
    fn test_mode_none_click_inside_does_nothing() {
        let mut m = selected();
        assert_eq!(
            m.handle_input(InputEvent::press(Point::new(200, 200))),
            Effect::Ignored
        );
        assert_eq!(m.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_arrow_drawn_and_short_arrow_dropped() {
        let mut m = selected();
        m.apply(Action::SetMode(Mode::Arrow));
        drag(&mut m, (150, 150), (300, 200));
        assert_eq!(m.annotations().len(), 1);
        assert_eq!(m.history().len(), 2);

        drag(&mut m, (150, 150), (155, 155));
        assert_eq!(m.annotations().len(), 1);
        assert_eq!(m.history().len(), 2);
    }

    #[test]
    fn test_rectangle_preview_then_commit() {
        let mut m = selected();
        m.apply(Action::SetMode(Mode::Rectangle));
        m.handle_input(InputEvent::press(Point::new(300, 300)));
        m.handle_input(InputEvent::motion(Point::new(200, 250)));
        let Some(Annotation::Rectangle(preview)) = m.provisional_preview() else {
            panic!("expected rectangle preview");
        };
        assert_eq!(preview.rect, Rect::new(200, 250, 300, 300));
        assert!(m.annotations().is_empty());

        m.handle_input(InputEvent::release(Point::new(200, 250)));
        assert_eq!(m.annotations().len(), 1);
        assert!(m.provisional_preview().is_none());
    }

    #[test]
    fn test_click_outside_resets_session() {
        let mut m = selected();
        m.apply(Action::SetMode(Mode::Arrow));
        drag(&mut m, (150, 150), (300, 200));
        drag(&mut m, (160, 150), (300, 300));
        assert_eq!(m.annotations().len(), 2);

        m.handle_input(InputEvent::press(Point::new(700, 600)));
        assert!(m.annotations().is_empty());
        assert_eq!(m.history().len(), 1);
        assert_eq!(m.history().index(), 0);
        assert!(m.history().current().is_some_and(|s| s.is_empty()));
        assert!(m.selection().is_dragging());
        assert_eq!(m.state(), &InteractionState::Selecting);
        assert_eq!(m.mode(), Mode::None);
    }

    #[test]
    fn test_text_commit_and_second_click() {
        let mut m = selected();
        m.apply(Action::SetMode(Mode::Text));
        m.handle_input(InputEvent::press(Point::new(200, 200)));
        for c in ["h", "i"] {
            m.handle_input(InputEvent::typed(c));
        }
        assert_eq!(m.text_edit().map(|e| e.text()), Some("hi"));

        // Second click commits the first text and starts a new edit
        m.handle_input(InputEvent::press(Point::new(250, 300)));
        assert_eq!(m.annotations().len(), 1);
        assert_eq!(m.text_edit().map(|e| e.position), Some(Point::new(250, 300)));

        // Empty edit is dropped silently
        m.handle_input(InputEvent::press(Point::new(260, 310)));
        assert_eq!(m.annotations().len(), 1);
        assert_eq!(m.history().len(), 2);
    }

    #[test]
    fn test_text_keys_are_not_shortcuts() {
        let mut m = selected();
        m.apply(Action::SetMode(Mode::Text));
        m.handle_input(InputEvent::press(Point::new(200, 200)));
        m.handle_input(InputEvent::typed("1"));
        m.handle_input(InputEvent::typed("4"));
        assert_eq!(m.mode(), Mode::Text);
        assert_eq!(m.color(), PaletteColor::Red);
        assert_eq!(m.text_edit().map(|e| e.text()), Some("14"));

        assert_eq!(
            m.handle_input(InputEvent::KeyDown {
                key: Key::Other(9),
                modifiers: Modifiers::NONE,
                text: Some("\t".to_string()),
            }),
            Effect::Ignored
        );

        m.handle_input(InputEvent::key(Key::Enter));
        assert_eq!(m.state(), &InteractionState::Idle);
        assert_eq!(m.annotations().len(), 1);
    }

    #[test]
    fn test_escape_discards_text_edit_only() {
        let mut m = selected();
        m.apply(Action::SetMode(Mode::Text));
        m.handle_input(InputEvent::press(Point::new(200, 200)));
        m.handle_input(InputEvent::typed("x"));
        m.handle_input(InputEvent::key(Key::Escape));
        assert_eq!(m.state(), &InteractionState::Idle);
        assert!(m.annotations().is_empty());
        assert!(!m.is_exiting());
    }

    #[test]
    fn test_scroll_clamped_and_needs_selection() {
        let mut m = machine();
        assert_eq!(m.handle_input(InputEvent::Scroll { delta: 120 }), Effect::Ignored);
        assert_eq!(m.style().thickness, 3);

        let mut m = selected();
        for _ in 0..30 {
            m.handle_input(InputEvent::Scroll { delta: 120 });
        }
        assert_eq!(m.style().thickness, MAX_THICKNESS);
        for _ in 0..30 {
            m.handle_input(InputEvent::Scroll { delta: -120 });
        }
        assert_eq!(m.style().thickness, MIN_THICKNESS);
    }

    #[test]
    fn test_cycle_color_wraps() {
        let mut m = selected();
        for _ in 0..PaletteColor::ALL.len() {
            m.handle_input(InputEvent::typed("4"));
        }
        assert_eq!(m.color(), PaletteColor::Red);
        m.apply(Action::CycleColor);
        assert_eq!(m.style().color, PaletteColor::Blue.color());
    }

    #[test]
    fn test_undo_redo_through_shortcuts() {
        let mut m = selected();
        m.apply(Action::SetMode(Mode::Rectangle));
        drag(&mut m, (150, 150), (250, 250));
        drag(&mut m, (300, 150), (400, 250));

        assert_eq!(m.handle_input(InputEvent::shortcut('z')), Effect::Redraw);
        assert_eq!(m.annotations().len(), 1);
        assert_eq!(m.handle_input(InputEvent::shortcut('z')), Effect::Redraw);
        assert!(m.annotations().is_empty());
        assert_eq!(m.handle_input(InputEvent::shortcut('z')), Effect::Ignored);
        assert_eq!(m.handle_input(InputEvent::shortcut('r')), Effect::Redraw);
        assert_eq!(m.annotations().len(), 1);
    }

    #[test]
    fn test_cancel_latches() {
        let mut m = selected();
        m.apply(Action::SetMode(Mode::Text));
        m.handle_input(InputEvent::press(Point::new(200, 200)));
        m.handle_input(InputEvent::typed("keep"));

        assert_eq!(m.handle_input(InputEvent::key(Key::Escape)), Effect::Redraw);
        assert_eq!(m.apply(Action::Cancel), Effect::Exit);
        assert_eq!(m.apply(Action::Cancel), Effect::Ignored);
        assert!(m.is_exiting());
        assert!(!m.input_grabbed());

        for event in [
            InputEvent::press(Point::new(700, 700)),
            InputEvent::motion(Point::new(10, 10)),
            InputEvent::release(Point::new(10, 10)),
            InputEvent::Scroll { delta: 1 },
            InputEvent::shortcut('z'),
        ] {
            assert_eq!(m.handle_input(event), Effect::Ignored);
        }
        assert!(m.selection().is_complete());
    }

    #[test]
    fn test_export_commits_pending_text() {
        let mut m = selected();
        m.apply(Action::SetMode(Mode::Text));
        m.handle_input(InputEvent::press(Point::new(200, 200)));
        m.handle_input(InputEvent::typed("done"));
        assert_eq!(
            m.apply(Action::CopyToClipboard),
            Effect::Export(ExportTarget::Clipboard)
        );
        assert_eq!(m.annotations().len(), 1);
        assert!(m.is_exiting());
        assert_eq!(m.apply(Action::Save), Effect::Ignored);
    }

    #[test]
    fn test_cancel_action_commits_pending_text() {
        let mut m = selected();
        m.apply(Action::SetMode(Mode::Text));
        m.handle_input(InputEvent::press(Point::new(200, 200)));
        m.handle_input(InputEvent::typed("kept"));
        assert_eq!(m.apply(Action::Cancel), Effect::Exit);
        assert_eq!(m.annotations().len(), 1);
        assert!(m.text_edit().is_none());
    }

    #[test]
    fn test_export_without_selection_ignored() {
        let mut m = machine();
        assert_eq!(m.handle_input(InputEvent::shortcut('s')), Effect::Ignored);
        assert!(!m.is_exiting());
    }

    #[test]
    fn test_secondary_button_ignored() {
        let mut m = machine();
        let event = InputEvent::PointerDown {
            button: PointerButton::Secondary,
            position: Point::new(10, 10),
        };
        assert_eq!(m.handle_input(event), Effect::Ignored);
        assert_eq!(m.selection(), &SelectionRegion::Empty);
    }

    #[test]
    fn test_help_text_tracks_state() {
        let mut m = machine();
        assert!(m.help_text().starts_with("Click and drag"));
        m.handle_input(InputEvent::press(Point::new(0, 0)));
        m.handle_input(InputEvent::motion(Point::new(40, 30)));
        assert_eq!(m.help_text(), "40 x 30");
        m.handle_input(InputEvent::release(Point::new(40, 30)));
        assert!(m.help_text().contains("SELECT MODE"));
        m.apply(Action::SetMode(Mode::Arrow));
        assert!(m.help_text().contains("ARROW MODE"));
        assert!(m.help_text().contains("Color(Red)"));
        assert!(!m.help_text().contains("Undo"));

        drag(&mut m, (5, 5), (30, 25));
        assert!(m.help_text().contains("Ctrl+Z=Undo"));
        assert!(!m.help_text().contains("Redo"));
        m.apply(Action::Undo);
        assert!(!m.help_text().contains("Undo"));
        assert!(m.help_text().contains("Ctrl+R=Redo"));
    }
}
