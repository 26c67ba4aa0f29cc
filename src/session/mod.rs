//! Overlay session management module
//!
//! This module contains:
//! - Message types for overlay interactions
//! - Keyboard shortcut mapping
//! - Interaction state types
//! - The interaction state machine
//! - `OverlaySession`, which ties a frozen capture to the state machine

pub mod machine;
pub mod messages;
pub mod shortcuts;
pub mod state;

use image::RgbaImage;

use crate::capture::{CaptureContext, CaptureError, CaptureImage};
use crate::config::Config;
use crate::domain::CoordinateSpace;
use crate::render::{render_overlay, render_selection};

pub use machine::InteractionMachine;
pub use messages::{Action, Effect, ExportTarget, InputEvent, Key, Modifiers, Mode, PointerButton};
pub use state::InteractionState;

/// Outcome of an input event or action, with the export image attached
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Ignored,
    Redraw,
    /// Session is over; hand `image` to the exporter for `target`
    Export {
        target: ExportTarget,
        image: RgbaImage,
    },
    Exit,
}

/// One capture-and-annotate session over a frozen desktop image
pub struct OverlaySession {
    capture: CaptureImage,
    machine: InteractionMachine,
}

impl OverlaySession {
    /// Capture every screen once and open a session over the result
    pub fn start(context: &mut CaptureContext, config: &Config) -> Result<Self, CaptureError> {
        let capture = context.capture_all_screens()?;
        log::info!(
            "Captured {}x{} desktop at ({}, {})",
            capture.width(),
            capture.height(),
            capture.geometry().left,
            capture.geometry().top
        );
        Ok(Self::from_capture(capture, config))
    }

    pub fn from_capture(capture: CaptureImage, config: &Config) -> Self {
        let coords = CoordinateSpace::new(capture.geometry());
        Self {
            machine: InteractionMachine::new(coords, config),
            capture,
        }
    }

    pub fn capture(&self) -> &CaptureImage {
        &self.capture
    }

    pub fn machine(&self) -> &InteractionMachine {
        &self.machine
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Response {
        let effect = self.machine.handle_input(event);
        self.respond(effect)
    }

    pub fn apply(&mut self, action: Action) -> Response {
        let effect = self.machine.apply(action);
        self.respond(effect)
    }

    fn respond(&self, effect: Effect) -> Response {
        match effect {
            Effect::Ignored => Response::Ignored,
            Effect::Redraw => Response::Redraw,
            Effect::Exit => Response::Exit,
            Effect::Export(target) => match self.render_selection() {
                Some(image) => Response::Export { target, image },
                None => {
                    log::warn!("Selection is outside the captured image, nothing to export");
                    Response::Exit
                }
            },
        }
    }

    /// Cropped and annotated selection; `None` without a complete selection
    pub fn render_selection(&self) -> Option<RgbaImage> {
        let selection = self.machine.selection().completed()?;
        render_selection(
            &self.capture,
            self.machine.coords(),
            selection,
            self.machine.annotations(),
        )
    }

    /// Current overlay frame
    pub fn render_overlay(&self) -> RgbaImage {
        render_overlay(&self.capture, &self.machine)
    }
}
