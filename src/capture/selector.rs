//! Backend selection
//!
//! Backends are probed once, in priority order, on first use. The first one
//! that reports itself available is pinned and every later capture goes
//! through it; a failing capture is reported as-is instead of falling back,
//! so geometry and pixels always come from the same source.

use std::fmt::Write as _;

use crate::config::Config;
use crate::domain::Rect;

use super::env::union_of;
use super::{
    CaptureBackend, CaptureError, CaptureImage, CommandBackend, Environment, NativeBackend,
    ScreenLayout, SystemEnvironment, XcapLayout,
};

/// Capture services for one overlay session
pub struct CaptureContext {
    backends: Vec<Box<dyn CaptureBackend>>,
    env: Box<dyn Environment>,
    layout: Box<dyn ScreenLayout>,
    /// `None` until probed; `Some(None)` if nothing was available
    pinned: Option<Option<usize>>,
    geometry: Option<Rect>,
}

impl CaptureContext {
    /// `backends` must be in priority order
    pub fn new(
        backends: Vec<Box<dyn CaptureBackend>>,
        env: Box<dyn Environment>,
        layout: Box<dyn ScreenLayout>,
    ) -> Self {
        Self {
            backends,
            env,
            layout,
            pinned: None,
            geometry: None,
        }
    }

    /// Default backend chain for the running system
    pub fn system(config: &Config) -> Self {
        let timeout = config.capture_timeout();
        let backends: Vec<Box<dyn CaptureBackend>> = vec![
            Box::new(NativeBackend),
            Box::new(CommandBackend::grim().with_timeout(timeout)),
            Box::new(CommandBackend::gnome_screenshot().with_timeout(timeout)),
            Box::new(CommandBackend::spectacle().with_timeout(timeout)),
            Box::new(CommandBackend::imagemagick().with_timeout(timeout)),
        ];
        Self::new(backends, Box::new(SystemEnvironment), Box::new(XcapLayout))
    }

    fn probe(&mut self) -> Option<usize> {
        if let Some(pinned) = self.pinned {
            return pinned;
        }
        let found = self
            .backends
            .iter()
            .position(|backend| backend.is_available(self.env.as_ref()));
        match found {
            Some(index) => log::info!("Using {} capture backend", self.backends[index].name()),
            None => log::warn!("No screen capture backend available"),
        }
        self.pinned = Some(found);
        found
    }

    /// Pinned backend, probing on first call
    pub fn active_backend(&mut self) -> Option<&dyn CaptureBackend> {
        let index = self.probe()?;
        self.backends.get(index).map(|b| b.as_ref())
    }

    pub fn active_backend_name(&mut self) -> Option<String> {
        self.active_backend().map(|b| b.name().to_string())
    }

    /// Forget the pinned backend and cached geometry
    pub fn invalidate(&mut self) {
        log::debug!("Capture backend selection invalidated");
        self.pinned = None;
        self.geometry = None;
    }

    /// Union of all monitors in desktop coordinates; empty if none can be
    /// enumerated
    pub fn virtual_geometry(&mut self) -> Rect {
        if let Some(geometry) = self.geometry {
            return geometry;
        }
        let geometry = match self.layout.monitors() {
            Ok(monitors) => union_of(&monitors),
            Err(err) => {
                log::warn!("Failed to enumerate monitors: {err}");
                Rect::default()
            }
        };
        if !geometry.is_empty() {
            self.geometry = Some(geometry);
        }
        geometry
    }

    /// Grab the whole desktop through the pinned backend
    pub fn capture_all_screens(&mut self) -> Result<CaptureImage, CaptureError> {
        let geometry = self.virtual_geometry();
        if geometry.is_empty() {
            return Err(CaptureError::failed("layout", "no screens found"));
        }
        let backend = self.active_backend().ok_or(CaptureError::Unavailable)?;
        let name = backend.name().to_string();
        let rgba = backend.capture(geometry).inspect_err(|err| {
            log::error!("Capture with {name} failed: {err}");
        })?;
        Ok(CaptureImage::new(rgba, geometry))
    }

    /// Human readable listing of the backends and session details
    pub fn backend_report(&mut self) -> String {
        let pinned = self.probe();
        let mut report = String::from("Screen capture backends:\n");
        for (index, backend) in self.backends.iter().enumerate() {
            let available = if backend.is_available(self.env.as_ref()) {
                "available"
            } else {
                "unavailable"
            };
            let marker = if pinned == Some(index) { " (active)" } else { "" };
            let _ = writeln!(report, "  {}: {available}{marker}", backend.name());
        }
        let var = |key: &str| self.env.var(key).unwrap_or_else(|| "unset".to_string());
        let _ = writeln!(report, "Session type: {}", var("XDG_SESSION_TYPE"));
        let _ = writeln!(report, "Desktop: {}", var("XDG_CURRENT_DESKTOP"));
        let _ = write!(report, "Wayland display: {}", var("WAYLAND_DISPLAY"));
        report
    }
}
