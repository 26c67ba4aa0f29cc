//! Probes of the running session
//!
//! Backends never read `std::env` or `PATH` directly; they go through
//! [`Environment`] so availability can be faked in tests.

use crate::domain::Rect;

use super::CaptureError;

pub trait Environment {
    fn var(&self, key: &str) -> Option<String>;

    /// Whether `program` can be found on `PATH`
    fn has_program(&self, program: &str) -> bool;

    fn is_wayland(&self) -> bool {
        self.var("WAYLAND_DISPLAY").is_some_and(|v| !v.is_empty())
            || self
                .var("XDG_SESSION_TYPE")
                .is_some_and(|v| v.eq_ignore_ascii_case("wayland"))
    }

    /// Lowercased `XDG_CURRENT_DESKTOP`, empty if unset
    fn desktop(&self) -> String {
        self.var("XDG_CURRENT_DESKTOP")
            .unwrap_or_default()
            .to_lowercase()
    }
}

/// The real process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn has_program(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Source of monitor rectangles in desktop coordinates
pub trait ScreenLayout {
    fn monitors(&self) -> Result<Vec<Rect>, CaptureError>;
}

/// Monitor layout as reported by xcap
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapLayout;

impl ScreenLayout for XcapLayout {
    fn monitors(&self) -> Result<Vec<Rect>, CaptureError> {
        let monitors =
            xcap::Monitor::all().map_err(|e| CaptureError::failed("xcap", e.to_string()))?;
        monitors.iter().map(monitor_rect).collect()
    }
}

pub(crate) fn monitor_rect(monitor: &xcap::Monitor) -> Result<Rect, CaptureError> {
    let err = |e: xcap::XCapError| CaptureError::failed("xcap", e.to_string());
    let x = monitor.x().map_err(err)?;
    let y = monitor.y().map_err(err)?;
    let width = monitor.width().map_err(err)?;
    let height = monitor.height().map_err(err)?;
    Ok(Rect::from_xywh(x, y, width as i32, height as i32))
}

/// Bounding box of all monitors; empty if there are none
pub fn union_of(monitors: &[Rect]) -> Rect {
    monitors
        .iter()
        .fold(Rect::default(), |acc, monitor| acc.union(*monitor))
}
