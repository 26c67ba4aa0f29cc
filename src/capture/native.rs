//! Native display grab through xcap
//!
//! Used on X11 (and other non-Wayland sessions) where every monitor can be
//! read directly without an external tool.

use image::{Rgba, RgbaImage};
use xcap::Monitor;

use super::env::monitor_rect;
use super::{CaptureBackend, CaptureError, Environment};
use crate::domain::Rect;

const NAME: &str = "native";

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeBackend;

impl CaptureBackend for NativeBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn is_available(&self, env: &dyn Environment) -> bool {
        if env.is_wayland() {
            return false;
        }
        Monitor::all().is_ok_and(|monitors| !monitors.is_empty())
    }

    fn capture(&self, geometry: Rect) -> Result<RgbaImage, CaptureError> {
        let dims = geometry
            .dimensions()
            .ok_or_else(|| CaptureError::failed(NAME, "empty desktop geometry"))?;
        let monitors = Monitor::all().map_err(|e| CaptureError::failed(NAME, e.to_string()))?;
        if monitors.is_empty() {
            return Err(CaptureError::failed(NAME, "no monitors found"));
        }

        let mut canvas = RgbaImage::from_pixel(dims.width(), dims.height(), Rgba([0, 0, 0, 255]));
        for monitor in &monitors {
            let rect = monitor_rect(monitor)?;
            let image = monitor
                .capture_image()
                .map_err(|e| CaptureError::failed(NAME, e.to_string()))?;
            log::debug!(
                "Captured monitor {}x{} at ({}, {})",
                image.width(),
                image.height(),
                rect.left,
                rect.top
            );
            image::imageops::overlay(
                &mut canvas,
                &image,
                (rect.left - geometry.left) as i64,
                (rect.top - geometry.top) as i64,
            );
        }
        Ok(canvas)
    }
}
