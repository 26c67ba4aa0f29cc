//! Screen capture module
//!
//! This module contains:
//! - The backend trait and its error type
//! - Environment and monitor layout probes (env.rs)
//! - The native xcap backend (native.rs)
//! - External screenshot tools run under a timeout (command.rs, process.rs)
//! - The backend selector that pins one backend per session (selector.rs)
//! - The frozen capture image (image.rs)

pub mod command;
pub mod env;
pub mod image;
pub mod native;
pub mod process;
pub mod selector;

use ::image::RgbaImage;

use crate::domain::Rect;

pub use command::CommandBackend;
pub use env::{Environment, ScreenLayout, SystemEnvironment, XcapLayout};
pub use self::image::CaptureImage;
pub use native::NativeBackend;
pub use selector::CaptureContext;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("No screen capture backend is available")]
    Unavailable,

    #[error("{backend} capture failed: {reason}")]
    Failed { backend: String, reason: String },

    #[error("{backend} timed out after {secs}s")]
    Timeout { backend: String, secs: u64 },

    #[error("I/O error during capture: {0}")]
    Io(#[from] std::io::Error),
}

impl CaptureError {
    pub fn failed(backend: &str, reason: impl Into<String>) -> Self {
        CaptureError::Failed {
            backend: backend.to_string(),
            reason: reason.into(),
        }
    }
}

/// One way of grabbing the whole desktop
pub trait CaptureBackend {
    /// Short name used in logs and the backend report
    fn name(&self) -> &str;

    /// Cheap availability check; must not capture anything
    fn is_available(&self, env: &dyn Environment) -> bool;

    /// Grab every screen as one image covering `geometry`
    fn capture(&self, geometry: Rect) -> Result<RgbaImage, CaptureError>;
}
