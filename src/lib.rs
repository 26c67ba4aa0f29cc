//! Multi-monitor capture and annotation engine
//!
//! A capture backend grabs the whole desktop once; an [`OverlaySession`]
//! then drives selection, annotation and export over that frozen image.

pub mod capture;
pub mod config;
pub mod domain;
pub mod export;
pub mod render;
pub mod session;

pub use capture::{CaptureContext, CaptureError, CaptureImage};
pub use config::Config;
pub use export::{ClipboardExporter, ExportError, Exporter, PngFileExporter};
pub use session::{OverlaySession, Response};
