//! Annotation rendering module
//!
//! This module contains:
//! - A tiny-skia canvas shared by the overlay and the exported image
//! - Geometry calculations for arrows
//! - Two-pass annotation drawing
//! - Export image rendering (crop + annotations)
//! - Live overlay frames

pub mod annotation;
pub mod canvas;
pub mod geometry;
pub mod image;
pub mod overlay;

pub use annotation::render_all;
pub use canvas::Canvas;
pub use self::image::render_selection;
pub use overlay::render_overlay;
