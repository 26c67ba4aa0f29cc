//! Pure domain types with minimal dependencies
//!
//! This module contains core types used throughout the crate.
//! Types here have no rendering or capture dependencies.

pub mod annotation;
pub mod coords;
pub mod geometry;
pub mod history;
pub mod selection;

pub use annotation::*;
pub use coords::*;
pub use geometry::*;
pub use history::*;
pub use selection::*;
