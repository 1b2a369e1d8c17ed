//! Utility types and functions for concepts-ink.
//!
//! This module contains fundamental types used throughout the library:
//! - [`Error`] / [`Result`] - Error handling
//! - [`BBox2f`] - 2D bounding boxes
//! - Math type re-exports from glam

mod error;
mod math;

pub use error::*;
pub use math::*;
