//! # concepts-ink
//!
//! Decoder for the Concepts drawing app's save format. A drawing is stored
//! as a keyed archive (an NSKeyedArchiver binary plist): a flat object table
//! plus UID cross-references. This crate resolves that table, walks the
//! drawing's group hierarchy and recovers one ordered 2D point sequence per
//! stroke, with an SVG writer as a thin visualization consumer.
//!
//! The Concepts format itself belongs to TopHatch, Inc.; this is an
//! independent reader built from observed files only.
//!
//! ## Modules
//!
//! - [`util`] - Errors, bounding boxes, math re-exports
//! - [`archive`] - Keyed-archive loading and UID resolution
//! - [`stroke`] - Stroke geometry extraction
//! - [`svg`] - SVG rendering of decoded strokes
//!
//! ## Example
//!
//! ```ignore
//! let strokes = concepts_ink::decode_strokes("Strokes.plist")?;
//! for stroke in &strokes {
//!     println!("{} points, bounds {:?}", stroke.len(), stroke.bounds());
//! }
//! ```

pub mod util;
pub mod archive;
pub mod stroke;
pub mod svg;

// Re-export commonly used types
pub use archive::Archive;
pub use stroke::{Stroke, StrokeExtractor};
pub use util::{BBox2f, Error, Result, Vec2};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::archive::Archive;
    pub use crate::stroke::{Stroke, StrokeExtractor};
    pub use crate::svg::{render_svg, write_svg};
    pub use crate::util::{BBox2f, Error, Result, Vec2};
}

use std::path::Path;

/// Decode every stroke of a drawing file in one call.
///
/// Opens the archive, runs a [`StrokeExtractor`] over it and returns the
/// strokes in hierarchy traversal order. Independent calls share no state
/// and may run on separate threads.
pub fn decode_strokes(path: impl AsRef<Path>) -> Result<Vec<Stroke>> {
    let archive = Archive::open(path)?;
    StrokeExtractor::new(&archive).extract()
}
