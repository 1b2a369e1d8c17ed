//! SVG output for decoded strokes.
//!
//! A thin consumer of the extractor's output: one polyline per stroke, in
//! order, with coordinates taken straight from the archive (no vertical
//! flip or other transform). The viewport is fitted to the union bounding
//! box of all points with a fixed padding.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::stroke::Stroke;
use crate::util::{BBox2f, Result};

/// Padding around the fitted drawing, in archive units.
const PADDING: f32 = 40.0;

/// Stroke width of the rendered polylines.
const STROKE_WIDTH: f32 = 2.0;

/// Render strokes into an SVG document string.
pub fn render_svg(strokes: &[Stroke]) -> String {
    let mut bounds = BBox2f::EMPTY;
    for stroke in strokes {
        bounds.expand_by_box(&stroke.bounds());
    }
    // no points anywhere: emit a minimal empty document
    if bounds.is_empty() {
        bounds = BBox2f::new(glam::Vec2::ZERO, glam::Vec2::ZERO);
    }

    let min = bounds.min - PADDING;
    let size = bounds.size() + 2.0 * PADDING;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
        min.x, min.y, size.x, size.y
    );
    let _ = writeln!(
        svg,
        r##"  <g fill="none" stroke="#000000" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round">"##,
        STROKE_WIDTH
    );
    for stroke in strokes {
        if stroke.is_empty() {
            continue;
        }
        let mut points = String::new();
        for p in &stroke.points {
            if !points.is_empty() {
                points.push(' ');
            }
            let _ = write!(points, "{},{}", p.x, p.y);
        }
        let _ = writeln!(svg, r#"    <polyline points="{}"/>"#, points);
    }
    let _ = writeln!(svg, "  </g>");
    svg.push_str("</svg>\n");
    svg
}

/// Render strokes and write the SVG document to a file.
pub fn write_svg(path: impl AsRef<Path>, strokes: &[Stroke]) -> Result<()> {
    fs::write(path, render_svg(strokes))?;
    Ok(())
}
