//! Stroke geometry extraction.
//!
//! Walks the drawing hierarchy (root → group layer → group items → drawable
//! sub-items) and decodes each drawable's point data. Two encodings exist in
//! the wild:
//!
//! - **packed** — a raw blob of 16-byte records (4 little-endian f32: x, y,
//!   and two auxiliary floats that are discarded), referenced from
//!   `strokePoints45` or `strokePointsNonOptionalAngles`;
//! - **key points** — a `keyPoints` collection of per-point objects, each
//!   carrying an 8-byte `glPosition` (2 little-endian f32).
//!
//! The packed form is checked first and wins when present as a byte buffer.
//! A drawable whose geometry is malformed is skipped, never fatal; only the
//! top-level hierarchy fields abort the decode.

use byteorder::{ByteOrder, LittleEndian};
use plist::Value;

use crate::archive::format::{
    GL_POSITION_KEY, GL_POSITION_SIZE, GROUP_ITEMS_KEY, KEY_POINTS_KEY, NS_OBJECTS_KEY,
    PACKED_POINT_KEYS, POINT_RECORD_SIZE, ROOT_GROUP_LAYERS_KEY,
};
use crate::archive::Archive;
use crate::util::{BBox2f, Error, Result, Vec2};

/// One decoded stroke: an ordered run of 2D points in archive-native
/// coordinates. Duplicate consecutive points are valid ink data and kept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stroke {
    pub points: Vec<Vec2>,
}

impl Stroke {
    /// Number of points in the stroke.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check whether the stroke has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box over all points.
    pub fn bounds(&self) -> BBox2f {
        let mut bbox = BBox2f::EMPTY;
        for &p in &self.points {
            bbox.expand_by_point(p);
        }
        bbox
    }
}

/// Decodes strokes out of a loaded [`Archive`].
///
/// One extractor per decode call; the diagnostic counters refer to the last
/// [`extract`](Self::extract) run.
pub struct StrokeExtractor<'a> {
    archive: &'a Archive,
    visited: usize,
    skipped: usize,
}

impl<'a> StrokeExtractor<'a> {
    /// Create an extractor over an archive.
    pub fn new(archive: &'a Archive) -> Self {
        Self { archive, visited: 0, skipped: 0 }
    }

    /// Number of drawable sub-items visited by the last extraction.
    #[inline]
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Number of visited sub-items that carried a recognized geometry field
    /// but decoded to nothing (malformed blob, zero valid key points, ...).
    #[inline]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Walk the drawing hierarchy and decode every drawable.
    ///
    /// Returns one [`Stroke`] per successfully decoded drawable, in
    /// traversal order. Key-point strokes are always non-empty; a packed
    /// blob of zero records decodes to a degenerate empty stroke.
    pub fn extract(&mut self) -> Result<Vec<Stroke>> {
        self.visited = 0;
        self.skipped = 0;

        let root = self.archive.root()?;
        let group_layer = self
            .archive
            .deref_field(root, ROOT_GROUP_LAYERS_KEY)
            .ok_or_else(|| Error::invalid("drawing root has no rootGroupLayers"))?;
        let group_items = self
            .archive
            .field(group_layer, NS_OBJECTS_KEY)
            .and_then(Value::as_array)
            .ok_or_else(|| Error::invalid("group layer has no NS.objects list"))?;

        let mut strokes = Vec::new();
        for item_ref in group_items {
            let Some(item) = self.resolve_element(item_ref) else {
                continue;
            };
            // not a stroke container (e.g. a text or image annotation)
            if self.archive.field(item, GROUP_ITEMS_KEY).is_none() {
                continue;
            }
            let Some(sub_refs) = self
                .archive
                .deref_field(item, GROUP_ITEMS_KEY)
                .and_then(|c| self.archive.field(c, NS_OBJECTS_KEY))
                .and_then(Value::as_array)
            else {
                continue;
            };

            for sub_ref in sub_refs {
                let Some(drawable) = self.resolve_element(sub_ref) else {
                    continue;
                };
                self.visited += 1;
                match self.decode_drawable(drawable) {
                    Some(stroke) => strokes.push(stroke),
                    None => {
                        if self.has_geometry_field(drawable) {
                            self.skipped += 1;
                        }
                    }
                }
            }
        }

        tracing::debug!(
            strokes = strokes.len(),
            visited = self.visited,
            skipped = self.skipped,
            "stroke extraction finished"
        );
        Ok(strokes)
    }

    /// Dereference one element of an `NS.objects` list, tolerating both UID
    /// references and inline values. Dangling references resolve to nothing.
    fn resolve_element(&self, element: &'a Value) -> Option<&'a Value> {
        match element {
            Value::Uid(uid) => self.archive.resolve(uid).ok(),
            value => Some(value),
        }
    }

    fn has_geometry_field(&self, drawable: &Value) -> bool {
        PACKED_POINT_KEYS
            .iter()
            .any(|&key| self.archive.field(drawable, key).is_some())
            || self.archive.field(drawable, KEY_POINTS_KEY).is_some()
    }

    /// Apply the encoding-detection policy to one drawable.
    fn decode_drawable(&self, drawable: &Value) -> Option<Stroke> {
        for key in PACKED_POINT_KEYS {
            if self.archive.field(drawable, key).is_some() {
                if let Some(blob) = self
                    .archive
                    .deref_field(drawable, key)
                    .and_then(Value::as_data)
                {
                    let points = decode_packed_points(blob);
                    if points.is_none() {
                        tracing::warn!(
                            field = key,
                            len = blob.len(),
                            "packed stroke blob length not a record multiple, skipping drawable"
                        );
                    }
                    return points.map(|points| Stroke { points });
                }
                // present but not a byte buffer: treat as absent, but consult
                // no further packed field
                break;
            }
        }
        self.decode_key_points(drawable)
    }

    /// Fallback decode via the `keyPoints` collection.
    ///
    /// Elements without a well-formed `glPosition` are dropped individually;
    /// a list yielding zero points produces no stroke at all.
    fn decode_key_points(&self, drawable: &Value) -> Option<Stroke> {
        let key_points = self.archive.deref_field(drawable, KEY_POINTS_KEY)?;
        let elements = self
            .archive
            .field(key_points, NS_OBJECTS_KEY)
            .and_then(Value::as_array)?;

        let mut points = Vec::new();
        for element in elements {
            let Some(point_obj) = self.resolve_element(element) else {
                continue;
            };
            let Some(data) = self
                .archive
                .field(point_obj, GL_POSITION_KEY)
                .and_then(Value::as_data)
            else {
                continue;
            };
            if data.len() != GL_POSITION_SIZE {
                continue;
            }
            points.push(Vec2::new(
                LittleEndian::read_f32(&data[0..4]),
                LittleEndian::read_f32(&data[4..8]),
            ));
        }

        if points.is_empty() {
            None
        } else {
            Some(Stroke { points })
        }
    }
}

/// Decode a packed blob of 16-byte records into (x, y) points.
///
/// The blob must be an exact multiple of the record size; anything else is a
/// decode failure for the whole drawable. The two trailing floats of each
/// record are skipped over, not interpreted.
fn decode_packed_points(blob: &[u8]) -> Option<Vec<Vec2>> {
    if blob.len() % POINT_RECORD_SIZE != 0 {
        return None;
    }
    let points = blob
        .chunks_exact(POINT_RECORD_SIZE)
        .map(|record| {
            Vec2::new(
                LittleEndian::read_f32(&record[0..4]),
                LittleEndian::read_f32(&record[4..8]),
            )
        })
        .collect();
    Some(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plist::{Dictionary, Uid};

    fn packed_blob(records: &[[f32; 4]]) -> Vec<u8> {
        let mut blob = Vec::with_capacity(records.len() * POINT_RECORD_SIZE);
        for record in records {
            for component in record {
                blob.extend_from_slice(&component.to_le_bytes());
            }
        }
        blob
    }

    #[test]
    fn test_packed_decode_roundtrip() {
        let blob = packed_blob(&[
            [1.0, 2.0, 9.5, -3.25],
            [3.5, -4.5, 0.0, 0.0],
            [3.5, -4.5, 1.0, 1.0], // duplicate (x, y) must survive
        ]);
        let points = decode_packed_points(&blob).expect("aligned blob");
        assert_eq!(
            points,
            vec![
                Vec2::new(1.0, 2.0),
                Vec2::new(3.5, -4.5),
                Vec2::new(3.5, -4.5),
            ]
        );
    }

    #[test]
    fn test_packed_decode_bit_exact() {
        // a NaN payload and a subnormal must round-trip bit-for-bit
        let weird_x = f32::from_bits(0x7fc0_1234);
        let weird_y = f32::from_bits(0x0000_0001);
        let blob = packed_blob(&[[weird_x, weird_y, 0.0, 0.0]]);
        let points = decode_packed_points(&blob).expect("aligned blob");
        assert_eq!(points[0].x.to_bits(), weird_x.to_bits());
        assert_eq!(points[0].y.to_bits(), weird_y.to_bits());
    }

    #[test]
    fn test_packed_decode_bad_length() {
        let mut blob = packed_blob(&[[1.0, 2.0, 0.0, 0.0]]);
        blob.push(0xFF);
        assert!(decode_packed_points(&blob).is_none());
        assert!(decode_packed_points(&[0u8; 15]).is_none());
    }

    #[test]
    fn test_packed_decode_empty_blob() {
        // zero records is a valid, degenerate stroke under the packed variant
        assert_eq!(decode_packed_points(&[]), Some(vec![]));
    }

    // -- extractor-level policy tests on hand-built archives --

    fn dict(entries: &[(&str, Value)]) -> Value {
        let mut d = Dictionary::new();
        for (key, value) in entries {
            d.insert((*key).to_string(), value.clone());
        }
        Value::Dictionary(d)
    }

    fn uid(index: u64) -> Value {
        Value::Uid(Uid::new(index))
    }

    /// Archive with a single group item wrapping the given drawables.
    /// Layout: [0]=$null [1]=root [2]=layer [3]=item [4]=container [5..]=extra
    fn drawing_archive(drawables: Vec<Value>, extra: Vec<Value>) -> Archive {
        let first_drawable = 5 + extra.len() as u64;
        let sub_refs: Vec<Value> =
            (0..drawables.len() as u64).map(|i| uid(first_drawable + i)).collect();

        let mut objects = vec![
            Value::String("$null".into()),
            dict(&[("rootGroupLayers", uid(2))]),
            dict(&[("NS.objects", Value::Array(vec![uid(3)]))]),
            dict(&[("groupItems", uid(4))]),
            dict(&[("NS.objects", Value::Array(sub_refs))]),
        ];
        objects.extend(extra);
        objects.extend(drawables);

        let mut top = Dictionary::new();
        top.insert("root".to_string(), uid(1));
        let mut root = Dictionary::new();
        root.insert("$objects".to_string(), Value::Array(objects));
        root.insert("$top".to_string(), Value::Dictionary(top));
        Archive::from_value(Value::Dictionary(root)).expect("valid archive")
    }

    #[test]
    fn test_blob_priority_over_key_points() {
        // drawable carries both encodings; the packed blob must win
        let blob = Value::Data(packed_blob(&[[1.0, 2.0, 0.0, 0.0]]));
        let key_point = dict(&[(
            "glPosition",
            Value::Data([9.0f32.to_le_bytes(), 9.0f32.to_le_bytes()].concat()),
        )]);
        let kp_container = dict(&[("NS.objects", Value::Array(vec![uid(7)]))]);
        let drawable = dict(&[("strokePoints45", uid(5)), ("keyPoints", uid(6))]);
        let archive = drawing_archive(vec![drawable], vec![blob, kp_container, key_point]);

        let strokes = StrokeExtractor::new(&archive).extract().expect("decode");
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].points, vec![Vec2::new(1.0, 2.0)]);
    }

    #[test]
    fn test_versioned_field_name() {
        let blob = Value::Data(packed_blob(&[[4.0, 5.0, 1.0, 1.0]]));
        let drawable = dict(&[("strokePointsNonOptionalAngles", uid(5))]);
        let archive = drawing_archive(vec![drawable], vec![blob]);
        let strokes = StrokeExtractor::new(&archive).extract().expect("decode");
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].points, vec![Vec2::new(4.0, 5.0)]);
    }

    #[test]
    fn test_bad_blob_skips_drawable_not_siblings() {
        let bad_blob = Value::Data(vec![0u8; 17]);
        let good_blob = Value::Data(packed_blob(&[[1.0, 1.0, 0.0, 0.0]]));
        let bad = dict(&[("strokePoints45", uid(5))]);
        let good = dict(&[("strokePoints45", uid(6))]);
        let archive = drawing_archive(vec![bad, good], vec![bad_blob, good_blob]);

        let mut extractor = StrokeExtractor::new(&archive);
        let strokes = extractor.extract().expect("decode");
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].points, vec![Vec2::new(1.0, 1.0)]);
        assert_eq!(extractor.visited(), 2);
        assert_eq!(extractor.skipped(), 1);
    }

    #[test]
    fn test_non_bytes_blob_falls_through_to_key_points() {
        // strokePoints45 resolves to a string: treated as absent, keyPoints
        // still decodes
        let not_a_blob = Value::String("oops".into());
        let point = dict(&[(
            "glPosition",
            Value::Data([3.0f32.to_le_bytes(), 4.0f32.to_le_bytes()].concat()),
        )]);
        let kp_container = dict(&[("NS.objects", Value::Array(vec![uid(7)]))]);
        let drawable = dict(&[("strokePoints45", uid(5)), ("keyPoints", uid(6))]);
        let archive = drawing_archive(vec![drawable], vec![not_a_blob, kp_container, point]);

        let strokes = StrokeExtractor::new(&archive).extract().expect("decode");
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].points, vec![Vec2::new(3.0, 4.0)]);
    }

    #[test]
    fn test_key_points_with_no_valid_positions_emits_nothing() {
        let no_position = dict(&[("somethingElse", Value::Real(1.0))]);
        let wrong_size = dict(&[("glPosition", Value::Data(vec![0u8; 7]))]);
        let kp_container = dict(&[("NS.objects", Value::Array(vec![uid(6), uid(7)]))]);
        let drawable = dict(&[("keyPoints", uid(5))]);
        let archive = drawing_archive(vec![drawable], vec![kp_container, no_position, wrong_size]);

        let mut extractor = StrokeExtractor::new(&archive);
        let strokes = extractor.extract().expect("decode");
        assert!(strokes.is_empty());
        assert_eq!(extractor.skipped(), 1);
    }

    #[test]
    fn test_drawable_with_no_geometry_fields() {
        let drawable = dict(&[("textContent", Value::String("hello".into()))]);
        let archive = drawing_archive(vec![drawable], vec![]);

        let mut extractor = StrokeExtractor::new(&archive);
        let strokes = extractor.extract().expect("decode");
        assert!(strokes.is_empty());
        assert_eq!(extractor.visited(), 1);
        // no recognized field: contributes nothing but is not a decode failure
        assert_eq!(extractor.skipped(), 0);
    }

    #[test]
    fn test_stroke_bounds() {
        let stroke = Stroke {
            points: vec![Vec2::new(-1.0, 2.0), Vec2::new(3.0, -4.0)],
        };
        let bounds = stroke.bounds();
        assert_eq!(bounds.min, Vec2::new(-1.0, -4.0));
        assert_eq!(bounds.max, Vec2::new(3.0, 2.0));
        assert!(Stroke::default().bounds().is_empty());
    }
}
