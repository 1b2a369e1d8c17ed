//! Keyed-archive key names and record layouts.
//!
//! A Concepts drawing is an NSKeyedArchiver binary plist: a flat `$objects`
//! table of heterogeneous values plus a `$top` dictionary whose `root` UID
//! points at the drawing. Every cross-reference in the table is a UID index
//! back into `$objects`.

/// Key of the flat object table in the archive root dictionary.
pub const OBJECTS_KEY: &str = "$objects";

/// Key of the top-level entry-point dictionary.
pub const TOP_KEY: &str = "$top";

/// Key of the root reference inside `$top`.
pub const ROOT_KEY: &str = "root";

/// Drawing root field referencing the top-level group layer.
pub const ROOT_GROUP_LAYERS_KEY: &str = "rootGroupLayers";

/// Ordered element list of any collection-shaped object.
pub const NS_OBJECTS_KEY: &str = "NS.objects";

/// Group item field referencing the container of drawable sub-items.
pub const GROUP_ITEMS_KEY: &str = "groupItems";

/// Packed stroke geometry fields, in detection priority order.
///
/// Both names denote the same blob layout (the second is a later format
/// revision); the first present field wins and the other is never consulted.
pub const PACKED_POINT_KEYS: [&str; 2] = ["strokePoints45", "strokePointsNonOptionalAngles"];

/// Fallback per-point object list field.
pub const KEY_POINTS_KEY: &str = "keyPoints";

/// Position field of a key-point object.
pub const GL_POSITION_KEY: &str = "glPosition";

/// Bytes per packed stroke record: 4 little-endian f32 (x, y, plus two
/// auxiliary floats of undocumented meaning, discarded).
pub const POINT_RECORD_SIZE: usize = 16;

/// Floats per packed stroke record.
pub const POINT_RECORD_STRIDE: usize = 4;

/// Bytes of a `glPosition` field: 2 little-endian f32 (x, y).
pub const GL_POSITION_SIZE: usize = 8;
