//! Keyed-archive loading and object table resolution.
//!
//! The archive is parsed by the `plist` crate into a generic [`Value`] tree;
//! this module pulls out the flat `$objects` table and the `$top` entry point
//! and provides bounds-checked UID dereferencing on top of them. Everything
//! downstream (the stroke extractor) works through [`Archive`] accessors and
//! never touches raw indices.

pub mod format;

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use memmap2::Mmap;
use plist::{Dictionary, Uid, Value};

use crate::util::{Error, Result};
use self::format::{OBJECTS_KEY, ROOT_KEY, TOP_KEY};

/// A loaded keyed archive: the object table plus its `$top` entry point.
///
/// Read-only once constructed. References (UIDs) are plain indices into the
/// table; [`Archive::resolve`] is the only way they turn into values.
#[derive(Debug)]
pub struct Archive {
    objects: Vec<Value>,
    top: Dictionary,
}

impl Archive {
    /// Open an archive file for reading with memory mapping.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_opts(path, true)
    }

    /// Open an archive file with optional memory mapping.
    pub fn open_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        let size = file.metadata()?.len();
        let value = if use_mmap && size > 0 {
            // Safety: file is opened read-only and the map does not outlive the parse
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::MmapFailed(e.to_string()))?;
            Value::from_reader(Cursor::new(&mmap[..]))?
        } else {
            Value::from_reader(BufReader::new(file))?
        };

        Self::from_value(value)
    }

    /// Parse an archive from an in-memory byte buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let value = Value::from_reader(Cursor::new(bytes))?;
        Self::from_value(value)
    }

    /// Build an archive from an already-deserialized plist value.
    ///
    /// The value must be a dictionary carrying an `$objects` array and a
    /// `$top` dictionary; anything else is a fatal structure error.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut dict = value
            .into_dictionary()
            .ok_or_else(|| Error::invalid("archive root is not a dictionary"))?;

        let objects = match dict.remove(OBJECTS_KEY) {
            Some(Value::Array(objects)) => objects,
            Some(_) => return Err(Error::invalid("$objects is not an array")),
            None => return Err(Error::invalid("missing $objects table")),
        };

        let top = match dict.remove(TOP_KEY) {
            Some(Value::Dictionary(top)) => top,
            Some(_) => return Err(Error::invalid("$top is not a dictionary")),
            None => return Err(Error::invalid("missing $top dictionary")),
        };

        tracing::debug!(objects = objects.len(), "loaded keyed archive");
        Ok(Self { objects, top })
    }

    /// Number of entries in the object table.
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check whether the object table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Dereference a UID into the object it denotes.
    ///
    /// Bounds-checked table access; a dangling UID is an error at the call
    /// site, not a panic.
    pub fn resolve(&self, uid: &Uid) -> Result<&Value> {
        let index = uid.get() as usize;
        self.objects.get(index).ok_or(Error::RefOutOfBounds {
            index,
            count: self.objects.len(),
        })
    }

    /// Resolve the drawing root via `$top.root`.
    pub fn root(&self) -> Result<&Value> {
        match self.top.get(ROOT_KEY) {
            Some(Value::Uid(uid)) => self.resolve(uid),
            _ => Err(Error::MissingRoot),
        }
    }

    /// Look up `key` on a mapping-shaped object.
    ///
    /// Returns `None` when the object is not a dictionary or lacks the key;
    /// absence is a branch condition for the extractor, never an error.
    pub fn field<'a>(&self, object: &'a Value, key: &str) -> Option<&'a Value> {
        object.as_dictionary()?.get(key)
    }

    /// Look up `key` and follow one level of UID indirection if present.
    ///
    /// A non-UID value is returned as-is; a dangling UID yields `None`.
    pub fn deref_field<'a>(&'a self, object: &'a Value, key: &str) -> Option<&'a Value> {
        match self.field(object, key)? {
            Value::Uid(uid) => self.resolve(uid).ok(),
            value => Some(value),
        }
    }
}
