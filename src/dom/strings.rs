//! String Interning Pool
//!
//! Deduplicated storage for every name, URI and value held by a document.
//! Records store compact `StrId`s instead of owned strings.
//!
//! Id 0 is the empty string and doubles as "absent" (no prefix, no
//! namespace). A handful of well-known strings are interned at fixed ids
//! so that defaults never need a lookup.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use super::namespace::ns;
use crate::error::BuildError;

/// Index of a string in a [`StringPool`]
pub type StrId = u32;

/// String interning pool
///
/// Memory layout:
/// - `entries`: (offset, len) into `data` for each interned string ID
/// - `data`: all string bytes, back to back
/// - `hash_index`: hash -> list of IDs (handles rare collisions)
#[derive(Debug, Clone)]
pub struct StringPool {
    entries: Vec<(u32, u32)>,
    data: String,
    hash_index: HashMap<u64, Vec<StrId>>,
}

impl StringPool {
    /// The empty string
    pub const EMPTY: StrId = 0;
    /// `xml`
    pub const XML_PREFIX: StrId = 1;
    /// `http://www.w3.org/XML/1998/namespace`
    pub const XML_URI: StrId = 2;
    /// `http://www.w3.org/2001/XMLSchema`
    pub const SCHEMA_URI: StrId = 3;
    /// `untyped`
    pub const UNTYPED: StrId = 4;
    /// `untypedAtomic`
    pub const UNTYPED_ATOMIC: StrId = 5;

    /// Create a new pool with the well-known strings pre-interned
    pub fn new() -> Self {
        let mut pool = StringPool {
            entries: Vec::with_capacity(64),
            data: String::with_capacity(1024),
            hash_index: HashMap::new(),
        };
        // Entry 0 is reserved for the empty string
        pool.entries.push((0, 0));

        let fixed = [
            (Self::XML_PREFIX, ns::XML_PREFIX),
            (Self::XML_URI, ns::XML),
            (Self::SCHEMA_URI, ns::SCHEMA),
            (Self::UNTYPED, ns::UNTYPED),
            (Self::UNTYPED_ATOMIC, ns::UNTYPED_ATOMIC),
        ];
        for (expected, s) in fixed {
            let id = pool.intern(s);
            debug_assert_eq!(id.ok(), Some(expected));
        }
        pool
    }

    #[inline]
    fn compute_hash(s: &str) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Intern a string, returning the id of an identical existing entry if any.
    ///
    /// Fails once the pool's ids or byte offsets no longer fit in a `u32`.
    pub fn intern(&mut self, s: &str) -> Result<StrId, BuildError> {
        if s.is_empty() {
            return Ok(Self::EMPTY);
        }

        let hash = Self::compute_hash(s);
        if let Some(ids) = self.hash_index.get(&hash) {
            for &id in ids {
                if self.get(id) == s {
                    return Ok(id);
                }
            }
        }

        let id = BuildError::position(self.entries.len(), "string")?;
        let offset = BuildError::position(self.data.len(), "string")?;
        let len = BuildError::position(s.len(), "string")?;
        self.data.push_str(s);
        self.entries.push((offset, len));
        self.hash_index.entry(hash).or_default().push(id);
        Ok(id)
    }

    /// Look up an already-interned string without adding it
    pub fn find(&self, s: &str) -> Option<StrId> {
        if s.is_empty() {
            return Some(Self::EMPTY);
        }
        self.hash_index
            .get(&Self::compute_hash(s))?
            .iter()
            .copied()
            .find(|&id| self.get(id) == s)
    }

    /// Get a string by ID. Unknown ids resolve to the empty string.
    pub fn get(&self, id: StrId) -> &str {
        match self.entries.get(id as usize) {
            Some(&(offset, len)) => {
                let start = offset as usize;
                &self.data[start..start + len as usize]
            }
            None => "",
        }
    }

    /// Get a string by ID, mapping the empty string to `None`
    pub fn get_opt(&self, id: StrId) -> Option<&str> {
        match self.get(id) {
            "" => None,
            s => Some(s),
        }
    }

    /// Number of distinct strings stored, including the reserved empty entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the pool holds nothing beyond the reserved entries
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= Self::UNTYPED_ATOMIC as usize + 1
    }

    /// Total bytes of string data stored
    pub fn bytes_used(&self) -> usize {
        self.data.len()
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}
