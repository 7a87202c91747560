//! Object ids and ref sets.

use serde::{Serialize, Serializer};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// A SHA-1 object id, as advertised on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 20]);

impl ObjectId {
    /// The length of an object id in hex characters.
    pub const HEX_LEN: usize = 40;

    /// Creates an object id from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the id as a lowercase hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses exactly 40 lowercase hex bytes.
    ///
    /// Uppercase digits are rejected: the advertisement grammar only admits
    /// lowercase, and nothing is normalized on the way in.
    #[must_use]
    pub fn from_hex(hex: &[u8]) -> Option<Self> {
        if hex.len() != Self::HEX_LEN || !hex.iter().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return None;
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex, &mut bytes).ok()?;
        Some(Self(bytes))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// The refs advertised by one repository, keyed by ref name.
///
/// Iteration is ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RefSet {
    refs: BTreeMap<String, ObjectId>,
}

impl RefSet {
    /// Creates an empty ref set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a ref, returning the id it previously pointed at.
    pub fn insert(&mut self, name: impl Into<String>, id: ObjectId) -> Option<ObjectId> {
        self.refs.insert(name.into(), id)
    }

    /// Looks up the id a ref points at.
    pub fn get(&self, name: &str) -> Option<&ObjectId> {
        self.refs.get(name)
    }

    /// Returns true if the ref is present.
    pub fn contains(&self, name: &str) -> bool {
        self.refs.contains_key(name)
    }

    /// Number of refs.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Returns true if there are no refs.
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Iterates over `(name, id)` pairs in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ObjectId> {
        self.refs.iter()
    }
}

impl<N: Into<String>> FromIterator<(N, ObjectId)> for RefSet {
    fn from_iter<I: IntoIterator<Item = (N, ObjectId)>>(iter: I) -> Self {
        Self {
            refs: iter.into_iter().map(|(name, id)| (name.into(), id)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RefSet {
    type Item = (&'a String, &'a ObjectId);
    type IntoIter = btree_map::Iter<'a, String, ObjectId>;

    fn into_iter(self) -> Self::IntoIter {
        self.refs.iter()
    }
}
