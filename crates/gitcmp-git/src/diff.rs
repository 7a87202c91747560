//! Comparing the ref sets of two repositories.

use crate::refs::{ObjectId, RefSet};
use serde::Serialize;

/// A ref present on both sides with different ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    /// Reference name.
    pub name: String,
    /// Id on the left side.
    pub left: ObjectId,
    /// Id on the right side.
    pub right: ObjectId,
}

/// A ref present on one side only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefEntry {
    /// Reference name.
    pub name: String,
    /// Id it points at.
    pub id: ObjectId,
}

/// The difference between two ref sets.
///
/// Every collection is sorted by ref name. Refs that agree on both sides
/// appear nowhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefDiff {
    /// Refs on both sides pointing at different ids.
    pub mismatched: Vec<Mismatch>,
    /// Refs only on the left side.
    pub only_left: Vec<RefEntry>,
    /// Refs only on the right side.
    pub only_right: Vec<RefEntry>,
}

impl RefDiff {
    /// Compares two ref sets without modifying either.
    pub fn compute(left: &RefSet, right: &RefSet) -> Self {
        let mut diff = Self::default();

        for (name, &id) in left {
            match right.get(name) {
                Some(&other) if other == id => {}
                Some(&other) => diff.mismatched.push(Mismatch {
                    name: name.clone(),
                    left: id,
                    right: other,
                }),
                None => diff.only_left.push(RefEntry {
                    name: name.clone(),
                    id,
                }),
            }
        }

        for (name, &id) in right {
            if !left.contains(name) {
                diff.only_right.push(RefEntry {
                    name: name.clone(),
                    id,
                });
            }
        }

        tracing::debug!(
            mismatched = diff.mismatched.len(),
            only_left = diff.only_left.len(),
            only_right = diff.only_right.len(),
            "Compared ref sets"
        );
        diff
    }

    /// Returns true if both sides advertise exactly the same refs.
    pub fn is_identical(&self) -> bool {
        self.mismatched.is_empty() && self.only_left.is_empty() && self.only_right.is_empty()
    }
}

/// Compares two ref sets. Shorthand for [`RefDiff::compute`].
pub fn diff(left: &RefSet, right: &RefSet) -> RefDiff {
    RefDiff::compute(left, right)
}
