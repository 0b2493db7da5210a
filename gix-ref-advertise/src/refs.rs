//! Ordering semantics for the ref set passed to [`crate::Advertiser::send`].

use bstr::BString;
use gix_hash::ObjectId;
use std::collections::{BTreeMap, HashMap};

/// A source of `(name, id)` pairs that knows whether it can hand them out in
/// ascending name order without an explicit sort.
///
/// Only a container whose iteration order is *total and stable* (a
/// `BTreeMap`, the canonical sorted RefMap) is trusted to preserve its order;
/// every other container is sorted unconditionally, per spec.md's "Container
/// semantics" design note.
pub trait RefContainer {
    /// Consumes the container, returning its entries in ascending
    /// byte-lexicographic name order.
    fn into_sorted_entries(self) -> Vec<(BString, ObjectId)>;
}

impl RefContainer for BTreeMap<BString, ObjectId> {
    fn into_sorted_entries(self) -> Vec<(BString, ObjectId)> {
        // A BTreeMap<BString, _> already iterates in ascending byte order.
        self.into_iter().collect()
    }
}

impl RefContainer for HashMap<BString, ObjectId> {
    fn into_sorted_entries(self) -> Vec<(BString, ObjectId)> {
        let mut entries: Vec<_> = self.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl RefContainer for Vec<(BString, ObjectId)> {
    fn into_sorted_entries(mut self) -> Vec<(BString, ObjectId)> {
        self.sort_by(|a, b| a.0.cmp(&b.0));
        self
    }
}
