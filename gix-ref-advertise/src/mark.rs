//! The advertised-mark side channel consumed by [`crate::Advertiser`].

use gix_hash::ObjectId;
use std::collections::HashSet;

/// A per-object "has this been advertised yet" bit, owned by the host
/// process rather than the advertiser itself.
///
/// The advertiser is granted the right to *set* this flag during a session so
/// that the same object is never advertised twice (whether via two ref names
/// pointing at it, a tag peel chain passing through it, or a later `.have`
/// line), but it does not own the storage: other subsystems may read it, and
/// the contract requires no other writer touches it for the duration of the
/// advertisement phase.
pub trait AdvertisedMark {
    /// Returns whether `id` has already been marked advertised.
    fn is_set(&self, id: &ObjectId) -> bool;
    /// Marks `id` as advertised.
    fn set(&mut self, id: &ObjectId);
}

/// A ready-to-use [`AdvertisedMark`] backed by a plain `HashSet`, suitable
/// when the host has no existing per-object flag storage (e.g. no object
/// pool with a spare bit) to hand the advertiser.
#[derive(Debug, Clone, Default)]
pub struct HashSetMark(HashSet<ObjectId>);

impl HashSetMark {
    /// Creates an empty mark set.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AdvertisedMark for HashSetMark {
    fn is_set(&self, id: &ObjectId) -> bool {
        self.0.contains(id)
    }

    fn set(&mut self, id: &ObjectId) {
        self.0.insert(*id);
    }
}
