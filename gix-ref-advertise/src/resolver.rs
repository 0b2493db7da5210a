//! The object resolver collaborator consumed by [`crate::Advertiser`].

use gix_hash::ObjectId;

/// The minimal view of a parsed object the advertiser needs: whether it is a
/// tag (and if so, its immediate target), or something else.
///
/// This intentionally does not model commits/trees/blobs separately — the
/// advertiser never inspects anything but "is this a tag, and if so what does
/// it point at".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedObject {
    /// An annotated tag pointing at `target`, which may itself be another tag.
    Tag {
        /// The object this tag directly points to.
        target: ObjectId,
    },
    /// Any non-tag object (commit, tree, blob, or another kind entirely).
    Other,
}

/// Resolves object ids to just enough information to advertise and, where
/// requested, peel tags.
///
/// Implementations must never raise: an object that cannot be found or
/// parsed is represented by returning `None`, matching the wire protocol's
/// tolerance for refs that vanish between listing and advertising.
pub trait ObjectResolver {
    /// Look up `id`, returning `None` if it does not exist or could not be
    /// parsed (an I/O fault during lookup is also represented as `None`).
    fn parse_any(&self, id: &ObjectId) -> Option<ResolvedObject>;
}

impl<F> ObjectResolver for F
where
    F: Fn(&ObjectId) -> Option<ResolvedObject>,
{
    fn parse_any(&self, id: &ObjectId) -> Option<ResolvedObject> {
        self(id)
    }
}
