//! Commit nodes as seen by the lane allocator.

use crate::lane::LaneId;
use gix_hash::ObjectId;

/// An index into the window of commits a [`crate::PlotGraph`] currently
/// holds. Assigned strictly in the order commits are pushed, so it doubles
/// as that commit's row number for rendering purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitIndex(pub(crate) usize);

impl CommitIndex {
    /// The raw offset into the owning [`crate::PlotGraph`]'s commit list.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A commit as tracked for the purposes of lane assignment.
///
/// `T` is caller-attached payload (commit metadata, render hints, ...) and
/// is never interpreted by this crate.
#[derive(Debug, Clone)]
pub struct PlotCommit<T = ()> {
    pub(crate) id: ObjectId,
    pub(crate) parent_ids: Vec<ObjectId>,
    pub(crate) children: Vec<CommitIndex>,
    pub(crate) lane: Option<LaneId>,
    pub(crate) passing_lanes: Vec<LaneId>,
    pub(crate) user_data: T,
}

impl<T> PlotCommit<T> {
    /// The object id this node was entered under.
    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    /// The ids of this commit's parents, in the order the source declared
    /// them. A parent not yet pushed (or never reached by the source, e.g.
    /// a shallow boundary) has no corresponding row.
    pub fn parent_ids(&self) -> &[ObjectId] {
        &self.parent_ids
    }

    /// Indices of this commit's children, in the order they were first
    /// discovered. Always fully populated by the time this commit is
    /// entered, since every child is pushed before its parents.
    pub fn children(&self) -> &[CommitIndex] {
        &self.children
    }

    /// The lane this commit was drawn on, once `enter` has processed it.
    /// `None` for a tip with no children (nothing has needed a lane for it
    /// yet).
    pub fn lane(&self) -> Option<LaneId> {
        self.lane
    }

    /// Lanes that pass through this commit's row without terminating or
    /// originating here — the lines a renderer must draw continuously
    /// across this row.
    pub fn passing_lanes(&self) -> &[LaneId] {
        &self.passing_lanes
    }

    /// The caller-attached payload.
    pub fn user_data(&self) -> &T {
        &self.user_data
    }
}
