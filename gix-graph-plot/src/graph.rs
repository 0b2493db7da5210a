//! The windowed commit list a [`crate::LaneAllocator`] is driven against.

use crate::{
    commit::{CommitIndex, PlotCommit},
    error::{Error, Result},
};
use gix_hash::ObjectId;
use std::collections::HashMap;

/// An external collaborator that feeds commits to a [`PlotGraph`] one at a
/// time, in an order guaranteed to place every child before all of its
/// parents (a topological, reverse-chronological walk).
///
/// Implementations must return `true` from [`is_plot_aware`] to certify this
/// ordering guarantee; [`PlotGraph::bind`] rejects sources that don't.
///
/// [`is_plot_aware`]: CommitSource::is_plot_aware
pub trait CommitSource {
    /// User payload attached to each yielded commit.
    type Data;

    /// Declares whether this source guarantees child-before-parent delivery
    /// order. A source that cannot make this guarantee must return `false`.
    fn is_plot_aware(&self) -> bool;

    /// Returns the next `(id, parent_ids, user_data)` triple, or `None` once
    /// the walk is exhausted.
    fn next_commit(&mut self) -> Option<(ObjectId, Vec<ObjectId>, Self::Data)>;
}

/// The set of commits a [`crate::LaneAllocator`] is currently working over.
///
/// Rows are assigned strictly in push order (a [`CommitIndex`] is just that
/// commit's position in the push sequence), which is what lets
/// [`crate::LaneAllocator::enter`] treat "row index" and "processing order"
/// as the same thing. A commit's parents, almost always pushed later than
/// the commit itself, are recorded by id immediately and linked into their
/// own future row's children list the moment they are pushed.
pub struct PlotGraph<T> {
    commits: Vec<PlotCommit<T>>,
    index_of: HashMap<ObjectId, CommitIndex>,
    pending_children: HashMap<ObjectId, Vec<CommitIndex>>,
}

impl<T> Default for PlotGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PlotGraph<T> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            commits: Vec::new(),
            index_of: HashMap::new(),
            pending_children: HashMap::new(),
        }
    }

    /// Verifies `source` is plot-aware. This is a pure sanity check: it does
    /// not consume `source`'s first item.
    pub fn bind<S>(source: &S) -> Result<()>
    where
        S: CommitSource,
    {
        if source.is_plot_aware() {
            Ok(())
        } else {
            Err(Error::WrongSource)
        }
    }

    /// The commits entered so far, in row (push) order.
    pub fn commits(&self) -> &[PlotCommit<T>] {
        &self.commits
    }

    /// Mutable access to the commits entered so far, for use by
    /// [`crate::LaneAllocator::enter`].
    pub fn commits_mut(&mut self) -> &mut [PlotCommit<T>] {
        &mut self.commits
    }

    /// The row `id` currently occupies, if it has been pushed.
    pub fn index_of(&self, id: &ObjectId) -> Option<CommitIndex> {
        self.index_of.get(id).copied()
    }

    /// Appends a new commit as the next row, wiring it into any
    /// already-pushed parent's children list immediately and registering
    /// itself against any parent not yet seen so that parent picks up this
    /// commit as a child the moment it, in turn, is pushed.
    ///
    /// Returns the row `id` now occupies.
    pub fn push(&mut self, id: ObjectId, parent_ids: impl IntoIterator<Item = ObjectId>, user_data: T) -> CommitIndex {
        let index = CommitIndex(self.commits.len());
        let parent_ids: Vec<ObjectId> = parent_ids.into_iter().collect();
        let children = self.pending_children.remove(&id).unwrap_or_default();

        self.commits.push(PlotCommit {
            id,
            parent_ids: parent_ids.clone(),
            children,
            lane: None,
            passing_lanes: Vec::new(),
            user_data,
        });
        self.index_of.insert(id, index);

        for parent_id in parent_ids {
            if let Some(&parent_index) = self.index_of.get(&parent_id) {
                self.commits[parent_index.0].children.push(index);
            } else {
                self.pending_children.entry(parent_id).or_default().push(index);
            }
        }

        index
    }
}
