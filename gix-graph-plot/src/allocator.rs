//! The lane-assignment algorithm itself.

use crate::{
    commit::{CommitIndex, PlotCommit},
    lane::{LaneFactory, LaneId, PlotLane},
};
use std::collections::{BTreeSet, HashSet};

/// Assigns lanes to commits one row at a time as they are entered, such
/// that no line drawn between a commit and a parent crosses through an
/// unrelated commit's node.
///
/// `enter` must be called for every commit in the same child-before-parent
/// order a [`crate::CommitSource`] yields them in; it relies on a parent
/// never being entered before all of its children.
pub struct LaneAllocator<T, F> {
    factory: F,
    lanes: Vec<PlotLane<T>>,
    active_lanes: HashSet<LaneId>,
    positions_allocated: usize,
    free_positions: BTreeSet<usize>,
}

impl<T, F> LaneAllocator<T, F>
where
    F: LaneFactory<T>,
{
    /// Creates an allocator with no active lanes, using `factory` to
    /// produce and retire per-lane renderer payloads.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            lanes: Vec::new(),
            active_lanes: HashSet::new(),
            positions_allocated: 0,
            free_positions: BTreeSet::new(),
        }
    }

    /// The total number of distinct horizontal positions this allocator has
    /// ever needed simultaneously; the minimum column width a renderer must
    /// reserve.
    pub fn positions_allocated(&self) -> usize {
        self.positions_allocated
    }

    /// Read access to a lane by id.
    pub fn lane(&self, id: LaneId) -> &PlotLane<T> {
        &self.lanes[id.0]
    }

    /// Mutable access to a lane by id.
    pub fn lane_mut(&mut self, id: LaneId) -> &mut PlotLane<T> {
        &mut self.lanes[id.0]
    }

    /// Whether `id` is currently open (has an active, undrawn descendant
    /// line still pending).
    pub fn is_active(&self, id: LaneId) -> bool {
        self.active_lanes.contains(&id)
    }

    /// Resets the allocator to its just-created state: empties the lane
    /// arena, `active_lanes` and `free_positions`, and sets
    /// `positions_allocated` back to zero, so it can be reused for an
    /// unrelated plot session.
    pub fn clear(&mut self) {
        self.lanes.clear();
        self.active_lanes.clear();
        self.positions_allocated = 0;
        self.free_positions.clear();
    }

    /// Processes the commit at `index` within `commits`, assigning it a
    /// lane (unless it is a tip with no children) and updating the
    /// passing-lane and blocked-position state of every row it interacts
    /// with.
    ///
    /// `commits` must already reflect every commit entered before `index`;
    /// `commits[index].children` must already be populated (via
    /// [`crate::PlotGraph::push`], which wires a commit into each already-
    /// materialized parent's children list — and registers itself for a
    /// parent not yet pushed — at push time) before this call.
    pub fn enter(&mut self, commits: &mut [PlotCommit<T>], index: usize) {
        if commits[index].children.is_empty() {
            return;
        }

        let children = commits[index].children.clone();

        let lane = if let [only_child] = children[..] {
            if commits[only_child.0].parent_ids.len() <= 1 {
                match commits[only_child.0].lane {
                    Some(lane) => lane,
                    None => {
                        let lane = self.next_free_lane();
                        commits[only_child.0].lane = Some(lane);
                        lane
                    }
                }
            } else {
                self.assign_merge_lane(commits, &children)
            }
        } else {
            self.assign_merge_lane(commits, &children)
        };
        commits[index].lane = Some(lane);
        #[cfg(feature = "tracing")]
        tracing::trace!(row = index, position = self.lanes[lane.0].position(), "assigned lane");

        // A single child directly below this row never has anything to
        // walk over (the loop below hits it immediately and breaks), so
        // this also covers the straight single-parent-chain case without a
        // separate early return.
        let child_set: HashSet<CommitIndex> = children.iter().copied().collect();
        let mut blocked: HashSet<usize> = HashSet::new();
        let mut remaining = children.len();
        let mut row = index;
        while row > 0 {
            row -= 1;
            if child_set.contains(&CommitIndex(row)) {
                remaining -= 1;
                if remaining == 0 {
                    break;
                }
                continue;
            }
            if let Some(row_lane) = commits[row].lane {
                blocked.insert(self.lanes[row_lane.0].position());
            }
            commits[row].passing_lanes.push(lane);
        }

        let current_position = self.lanes[lane.0].position();
        if blocked.contains(&current_position) {
            let new_position = self
                .free_positions
                .iter()
                .copied()
                .find(|p| !blocked.contains(p))
                .unwrap_or(self.positions_allocated);
            if new_position == self.positions_allocated {
                self.positions_allocated += 1;
            } else {
                self.free_positions.remove(&new_position);
            }
            self.free_positions.insert(current_position);
            self.lanes[lane.0].set_position(new_position);
            #[cfg(feature = "tracing")]
            tracing::trace!(
                row = index,
                from = current_position,
                to = new_position,
                "repositioned lane to avoid a blocked column"
            );
        }
    }

    /// Resolves the lane a fork point (a commit with more than one child,
    /// or whose sole child is itself a merge) should continue on: every
    /// child not yet laned is given one, exactly one of those lanes (the
    /// first seen, preferring one already active) is kept in reserve, every
    /// other child lane is closed, and finally the reserved lane is closed
    /// too so its position becomes available for the fresh lane this
    /// commit itself is assigned.
    fn assign_merge_lane(&mut self, commits: &mut [PlotCommit<T>], children: &[CommitIndex]) -> LaneId {
        let mut reserved: Option<LaneId> = None;
        for &child in children {
            match commits[child.0].lane {
                None => {
                    let lane = self.next_free_lane();
                    commits[child.0].lane = Some(lane);
                    if reserved.is_none() {
                        reserved = Some(lane);
                    } else {
                        self.close_lane(lane);
                    }
                }
                Some(lane) => {
                    if reserved.is_none() && self.active_lanes.contains(&lane) {
                        reserved = Some(lane);
                    } else {
                        self.close_lane(lane);
                    }
                }
            }
        }
        if let Some(lane) = reserved {
            self.close_lane(lane);
        }
        self.next_free_lane()
    }

    /// Allocates a new lane, reusing the smallest free position if one
    /// exists and allocating a fresh one otherwise.
    fn next_free_lane(&mut self) -> LaneId {
        let position = match self.free_positions.iter().next().copied() {
            Some(position) => {
                self.free_positions.remove(&position);
                position
            }
            None => {
                let position = self.positions_allocated;
                self.positions_allocated += 1;
                position
            }
        };
        let data = self.factory.create_lane();
        let id = LaneId(self.lanes.len());
        self.lanes.push(PlotLane::new(position, data));
        self.active_lanes.insert(id);
        id
    }

    /// Retires a lane: recycles its renderer payload, removes it from the
    /// active set, and frees its position for reuse.
    fn close_lane(&mut self, id: LaneId) {
        let lane = &mut self.lanes[id.0];
        self.factory.recycle_lane(lane);
        self.active_lanes.remove(&id);
        self.free_positions.insert(lane.position());
    }
}
