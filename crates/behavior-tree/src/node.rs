//! Closed node algebra shared by every tree.
//!
//! Structural nodes form a small closed set dispatched with `match`; only the
//! leaves are supplied by the game through the type parameter `L`. Every node
//! carries a [`NodeState`] holding its last status and, for composites, the
//! index of the child to resume.

use crate::composite::{Parallel, Selector, Sequence};
use crate::decorator::{AlwaysSucceed, Inverter};
use crate::{Behavior, Status};

/// Per-node execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeState {
    /// Status reported by the most recent tick (`Inactive` after a reset).
    pub status: Status,
    /// Index of the child to resume on the next tick (composites only).
    pub cursor: usize,
}

impl NodeState {
    /// Stores `status` and returns it.
    #[inline]
    pub fn record(&mut self, status: Status) -> Status {
        self.status = status;
        status
    }

    /// Returns the state to `Inactive` with the cursor at the first child.
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Discriminant of a [`BehaviorNode`], used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Sequence,
    Selector,
    Parallel,
    Inverter,
    AlwaysSucceed,
    Leaf,
}

/// A game leaf wrapped with its execution state.
#[derive(Debug, Clone)]
pub struct Leaf<L> {
    behavior: L,
    state: NodeState,
}

impl<L> Leaf<L> {
    pub fn new(behavior: L) -> Self {
        Self {
            behavior,
            state: NodeState::default(),
        }
    }

    pub fn behavior(&self) -> &L {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut L {
        &mut self.behavior
    }

    pub fn state(&self) -> NodeState {
        self.state
    }
}

impl<C, L: Behavior<C>> Behavior<C> for Leaf<L> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        let status = settle(self.behavior.tick(ctx));
        self.state.record(status)
    }

    fn reset(&mut self) {
        Behavior::<C>::reset(&mut self.behavior);
        self.state.clear();
    }
}

/// Any node of a behavior tree.
#[derive(Debug, Clone)]
pub enum BehaviorNode<L> {
    Sequence(Sequence<L>),
    Selector(Selector<L>),
    Parallel(Parallel<L>),
    Inverter(Inverter<L>),
    AlwaysSucceed(AlwaysSucceed<L>),
    Leaf(Leaf<L>),
}

impl<L> BehaviorNode<L> {
    /// Status reported by this node's most recent tick.
    pub fn status(&self) -> Status {
        self.state().status
    }

    /// Execution state of this node.
    pub fn state(&self) -> NodeState {
        match self {
            BehaviorNode::Sequence(node) => node.state(),
            BehaviorNode::Selector(node) => node.state(),
            BehaviorNode::Parallel(node) => node.state(),
            BehaviorNode::Inverter(node) => node.state(),
            BehaviorNode::AlwaysSucceed(node) => node.state(),
            BehaviorNode::Leaf(node) => node.state(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            BehaviorNode::Sequence(_) => NodeKind::Sequence,
            BehaviorNode::Selector(_) => NodeKind::Selector,
            BehaviorNode::Parallel(_) => NodeKind::Parallel,
            BehaviorNode::Inverter(_) => NodeKind::Inverter,
            BehaviorNode::AlwaysSucceed(_) => NodeKind::AlwaysSucceed,
            BehaviorNode::Leaf(_) => NodeKind::Leaf,
        }
    }

    /// Returns the wrapped leaf behavior, if this node is a leaf.
    pub fn as_leaf(&self) -> Option<&L> {
        match self {
            BehaviorNode::Leaf(leaf) => Some(leaf.behavior()),
            _ => None,
        }
    }

    /// Returns `true` if `predicate` holds for any leaf in this subtree.
    pub fn any_leaf(&self, predicate: &mut impl FnMut(&L) -> bool) -> bool {
        match self {
            BehaviorNode::Sequence(node) => node.children().iter().any(|c| c.any_leaf(predicate)),
            BehaviorNode::Selector(node) => node.children().iter().any(|c| c.any_leaf(predicate)),
            BehaviorNode::Parallel(node) => node.children().iter().any(|c| c.any_leaf(predicate)),
            BehaviorNode::Inverter(node) => node.child().any_leaf(predicate),
            BehaviorNode::AlwaysSucceed(node) => node.child().any_leaf(predicate),
            BehaviorNode::Leaf(leaf) => predicate(leaf.behavior()),
        }
    }
}

impl<C, L: Behavior<C>> Behavior<C> for BehaviorNode<L> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        match self {
            BehaviorNode::Sequence(node) => node.tick(ctx),
            BehaviorNode::Selector(node) => node.tick(ctx),
            BehaviorNode::Parallel(node) => node.tick(ctx),
            BehaviorNode::Inverter(node) => node.tick(ctx),
            BehaviorNode::AlwaysSucceed(node) => node.tick(ctx),
            BehaviorNode::Leaf(node) => node.tick(ctx),
        }
    }

    fn reset(&mut self) {
        match self {
            BehaviorNode::Sequence(node) => Behavior::<C>::reset(node),
            BehaviorNode::Selector(node) => Behavior::<C>::reset(node),
            BehaviorNode::Parallel(node) => Behavior::<C>::reset(node),
            BehaviorNode::Inverter(node) => Behavior::<C>::reset(node),
            BehaviorNode::AlwaysSucceed(node) => Behavior::<C>::reset(node),
            BehaviorNode::Leaf(node) => Behavior::<C>::reset(node),
        }
    }
}

/// Maps a stray `Inactive` returned by a leaf to `Failure`.
///
/// `tick` must never report `Inactive`; debug builds treat it as a bug.
#[inline]
pub(crate) fn settle(status: Status) -> Status {
    debug_assert!(
        status != Status::Inactive,
        "tick returned Status::Inactive"
    );
    match status {
        Status::Inactive => Status::Failure,
        other => other,
    }
}
