//! Owned tree instances.

use crate::{Behavior, BehaviorNode, Status};

/// A behavior tree instance with its own execution state.
///
/// Templates are built once and cloned per owner; every clone carries
/// independent progress (cursors, elapsed waits, cached targets).
#[derive(Debug, Clone)]
pub struct BehaviorTree<L> {
    root: BehaviorNode<L>,
    ticks: u64,
}

impl<L> BehaviorTree<L> {
    pub fn new(root: BehaviorNode<L>) -> Self {
        Self { root, ticks: 0 }
    }

    /// Ticks the root once.
    pub fn tick<C>(&mut self, ctx: &mut C) -> Status
    where
        L: Behavior<C>,
    {
        self.ticks += 1;
        self.root.tick(ctx)
    }

    /// Abandons any running work and returns every node to `Inactive`.
    pub fn reset<C>(&mut self)
    where
        L: Behavior<C>,
    {
        Behavior::<C>::reset(&mut self.root);
    }

    /// Status reported by the most recent tick.
    pub fn status(&self) -> Status {
        self.root.status()
    }

    /// Returns `true` while the root reports `Running`.
    pub fn is_running(&self) -> bool {
        self.root.status().is_running()
    }

    /// Number of ticks since the instance was created.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn root(&self) -> &BehaviorNode<L> {
        &self.root
    }

    pub fn any_leaf(&self, mut predicate: impl FnMut(&L) -> bool) -> bool {
        self.root.any_leaf(&mut predicate)
    }
}

impl<L> From<BehaviorNode<L>> for BehaviorTree<L> {
    fn from(root: BehaviorNode<L>) -> Self {
        Self::new(root)
    }
}
