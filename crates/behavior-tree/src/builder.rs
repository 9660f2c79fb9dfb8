//! Builder utilities for ergonomic behavior tree construction.
//!
//! This module provides helper functions to reduce boilerplate when building
//! behavior trees. Instead of writing verbose
//! `BehaviorNode::Sequence(Sequence::new(vec![...]))`, you can use shorter
//! functions like `sequence(vec![...])`.

use crate::node::Leaf;
use crate::{
    AlwaysSucceed, BehaviorNode, Inverter, Parallel, ParallelPolicy, Selector, Sequence,
};

/// Creates a sequence node.
#[inline]
pub fn sequence<L>(children: Vec<BehaviorNode<L>>) -> BehaviorNode<L> {
    BehaviorNode::Sequence(Sequence::new(children))
}

/// Creates a selector node.
#[inline]
pub fn selector<L>(children: Vec<BehaviorNode<L>>) -> BehaviorNode<L> {
    BehaviorNode::Selector(Selector::new(children))
}

/// Creates a parallel node with independent success and failure policies.
#[inline]
pub fn parallel<L>(
    success: ParallelPolicy,
    failure: ParallelPolicy,
    children: Vec<BehaviorNode<L>>,
) -> BehaviorNode<L> {
    BehaviorNode::Parallel(Parallel::new(success, failure, children))
}

/// Creates an inverter node.
#[inline]
pub fn inverter<L>(child: BehaviorNode<L>) -> BehaviorNode<L> {
    BehaviorNode::Inverter(Inverter::new(child))
}

/// Creates an always-succeed node.
#[inline]
pub fn always_succeed<L>(child: BehaviorNode<L>) -> BehaviorNode<L> {
    BehaviorNode::AlwaysSucceed(AlwaysSucceed::new(child))
}

/// Wraps a game leaf.
#[inline]
pub fn leaf<L>(behavior: L) -> BehaviorNode<L> {
    BehaviorNode::Leaf(Leaf::new(behavior))
}
