//! Composite behavior nodes.
//!
//! Composite nodes control the execution flow of multiple child behaviors.
//! This module provides the fundamental building blocks for creating complex
//! decision trees: [`Sequence`] (AND logic), [`Selector`] (OR logic) and
//! [`Parallel`] (concurrent children with configurable policies).
//!
//! # Resumption
//!
//! `Sequence` and `Selector` remember the index of a `Running` child and
//! resume from it on the next tick. Children before the cursor are not
//! re-evaluated until the composite completes or is reset.

use crate::node::{BehaviorNode, NodeState, settle};
use crate::{Behavior, Status};

/// Executes child behaviors in sequence until one fails.
///
/// # Semantics
///
/// A `Sequence` node evaluates its children from left to right:
/// - If a child returns `Failure`, the sequence **stops immediately** and returns `Failure`
/// - If a child returns `Running`, the sequence returns `Running` and resumes at that child
/// - If a child returns `Success`, the sequence **continues** to the next child
/// - If all children return `Success`, the sequence returns `Success`
///
/// This is analogous to a short-circuited logical AND (&&) operation.
#[derive(Debug, Clone)]
pub struct Sequence<L> {
    children: Vec<BehaviorNode<L>>,
    state: NodeState,
}

impl<L> Sequence<L> {
    /// Creates a new sequence with the given child behaviors.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty. A sequence with no children is
    /// meaningless and likely indicates a programming error.
    pub fn new(children: Vec<BehaviorNode<L>>) -> Self {
        assert!(
            !children.is_empty(),
            "Sequence must have at least one child"
        );
        Self {
            children,
            state: NodeState::default(),
        }
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn children(&self) -> &[BehaviorNode<L>] {
        &self.children
    }
}

impl<C, L: Behavior<C>> Behavior<C> for Sequence<L> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        while self.state.cursor < self.children.len() {
            match settle(self.children[self.state.cursor].tick(ctx)) {
                Status::Success => self.state.cursor += 1,
                Status::Running => return self.state.record(Status::Running),
                _ => return finish::<C, L>(&mut self.children, &mut self.state, Status::Failure),
            }
        }
        // All children succeeded
        finish::<C, L>(&mut self.children, &mut self.state, Status::Success)
    }

    fn reset(&mut self) {
        reset_all::<C, L>(&mut self.children);
        self.state.clear();
    }
}

/// Executes child behaviors in sequence until one succeeds.
///
/// # Semantics
///
/// A `Selector` node evaluates its children from left to right:
/// - If a child returns `Success`, the selector **stops immediately** and returns `Success`
/// - If a child returns `Running`, the selector returns `Running` and resumes at that child
/// - If a child returns `Failure`, the selector **continues** to the next child
/// - If all children return `Failure`, the selector returns `Failure`
///
/// This is analogous to a short-circuited logical OR (||) operation.
#[derive(Debug, Clone)]
pub struct Selector<L> {
    children: Vec<BehaviorNode<L>>,
    state: NodeState,
}

impl<L> Selector<L> {
    /// Creates a new selector with the given child behaviors.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty. A selector with no children is
    /// meaningless and likely indicates a programming error.
    pub fn new(children: Vec<BehaviorNode<L>>) -> Self {
        assert!(
            !children.is_empty(),
            "Selector must have at least one child"
        );
        Self {
            children,
            state: NodeState::default(),
        }
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn children(&self) -> &[BehaviorNode<L>] {
        &self.children
    }
}

impl<C, L: Behavior<C>> Behavior<C> for Selector<L> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        while self.state.cursor < self.children.len() {
            match settle(self.children[self.state.cursor].tick(ctx)) {
                Status::Success => {
                    return finish::<C, L>(&mut self.children, &mut self.state, Status::Success);
                }
                Status::Running => return self.state.record(Status::Running),
                _ => self.state.cursor += 1,
            }
        }
        // All children failed
        finish::<C, L>(&mut self.children, &mut self.state, Status::Failure)
    }

    fn reset(&mut self) {
        reset_all::<C, L>(&mut self.children);
        self.state.clear();
    }
}

/// How many children must reach a result for a [`Parallel`] node to adopt it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParallelPolicy {
    /// A single child reaching the result is enough.
    RequireOne,
    /// Every child must reach the result.
    RequireAll,
}

/// Ticks all children on every call.
///
/// # Semantics
///
/// - Results are never latched: a child that finished on an earlier call is
///   ticked again, so a condition guarding a running sibling is re-checked.
/// - With a `RequireOne` success policy the node succeeds as soon as a child
///   succeeds, without ticking the remaining children that call.
/// - Otherwise results are counted after every child was ticked: the failure
///   policy is checked first, then the success policy.
/// - If no child is running and neither policy is satisfied, the node fails.
/// - On completion, children still running are reset.
#[derive(Debug, Clone)]
pub struct Parallel<L> {
    children: Vec<BehaviorNode<L>>,
    success: ParallelPolicy,
    failure: ParallelPolicy,
    state: NodeState,
}

impl<L> Parallel<L> {
    /// Creates a new parallel node.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(
        success: ParallelPolicy,
        failure: ParallelPolicy,
        children: Vec<BehaviorNode<L>>,
    ) -> Self {
        assert!(
            !children.is_empty(),
            "Parallel must have at least one child"
        );
        Self {
            children,
            success,
            failure,
            state: NodeState::default(),
        }
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn children(&self) -> &[BehaviorNode<L>] {
        &self.children
    }

    pub fn policies(&self) -> (ParallelPolicy, ParallelPolicy) {
        (self.success, self.failure)
    }
}

impl<C, L: Behavior<C>> Behavior<C> for Parallel<L> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        let total = self.children.len();
        let mut succeeded = 0;
        let mut failed = 0;
        let mut short_circuit = false;
        for child in &mut self.children {
            match settle(child.tick(ctx)) {
                Status::Success if self.success == ParallelPolicy::RequireOne => {
                    short_circuit = true;
                    break;
                }
                Status::Success => succeeded += 1,
                Status::Failure => failed += 1,
                Status::Running | Status::Inactive => {}
            }
        }
        if short_circuit {
            return self.complete(Status::Success);
        }

        let failure_met = match self.failure {
            ParallelPolicy::RequireOne => failed > 0,
            ParallelPolicy::RequireAll => failed == total,
        };
        if failure_met {
            return self.complete(Status::Failure);
        }

        if self.success == ParallelPolicy::RequireAll && succeeded == total {
            return self.complete(Status::Success);
        }

        if succeeded + failed == total {
            // Every child finished, neither policy can be met anymore
            return self.complete(Status::Failure);
        }

        self.state.record(Status::Running)
    }

    fn reset(&mut self) {
        reset_all::<C, L>(&mut self.children);
        self.state.clear();
    }
}

impl<L> Parallel<L> {
    fn complete<C>(&mut self, status: Status) -> Status
    where
        L: Behavior<C>,
    {
        reset_all::<C, L>(&mut self.children);
        self.state.cursor = 0;
        self.state.record(status)
    }
}

/// Resets every child and records the composite's final status.
fn finish<C, L: Behavior<C>>(
    children: &mut [BehaviorNode<L>],
    state: &mut NodeState,
    status: Status,
) -> Status {
    reset_all::<C, L>(children);
    state.cursor = 0;
    state.record(status)
}

fn reset_all<C, L: Behavior<C>>(children: &mut [BehaviorNode<L>]) {
    for child in children {
        Behavior::<C>::reset(child);
    }
}
