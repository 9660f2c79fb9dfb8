//! Decorator behavior nodes.
//!
//! Decorators wrap a single child behavior and modify its result or execution.
//! This module provides [`Inverter`] (NOT logic) and [`AlwaysSucceed`] (error suppression).

use crate::node::{BehaviorNode, NodeState, settle};
use crate::{Behavior, Status};

/// Inverts the result of its child behavior.
///
/// # Semantics
///
/// - If the child returns `Success`, the inverter returns `Failure`
/// - If the child returns `Failure`, the inverter returns `Success`
/// - If the child returns `Running`, the inverter returns `Running`
///
/// This is analogous to a logical NOT (!) operation.
#[derive(Debug, Clone)]
pub struct Inverter<L> {
    child: Box<BehaviorNode<L>>,
    state: NodeState,
}

impl<L> Inverter<L> {
    /// Creates a new inverter that wraps the given child behavior.
    pub fn new(child: BehaviorNode<L>) -> Self {
        Self {
            child: Box::new(child),
            state: NodeState::default(),
        }
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn child(&self) -> &BehaviorNode<L> {
        &self.child
    }
}

impl<C, L: Behavior<C>> Behavior<C> for Inverter<L> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        let status = settle(self.child.tick(ctx)).invert();
        self.state.record(status)
    }

    fn reset(&mut self) {
        Behavior::<C>::reset(self.child.as_mut());
        self.state.clear();
    }
}

/// Always returns `Success` once its child finishes, regardless of the child's result.
///
/// # Semantics
///
/// - If the child returns `Success`, returns `Success`
/// - If the child returns `Failure`, **still returns `Success`**
/// - If the child returns `Running`, returns `Running`
///
/// This is useful for:
/// - Optional behaviors that shouldn't cause a sequence to fail
/// - Error suppression in non-critical paths
#[derive(Debug, Clone)]
pub struct AlwaysSucceed<L> {
    child: Box<BehaviorNode<L>>,
    state: NodeState,
}

impl<L> AlwaysSucceed<L> {
    /// Creates a new always-succeed wrapper around the given child behavior.
    pub fn new(child: BehaviorNode<L>) -> Self {
        Self {
            child: Box::new(child),
            state: NodeState::default(),
        }
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn child(&self) -> &BehaviorNode<L> {
        &self.child
    }
}

impl<C, L: Behavior<C>> Behavior<C> for AlwaysSucceed<L> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        let status = match settle(self.child.tick(ctx)) {
            Status::Running => Status::Running,
            _ => Status::Success,
        };
        self.state.record(status)
    }

    fn reset(&mut self) {
        Behavior::<C>::reset(self.child.as_mut());
        self.state.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{always_succeed, inverter, leaf};

    struct TestContext {
        value: i32,
    }

    #[derive(Debug, Clone)]
    enum TestLeaf {
        IsPositive,
        FailAndIncrement,
        RunOnce { ran: bool },
    }

    impl Behavior<TestContext> for TestLeaf {
        fn tick(&mut self, ctx: &mut TestContext) -> Status {
            match self {
                TestLeaf::IsPositive => Status::from_bool(ctx.value > 0),
                TestLeaf::FailAndIncrement => {
                    ctx.value += 1;
                    Status::Failure
                }
                TestLeaf::RunOnce { ran } => {
                    if *ran {
                        *ran = false;
                        Status::Failure
                    } else {
                        *ran = true;
                        Status::Running
                    }
                }
            }
        }

        fn reset(&mut self) {
            if let TestLeaf::RunOnce { ran } = self {
                *ran = false;
            }
        }
    }

    #[test]
    fn inverter_inverts_success() {
        let mut node = inverter(leaf(TestLeaf::IsPositive));

        let mut ctx = TestContext { value: 10 };
        assert_eq!(node.tick(&mut ctx), Status::Failure);
    }

    #[test]
    fn inverter_inverts_failure() {
        let mut node = inverter(leaf(TestLeaf::IsPositive));

        let mut ctx = TestContext { value: -10 };
        assert_eq!(node.tick(&mut ctx), Status::Success);
    }

    #[test]
    fn inverter_passes_running_through() {
        let mut node = inverter(leaf(TestLeaf::RunOnce { ran: false }));

        let mut ctx = TestContext { value: 0 };
        assert_eq!(node.tick(&mut ctx), Status::Running);
        assert_eq!(node.tick(&mut ctx), Status::Success);
    }

    #[test]
    fn always_succeed_on_failure() {
        let mut node = always_succeed(leaf(TestLeaf::FailAndIncrement));

        let mut ctx = TestContext { value: 0 };
        assert_eq!(node.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.value, 1); // Child still executed
    }

    #[test]
    fn always_succeed_keeps_running() {
        let mut node = always_succeed(leaf(TestLeaf::RunOnce { ran: false }));

        let mut ctx = TestContext { value: 0 };
        assert_eq!(node.tick(&mut ctx), Status::Running);
        assert_eq!(node.tick(&mut ctx), Status::Success);
    }
}
