//! Core behavior trait.
//!
//! This module defines the [`Behavior`] trait, which is the fundamental
//! abstraction for leaf nodes and for every structural node in
//! [`crate::BehaviorNode`]. The trait is generic over a context type `C`,
//! allowing nodes to access game state and make decisions.

use crate::Status;

/// A behavior tree node that can be evaluated against a context.
pub trait Behavior<C> {
    /// Evaluate this behavior node against the given context.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Mutable reference to the context/blackboard. Nodes can read
    ///   game state and modify it.
    ///
    /// # Returns
    ///
    /// - `Status::Running` if the work continues on a later tick
    /// - `Status::Success` if the behavior succeeded
    /// - `Status::Failure` if the behavior failed
    fn tick(&mut self, ctx: &mut C) -> Status;

    /// Clears any saved progress so the next tick starts from scratch.
    ///
    /// Called when a parent abandons a running subtree. Stateless nodes can
    /// rely on the default no-op.
    fn reset(&mut self) {}
}

/// Blanket implementation for boxed behaviors.
///
/// This allows `Box<dyn Behavior<C>>` to also implement `Behavior<C>`,
/// enabling dynamic dispatch and heterogeneous collections of leaves.
impl<C> Behavior<C> for Box<dyn Behavior<C>> {
    #[inline]
    fn tick(&mut self, ctx: &mut C) -> Status {
        (**self).tick(ctx)
    }

    #[inline]
    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Contexts that expose the simulated time elapsed since the previous tick.
///
/// Time-based leaves such as [`crate::Wait`] read the step length from here
/// instead of a wall clock, keeping evaluation deterministic.
pub trait Clock {
    /// Seconds elapsed since the previous tick.
    fn delta(&self) -> f64;
}
