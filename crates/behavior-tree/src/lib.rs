//! Resumable behavior tree library for tick-driven simulations.
//!
//! This library provides a small, deterministic behavior tree implementation
//! designed for games that advance in fixed simulation steps.
//!
//! - **Resumable**: Nodes report `Running` and continue from saved progress
//! - **Explicit time**: Leaves read the step length from the context ([`Clock`])
//! - **Closed node set**: Structural nodes are an enum; games supply leaves
//! - **Zero dependencies**: Pure Rust with no external crates
//!
//! # Architecture
//!
//! - [`Behavior`]: Core trait implemented by leaves and every node
//! - [`Status`]: Inactive, Running, Success or Failure
//! - [`BehaviorNode`]: Sequence, Selector, Parallel, Inverter, AlwaysSucceed, Leaf
//! - [`BehaviorTree`]: Owned, cloneable tree instance
//! - [`Wait`]: Generic timed leaf

pub mod behavior;
pub mod builder;
pub mod composite;
pub mod decorator;
pub mod leaf;
pub mod node;
pub mod status;
pub mod tree;

// Re-export core types for ergonomic API
pub use behavior::{Behavior, Clock};
pub use composite::{Parallel, ParallelPolicy, Selector, Sequence};
pub use decorator::{AlwaysSucceed, Inverter};
pub use leaf::{TIME_EPSILON, Wait};
pub use node::{BehaviorNode, Leaf, NodeKind, NodeState};
pub use status::Status;
pub use tree::BehaviorTree;
