//! Attribute values with layered modifiers and a lazily refreshed cache.
//!
//! ```text
//! value = clamp((base + Σ flat) × (1 + Σ percent) × Π final)
//! ```
//!
//! Modifiers are folded in insertion order per attribute. Clamping follows
//! the [`ClampPolicy`](crate::config::ClampPolicy) the set was built with.

mod kind;
mod modifier;
mod observer;
mod set;

pub use kind::AttributeKind;
pub use modifier::{Modifier, ModifierKind, ModifierLifetime};
pub use observer::{AttributeChange, AttributeObserver};
pub use set::AttributeSet;
