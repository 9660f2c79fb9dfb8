//! In-memory content presets for the combat core.
//!
//! This crate houses the stock skills, status effects, entity archetypes
//! and AI trees used by the simulator and by tests:
//! - Status effect templates (`effects`)
//! - Skill templates and the standard library (`skills`)
//! - Behavior tree templates (`behaviors`)
//! - Entity archetypes with attributes, skills and AI (`archetypes`)
//!
//! Everything here is plain Rust values handed to the core already
//! validated; the core never loads content itself.

pub mod archetypes;
pub mod behaviors;
pub mod effects;
pub mod skills;

pub use archetypes::Archetype;
pub use behaviors::BehaviorKind;
pub use skills::standard_library;
