//! Status effects: timed modifiers, periodic damage/healing and control.
//!
//! Lifecycle of one effect:
//!
//! ```text
//! Applying → Active → (Ticking → Active)* → Expiring → Removed
//!              ↺ stack / refresh
//! ```

mod container;
mod control;
mod effect;
mod error;

pub use container::{
    ApplyOptions, ApplyOutcome, ApplyReport, EffectEvent, EffectEventKind, StatusEffects,
};
pub use control::{ControlFlags, ControlKind};
pub use error::EffectApplyError;
pub use effect::{
    AppliedModifier, EffectCategory, EffectDuration, EffectPhase, ModifierTemplate, Polarity,
    StackPolicy, StatusEffect,
};
