//! Skill definitions, per-owner instances and the data a cast carries.
//!
//! Execution itself lives on [`CombatWorld`](crate::world::CombatWorld),
//! which owns the registry every stage reads and writes:
//!
//! ```text
//! can_use → validate target → deduct costs → cues → cooldown
//!        → (cast in flight) → gather targets → apply effects
//! ```

mod cast;
mod cue;
mod error;
mod instance;
mod library;
mod template;
mod validate;

pub use cast::{
    ActiveCast, CastCommitment, CastOutcome, SkillResolution, TargetResult, TargetSet, UseOutcome,
};
pub use cue::{CueLog, CueStage, NullPresentation, PresentationCue, PresentationSink};
pub use error::SkillUseError;
pub use instance::SkillInstance;
pub use library::SkillLibrary;
pub use template::{
    Affiliation, AreaFalloff, AreaOrigin, EmptyTargetPolicy, LevelScaling, SkillCost, SkillCues,
    SkillEffect, SkillSchool, SkillTemplate, SkillTemplateBuilder, TargetMode,
};
pub use validate::{blocking_control, can_use};
