//! Deterministic combat rules for tick-driven games.
//!
//! `combat-core` turns per-tick intent ("use skill X on target Y") into
//! changes in health, resources and temporary modifiers, and drives
//! non-player entities through behavior trees. All encounter flow goes
//! through [`engine::CombatEngine`]; the modules underneath are usable on
//! their own for tools and tests.
//!
//! Layers, leaves first: [`attributes`] → [`status`] → [`skill`] →
//! [`ai`] → [`machine`], bound together by [`entity`] and [`world`].
pub mod ai;
pub mod attributes;
pub mod combat;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod machine;
pub mod rng;
pub mod skill;
pub mod status;
pub mod types;
pub mod world;

pub use ai::{AiContext, AiNode, Action, Comparison, Condition, EffectMatcher, Subject, TargetSelection};
pub use attributes::{
    AttributeChange, AttributeKind, AttributeObserver, AttributeSet, Modifier, ModifierKind,
    ModifierLifetime,
};
pub use combat::{DamageKind, HitReport};
pub use config::{ClampPolicy, CombatConfig, CombatMode};
pub use engine::CombatEngine;
pub use entity::{CombatEntity, CombatFlags, EntityRegistry, EntityStore};
pub use error::{CombatError, ErrorSeverity};
pub use machine::{
    CombatContext, CombatPhase, CombatReport, CombatResult, CombatStateMachine, PhaseHandler,
    PhaseScope, PhaseTransition, Rewards, StateTransitionError,
};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use skill::{
    Affiliation, AreaOrigin, CastOutcome, CueLog, CueStage, EmptyTargetPolicy, NullPresentation,
    PresentationCue, PresentationSink, SkillCost, SkillEffect, SkillInstance, SkillLibrary,
    SkillResolution, SkillSchool, SkillTemplate, SkillUseError, TargetMode, UseOutcome,
};
pub use status::{
    ApplyOptions, ApplyOutcome, ControlFlags, ControlKind, EffectApplyError, EffectCategory,
    EffectDuration, ModifierTemplate, Polarity, StackPolicy, StatusEffect, StatusEffects,
};
pub use types::{CombatId, EffectId, EntityId, Faction, ModifierId, ModifierSource, Position, SkillId, Tick};
pub use world::{CombatEvent, CombatWorld};
