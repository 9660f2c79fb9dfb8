//! Shared simulation state every combat system reads and writes.
//!
//! [`CombatWorld`] owns the registry, the skill library, the configuration,
//! the RNG and the presentation sink. Phase handlers and behavior-tree
//! leaves receive it explicitly; nothing in the crate is global.

mod effects;
mod skills;
mod upkeep;

use behavior_tree::Status;

use crate::config::CombatConfig;
use crate::entity::EntityRegistry;
use crate::rng::{PcgRng, RngOracle, compute_seed};
use crate::skill::{CastOutcome, NullPresentation, PresentationCue, PresentationSink, SkillLibrary, SkillResolution};
use crate::status::EffectEvent;
use crate::types::{EntityId, SkillId, Tick};

/// Notable things that happened during a tick, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum CombatEvent {
    CastStarted { caster: EntityId, skill: SkillId, remaining: f64 },
    SkillResolved(SkillResolution),
    CastEnded(CastOutcome),
    CastInterrupted { caster: EntityId, skill: SkillId },
    Effect(EffectEvent),
    Died { entity: EntityId, killer: Option<EntityId> },
    AiTicked { entity: EntityId, status: Status },
}

pub struct CombatWorld {
    pub registry: Box<dyn EntityRegistry>,
    pub skills: SkillLibrary,
    pub config: CombatConfig,
    rng: Box<dyn RngOracle>,
    presentation: Box<dyn PresentationSink>,
    clock: Tick,
    roll_counter: u64,
    participants: Vec<EntityId>,
    events: Vec<CombatEvent>,
}

impl CombatWorld {
    pub fn new(registry: Box<dyn EntityRegistry>, skills: SkillLibrary, config: CombatConfig) -> Self {
        Self {
            registry,
            skills,
            config,
            rng: Box::new(PcgRng),
            presentation: Box::new(NullPresentation),
            clock: Tick::ZERO,
            roll_counter: 0,
            participants: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn with_rng(mut self, rng: Box<dyn RngOracle>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_presentation(mut self, presentation: Box<dyn PresentationSink>) -> Self {
        self.presentation = presentation;
        self
    }

    pub fn clock(&self) -> Tick {
        self.clock
    }

    pub(crate) fn advance_clock(&mut self) -> Tick {
        self.clock = self.clock + 1;
        self.clock
    }

    pub fn participants(&self) -> &[EntityId] {
        &self.participants
    }

    pub(crate) fn set_participants(&mut self, participants: Vec<EntityId>) {
        self.participants = participants;
    }

    pub fn is_participant(&self, id: EntityId) -> bool {
        self.participants.contains(&id)
    }

    /// Living participants, in roster order.
    pub fn living_participants(&self) -> Vec<EntityId> {
        self.participants
            .iter()
            .copied()
            .filter(|id| self.registry.is_alive(*id))
            .collect()
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub(crate) fn record(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    pub(crate) fn cue(&mut self, cue: PresentationCue) {
        self.presentation.cue(cue);
    }

    /// Bernoulli roll for `actor`. Every call consumes one step of the roll
    /// counter, so identical inputs replay identically.
    pub fn roll(&mut self, actor: EntityId, chance: f64) -> bool {
        let seed = compute_seed(self.config.seed, self.clock.0, actor.0, self.roll_counter);
        self.roll_counter += 1;
        self.rng.roll_chance(seed, chance)
    }

    /// Cancels the entity's cast through the rollback path, then returns its
    /// behavior tree to `Inactive`.
    pub fn reset_ai(&mut self, id: EntityId) {
        self.cancel_cast(id);
        if let Some(entity) = self.registry.get_mut(id)
            && let Some(tree) = entity.behavior.as_mut()
        {
            tree.reset::<crate::ai::AiContext<'_>>();
        }
    }
}

impl std::fmt::Debug for CombatWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatWorld")
            .field("clock", &self.clock)
            .field("participants", &self.participants)
            .field("skills", &self.skills.len())
            .field("roll_counter", &self.roll_counter)
            .finish()
    }
}
