//! Facade owning the world, the phase machine and the running encounter.

use crate::attributes::AttributeKind;
use crate::combat::{DamageKind, HitReport};
use crate::config::{CombatConfig, CombatMode};
use crate::entity::EntityRegistry;
use crate::machine::{
    CombatContext, CombatPhase, CombatReport, CombatResult, CombatStateMachine, PendingAction,
    PhaseHandler, PhaseScope, PhaseTransition, StateTransitionError, states,
};
use crate::rng::RngOracle;
use crate::skill::{PresentationSink, SkillLibrary, SkillUseError, UseOutcome};
use crate::status::{ApplyOutcome, EffectApplyError, StatusEffect};
use crate::types::{CombatId, EffectId, EntityId, SkillId};
use crate::world::{CombatEvent, CombatWorld};

/// Runs one encounter at a time.
///
/// ```text
/// start_combat → tick(dt)* → (Victory | Defeat | Draw) → finish
/// ```
///
/// Between `start_combat` and `finish` the engine holds a
/// [`CombatContext`]; phase handlers see it together with the world on
/// every update.
pub struct CombatEngine {
    world: CombatWorld,
    machine: CombatStateMachine,
    context: Option<CombatContext>,
    next_combat_id: u64,
}

impl CombatEngine {
    pub fn new(registry: Box<dyn EntityRegistry>, skills: SkillLibrary, config: CombatConfig) -> Self {
        Self::from_world(CombatWorld::new(registry, skills, config))
    }

    pub fn from_world(world: CombatWorld) -> Self {
        Self {
            machine: CombatStateMachine::with_defaults(&world.config),
            world,
            context: None,
            next_combat_id: 1,
        }
    }

    pub fn with_rng(mut self, rng: Box<dyn RngOracle>) -> Self {
        self.world = self.world.with_rng(rng);
        self
    }

    pub fn with_presentation(mut self, presentation: Box<dyn PresentationSink>) -> Self {
        self.world = self.world.with_presentation(presentation);
        self
    }

    fn scoped<R>(
        &mut self,
        f: impl FnOnce(&mut CombatStateMachine, &mut PhaseScope<'_>) -> R,
    ) -> Result<R, StateTransitionError> {
        let ctx = self.context.as_mut().ok_or(StateTransitionError::NotStarted)?;
        let mut scope = PhaseScope {
            world: &mut self.world,
            ctx,
        };
        Ok(f(&mut self.machine, &mut scope))
    }

    /// Opens an encounter between `rosters`; the first roster is the player
    /// side. The battle is running (`BattleActive` or the first turn) when
    /// this returns.
    pub fn start_combat(&mut self, rosters: Vec<Vec<EntityId>>) -> Result<CombatId, StateTransitionError> {
        let count = rosters.iter().filter(|r| !r.is_empty()).count();
        if count < 2 {
            return Err(StateTransitionError::InvalidRosters { count });
        }
        if let Some(from) = self.machine.current()
            && !from.is_terminal()
        {
            return Err(StateTransitionError::InvalidTransition {
                from,
                to: CombatPhase::BattleStart,
            });
        }

        let combat_id = CombatId(self.next_combat_id);
        self.next_combat_id += 1;
        self.machine.clear();
        self.context = Some(CombatContext::new(combat_id, rosters, self.world.clock()));

        let started = self.scoped(|machine, scope| {
            machine.transition(CombatPhase::BattleStart, scope)?;
            machine.settle(scope)
        });
        if let Err(err) = started.and_then(|inner| inner) {
            tracing::warn!(combat = combat_id.0, error = %err, "combat failed to start");
            self.context = None;
            self.machine.halt();
            return Err(err);
        }
        Ok(combat_id)
    }

    /// Advances the encounter by `dt` seconds. A paused battle keeps the
    /// clock frozen.
    pub fn tick(&mut self, dt: f64) -> Result<(), StateTransitionError> {
        if self.context.is_none() {
            return Err(StateTransitionError::NotStarted);
        }
        if self.machine.current() != Some(CombatPhase::BattlePause) {
            self.world.advance_clock();
        }
        self.scoped(|machine, scope| machine.update(scope, dt))?
    }

    /// Manual skill use.
    ///
    /// Real-time battles accept it while `BattleActive`; the skill resolves
    /// now or starts its cast. Turn-based battles accept it from a member of
    /// the acting roster who has not acted yet; the use is committed now and
    /// resolves through the skill phases on the next tick.
    pub fn use_skill(
        &mut self,
        caster: EntityId,
        skill: &SkillId,
        target: Option<EntityId>,
    ) -> Result<UseOutcome, SkillUseError> {
        let phase = self.machine.current();
        let Some(ctx) = self.context.as_mut() else {
            return Err(SkillUseError::OutOfTurn);
        };

        match self.world.config.mode {
            CombatMode::RealTime => {
                if phase != Some(CombatPhase::BattleActive) {
                    return Err(SkillUseError::OutOfTurn);
                }
                self.world.use_skill(caster, skill, target, false)
            }
            CombatMode::TurnBased => {
                let Some(phase) = phase.filter(|p| p.is_turn()) else {
                    return Err(SkillUseError::OutOfTurn);
                };
                let may_act = ctx.pending.is_none()
                    && ctx.turn.as_ref().is_some_and(|turn| {
                        ctx.roster_of(caster) == Some(turn.roster_index)
                            && !turn.acted.contains(&caster)
                    });
                if !may_act {
                    return Err(SkillUseError::OutOfTurn);
                }
                let outcome = self.world.use_skill(caster, skill, target, true)?;
                ctx.pending = Some(PendingAction::new(caster, phase));
                Ok(outcome)
            }
        }
    }

    pub fn add_status_effect(
        &mut self,
        target: EntityId,
        effect: StatusEffect,
        source: Option<EntityId>,
    ) -> Result<ApplyOutcome, EffectApplyError> {
        self.world
            .apply_status(target, effect, source)
            .map(|report| report.outcome)
    }

    pub fn remove_status_effect(&mut self, entity: EntityId, effect_id: &EffectId) -> bool {
        self.world.remove_status(entity, effect_id)
    }

    /// Current value of `kind` on `entity`, recomputing it if stale.
    pub fn get_attribute(&mut self, entity: EntityId, kind: AttributeKind) -> Option<f64> {
        self.world
            .registry
            .get_mut(entity)
            .map(|e| e.attributes.get_value(kind))
    }

    pub fn apply_hit(
        &mut self,
        attacker: EntityId,
        target: EntityId,
        damage: f64,
        kind: DamageKind,
        is_critical: bool,
    ) -> Result<HitReport, EffectApplyError> {
        self.world.apply_hit(attacker, target, damage, kind, is_critical)
    }

    pub fn interrupt_cast(&mut self, caster: EntityId) -> bool {
        self.world.interrupt_cast(caster)
    }

    /// Suspends the active branch, remembering where it was.
    pub fn pause(&mut self) -> Result<(), StateTransitionError> {
        let from = self.machine.current().ok_or(StateTransitionError::NotStarted)?;
        if !from.is_active_branch() {
            return Err(StateTransitionError::InvalidTransition {
                from,
                to: CombatPhase::BattlePause,
            });
        }
        self.scoped(|machine, scope| {
            scope.ctx.resume_phase = Some(from);
            let result = machine.transition(CombatPhase::BattlePause, scope);
            if result.is_err() {
                scope.ctx.resume_phase = None;
            }
            result
        })?
    }

    pub fn resume(&mut self) -> Result<(), StateTransitionError> {
        let from = self.machine.current().ok_or(StateTransitionError::NotStarted)?;
        if from != CombatPhase::BattlePause {
            return Err(StateTransitionError::InvalidTransition {
                from,
                to: CombatPhase::BattleResume,
            });
        }
        self.scoped(|machine, scope| {
            machine.transition(CombatPhase::BattleResume, scope)?;
            machine.settle(scope)
        })?
    }

    /// Ends the acting roster's turn at the next update.
    pub fn end_turn(&mut self) -> Result<(), StateTransitionError> {
        let from = self.machine.current().ok_or(StateTransitionError::NotStarted)?;
        let turn = self
            .context
            .as_mut()
            .and_then(|ctx| ctx.turn.as_mut())
            .filter(|_| from.is_turn())
            .ok_or(StateTransitionError::InvalidTransition {
                from,
                to: CombatPhase::BattleActive,
            })?;
        turn.end_requested = true;
        Ok(())
    }

    pub fn register_phase(
        &mut self,
        phase: CombatPhase,
        handler: Box<dyn PhaseHandler>,
    ) -> Option<Box<dyn PhaseHandler>> {
        self.machine.register(phase, handler)
    }

    /// Moves the running encounter to `phase`, typically a custom one.
    pub fn transition_to(&mut self, phase: CombatPhase) -> Result<(), StateTransitionError> {
        self.scoped(|machine, scope| machine.transition(phase, scope))?
    }

    pub fn current_phase(&self) -> Option<CombatPhase> {
        self.machine.current()
    }

    pub fn combat_result(&self) -> CombatResult {
        self.context
            .as_ref()
            .map_or(CombatResult::Unknown, |ctx| ctx.result)
    }

    pub fn phase_history(&self) -> &[PhaseTransition] {
        self.machine.history()
    }

    pub fn is_finished(&self) -> bool {
        self.machine.current().is_some_and(CombatPhase::is_terminal)
    }

    pub fn context(&self) -> Option<&CombatContext> {
        self.context.as_ref()
    }

    pub fn report(&self) -> Option<&CombatReport> {
        self.context.as_ref().and_then(|ctx| ctx.report.as_ref())
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        self.world.drain_events()
    }

    pub fn world(&self) -> &CombatWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut CombatWorld {
        &mut self.world
    }

    /// Closes the encounter and hands back its report.
    ///
    /// An encounter still in progress is unwound first and reported with
    /// whatever result it had reached, usually `Unknown`.
    pub fn finish(&mut self) -> Option<CombatReport> {
        let mut ctx = self.context.take()?;
        let finished = self.is_finished();
        self.machine.halt();

        let report = match ctx.report.take() {
            Some(report) if finished => report,
            _ => {
                if !finished {
                    tracing::info!(combat = ctx.combat_id.0, "combat abandoned");
                    states::unwind(&mut self.world, &ctx);
                }
                states::build_report(&self.world, &ctx)
            }
        };
        Some(report)
    }
}

impl std::fmt::Debug for CombatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatEngine")
            .field("world", &self.world)
            .field("machine", &self.machine)
            .field("combat", &self.context.as_ref().map(|ctx| ctx.combat_id))
            .finish()
    }
}
