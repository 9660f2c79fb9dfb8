use crate::combat::{DamageKind, HitReport, apply_damage};
use crate::status::{ApplyOptions, ApplyOutcome, ApplyReport, EffectApplyError, EffectEvent, StatusEffect};
use crate::types::{EffectId, EntityId};
use crate::world::{CombatEvent, CombatWorld};

impl CombatWorld {
    /// Applies `effect` to a living target with default options.
    pub fn apply_status(
        &mut self,
        target: EntityId,
        effect: StatusEffect,
        source: Option<EntityId>,
    ) -> Result<ApplyReport, EffectApplyError> {
        self.apply_status_with(target, effect, source, ApplyOptions::default())
    }

    pub fn apply_status_with(
        &mut self,
        target: EntityId,
        mut effect: StatusEffect,
        source: Option<EntityId>,
        options: ApplyOptions,
    ) -> Result<ApplyReport, EffectApplyError> {
        effect.source = source.or(effect.source);
        let control = effect.category.control();

        let entity = self
            .registry
            .get_mut(target)
            .filter(|e| e.is_alive())
            .ok_or(EffectApplyError::TargetInvalid(target))?;
        let report = entity
            .effects
            .apply(effect, &mut entity.attributes, options, &self.config);

        self.record_effect_events(&report.events);

        if let Some(kind) = control
            && kind.interrupts_casts()
            && report.outcome != ApplyOutcome::Discarded
            && self.interrupt_cast(target)
        {
            tracing::debug!(%target, %kind, "cast interrupted by control");
        }

        if report.killed() {
            let killer = report.events.iter().find_map(|e| e.source);
            self.process_death(target, killer);
        }
        Ok(report)
    }

    /// Removes every instance of `effect_id`, rolling back its modifiers.
    pub fn remove_status(&mut self, entity: EntityId, effect_id: &EffectId) -> bool {
        let Some(entity) = self.registry.get_mut(entity) else {
            return false;
        };
        entity.effects.remove(effect_id, &mut entity.attributes)
    }

    /// Entry point for collision and targeting providers: `damage` is the
    /// pre-mitigation amount.
    pub fn apply_hit(
        &mut self,
        attacker: EntityId,
        target: EntityId,
        damage: f64,
        kind: DamageKind,
        is_critical: bool,
    ) -> Result<HitReport, EffectApplyError> {
        let entity = self
            .registry
            .get_mut(target)
            .filter(|e| e.is_alive())
            .ok_or(EffectApplyError::TargetInvalid(target))?;
        let report = apply_damage(&mut entity.attributes, damage, kind, is_critical, &self.config);
        tracing::debug!(
            %attacker,
            %target,
            amount = report.amount,
            remaining = report.remaining_health,
            "hit applied"
        );

        if report.killed {
            self.process_death(target, Some(attacker));
        }
        Ok(report)
    }

    /// Marks a depleted entity dead and unwinds everything it had going:
    /// effects are removed with rollback, its cast is cancelled and its
    /// AI is reset. Entities that are still alive or already dead are left
    /// untouched.
    pub(crate) fn process_death(&mut self, id: EntityId, killer: Option<EntityId>) {
        let Some(entity) = self.registry.get_mut(id) else {
            return;
        };
        if !entity.is_alive() || !entity.is_depleted() {
            return;
        }
        entity.flags.alive = false;
        entity.ai_target = None;
        entity.effects.clear(&mut entity.attributes);

        self.reset_ai(id);
        tracing::info!(entity = %id, killer = ?killer, "entity died");
        self.record(CombatEvent::Died { entity: id, killer });
    }

    pub(crate) fn record_effect_events(&mut self, events: &[EffectEvent]) {
        self.events
            .extend(events.iter().cloned().map(CombatEvent::Effect));
    }
}
