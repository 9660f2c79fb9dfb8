use std::sync::Arc;

use arrayvec::ArrayVec;
use behavior_tree::TIME_EPSILON;

use crate::attributes::AttributeKind;
use crate::combat::{apply_damage, apply_heal, raw_amount};
use crate::skill::{
    ActiveCast, AreaOrigin, CastCommitment, CastOutcome, CueStage, EmptyTargetPolicy,
    PresentationCue, SkillEffect, SkillResolution, SkillTemplate, SkillUseError, TargetMode,
    TargetResult, TargetSet, UseOutcome, can_use,
};
use crate::types::{EntityId, Position, SkillId};
use crate::world::{CombatEvent, CombatWorld};

impl CombatWorld {
    /// Runs the skill pipeline for `caster`.
    ///
    /// Validation happens before anything is spent. Once costs are deducted
    /// the cooldown starts regardless of how resolution goes. Skills with a
    /// cast time, or any skill when `defer` is set, are left in flight on
    /// the caster and resolve through [`advance_casts`](Self::advance_casts)
    /// or [`complete_cast`](Self::complete_cast).
    pub fn use_skill(
        &mut self,
        caster: EntityId,
        skill: &SkillId,
        target: Option<EntityId>,
        defer: bool,
    ) -> Result<UseOutcome, SkillUseError> {
        let template = self.template(skill)?;
        self.validate_use(caster, &template)?;
        self.validate_target(caster, &template, target)?;

        let deferred = defer || template.cast_time > TIME_EPSILON;
        if !deferred
            && template.empty_target_policy() == EmptyTargetPolicy::Abort
            && self.gather_for(caster, &template, target).is_empty()
        {
            return Err(SkillUseError::NoEligibleTargetsInRange);
        }

        let commitment = self.commit(caster, &template, target)?;

        if deferred {
            let remaining = template.cast_time.max(0.0);
            if let Some(entity) = self.registry.get_mut(caster) {
                entity.flags.acting_skill_id = Some(skill.clone());
                entity.cast = Some(ActiveCast {
                    commitment,
                    remaining,
                    interruptible: template.interruptible,
                });
            }
            tracing::debug!(%caster, %skill, remaining, "cast started");
            self.record(CombatEvent::CastStarted {
                caster,
                skill: skill.clone(),
                remaining,
            });
            return Ok(UseOutcome::Casting { remaining });
        }

        match self.resolve(&commitment) {
            CastOutcome::Resolved(resolution) => Ok(UseOutcome::Resolved(resolution)),
            CastOutcome::Whiffed { .. } => Ok(UseOutcome::Whiffed),
            // Targets were checked above; costs are already refunded here.
            CastOutcome::Aborted { .. } => Err(SkillUseError::NoEligibleTargetsInRange),
        }
    }

    /// Runs the validation gate without side effects.
    pub fn check_skill(
        &self,
        caster: EntityId,
        skill: &SkillId,
        target: Option<EntityId>,
    ) -> Result<(), SkillUseError> {
        let template = self.template(skill)?;
        self.validate_use(caster, &template)?;
        self.validate_target(caster, &template, target)
    }

    fn template(&self, skill: &SkillId) -> Result<Arc<SkillTemplate>, SkillUseError> {
        self.skills
            .get(skill)
            .ok_or_else(|| SkillUseError::UnknownSkill(skill.clone()))
    }

    fn validate_use(&self, caster: EntityId, template: &SkillTemplate) -> Result<(), SkillUseError> {
        let entity = self.registry.get(caster).ok_or(SkillUseError::InvalidCaster)?;
        let instance = entity
            .skill(&template.id)
            .ok_or_else(|| SkillUseError::UnknownSkill(template.id.clone()))?;
        can_use(entity, instance, template)
    }

    fn validate_target(
        &self,
        caster: EntityId,
        template: &SkillTemplate,
        target: Option<EntityId>,
    ) -> Result<(), SkillUseError> {
        if !template.target.requires_target() {
            return Ok(());
        }
        let caster = self.registry.get(caster).ok_or(SkillUseError::InvalidCaster)?;
        let target = target
            .and_then(|id| self.registry.get(id))
            .filter(|t| t.is_alive() && self.is_participant(t.id))
            .ok_or(SkillUseError::InvalidTarget)?;

        if !template.target.affiliation().accepts(caster.faction, target.faction) {
            return Err(SkillUseError::InvalidTarget);
        }
        let distance = caster.position.distance(&target.position);
        if distance > template.range + TIME_EPSILON {
            return Err(SkillUseError::OutOfRange {
                distance,
                range: template.range,
            });
        }
        Ok(())
    }

    /// Deducts every cost, starts the cooldown and fires the cast cue.
    ///
    /// Affordability was checked by the validation gate, so deduction
    /// either applies every cost or, if the caster vanished, none.
    fn commit(
        &mut self,
        caster: EntityId,
        template: &SkillTemplate,
        target: Option<EntityId>,
    ) -> Result<CastCommitment, SkillUseError> {
        let now = self.clock();
        let entity = self.registry.get_mut(caster).ok_or(SkillUseError::InvalidCaster)?;
        let instance = entity
            .skills
            .get_mut(&template.id)
            .ok_or_else(|| SkillUseError::UnknownSkill(template.id.clone()))?;
        instance.start_cooldown(template.cooldown);
        instance.last_used_tick = Some(now);
        let level = instance.level.min(template.max_level);

        let mut paid = ArrayVec::new();
        for cost in &template.costs {
            entity.attributes.add_base(cost.kind, -cost.amount);
            paid.push(*cost);
        }

        self.cue(PresentationCue {
            stage: CueStage::Cast,
            skill: template.id.clone(),
            caster,
            target,
            animation: template.cues.cast_animation.clone(),
            vfx: None,
            sfx: template.cues.cast_sfx.clone(),
        });

        Ok(CastCommitment {
            caster,
            skill: template.id.clone(),
            target,
            level,
            paid,
            committed_at: now,
        })
    }

    /// Returns a commitment's costs and clears the cooldown it started.
    pub fn refund(&mut self, commitment: &CastCommitment) {
        let Some(entity) = self.registry.get_mut(commitment.caster) else {
            return;
        };
        for cost in &commitment.paid {
            entity.attributes.add_base(cost.kind, cost.amount);
        }
        if let Some(instance) = entity.skills.get_mut(&commitment.skill) {
            instance.clear_cooldown();
        }
    }

    /// Gathers targets and applies the skill, honoring the empty-target
    /// policy.
    pub fn resolve(&mut self, commitment: &CastCommitment) -> CastOutcome {
        let targets = self.gather_targets(commitment);
        self.resolve_against(commitment, &targets)
    }

    /// Second half of [`resolve`](Self::resolve), for callers that gathered
    /// targets themselves.
    pub fn resolve_against(&mut self, commitment: &CastCommitment, targets: &TargetSet) -> CastOutcome {
        let caster = commitment.caster;
        let skill = commitment.skill.clone();
        let Ok(template) = self.template(&skill) else {
            self.refund(commitment);
            return CastOutcome::Aborted { caster, skill };
        };

        if targets.is_empty() {
            return match template.empty_target_policy() {
                EmptyTargetPolicy::Abort => {
                    self.refund(commitment);
                    tracing::debug!(%caster, %skill, "targets vanished, skill refunded");
                    CastOutcome::Aborted { caster, skill }
                }
                EmptyTargetPolicy::Consume => {
                    self.mark_resolved(caster, &skill);
                    tracing::debug!(%caster, %skill, "skill whiffed");
                    CastOutcome::Whiffed { caster, skill }
                }
            };
        }

        CastOutcome::Resolved(self.apply_to_targets(commitment, targets))
    }

    pub fn gather_targets(&self, commitment: &CastCommitment) -> TargetSet {
        match self.skills.get(&commitment.skill) {
            Some(template) => self.gather_for(commitment.caster, &template, commitment.target),
            None => TargetSet::default(),
        }
    }

    fn gather_for(&self, caster: EntityId, template: &SkillTemplate, target: Option<EntityId>) -> TargetSet {
        let Some(caster_entity) = self.registry.get(caster).filter(|e| e.is_alive()) else {
            return TargetSet::default();
        };
        let faction = caster_entity.faction;
        let caster_position = caster_entity.position;
        let explicit = target
            .and_then(|id| self.registry.get(id))
            .filter(|t| t.is_alive() && self.is_participant(t.id));

        let (origin, radius) = match template.target {
            TargetMode::SelfOnly => {
                return TargetSet {
                    origin: caster_position,
                    primary: Some(caster),
                    targets: vec![caster],
                };
            }
            TargetMode::SingleTarget(affiliation) => {
                let Some(target) = explicit else {
                    return TargetSet::default();
                };
                let in_range =
                    caster_position.distance(&target.position) <= template.range + TIME_EPSILON;
                if !in_range || !affiliation.accepts(faction, target.faction) {
                    return TargetSet::default();
                }
                return TargetSet {
                    origin: target.position,
                    primary: Some(target.id),
                    targets: vec![target.id],
                };
            }
            TargetMode::Area {
                origin: AreaOrigin::Caster,
                ..
            } => (caster_position, Some(template.effect_range)),
            TargetMode::Area {
                origin: AreaOrigin::Target,
                ..
            } => match explicit {
                Some(target) => (target.position, Some(template.effect_range)),
                None => return TargetSet::default(),
            },
            TargetMode::AllEnemies | TargetMode::AllAllies => (caster_position, None),
        };

        let affiliation = template.target.affiliation();
        let targets: Vec<EntityId> = self
            .living_participants()
            .into_iter()
            .filter_map(|id| self.registry.get(id))
            .filter(|e| affiliation.accepts(faction, e.faction))
            .filter(|e| radius.is_none_or(|r| origin.distance(&e.position) <= r + TIME_EPSILON))
            .map(|e| e.id)
            .collect();

        let primary = explicit
            .map(|t| t.id)
            .filter(|id| targets.contains(id))
            .or_else(|| self.nearest(&targets, &origin));

        TargetSet {
            origin,
            primary,
            targets,
        }
    }

    fn nearest(&self, candidates: &[EntityId], origin: &Position) -> Option<EntityId> {
        let mut best: Option<(EntityId, f64)> = None;
        for id in candidates {
            let Some(entity) = self.registry.get(*id) else {
                continue;
            };
            let distance = origin.distance(&entity.position);
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((*id, distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Applies every skill effect to every target in order. Non-primary
    /// targets take reduced damage and roll reduced control chances.
    pub fn apply_to_targets(&mut self, commitment: &CastCommitment, targets: &TargetSet) -> SkillResolution {
        let caster = commitment.caster;
        let mut resolution = SkillResolution {
            caster,
            skill: commitment.skill.clone(),
            resolved_at: self.clock(),
            results: Vec::new(),
        };
        let Ok(template) = self.template(&commitment.skill) else {
            return resolution;
        };

        let (attack, magic_attack, crit_chance) = match self.registry.get(caster) {
            Some(entity) => (
                entity.attributes.peek(AttributeKind::Attack),
                entity.attributes.peek(AttributeKind::MagicAttack),
                entity.attributes.peek(AttributeKind::CritChance),
            ),
            None => (0.0, 0.0, 0.0),
        };
        let per_level = template.scaling.per_level;

        for &target in &targets.targets {
            let primary = targets.is_primary(target);
            let mut result = TargetResult {
                target,
                primary,
                hits: Vec::new(),
                healed: 0.0,
                statuses: Vec::new(),
            };

            for effect in &template.effects {
                if !self.registry.is_alive(target) {
                    break;
                }
                match effect {
                    SkillEffect::Damage { kind, coefficient } => {
                        let stat = match kind.offense_stat() {
                            AttributeKind::MagicAttack => magic_attack,
                            _ => attack,
                        };
                        let mut raw = raw_amount(stat, *coefficient, commitment.level, per_level);
                        if !primary {
                            raw *= template.falloff.secondary_damage_multiplier;
                        }
                        let is_critical = self.roll(caster, crit_chance);
                        let Some(entity) = self.registry.get_mut(target) else {
                            continue;
                        };
                        let hit = apply_damage(&mut entity.attributes, raw, *kind, is_critical, &self.config);
                        result.hits.push(hit);
                        if hit.killed {
                            self.process_death(target, Some(caster));
                        }
                    }
                    SkillEffect::Heal { coefficient } => {
                        let amount = raw_amount(magic_attack, *coefficient, commitment.level, per_level);
                        if let Some(entity) = self.registry.get_mut(target) {
                            result.healed += apply_heal(&mut entity.attributes, amount);
                        }
                    }
                    SkillEffect::ApplyStatus { effect, chance } => {
                        let mut chance = *chance;
                        if !primary && effect.category.control().is_some() {
                            chance *= template.falloff.secondary_control_chance;
                        }
                        if !self.roll(caster, chance) {
                            continue;
                        }
                        if let Ok(report) = self.apply_status(target, effect.clone(), Some(caster)) {
                            result.statuses.push(report.outcome);
                        }
                    }
                }
            }

            self.cue(PresentationCue {
                stage: CueStage::Impact,
                skill: template.id.clone(),
                caster,
                target: Some(target),
                animation: None,
                vfx: template.cues.impact_vfx.clone(),
                sfx: template.cues.impact_sfx.clone(),
            });
            resolution.results.push(result);
        }

        self.mark_resolved(caster, &template.id);
        tracing::debug!(
            %caster,
            skill = %template.id,
            targets = resolution.results.len(),
            damage = resolution.total_damage(),
            "skill resolved"
        );
        self.record(CombatEvent::SkillResolved(resolution.clone()));
        resolution
    }

    fn mark_resolved(&mut self, caster: EntityId, skill: &SkillId) {
        let now = self.clock();
        if let Some(instance) = self
            .registry
            .get_mut(caster)
            .and_then(|e| e.skills.get_mut(skill))
        {
            instance.last_resolved_tick = Some(now);
        }
    }

    /// Advances every in-flight cast by `dt`; completed casts resolve now.
    pub fn advance_casts(&mut self, dt: f64) -> Vec<CastOutcome> {
        let mut outcomes = Vec::new();
        for id in self.living_participants() {
            let complete = match self.registry.get_mut(id).and_then(|e| e.cast.as_mut()) {
                Some(cast) => {
                    cast.remaining -= dt;
                    cast.is_complete()
                }
                None => false,
            };
            if complete && let Some(outcome) = self.complete_cast(id) {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Finishes `caster`'s cast immediately, whatever time remains.
    pub fn complete_cast(&mut self, caster: EntityId) -> Option<CastOutcome> {
        let cast = self.take_cast(caster)?;
        let outcome = self.resolve(&cast.commitment);
        self.record(CombatEvent::CastEnded(outcome.clone()));
        Some(outcome)
    }

    /// Detaches the cast from its caster without resolving or refunding it.
    pub fn take_cast(&mut self, caster: EntityId) -> Option<ActiveCast> {
        let entity = self.registry.get_mut(caster)?;
        entity.flags.acting_skill_id = None;
        entity.cast.take()
    }

    /// Interrupts an interruptible cast; costs are refunded and the cooldown
    /// cleared. Non-interruptible casts are left running.
    pub fn interrupt_cast(&mut self, caster: EntityId) -> bool {
        let interruptible = self
            .registry
            .get(caster)
            .and_then(|e| e.cast.as_ref())
            .is_some_and(|cast| cast.interruptible);
        interruptible && self.cancel_cast(caster)
    }

    /// Cancels any cast through the rollback path.
    pub fn cancel_cast(&mut self, caster: EntityId) -> bool {
        let Some(cast) = self.take_cast(caster) else {
            return false;
        };
        self.refund(&cast.commitment);
        let skill = cast.commitment.skill;
        self.cue(PresentationCue {
            stage: CueStage::Interrupted,
            skill: skill.clone(),
            caster,
            target: cast.commitment.target,
            animation: None,
            vfx: None,
            sfx: None,
        });
        tracing::debug!(%caster, %skill, "cast cancelled");
        self.record(CombatEvent::CastInterrupted { caster, skill });
        true
    }
}
