//! Event and cue logging.

use combat_core::status::EffectEventKind;
use combat_core::{CastOutcome, CombatEvent, EntityId, EntityRegistry, PresentationCue, PresentationSink};

/// Forwards presentation cues to the log.
pub struct TracingPresentation;

impl PresentationSink for TracingPresentation {
    fn cue(&mut self, cue: PresentationCue) {
        tracing::trace!(
            stage = %cue.stage,
            skill = %cue.skill,
            caster = cue.caster.0,
            target = ?cue.target.map(|t| t.0),
            vfx = ?cue.vfx,
            sfx = ?cue.sfx,
            animation = ?cue.animation,
            "cue"
        );
    }
}

fn name(registry: &dyn EntityRegistry, id: EntityId) -> String {
    registry
        .get(id)
        .map_or_else(|| format!("#{}", id.0), |e| e.name.clone())
}

pub fn event(registry: &dyn EntityRegistry, event: &CombatEvent) {
    match event {
        CombatEvent::CastStarted {
            caster,
            skill,
            remaining,
        } => {
            tracing::info!(caster = %name(registry, *caster), %skill, remaining, "casting");
        }
        CombatEvent::SkillResolved(resolution) => {
            for result in &resolution.results {
                tracing::info!(
                    caster = %name(registry, resolution.caster),
                    skill = %resolution.skill,
                    target = %name(registry, result.target),
                    damage = result.damage(),
                    healed = result.healed,
                    "skill landed"
                );
            }
        }
        CombatEvent::CastEnded(CastOutcome::Whiffed { caster, skill }) => {
            tracing::info!(caster = %name(registry, *caster), %skill, "skill found no targets");
        }
        CombatEvent::CastEnded(_) => {}
        CombatEvent::CastInterrupted { caster, skill } => {
            tracing::info!(caster = %name(registry, *caster), %skill, "cast interrupted");
        }
        CombatEvent::Effect(effect) => match effect.kind {
            EffectEventKind::Applied | EffectEventKind::Expired | EffectEventKind::Removed => {
                tracing::debug!(
                    target = %name(registry, effect.target),
                    effect = %effect.effect_id,
                    kind = ?effect.kind,
                    "status"
                );
            }
            EffectEventKind::Ticked { amount, .. } => {
                tracing::debug!(
                    target = %name(registry, effect.target),
                    effect = %effect.effect_id,
                    amount,
                    "status ticked"
                );
            }
            _ => {}
        },
        CombatEvent::Died { entity, killer } => {
            tracing::info!(
                entity = %name(registry, *entity),
                killer = %killer.map_or_else(|| "-".to_owned(), |k| name(registry, k)),
                "died"
            );
        }
        CombatEvent::AiTicked { entity, status } => {
            tracing::trace!(entity = %name(registry, *entity), ?status, "ai ticked");
        }
    }
}
