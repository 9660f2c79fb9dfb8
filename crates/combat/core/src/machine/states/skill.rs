//! Turn-based resolution of a manual skill use, one step per phase.

use crate::machine::{CombatPhase, PhaseHandler, PhaseScope};
use crate::skill::CastOutcome;
use crate::world::CombatEvent;

/// Advances the pending cast; leaves for `SkillExecuting` once it completes.
pub struct SkillCastingHandler;

impl PhaseHandler for SkillCastingHandler {
    fn name(&self) -> &'static str {
        "skill_casting"
    }

    fn on_update(&mut self, scope: &mut PhaseScope<'_>, dt: f64) -> Option<CombatPhase> {
        let PhaseScope { world, ctx } = scope;
        let Some(pending) = ctx.pending.as_mut() else {
            return Some(CombatPhase::BattleActive);
        };
        let caster = pending.caster;

        let complete = match world.registry.get_mut(caster).and_then(|e| e.cast.as_mut()) {
            Some(cast) => {
                cast.remaining -= dt;
                cast.is_complete()
            }
            None => {
                // Interrupted or cancelled; the rollback already refunded it.
                tracing::debug!(%caster, "pending cast is gone");
                let return_to = pending.return_to;
                ctx.pending = None;
                return Some(return_to);
            }
        };
        if !complete {
            return None;
        }

        pending.commitment = world.take_cast(caster).map(|cast| cast.commitment);
        Some(CombatPhase::SkillExecuting)
    }

    fn is_transient(&self) -> bool {
        true
    }
}

/// Gathers the targets of the committed skill into the pending action.
pub struct SkillExecutingHandler;

impl PhaseHandler for SkillExecutingHandler {
    fn name(&self) -> &'static str {
        "skill_executing"
    }

    fn on_update(&mut self, scope: &mut PhaseScope<'_>, _dt: f64) -> Option<CombatPhase> {
        let PhaseScope { world, ctx } = scope;
        let pending = ctx.pending.as_mut()?;
        match pending.commitment.as_ref() {
            Some(commitment) => {
                pending.targets = Some(world.gather_targets(commitment));
                Some(CombatPhase::CalculatingDamage)
            }
            None => {
                let return_to = pending.return_to;
                ctx.pending = None;
                Some(return_to)
            }
        }
    }

    fn is_transient(&self) -> bool {
        true
    }
}

/// Applies the skill to the gathered targets and checks for the end of the
/// battle before handing control back to the turn.
pub struct CalculatingDamageHandler;

impl PhaseHandler for CalculatingDamageHandler {
    fn name(&self) -> &'static str {
        "calculating_damage"
    }

    fn on_update(&mut self, scope: &mut PhaseScope<'_>, _dt: f64) -> Option<CombatPhase> {
        let PhaseScope { world, ctx } = scope;
        let pending = ctx.pending.take()?;
        let return_to = pending.return_to;

        if let Some(commitment) = pending.commitment {
            let targets = pending
                .targets
                .unwrap_or_else(|| world.gather_targets(&commitment));
            let outcome = world.resolve_against(&commitment, &targets);
            if !matches!(outcome, CastOutcome::Aborted { .. })
                && let Some(turn) = ctx.turn.as_mut()
            {
                turn.acted.insert(pending.caster);
            }
            world.record(CombatEvent::CastEnded(outcome));
        }

        if ctx.check_end(&*world.registry) {
            Some(CombatPhase::BattleEnd)
        } else {
            Some(return_to)
        }
    }

    fn is_transient(&self) -> bool {
        true
    }
}
