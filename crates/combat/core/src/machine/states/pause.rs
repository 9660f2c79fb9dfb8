use crate::machine::{CombatPhase, PhaseHandler, PhaseScope};

/// Holds the battle. The interrupted phase waits in
/// [`CombatContext::resume_phase`](crate::machine::CombatContext::resume_phase).
pub struct BattlePauseHandler;

impl PhaseHandler for BattlePauseHandler {
    fn name(&self) -> &'static str {
        "battle_pause"
    }

    fn on_enter(&mut self, scope: &mut PhaseScope<'_>) {
        tracing::info!(combat = scope.ctx.combat_id.0, resume = ?scope.ctx.resume_phase, "battle paused");
    }

    fn on_update(&mut self, _scope: &mut PhaseScope<'_>, _dt: f64) -> Option<CombatPhase> {
        None
    }
}

/// Returns to the phase the pause interrupted.
pub struct BattleResumeHandler;

impl PhaseHandler for BattleResumeHandler {
    fn name(&self) -> &'static str {
        "battle_resume"
    }

    fn on_update(&mut self, scope: &mut PhaseScope<'_>, _dt: f64) -> Option<CombatPhase> {
        let phase = scope.ctx.resume_phase.take().unwrap_or(CombatPhase::BattleActive);
        tracing::info!(combat = scope.ctx.combat_id.0, %phase, "battle resumed");
        Some(phase)
    }

    fn is_transient(&self) -> bool {
        true
    }
}
