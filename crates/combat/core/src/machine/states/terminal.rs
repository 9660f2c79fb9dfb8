use crate::machine::{CombatContext, CombatPhase, CombatReport, PhaseHandler, PhaseScope, Rewards};
use crate::world::CombatWorld;

/// `Victory`, `Defeat` or `Draw`. Entering one produces the
/// [`CombatReport`]; nothing leaves a terminal phase.
pub struct TerminalHandler {
    phase: CombatPhase,
}

impl TerminalHandler {
    pub fn new(phase: CombatPhase) -> Self {
        Self { phase }
    }
}

impl PhaseHandler for TerminalHandler {
    fn name(&self) -> &'static str {
        self.phase.as_str()
    }

    fn on_enter(&mut self, scope: &mut PhaseScope<'_>) {
        let report = build_report(scope.world, scope.ctx);
        tracing::info!(
            combat = report.combat_id.0,
            result = %report.result,
            turns = report.turns,
            survivors = report.survivors.len(),
            "combat finished"
        );
        scope.ctx.report = Some(report);
    }

    fn on_update(&mut self, _scope: &mut PhaseScope<'_>, _dt: f64) -> Option<CombatPhase> {
        None
    }
}

pub(crate) fn build_report(world: &CombatWorld, ctx: &CombatContext) -> CombatReport {
    let survivors = ctx
        .participants()
        .into_iter()
        .filter(|id| world.registry.is_alive(*id))
        .collect();
    CombatReport {
        combat_id: ctx.combat_id,
        result: ctx.result,
        turns: ctx.turn_counter,
        started_at: ctx.started_at,
        ended_at: world.clock(),
        survivors,
        rewards: ctx.side.get::<Rewards>().cloned(),
    }
}
