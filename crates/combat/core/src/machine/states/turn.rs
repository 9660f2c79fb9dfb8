use crate::machine::{CombatPhase, PhaseHandler, PhaseScope};

/// One roster's turn in turn-based mode.
///
/// AI-controlled members tick their trees once; manual members act through
/// [`CombatEngine::use_skill`](crate::engine::CombatEngine::use_skill),
/// which parks a pending action that this handler forwards to
/// `SkillCasting`. The turn ends when every living member has acted or
/// `end_turn` was requested.
pub struct TurnHandler {
    phase: CombatPhase,
}

impl TurnHandler {
    pub fn new(phase: CombatPhase) -> Self {
        Self { phase }
    }
}

impl PhaseHandler for TurnHandler {
    fn name(&self) -> &'static str {
        self.phase.as_str()
    }

    fn on_update(&mut self, scope: &mut PhaseScope<'_>, dt: f64) -> Option<CombatPhase> {
        let PhaseScope { world, ctx } = scope;

        if ctx.pending.is_some() {
            return Some(CombatPhase::SkillCasting);
        }
        let Some(acting) = ctx.turn.as_ref().map(|t| t.roster_index) else {
            tracing::warn!(phase = %self.phase, "turn phase without turn state");
            return Some(CombatPhase::BattleActive);
        };

        for id in ctx.living(acting, &*world.registry) {
            let pending = ctx.turn.as_ref().is_some_and(|t| !t.acted.contains(&id));
            let ai = world.registry.get(id).is_some_and(|e| e.is_ai_controlled());
            if pending && ai {
                world.tick_ai(id, dt);
                if let Some(turn) = ctx.turn.as_mut() {
                    turn.acted.insert(id);
                }
            }
        }

        if ctx.check_end(&*world.registry) {
            return Some(CombatPhase::BattleEnd);
        }

        let living = ctx.living(acting, &*world.registry);
        let done = ctx
            .turn
            .as_ref()
            .is_some_and(|t| t.end_requested || living.iter().all(|id| t.acted.contains(id)));
        done.then_some(CombatPhase::BattleActive)
    }
}
