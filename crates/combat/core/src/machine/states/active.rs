use crate::config::CombatMode;
use crate::machine::{CombatPhase, PhaseHandler, PhaseScope, TurnState};

/// The main loop.
///
/// Real-time: every update runs a full upkeep with `dt` (AI included) and
/// then checks whether a roster was wiped out. Turn-based: each entry runs
/// one upkeep of `turn_duration` and hands the turn to the next roster that
/// still has someone standing.
pub struct BattleActiveHandler {
    mode: CombatMode,
}

impl BattleActiveHandler {
    pub fn new(mode: CombatMode) -> Self {
        Self { mode }
    }
}

impl PhaseHandler for BattleActiveHandler {
    fn name(&self) -> &'static str {
        "battle_active"
    }

    fn on_update(&mut self, scope: &mut PhaseScope<'_>, dt: f64) -> Option<CombatPhase> {
        let PhaseScope { world, ctx } = scope;

        match self.mode {
            CombatMode::RealTime => {
                world.upkeep(dt, true);
                ctx.turn_counter += 1;
                ctx.check_end(&*world.registry)
                    .then_some(CombatPhase::BattleEnd)
            }
            CombatMode::TurnBased => {
                let duration = world.config.turn_duration;
                world.upkeep(duration, false);
                if ctx.check_end(&*world.registry) {
                    return Some(CombatPhase::BattleEnd);
                }

                let count = ctx.rosters.len().max(1);
                let start = ctx.turn.as_ref().map_or(0, |t| t.roster_index + 1);
                let roster_index = (0..count)
                    .map(|offset| (start + offset) % count)
                    .find(|&index| !ctx.living(index, &*world.registry).is_empty())
                    .unwrap_or(0);

                ctx.turn = Some(TurnState {
                    roster_index,
                    ..TurnState::default()
                });
                ctx.turn_counter += 1;
                tracing::debug!(turn = ctx.turn_counter, roster = roster_index, "turn begins");

                Some(if roster_index == 0 {
                    CombatPhase::PlayerTurn
                } else {
                    CombatPhase::EnemyTurn
                })
            }
        }
    }

    fn is_transient(&self) -> bool {
        self.mode == CombatMode::TurnBased
    }
}
