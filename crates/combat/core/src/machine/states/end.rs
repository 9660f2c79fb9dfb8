use crate::attributes::AttributeKind;
use crate::machine::{CombatContext, CombatPhase, CombatResult, PhaseHandler, PhaseScope, Rewards};
use crate::world::CombatWorld;

/// Pays out rewards, then unwinds every participant before the terminal
/// phase is entered.
pub struct BattleEndHandler;

impl PhaseHandler for BattleEndHandler {
    fn name(&self) -> &'static str {
        "battle_end"
    }

    fn on_enter(&mut self, scope: &mut PhaseScope<'_>) {
        if let Some(rewards) = distribute_rewards(scope.world, scope.ctx) {
            tracing::info!(
                recipients = rewards.recipients.len(),
                experience = rewards.experience_each,
                gold = rewards.gold_each,
                "rewards distributed"
            );
            scope.ctx.side.insert(rewards);
        }
        unwind(scope.world, scope.ctx);
    }

    fn on_update(&mut self, scope: &mut PhaseScope<'_>, _dt: f64) -> Option<CombatPhase> {
        match scope.ctx.result.terminal_phase() {
            Some(phase) => Some(phase),
            None => {
                tracing::warn!(combat = scope.ctx.combat_id.0, "battle ended undecided");
                scope.ctx.result = CombatResult::Draw;
                Some(CombatPhase::Draw)
            }
        }
    }

    fn is_transient(&self) -> bool {
        true
    }
}

/// Losers' `Experience` and `Gold`, split evenly among the winners still
/// standing and credited to their base values. No rewards on a draw.
fn distribute_rewards(world: &mut CombatWorld, ctx: &CombatContext) -> Option<Rewards> {
    let (winners, losers): (Vec<usize>, Vec<usize>) = match ctx.result {
        CombatResult::Victory => (vec![0], (1..ctx.rosters.len()).collect()),
        CombatResult::Defeat => ((1..ctx.rosters.len()).collect(), vec![0]),
        CombatResult::Draw | CombatResult::Unknown => return None,
    };

    let recipients: Vec<_> = winners
        .iter()
        .flat_map(|&index| ctx.living(index, &*world.registry))
        .collect();
    if recipients.is_empty() {
        return None;
    }

    let (experience, gold) = losers
        .iter()
        .filter_map(|&index| ctx.rosters.get(index))
        .flat_map(|roster| roster.iter())
        .filter_map(|&id| world.registry.get(id))
        .filter(|entity| !entity.is_alive())
        .fold((0.0, 0.0), |(xp, gold), entity| {
            (
                xp + entity.attributes.peek(AttributeKind::Experience),
                gold + entity.attributes.peek(AttributeKind::Gold),
            )
        });

    let share = recipients.len() as f64;
    let rewards = Rewards {
        experience_each: experience / share,
        gold_each: gold / share,
        recipients,
    };
    for &id in &rewards.recipients {
        if let Some(entity) = world.registry.get_mut(id) {
            entity.attributes.add_base(AttributeKind::Experience, rewards.experience_each);
            entity.attributes.add_base(AttributeKind::Gold, rewards.gold_each);
        }
    }
    Some(rewards)
}

/// Returns every participant to its out-of-combat state: casts cancelled,
/// trees reset, status effects removed with rollback, combat flags cleared.
pub(crate) fn unwind(world: &mut CombatWorld, ctx: &CombatContext) {
    for id in ctx.participants() {
        world.reset_ai(id);
        let Some(entity) = world.registry.get_mut(id) else {
            continue;
        };
        let removed = entity.effects.clear(&mut entity.attributes);
        entity.ai_target = None;
        entity.flags.in_combat = false;
        entity.flags.current_combat_id = None;
        entity.flags.acting_skill_id = None;
        tracing::debug!(entity = %id, removed, "participant unwound");
    }
    world.set_participants(Vec::new());
}
