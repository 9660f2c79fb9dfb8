use crate::attributes::AttributeKind;
use crate::machine::{CombatPhase, ParticipantSnapshot, ParticipantSnapshots, PhaseHandler, PhaseScope};

/// Binds the rosters to the world and marks everyone as in combat.
///
/// Ids that are missing from the registry, or already dead, are dropped from
/// their roster with a warning.
pub struct BattleStartHandler;

impl PhaseHandler for BattleStartHandler {
    fn name(&self) -> &'static str {
        "battle_start"
    }

    fn on_enter(&mut self, scope: &mut PhaseScope<'_>) {
        let combat_id = scope.ctx.combat_id;
        let clamp = scope.world.config.clamp.clone();
        let registry = &mut scope.world.registry;
        let mut snapshots = Vec::new();

        for roster in &mut scope.ctx.rosters {
            roster.retain(|&id| match registry.get_mut(id) {
                Some(entity) if entity.is_alive() => {
                    entity.attributes.set_clamp(clamp.clone());
                    entity.flags.in_combat = true;
                    entity.flags.current_combat_id = Some(combat_id);
                    snapshots.push(ParticipantSnapshot {
                        id,
                        name: entity.name.clone(),
                        faction: entity.faction,
                        health: entity.attributes.get_value(AttributeKind::Health),
                        max_health: entity.attributes.get_value(AttributeKind::MaxHealth),
                    });
                    true
                }
                Some(_) => {
                    tracing::warn!(entity = %id, "dead participant skipped");
                    false
                }
                None => {
                    tracing::warn!(entity = %id, "unknown participant skipped");
                    false
                }
            });
        }

        tracing::info!(
            combat = combat_id.0,
            participants = snapshots.len(),
            rosters = scope.ctx.rosters.len(),
            "battle started"
        );
        scope.world.set_participants(scope.ctx.participants());
        scope.ctx.side.insert(ParticipantSnapshots(snapshots));
    }

    fn on_update(&mut self, _scope: &mut PhaseScope<'_>, _dt: f64) -> Option<CombatPhase> {
        Some(CombatPhase::BattleActive)
    }

    fn is_transient(&self) -> bool {
        true
    }
}
