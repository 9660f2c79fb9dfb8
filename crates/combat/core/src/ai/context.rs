use behavior_tree::Clock;

use crate::entity::CombatEntity;
use crate::types::EntityId;
use crate::world::CombatWorld;

/// Blackboard handed to every AI leaf: the acting entity, the world it
/// acts in and the step length.
pub struct AiContext<'w> {
    pub entity: EntityId,
    pub world: &'w mut CombatWorld,
    pub dt: f64,
}

impl AiContext<'_> {
    pub fn me(&self) -> Option<&CombatEntity> {
        self.world.registry.get(self.entity)
    }

    pub fn me_mut(&mut self) -> Option<&mut CombatEntity> {
        self.world.registry.get_mut(self.entity)
    }

    /// The current AI target, if it is still a living participant.
    pub fn target(&self) -> Option<&CombatEntity> {
        let id = self.me()?.ai_target?;
        self.world
            .registry
            .get(id)
            .filter(|t| t.is_alive() && self.world.is_participant(id))
    }

    /// Living participants hostile to the acting entity, in roster order.
    pub fn enemies(&self) -> Vec<&CombatEntity> {
        let Some(me) = self.me() else {
            return Vec::new();
        };
        self.world
            .living_participants()
            .into_iter()
            .filter_map(|id| self.world.registry.get(id))
            .filter(|e| e.faction != me.faction)
            .collect()
    }
}

impl Clock for AiContext<'_> {
    fn delta(&self) -> f64 {
        self.dt
    }
}
