use behavior_tree::Status;

use crate::ai::AiContext;
use crate::types::EntityId;
use crate::world::{CombatEvent, CombatWorld};

impl CombatWorld {
    /// Per-tick maintenance for every living participant, in roster order:
    /// expire timed modifiers, tick status effects, count down cooldowns,
    /// then advance casts. With `run_ai` set, AI-controlled participants
    /// tick their behavior trees last.
    pub fn upkeep(&mut self, dt: f64, run_ai: bool) {
        let now = self.clock();

        for id in self.living_participants() {
            let Some(entity) = self.registry.get_mut(id) else {
                continue;
            };
            entity.attributes.tick(now);
            let events = entity.effects.tick(dt, &mut entity.attributes, &self.config);
            for instance in entity.skills.values_mut() {
                instance.tick_cooldown(dt);
            }
            let depleted = entity.is_depleted();

            self.record_effect_events(&events);
            if depleted {
                let killer = events.iter().rev().find_map(|e| e.source);
                self.process_death(id, killer);
            }
        }

        self.advance_casts(dt);

        if run_ai {
            for id in self.living_participants() {
                self.tick_ai(id, dt);
            }
        }
    }

    /// Ticks one entity's behavior tree. Entities without a tree, or that
    /// are dead, are skipped and report `None`.
    ///
    /// A cast the tree started but no longer waits on (its `UseSkill` leaf
    /// was reset by a finishing parent) is cancelled and its costs refunded.
    /// Casts begun outside the tree are left alone.
    pub fn tick_ai(&mut self, id: EntityId, dt: f64) -> Option<Status> {
        let entity = self.registry.get_mut(id).filter(|e| e.is_alive())?;
        // The tree leaves the entity for the duration of the tick so its
        // leaves can borrow the whole world.
        let mut tree = entity.behavior.take()?;
        let foreign_cast = entity
            .cast
            .as_ref()
            .map(|cast| cast.commitment.skill.clone())
            .filter(|skill| !tree.any_leaf(|leaf| leaf.tracks_cast(skill)));

        let status = {
            let mut ctx = AiContext {
                entity: id,
                world: self,
                dt,
            };
            tree.tick(&mut ctx)
        };

        let mut abandoned = false;
        match self.registry.get_mut(id) {
            Some(entity) => {
                if entity.is_alive() {
                    abandoned = entity.cast.as_ref().is_some_and(|cast| {
                        let skill = &cast.commitment.skill;
                        foreign_cast.as_ref() != Some(skill)
                            && !tree.any_leaf(|leaf| leaf.tracks_cast(skill))
                    });
                } else {
                    tree.reset::<AiContext<'_>>();
                }
                entity.behavior = Some(tree);
            }
            None => tracing::warn!(entity = %id, "entity vanished during its AI tick"),
        }

        if abandoned {
            tracing::debug!(entity = %id, "ai abandoned its cast");
            self.cancel_cast(id);
        }

        tracing::trace!(entity = %id, ?status, "ai ticked");
        self.record(CombatEvent::AiTicked { entity: id, status });
        Some(status)
    }
}
