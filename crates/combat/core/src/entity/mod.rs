//! Combat entities and the registry that owns them.

mod registry;

pub use registry::{EntityRegistry, EntityStore};

use std::collections::BTreeMap;

use behavior_tree::BehaviorTree;

use crate::ai::AiNode;
use crate::attributes::{AttributeKind, AttributeSet};
use crate::skill::{ActiveCast, SkillInstance};
use crate::status::StatusEffects;
use crate::types::{CombatId, EntityId, Faction, Position, SkillId};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatFlags {
    pub alive: bool,
    pub in_combat: bool,
    pub current_combat_id: Option<CombatId>,
    /// Skill currently being cast.
    pub acting_skill_id: Option<SkillId>,
}

impl Default for CombatFlags {
    fn default() -> Self {
        Self {
            alive: true,
            in_combat: false,
            current_combat_id: None,
            acting_skill_id: None,
        }
    }
}

/// Everything the combat core knows about one participant.
///
/// Entities without a behavior tree are driven manually through
/// `use_skill`.
#[derive(Clone, Debug)]
pub struct CombatEntity {
    pub id: EntityId,
    pub name: String,
    pub faction: Faction,
    pub position: Position,
    pub attributes: AttributeSet,
    pub effects: StatusEffects,
    pub skills: BTreeMap<SkillId, SkillInstance>,
    pub behavior: Option<BehaviorTree<AiNode>>,
    pub ai_target: Option<EntityId>,
    pub cast: Option<ActiveCast>,
    pub flags: CombatFlags,
}

impl CombatEntity {
    pub fn new(id: EntityId, name: impl Into<String>, faction: Faction) -> Self {
        Self {
            id,
            name: name.into(),
            faction,
            position: Position::ORIGIN,
            attributes: AttributeSet::new(id),
            effects: StatusEffects::new(id),
            skills: BTreeMap::new(),
            behavior: None,
            ai_target: None,
            cast: None,
            flags: CombatFlags::default(),
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_attribute(mut self, kind: AttributeKind, value: f64) -> Self {
        self.attributes.set_base(kind, value);
        self
    }

    /// Sets a depletable resource and its cap to the same value.
    pub fn with_resource(mut self, kind: AttributeKind, value: f64) -> Self {
        self.attributes.set_base(kind, value);
        if let Some(maximum) = kind.maximum() {
            self.attributes.set_base(maximum, value);
        }
        self
    }

    pub fn with_skill(mut self, skill: impl Into<SkillId>, level: u32) -> Self {
        let instance = SkillInstance::new(skill, level);
        self.skills.insert(instance.skill_id.clone(), instance);
        self
    }

    pub fn with_behavior(mut self, tree: BehaviorTree<AiNode>) -> Self {
        self.behavior = Some(tree);
        self
    }

    /// Moves the entity to a new id, keeping owned state consistent.
    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.id = id;
        self.attributes.set_owner(id);
        self.effects.set_owner(id);
    }

    pub fn is_alive(&self) -> bool {
        self.flags.alive
    }

    pub fn is_ai_controlled(&self) -> bool {
        self.behavior.is_some()
    }

    pub fn is_casting(&self) -> bool {
        self.cast.is_some()
    }

    pub fn skill(&self, id: &SkillId) -> Option<&SkillInstance> {
        self.skills.get(id)
    }

    pub fn skill_mut(&mut self, id: &SkillId) -> Option<&mut SkillInstance> {
        self.skills.get_mut(id)
    }

    pub fn health(&self) -> f64 {
        self.attributes.peek(AttributeKind::Health)
    }

    pub fn level(&self) -> u32 {
        self.attributes.peek(AttributeKind::Level).max(1.0) as u32
    }

    /// True once health has dropped to zero; the death itself is processed
    /// by the world.
    pub fn is_depleted(&self) -> bool {
        self.health() <= 0.0
    }
}
