//! Entity archetypes: starting attributes, bound skills and default AI.

use combat_core::{AttributeKind, CombatEntity, EntityId, Faction, Position};

use crate::behaviors::BehaviorKind;
use crate::skills;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Archetype {
    Warrior,
    Mage,
    Cleric,
    Rogue,
    Goblin,
    GoblinShaman,
    Orc,
}

/// Starting values; resources start full.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArchetypeStats {
    pub health: f64,
    pub mana: f64,
    pub stamina: f64,
    pub attack: f64,
    pub magic_attack: f64,
    pub defense: f64,
    pub magic_defense: f64,
    pub crit_chance: f64,
    pub move_speed: f64,
    /// Experience and gold carried, paid out to whoever defeats it.
    pub bounty: (f64, f64),
}

impl Archetype {
    pub fn stats(self) -> ArchetypeStats {
        let base = ArchetypeStats {
            health: 100.0,
            mana: 0.0,
            stamina: 50.0,
            attack: 10.0,
            magic_attack: 0.0,
            defense: 10.0,
            magic_defense: 10.0,
            crit_chance: 0.05,
            move_speed: 3.0,
            bounty: (0.0, 0.0),
        };
        match self {
            Self::Warrior => ArchetypeStats {
                health: 160.0,
                stamina: 80.0,
                attack: 18.0,
                defense: 25.0,
                ..base
            },
            Self::Mage => ArchetypeStats {
                health: 90.0,
                mana: 150.0,
                magic_attack: 30.0,
                magic_defense: 20.0,
                ..base
            },
            Self::Cleric => ArchetypeStats {
                health: 110.0,
                mana: 120.0,
                magic_attack: 20.0,
                defense: 15.0,
                magic_defense: 25.0,
                ..base
            },
            Self::Rogue => ArchetypeStats {
                health: 100.0,
                stamina: 90.0,
                attack: 16.0,
                crit_chance: 0.25,
                move_speed: 4.0,
                ..base
            },
            Self::Goblin => ArchetypeStats {
                health: 60.0,
                attack: 8.0,
                defense: 5.0,
                move_speed: 3.5,
                bounty: (20.0, 5.0),
                ..base
            },
            Self::GoblinShaman => ArchetypeStats {
                health: 55.0,
                mana: 90.0,
                magic_attack: 14.0,
                defense: 5.0,
                bounty: (30.0, 8.0),
                ..base
            },
            Self::Orc => ArchetypeStats {
                health: 180.0,
                stamina: 60.0,
                attack: 16.0,
                defense: 20.0,
                magic_defense: 5.0,
                move_speed: 2.5,
                bounty: (60.0, 20.0),
                ..base
            },
        }
    }

    /// Skills bound at level 1.
    pub fn skills(self) -> &'static [&'static str] {
        match self {
            Self::Warrior => &[skills::BASIC_ATTACK, skills::STUN_BASH, skills::WAR_CRY],
            Self::Mage => &[skills::BASIC_ATTACK, skills::FIREBALL, skills::FLAME_NOVA],
            Self::Cleric => &[skills::BASIC_ATTACK, skills::HEAL, skills::MEND, skills::HEX],
            Self::Rogue => &[skills::BASIC_ATTACK, skills::POISON_STRIKE],
            Self::Goblin => &[skills::BASIC_ATTACK, skills::POISON_STRIKE],
            Self::GoblinShaman => &[skills::BASIC_ATTACK, skills::FIREBALL, skills::MEND, skills::HEX],
            Self::Orc => &[skills::BASIC_ATTACK, skills::STUN_BASH],
        }
    }

    pub fn behavior(self) -> BehaviorKind {
        match self {
            Self::Warrior | Self::Orc => BehaviorKind::MeleeBrute,
            Self::Mage => BehaviorKind::Caster,
            Self::Cleric | Self::GoblinShaman => BehaviorKind::Healer,
            Self::Rogue | Self::Goblin => BehaviorKind::Skirmisher,
        }
    }

    /// A manually driven entity. The id is a placeholder until the registry
    /// assigns one.
    pub fn build(self, name: impl Into<String>, faction: Faction, position: Position) -> CombatEntity {
        let stats = self.stats();
        let (experience, gold) = stats.bounty;
        let mut entity = CombatEntity::new(EntityId(0), name, faction)
            .with_position(position)
            .with_resource(AttributeKind::Health, stats.health)
            .with_resource(AttributeKind::Mana, stats.mana)
            .with_resource(AttributeKind::Stamina, stats.stamina)
            .with_attribute(AttributeKind::Attack, stats.attack)
            .with_attribute(AttributeKind::MagicAttack, stats.magic_attack)
            .with_attribute(AttributeKind::Defense, stats.defense)
            .with_attribute(AttributeKind::MagicDefense, stats.magic_defense)
            .with_attribute(AttributeKind::CritChance, stats.crit_chance)
            .with_attribute(AttributeKind::MoveSpeed, stats.move_speed)
            .with_attribute(AttributeKind::Level, 1.0)
            .with_attribute(AttributeKind::Experience, experience)
            .with_attribute(AttributeKind::Gold, gold);
        for skill in self.skills() {
            entity = entity.with_skill(*skill, 1);
        }
        entity
    }

    /// Same as [`build`](Self::build) with the archetype's default AI.
    pub fn build_ai(self, name: impl Into<String>, faction: Faction, position: Position) -> CombatEntity {
        self.build(name, faction, position)
            .with_behavior(self.behavior().tree())
    }
}
