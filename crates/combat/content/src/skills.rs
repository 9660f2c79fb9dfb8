//! Skill templates and the standard library built from them.

use combat_core::skill::{AreaOrigin, SkillCues, SkillTemplate, TargetMode};
use combat_core::{Affiliation, AttributeKind, DamageKind, SkillLibrary, SkillSchool};

use crate::effects;

pub const BASIC_ATTACK: &str = "basic_attack";
pub const FIREBALL: &str = "fireball";
pub const FLAME_NOVA: &str = "flame_nova";
pub const HEAL: &str = "heal";
pub const MEND: &str = "mend";
pub const POISON_STRIKE: &str = "poison_strike";
pub const STUN_BASH: &str = "stun_bash";
pub const WAR_CRY: &str = "war_cry";
pub const HEX: &str = "hex";

fn cues(animation: &str, impact_vfx: &str) -> SkillCues {
    SkillCues {
        cast_animation: Some(animation.to_owned()),
        cast_sfx: Some(format!("sfx/{animation}")),
        impact_vfx: Some(impact_vfx.to_owned()),
        impact_sfx: None,
    }
}

pub fn basic_attack() -> SkillTemplate {
    SkillTemplate::builder(BASIC_ATTACK, "Basic Attack")
        .cooldown(1.0)
        .range(2.0)
        .damage(DamageKind::Physical, 1.0)
        .cues(cues("swing", "vfx/hit_spark"))
        .build()
}

pub fn fireball() -> SkillTemplate {
    SkillTemplate::builder(FIREBALL, "Fireball")
        .school(SkillSchool::Magical)
        .cost(AttributeKind::Mana, 30.0)
        .cooldown(4.0)
        .cast_time(1.0)
        .range(8.0)
        .damage(DamageKind::Magical, 1.5)
        .apply_status(effects::burn(), 0.5)
        .cues(cues("cast_fire", "vfx/explosion"))
        .build()
}

/// Burst around the caster; targets past the nearest one take reduced
/// damage and are stunned less often.
pub fn flame_nova() -> SkillTemplate {
    SkillTemplate::builder(FLAME_NOVA, "Flame Nova")
        .school(SkillSchool::Magical)
        .cost(AttributeKind::Mana, 40.0)
        .cooldown(8.0)
        .target(TargetMode::Area {
            origin: AreaOrigin::Caster,
            affects: Affiliation::Enemy,
        })
        .effect_range(3.0)
        .falloff(0.6, 0.5)
        .damage(DamageKind::Magical, 1.0)
        .apply_status(effects::stun(1.0), 0.5)
        .cues(cues("cast_nova", "vfx/ring_of_fire"))
        .build()
}

pub fn heal() -> SkillTemplate {
    SkillTemplate::builder(HEAL, "Heal")
        .school(SkillSchool::Magical)
        .cost(AttributeKind::Mana, 20.0)
        .cooldown(3.0)
        .cast_time(0.5)
        .target(TargetMode::SingleTarget(Affiliation::Ally))
        .range(6.0)
        .heal(1.2)
        .build()
}

/// Self heal with a lingering regeneration.
pub fn mend() -> SkillTemplate {
    SkillTemplate::builder(MEND, "Mend")
        .school(SkillSchool::Magical)
        .cost(AttributeKind::Mana, 15.0)
        .cooldown(6.0)
        .target(TargetMode::SelfOnly)
        .heal(0.8)
        .apply_status(effects::regeneration(), 1.0)
        .build()
}

pub fn poison_strike() -> SkillTemplate {
    SkillTemplate::builder(POISON_STRIKE, "Poison Strike")
        .cost(AttributeKind::Stamina, 10.0)
        .cooldown(3.0)
        .range(2.0)
        .damage(DamageKind::Physical, 0.8)
        .apply_status(effects::poison(), 1.0)
        .build()
}

pub fn stun_bash() -> SkillTemplate {
    SkillTemplate::builder(STUN_BASH, "Stun Bash")
        .cost(AttributeKind::Stamina, 15.0)
        .cooldown(6.0)
        .range(2.0)
        .damage(DamageKind::Physical, 0.6)
        .apply_status(effects::stun(1.5), 0.75)
        .cues(cues("bash", "vfx/stars"))
        .build()
}

pub fn war_cry() -> SkillTemplate {
    SkillTemplate::builder(WAR_CRY, "War Cry")
        .school(SkillSchool::Utility)
        .cost(AttributeKind::Stamina, 20.0)
        .cooldown(15.0)
        .target(TargetMode::AllAllies)
        .apply_status(effects::war_cry(), 1.0)
        .build()
}

/// Silences the target and slows it down.
pub fn hex() -> SkillTemplate {
    SkillTemplate::builder(HEX, "Hex")
        .school(SkillSchool::Magical)
        .cost(AttributeKind::Mana, 25.0)
        .cooldown(10.0)
        .range(6.0)
        .apply_status(effects::silence(2.0), 1.0)
        .apply_status(effects::slow(), 1.0)
        .build()
}

/// Every stock skill.
pub fn standard_library() -> SkillLibrary {
    [
        basic_attack(),
        fireball(),
        flame_nova(),
        heal(),
        mend(),
        poison_strike(),
        stun_bash(),
        war_cry(),
        hex(),
    ]
    .into_iter()
    .collect()
}
