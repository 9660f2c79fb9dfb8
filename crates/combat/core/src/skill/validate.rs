use crate::entity::CombatEntity;
use crate::skill::{SkillInstance, SkillSchool, SkillTemplate, SkillUseError};
use crate::status::{ControlFlags, ControlKind};

/// Validation gate run before anything is spent.
///
/// Checks, in order: the caster is alive and in combat, not already
/// casting, not blocked by control, off cooldown, and can afford every cost.
pub fn can_use(
    caster: &CombatEntity,
    instance: &SkillInstance,
    template: &SkillTemplate,
) -> Result<(), SkillUseError> {
    if !caster.flags.alive || !caster.flags.in_combat {
        return Err(SkillUseError::InvalidCaster);
    }
    if caster.cast.is_some() {
        return Err(SkillUseError::AlreadyCasting);
    }
    if let Some(kind) = blocking_control(caster.effects.control_flags(), template.school) {
        return Err(SkillUseError::Controlled(kind));
    }
    if !instance.is_ready() {
        return Err(SkillUseError::OnCooldown {
            remaining: instance.cooldown_remaining,
        });
    }

    for (index, cost) in template.costs.iter().enumerate() {
        // repeated kinds are checked once, against their summed amount
        if template.costs[..index].iter().any(|c| c.kind == cost.kind) {
            continue;
        }
        let required = template.cost(cost.kind);
        let available = caster.attributes.peek(cost.kind);
        if available < required {
            return Err(SkillUseError::InsufficientResource {
                kind: cost.kind,
                required,
                available,
            });
        }
    }
    Ok(())
}

/// Control kind that prevents a skill of `school` from being used.
pub fn blocking_control(flags: ControlFlags, school: SkillSchool) -> Option<ControlKind> {
    if flags.has(ControlKind::Stun) {
        return Some(ControlKind::Stun);
    }
    match school {
        SkillSchool::Magical if flags.has(ControlKind::Silence) => Some(ControlKind::Silence),
        SkillSchool::Physical if flags.has(ControlKind::Disarm) => Some(ControlKind::Disarm),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_blocks_by_school() {
        let silenced = ControlFlags::from(ControlKind::Silence);
        assert_eq!(blocking_control(silenced, SkillSchool::Magical), Some(ControlKind::Silence));
        assert_eq!(blocking_control(silenced, SkillSchool::Physical), None);

        let disarmed = ControlFlags::from(ControlKind::Disarm);
        assert_eq!(blocking_control(disarmed, SkillSchool::Physical), Some(ControlKind::Disarm));

        let stunned = ControlFlags::from(ControlKind::Stun);
        assert_eq!(blocking_control(stunned, SkillSchool::Utility), Some(ControlKind::Stun));
    }
}
