use crate::types::{SkillId, Tick};

/// One owner's binding of a skill template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillInstance {
    pub skill_id: SkillId,
    pub level: u32,
    /// Seconds until the skill may be used again.
    pub cooldown_remaining: f64,
    pub last_used_tick: Option<Tick>,
    pub last_resolved_tick: Option<Tick>,
}

impl SkillInstance {
    pub fn new(skill_id: impl Into<SkillId>, level: u32) -> Self {
        Self {
            skill_id: skill_id.into(),
            level: level.max(1),
            cooldown_remaining: 0.0,
            last_used_tick: None,
            last_resolved_tick: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining <= behavior_tree::TIME_EPSILON
    }

    pub fn start_cooldown(&mut self, seconds: f64) {
        self.cooldown_remaining = seconds.max(0.0);
    }

    pub fn clear_cooldown(&mut self) {
        self.cooldown_remaining = 0.0;
    }

    pub fn tick_cooldown(&mut self, dt: f64) {
        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
        }
    }

    /// Whether the skill resolved at or after `since`.
    pub fn resolved_since(&self, since: Tick) -> bool {
        self.last_resolved_tick.is_some_and(|tick| tick >= since)
    }
}
