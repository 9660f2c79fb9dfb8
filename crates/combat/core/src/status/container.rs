use behavior_tree::TIME_EPSILON;

use crate::attributes::{AttributeSet, Modifier};
use crate::combat::{apply_damage, apply_heal};
use crate::config::CombatConfig;
use crate::status::effect::{AppliedModifier, EffectCategory, EffectPhase, Polarity, StackPolicy};
use crate::status::{ControlFlags, StatusEffect};
use crate::types::{EffectId, EntityId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplyOptions {
    /// A `Stack` effect already at `max_stacks` gets a second, independent
    /// instance instead of being discarded.
    pub allow_independent_instances: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplyOutcome {
    Applied,
    Stacked { stacks: u32 },
    Refreshed,
    Replaced,
    Discarded,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectEventKind {
    Applied,
    Stacked { stacks: u32 },
    Refreshed { remaining: f64 },
    Replaced,
    Discarded,
    /// One periodic unit landed. `killed` is set when a damage tick took the
    /// owner to zero health.
    Ticked { amount: f64, killed: bool },
    Expired,
    Removed,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectEvent {
    pub target: EntityId,
    pub effect_id: EffectId,
    pub source: Option<EntityId>,
    pub kind: EffectEventKind,
}

/// Result of [`StatusEffects::apply`].
#[derive(Clone, Debug, PartialEq)]
pub struct ApplyReport {
    pub outcome: ApplyOutcome,
    pub events: Vec<EffectEvent>,
}

impl ApplyReport {
    pub fn killed(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e.kind, EffectEventKind::Ticked { killed: true, .. }))
    }
}

/// Insertion-ordered set of effects on one entity.
///
/// Every modifier an effect installs is recorded in its ledger; removal and
/// expiry take exactly those modifiers back out of the owner's attributes.
#[derive(Clone, Debug, Default)]
pub struct StatusEffects {
    owner: EntityId,
    effects: Vec<StatusEffect>,
    next_instance: u32,
}

impl StatusEffects {
    pub fn new(owner: EntityId) -> Self {
        Self {
            owner,
            effects: Vec::new(),
            next_instance: 0,
        }
    }

    pub(crate) fn set_owner(&mut self, owner: EntityId) {
        self.owner = owner;
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn has(&self, id: &EffectId) -> bool {
        self.effects.iter().any(|e| &e.effect_id == id)
    }

    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.effects.iter().any(|e| e.effect_id.matches_prefix(prefix))
    }

    /// First (oldest) instance with this id.
    pub fn get(&self, id: &EffectId) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| &e.effect_id == id)
    }

    pub fn count(&self, id: &EffectId) -> usize {
        self.effects.iter().filter(|e| &e.effect_id == id).count()
    }

    pub fn control_flags(&self) -> ControlFlags {
        self.effects
            .iter()
            .filter_map(|e| e.category.control())
            .fold(ControlFlags::empty(), |flags, kind| flags | kind.into())
    }

    pub fn apply(
        &mut self,
        effect: StatusEffect,
        attrs: &mut AttributeSet,
        options: ApplyOptions,
        config: &CombatConfig,
    ) -> ApplyReport {
        let mut events = Vec::new();

        let Some(index) = self.find_target_instance(&effect) else {
            self.insert(effect, attrs, config, &mut events);
            return self.report(ApplyOutcome::Applied, events);
        };

        let outcome = match self.effects[index].stack_policy {
            StackPolicy::None | StackPolicy::TakeMostRecent => {
                self.replace(index, effect, attrs, config, &mut events);
                ApplyOutcome::Replaced
            }
            StackPolicy::Stack => {
                let existing = &mut self.effects[index];
                if existing.stacks < existing.max_stacks {
                    let stacks = add_stack(existing, &effect, attrs);
                    events.push(event(self.owner, existing, EffectEventKind::Stacked { stacks }));
                    ApplyOutcome::Stacked { stacks }
                } else if options.allow_independent_instances {
                    self.insert(effect, attrs, config, &mut events);
                    ApplyOutcome::Applied
                } else {
                    events.push(event(self.owner, &effect, EffectEventKind::Discarded));
                    ApplyOutcome::Discarded
                }
            }
            StackPolicy::Refresh => {
                let existing = &mut self.effects[index];
                existing.remaining = existing.remaining.max(effect.duration.seconds());
                let remaining = existing.remaining;
                events.push(event(self.owner, existing, EffectEventKind::Refreshed { remaining }));
                ApplyOutcome::Refreshed
            }
            StackPolicy::TakeStrongest => {
                if effect.magnitude > self.effects[index].magnitude {
                    self.replace(index, effect, attrs, config, &mut events);
                    ApplyOutcome::Replaced
                } else {
                    events.push(event(self.owner, &effect, EffectEventKind::Discarded));
                    ApplyOutcome::Discarded
                }
            }
        };

        self.report(outcome, events)
    }

    /// Advances every effect by `dt`: periodic ticks first, then expiry.
    pub fn tick(&mut self, dt: f64, attrs: &mut AttributeSet, config: &CombatConfig) -> Vec<EffectEvent> {
        let mut events = Vec::new();

        for effect in self.effects.iter_mut() {
            if !effect.duration.is_infinite() {
                effect.remaining -= dt;
            }
            if let Some(interval) = effect.category.interval() {
                effect.next_tick_in -= dt;
                let finite = !effect.duration.is_infinite();
                // Both offsets are relative to now; ticks due after the end
                // of the effect never land.
                while effect.next_tick_in <= TIME_EPSILON
                    && (!finite || effect.next_tick_in <= effect.remaining + TIME_EPSILON)
                {
                    effect.phase = EffectPhase::Ticking;
                    let kind = periodic_tick(effect, attrs, config);
                    events.push(event(self.owner, effect, kind));
                    effect.phase = EffectPhase::Active;
                    if interval <= TIME_EPSILON {
                        effect.next_tick_in = 0.0;
                        break;
                    }
                    effect.next_tick_in += interval;
                }
            }
        }

        let mut index = 0;
        while index < self.effects.len() {
            if self.effects[index].is_expired() {
                let mut effect = self.effects.remove(index);
                effect.phase = EffectPhase::Expiring;
                rollback(&mut effect, attrs);
                events.push(event(self.owner, &effect, EffectEventKind::Expired));
            } else {
                index += 1;
            }
        }

        log_events(&events);
        events
    }

    /// Removes every instance of `id`. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: &EffectId, attrs: &mut AttributeSet) -> bool {
        self.remove_where(|e| &e.effect_id == id, attrs) > 0
    }

    pub fn clear(&mut self, attrs: &mut AttributeSet) -> usize {
        self.remove_where(|_| true, attrs)
    }

    /// Dispel: removes every effect with the given polarity.
    pub fn clear_by_polarity(&mut self, polarity: Polarity, attrs: &mut AttributeSet) -> usize {
        self.remove_where(|e| e.polarity == polarity, attrs)
    }

    fn remove_where(
        &mut self,
        mut predicate: impl FnMut(&StatusEffect) -> bool,
        attrs: &mut AttributeSet,
    ) -> usize {
        let mut events = Vec::new();
        let mut index = 0;
        while index < self.effects.len() {
            if predicate(&self.effects[index]) {
                let mut effect = self.effects.remove(index);
                rollback(&mut effect, attrs);
                events.push(event(self.owner, &effect, EffectEventKind::Removed));
            } else {
                index += 1;
            }
        }
        log_events(&events);
        events.len()
    }

    /// Instance a new application interacts with: the oldest one with room
    /// for another stack, else the oldest one.
    fn find_target_instance(&self, effect: &StatusEffect) -> Option<usize> {
        let mut first = None;
        for (index, existing) in self.effects.iter().enumerate() {
            if existing.effect_id != effect.effect_id {
                continue;
            }
            if existing.stack_policy != StackPolicy::Stack || existing.stacks < existing.max_stacks {
                return Some(index);
            }
            first.get_or_insert(index);
        }
        first
    }

    fn insert(
        &mut self,
        mut effect: StatusEffect,
        attrs: &mut AttributeSet,
        config: &CombatConfig,
        events: &mut Vec<EffectEvent>,
    ) {
        effect.instance = self.next_instance;
        self.next_instance += 1;
        self.on_apply(&mut effect, attrs, config, events);
        self.effects.push(effect);
    }

    fn replace(
        &mut self,
        index: usize,
        mut effect: StatusEffect,
        attrs: &mut AttributeSet,
        config: &CombatConfig,
        events: &mut Vec<EffectEvent>,
    ) {
        rollback(&mut self.effects[index], attrs);
        events.push(event(self.owner, &self.effects[index], EffectEventKind::Replaced));

        effect.instance = self.next_instance;
        self.next_instance += 1;
        self.on_apply(&mut effect, attrs, config, events);
        self.effects[index] = effect;
    }

    fn on_apply(
        &self,
        effect: &mut StatusEffect,
        attrs: &mut AttributeSet,
        config: &CombatConfig,
        events: &mut Vec<EffectEvent>,
    ) {
        effect.stacks = 1;
        effect.rederive_magnitude();
        effect.remaining = effect.duration.seconds();
        effect.next_tick_in = effect.category.interval().unwrap_or(0.0);
        effect.applied.clear();

        let source = effect.modifier_source();
        for (index, template) in effect.modifiers.iter().enumerate() {
            let id = effect.modifier_id(index);
            attrs.add_modifier(Modifier::new(
                id.clone(),
                source.as_str(),
                template.attribute,
                template.kind,
                template.value,
            ));
            effect.applied.push(AppliedModifier {
                id,
                attribute: template.attribute,
                kind: template.kind,
                total: template.value,
            });
        }
        effect.phase = EffectPhase::Active;
        events.push(event(self.owner, effect, EffectEventKind::Applied));

        if effect.tick_on_apply && effect.is_periodic() {
            let kind = periodic_tick(effect, attrs, config);
            events.push(event(self.owner, effect, kind));
        }
    }

    fn report(&self, outcome: ApplyOutcome, events: Vec<EffectEvent>) -> ApplyReport {
        log_events(&events);
        ApplyReport { outcome, events }
    }
}

/// Adds one stack to `existing` from a fresh application of `incoming`.
fn add_stack(existing: &mut StatusEffect, incoming: &StatusEffect, attrs: &mut AttributeSet) -> u32 {
    existing.stacks += 1;
    debug_assert!(
        existing.stacks >= 1 && existing.stacks <= existing.max_stacks,
        "stack count {} outside [1, {}]",
        existing.stacks,
        existing.max_stacks
    );
    existing.rederive_magnitude();
    existing.remaining = existing.remaining.max(incoming.duration.seconds());

    let source = existing.modifier_source();
    for (ledger, template) in existing.applied.iter_mut().zip(existing.modifiers.iter()) {
        ledger.accumulate(template.value);
        attrs.add_modifier(Modifier::new(
            ledger.id.clone(),
            source.as_str(),
            ledger.attribute,
            ledger.kind,
            ledger.total,
        ));
    }
    existing.stacks
}

fn rollback(effect: &mut StatusEffect, attrs: &mut AttributeSet) {
    for applied in effect.applied.drain(..) {
        attrs.remove_modifier(&applied.id, applied.attribute);
    }
    effect.phase = EffectPhase::Removed;
}

fn periodic_tick(effect: &StatusEffect, attrs: &mut AttributeSet, config: &CombatConfig) -> EffectEventKind {
    let amount = effect.tick_amount();
    match effect.category {
        EffectCategory::DamageOverTime { damage_kind, .. } => {
            let hit = apply_damage(attrs, amount, damage_kind, false, config);
            EffectEventKind::Ticked {
                amount: hit.absorbed + hit.health_damage,
                killed: hit.killed,
            }
        }
        EffectCategory::HealOverTime { .. } => EffectEventKind::Ticked {
            amount: apply_heal(attrs, amount),
            killed: false,
        },
        _ => EffectEventKind::Ticked {
            amount: 0.0,
            killed: false,
        },
    }
}

fn event(target: EntityId, effect: &StatusEffect, kind: EffectEventKind) -> EffectEvent {
    EffectEvent {
        target,
        effect_id: effect.effect_id.clone(),
        source: effect.source,
        kind,
    }
}

fn log_events(events: &[EffectEvent]) {
    for e in events {
        tracing::debug!(target = %e.target, effect = %e.effect_id, kind = ?e.kind, "status effect");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeKind;
    use crate::combat::DamageKind;
    use crate::status::{ControlKind, ModifierTemplate};

    fn fixture() -> (StatusEffects, AttributeSet, CombatConfig) {
        let mut attrs = AttributeSet::new(EntityId(1));
        attrs.set_base(AttributeKind::Health, 100.0);
        attrs.set_base(AttributeKind::MaxHealth, 100.0);
        attrs.set_base(AttributeKind::Attack, 10.0);
        (StatusEffects::new(EntityId(1)), attrs, CombatConfig::default())
    }

    fn rage(max_stacks: u32) -> StatusEffect {
        StatusEffect::new("rage", "Rage", EffectCategory::AttributeModifier)
            .with_polarity(Polarity::Positive)
            .with_duration(5.0)
            .with_stacking(StackPolicy::Stack, max_stacks)
            .with_magnitude(1.0)
            .with_bonus_per_extra_stack(0.5)
            .with_modifier(ModifierTemplate::flat(AttributeKind::Attack, 2.0))
    }

    #[test]
    fn stack_caps_at_max() {
        let (mut effects, mut attrs, config) = fixture();
        for _ in 0..5 {
            effects.apply(rage(3), &mut attrs, ApplyOptions::default(), &config);
        }

        let effect = effects.get(&"rage".into()).unwrap();
        assert_eq!(effect.stacks, 3);
        assert_eq!(effect.magnitude, 2.0);
        assert_eq!(effects.len(), 1);
        assert_eq!(attrs.get_value(AttributeKind::Attack), 16.0);
    }

    #[test]
    fn stack_at_max_can_spawn_independent_instance() {
        let (mut effects, mut attrs, config) = fixture();
        let options = ApplyOptions {
            allow_independent_instances: true,
        };
        effects.apply(rage(1), &mut attrs, options, &config);
        let report = effects.apply(rage(1), &mut attrs, options, &config);

        assert_eq!(report.outcome, ApplyOutcome::Applied);
        assert_eq!(effects.count(&"rage".into()), 2);
        assert_eq!(attrs.get_value(AttributeKind::Attack), 14.0);

        assert!(effects.remove(&"rage".into(), &mut attrs));
        assert_eq!(attrs.get_value(AttributeKind::Attack), 10.0);
    }

    #[test]
    fn take_strongest_keeps_larger_magnitude() {
        let (mut effects, mut attrs, config) = fixture();
        let weak = StatusEffect::new("armor", "Armor", EffectCategory::AttributeModifier)
            .with_duration(10.0)
            .with_stacking(StackPolicy::TakeStrongest, 1)
            .with_magnitude(5.0);
        let strong = weak.clone().with_magnitude(9.0);

        effects.apply(weak.clone(), &mut attrs, ApplyOptions::default(), &config);
        let replaced = effects.apply(strong, &mut attrs, ApplyOptions::default(), &config);
        let discarded = effects.apply(weak, &mut attrs, ApplyOptions::default(), &config);

        assert_eq!(replaced.outcome, ApplyOutcome::Replaced);
        assert_eq!(discarded.outcome, ApplyOutcome::Discarded);
        assert_eq!(effects.get(&"armor".into()).unwrap().magnitude, 9.0);
    }

    #[test]
    fn take_strongest_tie_keeps_existing() {
        let (mut effects, mut attrs, config) = fixture();
        let first = StatusEffect::new("armor", "Armor", EffectCategory::AttributeModifier)
            .with_duration(10.0)
            .with_stacking(StackPolicy::TakeStrongest, 1)
            .with_magnitude(5.0)
            .with_source(EntityId(7));
        let second = first.clone().with_source(EntityId(8));

        effects.apply(first, &mut attrs, ApplyOptions::default(), &config);
        let report = effects.apply(second, &mut attrs, ApplyOptions::default(), &config);

        assert_eq!(report.outcome, ApplyOutcome::Discarded);
        assert_eq!(effects.get(&"armor".into()).unwrap().source, Some(EntityId(7)));
    }

    #[test]
    fn refresh_extends_to_longer_duration() {
        let (mut effects, mut attrs, config) = fixture();
        let slow = StatusEffect::new("slow", "Slow", EffectCategory::AttributeModifier)
            .with_duration(4.0)
            .with_stacking(StackPolicy::Refresh, 1);

        effects.apply(slow.clone(), &mut attrs, ApplyOptions::default(), &config);
        effects.tick(3.0, &mut attrs, &config);
        effects.apply(slow.clone().with_duration(2.0), &mut attrs, ApplyOptions::default(), &config);
        assert_eq!(effects.get(&"slow".into()).unwrap().remaining, 2.0);

        effects.apply(slow, &mut attrs, ApplyOptions::default(), &config);
        assert_eq!(effects.get(&"slow".into()).unwrap().remaining, 4.0);
    }

    #[test]
    fn dot_ticks_on_interval_and_expires() {
        let (mut effects, mut attrs, config) = fixture();
        let poison = StatusEffect::new(
            "poison.weak",
            "Weak Poison",
            EffectCategory::DamageOverTime {
                interval: 2.0,
                damage_kind: DamageKind::True,
            },
        )
        .with_duration(6.0)
        .with_magnitude(5.0)
        .with_modifier(ModifierTemplate::flat(AttributeKind::Defense, -3.0));

        effects.apply(poison, &mut attrs, ApplyOptions::default(), &config);
        assert_eq!(attrs.get_value(AttributeKind::Defense), -3.0);

        let mut ticks = Vec::new();
        for second in 1..=8 {
            for e in effects.tick(1.0, &mut attrs, &config) {
                if matches!(e.kind, EffectEventKind::Ticked { .. }) {
                    ticks.push(second);
                }
            }
        }

        assert_eq!(ticks, vec![2, 4, 6]);
        assert!(effects.is_empty());
        assert_eq!(attrs.get_value(AttributeKind::Health), 85.0);
        assert_eq!(attrs.get_value(AttributeKind::Defense), 0.0);
        assert_eq!(attrs.modifier_count(), 0);
    }

    #[test]
    fn single_long_step_stops_ticking_at_expiry() {
        let (mut effects, mut attrs, config) = fixture();
        let poison = StatusEffect::new(
            "poison.weak",
            "Weak Poison",
            EffectCategory::DamageOverTime {
                interval: 2.0,
                damage_kind: DamageKind::True,
            },
        )
        .with_duration(6.0)
        .with_magnitude(5.0);
        effects.apply(poison, &mut attrs, ApplyOptions::default(), &config);

        let events = effects.tick(10.0, &mut attrs, &config);
        let ticks = events
            .iter()
            .filter(|e| matches!(e.kind, EffectEventKind::Ticked { .. }))
            .count();

        assert_eq!(ticks, 3);
        assert!(matches!(events.last().map(|e| e.kind), Some(EffectEventKind::Expired)));
        assert!(effects.is_empty());
        assert_eq!(attrs.get_value(AttributeKind::Health), 85.0);
    }

    #[test]
    fn tick_on_apply_fires_immediately() {
        let (mut effects, mut attrs, config) = fixture();
        attrs.set_base(AttributeKind::Health, 50.0);
        let regen = StatusEffect::new("regen", "Regen", EffectCategory::HealOverTime { interval: 1.0 })
            .with_duration(3.0)
            .with_magnitude(10.0)
            .with_tick_on_apply();

        let report = effects.apply(regen, &mut attrs, ApplyOptions::default(), &config);
        assert_eq!(report.events.len(), 2);
        assert_eq!(attrs.get_value(AttributeKind::Health), 60.0);
    }

    #[test]
    fn remove_is_idempotent() {
        let (mut effects, mut attrs, config) = fixture();
        effects.apply(rage(3), &mut attrs, ApplyOptions::default(), &config);

        assert!(effects.remove(&"rage".into(), &mut attrs));
        assert!(!effects.remove(&"rage".into(), &mut attrs));
        assert_eq!(attrs.get_value(AttributeKind::Attack), 10.0);
    }

    #[test]
    fn dispel_by_polarity_and_control_flags() {
        let (mut effects, mut attrs, config) = fixture();
        let stun = StatusEffect::new("stun", "Stun", EffectCategory::Control(ControlKind::Stun))
            .with_duration(1.0);
        effects.apply(stun, &mut attrs, ApplyOptions::default(), &config);
        effects.apply(rage(3), &mut attrs, ApplyOptions::default(), &config);

        assert!(effects.control_flags().has(ControlKind::Stun));
        assert_eq!(effects.clear_by_polarity(Polarity::Negative, &mut attrs), 1);
        assert!(effects.control_flags().is_empty());
        assert!(effects.has(&"rage".into()));
        assert!(effects.has_prefix("ra"));
    }
}
