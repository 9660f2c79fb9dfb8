use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::attributes::modifier::ModifierTotals;
use crate::attributes::{AttributeChange, AttributeKind, AttributeObserver, Modifier};
use crate::config::ClampPolicy;
use crate::types::{EntityId, ModifierId, ModifierSource, Tick};

/// Per-entity value store: base values, ordered modifiers, cached results.
///
/// `cached[k]` is only trusted when `k` is not dirty. Every mutation of a
/// base value or a modifier marks its kind dirty, and the next
/// [`get_value`](Self::get_value) recomputes it. With at least one observer
/// attached, mutations refresh eagerly so observers hear about the change
/// before the mutating call returns.
#[derive(Clone)]
pub struct AttributeSet {
    owner: EntityId,
    base: BTreeMap<AttributeKind, f64>,
    modifiers: BTreeMap<AttributeKind, Vec<Modifier>>,
    cached: BTreeMap<AttributeKind, f64>,
    dirty: BTreeSet<AttributeKind>,
    clamp: ClampPolicy,
    observers: Vec<Arc<dyn AttributeObserver>>,
}

impl AttributeSet {
    pub fn new(owner: EntityId) -> Self {
        Self::with_clamp(owner, ClampPolicy::default())
    }

    pub fn with_clamp(owner: EntityId, clamp: ClampPolicy) -> Self {
        Self {
            owner,
            base: BTreeMap::new(),
            modifiers: BTreeMap::new(),
            cached: BTreeMap::new(),
            dirty: BTreeSet::new(),
            clamp,
            observers: Vec::new(),
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: EntityId) {
        self.owner = owner;
    }

    /// Replaces the clamp policy; every kind with a value is re-evaluated.
    pub fn set_clamp(&mut self, clamp: ClampPolicy) {
        self.clamp = clamp;
        let kinds: Vec<_> = self.known_kinds().collect();
        for kind in kinds {
            self.touch(kind);
        }
    }

    pub fn clamp(&self) -> &ClampPolicy {
        &self.clamp
    }

    pub fn base(&self, kind: AttributeKind) -> f64 {
        self.base.get(&kind).copied().unwrap_or(0.0)
    }

    pub fn set_base(&mut self, kind: AttributeKind, value: f64) {
        if self.base.get(&kind) == Some(&value) {
            return;
        }
        self.base.insert(kind, value);
        self.touch(kind);
    }

    /// Adds `delta` to the base value.
    pub fn add_base(&mut self, kind: AttributeKind, delta: f64) {
        if delta != 0.0 {
            self.set_base(kind, self.base(kind) + delta);
        }
    }

    /// Returns the computed value, recomputing and caching it if dirty.
    pub fn get_value(&mut self, kind: AttributeKind) -> f64 {
        if self.dirty.contains(&kind) || !self.cached.contains_key(&kind) {
            return self.refresh(kind);
        }
        let cached = self.cached[&kind];
        debug_assert!(
            same_value(cached, self.compute(kind)),
            "clean cache for {kind} on {} is stale",
            self.owner
        );
        cached
    }

    /// Read-only evaluation: the cached value when clean, else the formula
    /// without touching the cache.
    pub fn peek(&self, kind: AttributeKind) -> f64 {
        match self.cached.get(&kind) {
            Some(value) if !self.dirty.contains(&kind) => *value,
            _ => self.compute(kind),
        }
    }

    pub fn is_dirty(&self, kind: AttributeKind) -> bool {
        self.dirty.contains(&kind)
    }

    pub fn modifiers(&self, kind: AttributeKind) -> &[Modifier] {
        self.modifiers.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_modifier(&self, id: &ModifierId, kind: AttributeKind) -> bool {
        self.modifiers(kind).iter().any(|m| &m.id == id)
    }

    pub fn modifier_count(&self) -> usize {
        self.modifiers.values().map(Vec::len).sum()
    }

    /// Adds a modifier, replacing one with the same id on the same attribute.
    pub fn add_modifier(&mut self, modifier: Modifier) {
        let kind = modifier.attribute;
        let slot = self.modifiers.entry(kind).or_default();
        match slot.iter_mut().find(|m| m.id == modifier.id) {
            Some(existing) => *existing = modifier,
            None => slot.push(modifier),
        }
        self.touch(kind);
    }

    pub fn remove_modifier(&mut self, id: &ModifierId, kind: AttributeKind) -> bool {
        let Some(slot) = self.modifiers.get_mut(&kind) else {
            return false;
        };
        let before = slot.len();
        slot.retain(|m| &m.id != id);
        if slot.len() == before {
            return false;
        }
        if slot.is_empty() {
            self.modifiers.remove(&kind);
        }
        self.touch(kind);
        true
    }

    pub fn remove_all_from_source(&mut self, source: &ModifierSource) -> usize {
        self.remove_where(|m| &m.source == source)
    }

    /// Drops modifiers whose lifetime ended at or before `now`.
    pub fn tick(&mut self, now: Tick) -> usize {
        let removed = self.remove_where(|m| m.lifetime.is_expired(now));
        if removed > 0 {
            tracing::debug!(owner = %self.owner, removed, tick = %now, "modifiers expired");
        }
        removed
    }

    /// Attaches an observer. Pending values are settled first so the observer
    /// only hears about changes made after it subscribed.
    pub fn observe(&mut self, observer: Arc<dyn AttributeObserver>) {
        let pending: Vec<_> = self.known_kinds().collect();
        for kind in pending {
            self.refresh(kind);
        }
        self.observers.push(observer);
    }

    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    /// Current value as a fraction of its cap (`Health / MaxHealth`).
    ///
    /// Kinds without a cap, or with a non-positive cap, report zero.
    pub fn ratio(&self, kind: AttributeKind) -> f64 {
        let Some(maximum) = kind.maximum() else {
            return 0.0;
        };
        let cap = self.peek(maximum);
        if cap <= 0.0 {
            return 0.0;
        }
        self.peek(kind) / cap
    }

    fn remove_where(&mut self, mut predicate: impl FnMut(&Modifier) -> bool) -> usize {
        let mut touched = Vec::new();
        let mut removed = 0;
        for (kind, slot) in self.modifiers.iter_mut() {
            let before = slot.len();
            slot.retain(|m| !predicate(m));
            if slot.len() != before {
                removed += before - slot.len();
                touched.push(*kind);
            }
        }
        self.modifiers.retain(|_, slot| !slot.is_empty());
        for kind in touched {
            self.touch(kind);
        }
        removed
    }

    fn known_kinds(&self) -> impl Iterator<Item = AttributeKind> {
        let kinds: BTreeSet<_> = self
            .base
            .keys()
            .chain(self.modifiers.keys())
            .chain(self.cached.keys())
            .copied()
            .collect();
        kinds.into_iter()
    }

    fn touch(&mut self, kind: AttributeKind) {
        self.dirty.insert(kind);
        if !self.observers.is_empty() {
            self.refresh(kind);
        }
    }

    fn compute(&self, kind: AttributeKind) -> f64 {
        let totals = ModifierTotals::fold(self.modifiers(kind));
        self.clamp.apply(kind, totals.evaluate(self.base(kind)))
    }

    fn refresh(&mut self, kind: AttributeKind) -> f64 {
        let value = self.compute(kind);
        let old = self.cached.insert(kind, value).unwrap_or(0.0);
        self.dirty.remove(&kind);

        if !same_value(old, value) && !self.observers.is_empty() {
            let change = AttributeChange {
                owner: self.owner,
                kind,
                old,
                new: value,
            };
            for observer in &self.observers {
                observer.on_attribute_changed(&change);
            }
        }
        value
    }
}

impl fmt::Debug for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeSet")
            .field("owner", &self.owner)
            .field("base", &self.base)
            .field("modifiers", &self.modifiers)
            .field("dirty", &self.dirty)
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn same_value(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::types::Tick;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<AttributeChange>>);

    impl AttributeObserver for Recorder {
        fn on_attribute_changed(&self, change: &AttributeChange) {
            self.0.lock().unwrap().push(*change);
        }
    }

    fn set() -> AttributeSet {
        AttributeSet::new(EntityId(1))
    }

    #[test]
    fn set_base_marks_dirty_and_read_cleans() {
        let mut attrs = set();
        attrs.set_base(AttributeKind::Attack, 20.0);
        assert!(attrs.is_dirty(AttributeKind::Attack));
        assert_eq!(attrs.get_value(AttributeKind::Attack), 20.0);
        assert!(!attrs.is_dirty(AttributeKind::Attack));

        attrs.set_base(AttributeKind::Attack, 20.0);
        assert!(!attrs.is_dirty(AttributeKind::Attack), "unchanged base is a no-op");
    }

    #[test]
    fn formula_combines_all_stages() {
        let mut attrs = set();
        attrs.set_base(AttributeKind::Attack, 10.0);
        attrs.add_modifier(Modifier::flat("ring", "gear", AttributeKind::Attack, 5.0));
        attrs.add_modifier(Modifier::percent("rage", "buff", AttributeKind::Attack, 0.2));
        attrs.add_modifier(Modifier::percent("banner", "buff", AttributeKind::Attack, 0.3));
        attrs.add_modifier(Modifier::multiplier("frenzy", "buff", AttributeKind::Attack, 2.0));

        // (10 + 5) × 1.5 × 2
        assert_eq!(attrs.get_value(AttributeKind::Attack), 45.0);
    }

    #[test]
    fn same_id_replaces_instead_of_stacking() {
        let mut attrs = set();
        attrs.set_base(AttributeKind::Defense, 10.0);
        attrs.add_modifier(Modifier::flat("guard", "skill", AttributeKind::Defense, 5.0));
        attrs.add_modifier(Modifier::flat("guard", "skill", AttributeKind::Defense, 8.0));

        assert_eq!(attrs.modifiers(AttributeKind::Defense).len(), 1);
        assert_eq!(attrs.get_value(AttributeKind::Defense), 18.0);
    }

    #[test]
    fn remove_reports_presence() {
        let mut attrs = set();
        let id = ModifierId::from("guard");
        attrs.add_modifier(Modifier::flat("guard", "skill", AttributeKind::Defense, 5.0));

        assert!(attrs.remove_modifier(&id, AttributeKind::Defense));
        assert!(!attrs.remove_modifier(&id, AttributeKind::Defense));
        assert!(!attrs.remove_modifier(&id, AttributeKind::Attack));
    }

    #[test]
    fn remove_all_from_source_touches_each_kind() {
        let mut attrs = set();
        attrs.add_modifier(Modifier::flat("a", "blessing", AttributeKind::Attack, 5.0));
        attrs.add_modifier(Modifier::flat("d", "blessing", AttributeKind::Defense, 5.0));
        attrs.add_modifier(Modifier::flat("x", "gear", AttributeKind::Defense, 1.0));
        attrs.get_value(AttributeKind::Attack);
        attrs.get_value(AttributeKind::Defense);

        assert_eq!(attrs.remove_all_from_source(&"blessing".into()), 2);
        assert!(attrs.is_dirty(AttributeKind::Attack));
        assert_eq!(attrs.get_value(AttributeKind::Defense), 1.0);
    }

    #[test]
    fn tick_expires_timed_modifiers() {
        let mut attrs = set();
        attrs.set_base(AttributeKind::MoveSpeed, 4.0);
        attrs.add_modifier(
            Modifier::percent("haste", "potion", AttributeKind::MoveSpeed, 0.5).expires_at(Tick(10)),
        );
        assert_eq!(attrs.get_value(AttributeKind::MoveSpeed), 6.0);

        assert_eq!(attrs.tick(Tick(9)), 0);
        assert_eq!(attrs.tick(Tick(10)), 1);
        assert_eq!(attrs.get_value(AttributeKind::MoveSpeed), 4.0);
    }

    #[test]
    fn clamp_floors_health_only() {
        let mut attrs = set();
        attrs.set_base(AttributeKind::Health, -30.0);
        attrs.set_base(AttributeKind::Attack, -3.0);

        assert_eq!(attrs.get_value(AttributeKind::Health), 0.0);
        assert_eq!(attrs.get_value(AttributeKind::Attack), -3.0);
    }

    #[test]
    fn peek_does_not_touch_cache() {
        let mut attrs = set();
        attrs.set_base(AttributeKind::Mana, 12.0);
        assert_eq!(attrs.peek(AttributeKind::Mana), 12.0);
        assert!(attrs.is_dirty(AttributeKind::Mana));
    }

    #[test]
    fn observers_hear_changes_inside_mutation() {
        let mut attrs = set();
        attrs.set_base(AttributeKind::Health, 100.0);
        let recorder = Arc::new(Recorder::default());
        attrs.observe(recorder.clone());

        attrs.add_base(AttributeKind::Health, -20.0);
        attrs.add_modifier(Modifier::flat("m", "s", AttributeKind::Shield, 0.0));

        let changes = recorder.0.lock().unwrap();
        assert_eq!(changes.len(), 1, "unchanged computed values are silent");
        assert_eq!(changes[0].kind, AttributeKind::Health);
        assert_eq!(changes[0].old, 100.0);
        assert_eq!(changes[0].new, 80.0);
        assert!(!attrs.is_dirty(AttributeKind::Health));
    }

    #[test]
    fn ratio_against_cap() {
        let mut attrs = set();
        attrs.set_base(AttributeKind::Health, 25.0);
        attrs.set_base(AttributeKind::MaxHealth, 100.0);
        assert_eq!(attrs.ratio(AttributeKind::Health), 0.25);
        assert_eq!(attrs.ratio(AttributeKind::Attack), 0.0);
    }
}
