use combat_core::{AttributeKind, AttributeSet, EntityId, Modifier, ModifierKind};
use proptest::prelude::*;

fn modifier_kind() -> impl Strategy<Value = ModifierKind> {
    prop_oneof![
        Just(ModifierKind::Flat),
        Just(ModifierKind::Percent),
        Just(ModifierKind::Final),
    ]
}

fn modifiers() -> impl Strategy<Value = Vec<(ModifierKind, f64)>> {
    prop::collection::vec((modifier_kind(), -2.0f64..5.0), 0..8)
}

fn expected(base: f64, modifiers: &[(ModifierKind, f64)]) -> f64 {
    let (mut flat, mut percent, mut multiplier) = (0.0, 0.0, 1.0);
    for (kind, value) in modifiers {
        match kind {
            ModifierKind::Flat => flat += value,
            ModifierKind::Percent => percent += value,
            ModifierKind::Final => multiplier *= value,
        }
    }
    (base + flat) * (1.0 + percent) * multiplier
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #[test]
    fn value_follows_formula_after_set_base(
        initial in -100.0f64..100.0,
        base in -100.0f64..100.0,
        mods in modifiers(),
    ) {
        let mut attrs = AttributeSet::new(EntityId(1));
        attrs.set_base(AttributeKind::Attack, initial);
        for (i, (kind, value)) in mods.iter().enumerate() {
            attrs.add_modifier(Modifier::new(
                format!("m{i}"),
                "prop",
                AttributeKind::Attack,
                *kind,
                *value,
            ));
        }

        attrs.set_base(AttributeKind::Attack, base);
        let value = attrs.get_value(AttributeKind::Attack);

        prop_assert!(!attrs.is_dirty(AttributeKind::Attack));
        prop_assert!(close(value, expected(base, &mods)), "{value} vs {}", expected(base, &mods));
    }

    #[test]
    fn add_then_remove_restores_value(
        base in 0.0f64..200.0,
        mods in modifiers(),
        extra_kind in modifier_kind(),
        extra_value in -2.0f64..5.0,
    ) {
        let mut attrs = AttributeSet::new(EntityId(1));
        attrs.set_base(AttributeKind::Defense, base);
        for (i, (kind, value)) in mods.iter().enumerate() {
            attrs.add_modifier(Modifier::new(format!("m{i}"), "prop", AttributeKind::Defense, *kind, *value));
        }
        let before = attrs.get_value(AttributeKind::Defense);

        attrs.add_modifier(Modifier::new("extra", "prop", AttributeKind::Defense, extra_kind, extra_value));
        attrs.get_value(AttributeKind::Defense);
        prop_assert!(attrs.remove_modifier(&"extra".into(), AttributeKind::Defense));

        prop_assert!(close(attrs.get_value(AttributeKind::Defense), before));
    }

    #[test]
    fn clamped_resources_never_go_negative(start in 0.0f64..100.0, deltas in prop::collection::vec(-80.0f64..80.0, 1..10)) {
        let mut attrs = AttributeSet::new(EntityId(1));
        attrs.set_base(AttributeKind::Health, start);
        for delta in deltas {
            attrs.add_base(AttributeKind::Health, delta);
            prop_assert!(attrs.get_value(AttributeKind::Health) >= 0.0);
        }
    }
}
