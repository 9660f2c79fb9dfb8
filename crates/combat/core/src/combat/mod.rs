//! Damage and healing math.
//!
//! Pure formulas live in [`damage`]; [`hit`] applies their results to an
//! [`AttributeSet`](crate::attributes::AttributeSet). Skill resolution, DoT
//! ticks and externally reported hits all go through [`hit::apply_damage`].
//!
//! - `raw = stat × coefficient × (1 + per_level × (level - 1))`
//! - `mitigated = max(minimum, raw × K / (K + defense))`
//! - critical hits multiply the mitigated value
//! - shields absorb before health, heals stop at the cap

pub mod damage;
pub mod hit;

pub use damage::{DamageKind, critical_amount, mitigate, raw_amount};
pub use hit::{HitReport, apply_damage, apply_heal};
