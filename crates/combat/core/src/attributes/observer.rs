use crate::attributes::AttributeKind;
use crate::types::EntityId;

/// A computed attribute value moved from `old` to `new`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeChange {
    pub owner: EntityId,
    pub kind: AttributeKind,
    pub old: f64,
    pub new: f64,
}

impl AttributeChange {
    pub fn delta(&self) -> f64 {
        self.new - self.old
    }
}

/// Receives attribute changes synchronously, inside the mutating call.
///
/// Observers must not mutate the set that notifies them.
pub trait AttributeObserver: Send + Sync {
    fn on_attribute_changed(&self, change: &AttributeChange);
}
